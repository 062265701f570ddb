mod http_jwk_set_fetcher;
mod jwk_set_fetcher;

pub use http_jwk_set_fetcher::{HttpJwkSetFetchError, HttpJwkSetFetcher};
pub use jwk_set_fetcher::JwkSetFetcher;

#[cfg(test)]
pub use jwk_set_fetcher::MockJwkSetFetcher;
