use std::future::Future;

use jsonwebtoken::jwk::JwkSet;

/// Source of the identity provider's published signing keys.
#[cfg_attr(test, mockall::automock(type Error=anyhow::Error;))]
pub trait JwkSetFetcher {
    type Error;

    fn fetch_jwk_set(&self) -> impl Future<Output = Result<JwkSet, Self::Error>> + Send;
}
