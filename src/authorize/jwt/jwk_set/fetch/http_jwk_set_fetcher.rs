use jsonwebtoken::jwk::JwkSet;

use super::JwkSetFetcher;

/// Fetches `https://<domain>/.well-known/jwks.json`.
///
/// Timeouts are whatever the given [`reqwest::Client`] was built with.
#[derive(Debug, Clone)]
pub struct HttpJwkSetFetcher {
    jwks_uri: String,
    http_client: reqwest::Client,
}

impl HttpJwkSetFetcher {
    pub const fn new(jwks_uri: String, http_client: reqwest::Client) -> Self {
        Self {
            jwks_uri,
            http_client,
        }
    }

    pub fn for_domain(domain: &str, http_client: reqwest::Client) -> Self {
        Self::new(jwks_uri_for(domain), http_client)
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }
}

impl JwkSetFetcher for HttpJwkSetFetcher {
    type Error = HttpJwkSetFetchError;

    #[tracing::instrument(skip_all, fields(jwks_uri = %self.jwks_uri))]
    async fn fetch_jwk_set(&self) -> Result<JwkSet, Self::Error> {
        tracing::debug!("Fetching JWK set");

        let jwks = self
            .http_client
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(HttpJwkSetFetchError::Fetch)?
            .error_for_status()
            .map_err(HttpJwkSetFetchError::Status)?
            .json::<JwkSet>()
            .await
            .map_err(HttpJwkSetFetchError::Parse)?;

        Ok(jwks)
    }
}

fn jwks_uri_for(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}

#[derive(Debug, thiserror::Error)]
pub enum HttpJwkSetFetchError {
    #[error("Failed to fetch JWK set: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("JWK set endpoint answered with an error: {0}")]
    Status(#[source] reqwest::Error),
    #[error("Failed to parse JWK set: {0}")]
    Parse(#[source] reqwest::Error),
}
