use std::{fmt::Display, sync::Arc, time::Duration};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::{sync::RwLock, time::Instant};

use crate::error::AuthError;

use super::fetch::JwkSetFetcher;

#[derive(Debug)]
struct JwkSetHolder {
    fetched_at: Instant,
    jwk_set: Arc<JwkSet>,
}

/// Process wide cache of the identity provider's signing keys.
///
/// The set is fetched lazily, served while younger than `time_to_live` and replaced as a whole
/// on refresh. A lookup for an unknown key id triggers one refetch, unless the cached set is
/// younger than `refetch_cooldown`.
#[derive(Debug)]
pub struct KeySetCache<F> {
    time_to_live: Duration,
    refetch_cooldown: Duration,
    jwk_set_fetcher: F,
    holder: RwLock<Option<JwkSetHolder>>,
}

impl<F> KeySetCache<F>
where
    F: JwkSetFetcher + Sync,
    F::Error: Display,
{
    pub fn new(time_to_live: Duration, refetch_cooldown: Duration, jwk_set_fetcher: F) -> Self {
        Self {
            time_to_live,
            refetch_cooldown,
            jwk_set_fetcher,
            holder: RwLock::new(None),
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn get_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        if let Some(holder) = self.holder.read().await.as_ref() {
            if holder.fetched_at.elapsed() < self.time_to_live {
                return Ok(holder.jwk_set.clone());
            }
        }

        self.refresh().await
    }

    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        tracing::debug!("Refreshing JWK set");

        let jwk_set = self
            .jwk_set_fetcher
            .fetch_jwk_set()
            .await
            .map_err(|err| {
                tracing::error!(%err, "Failed to fetch JWK set");

                AuthError::UpstreamUnavailable
            })?;

        let jwk_set = Arc::new(jwk_set);

        *(self.holder.write().await) = Some(JwkSetHolder {
            fetched_at: Instant::now(),
            jwk_set: jwk_set.clone(),
        });

        Ok(jwk_set)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find(&self, kid: &str) -> Result<Jwk, AuthError> {
        let jwk_set = self.get_keys().await?;

        if let Some(jwk) = jwk_set.find(kid) {
            return Ok(jwk.clone());
        }

        if !self.may_refetch().await {
            tracing::warn!("Unknown kid, refetch is cooling down");

            return Err(AuthError::UnknownKey);
        }

        let jwk_set = self.refresh().await?;

        jwk_set.find(kid).cloned().ok_or(AuthError::UnknownKey)
    }

    async fn may_refetch(&self) -> bool {
        self.holder
            .read()
            .await
            .as_ref()
            .map_or(true, |holder| {
                holder.fetched_at.elapsed() >= self.refetch_cooldown
            })
    }
}
