use std::{fmt::Display, future::Future, ops::Deref, sync::Arc};

use jsonwebtoken::{
    decode, decode_header,
    errors::{Error as JwtError, ErrorKind},
    DecodingKey,
};

use crate::error::AuthError;

use super::{
    jwk_set::{fetch::JwkSetFetcher, KeySetCache},
    Claims, Validation,
};

pub trait TokenVerifier {
    fn verify(&self, credential: &str) -> impl Future<Output = Result<Claims, AuthError>> + Send;
}

#[derive(Debug)]
pub struct JwtVerifierInner<F> {
    key_set_cache: KeySetCache<F>,
    validation: Validation,
}

/// Verifies bearer tokens against the identity provider's signing keys.
///
/// Cheap to clone, clones share the same key set cache.
#[derive(Debug)]
pub struct JwtVerifier<F> {
    inner: Arc<JwtVerifierInner<F>>,
}

impl<F> Clone for JwtVerifier<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<F> Deref for JwtVerifier<F> {
    type Target = JwtVerifierInner<F>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<F> JwtVerifier<F> {
    pub fn new(key_set_cache: KeySetCache<F>, validation: Validation) -> Self {
        Self {
            inner: Arc::new(JwtVerifierInner {
                key_set_cache,
                validation,
            }),
        }
    }
}

impl<F> JwtVerifierInner<F>
where
    F: JwkSetFetcher + Sync,
    F::Error: Display,
{
    pub fn key_set_cache(&self) -> &KeySetCache<F> {
        &self.key_set_cache
    }

    async fn verify_jwt(&self, jwt: &str) -> Result<Claims, AuthError> {
        let header = decode_header(jwt).map_err(|err| {
            tracing::debug!(%err, "Header decode error");

            AuthError::BadSignature
        })?;

        if !self.validation.accepts(header.alg) {
            tracing::debug!(alg = ?header.alg, "Algorithm not accepted");

            return Err(AuthError::BadSignature);
        }

        let kid = header.kid.ok_or(AuthError::UnknownKey)?;

        let jwk = self.key_set_cache.find(&kid).await?;

        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|err| {
            tracing::warn!(%err, %kid, "Decoding key creation error");

            AuthError::UnknownKey
        })?;

        let token_data = decode::<Claims>(
            jwt,
            &decoding_key,
            &self.validation.to_jsonwebtoken_validation(),
        )
        .map_err(classify)?;

        Ok(token_data.claims)
    }
}

fn classify(err: JwtError) -> AuthError {
    tracing::debug!(%err, "Data decode error");

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => AuthError::BadSignature,
    }
}

impl<F> TokenVerifier for JwtVerifier<F>
where
    F: JwkSetFetcher + Send + Sync,
    F::Error: Display,
{
    #[tracing::instrument(skip_all)]
    async fn verify(&self, credential: &str) -> Result<Claims, AuthError> {
        self.verify_jwt(credential).await
    }
}
