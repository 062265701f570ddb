use std::future::Future;

use http::HeaderMap;

use crate::{
    authorize::{
        header::{BearerExtractor, DefaultBearerExtractor},
        jwt::{Claims, TokenVerifier},
        permission::PermissionRequirement,
    },
    error::AuthError,
};

use super::{layer::GateLayer, Granted};

/// Outcome of passing a [`RequestGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The credential verified, its claims were discarded.
    Authenticated,
    /// The credential verified and satisfied this requirement.
    Authorized(PermissionRequirement),
}

impl Admission {
    pub fn granted(self) -> Option<Granted> {
        match self {
            Admission::Authenticated => None,
            Admission::Authorized(requirement) => Some(Granted(requirement)),
        }
    }
}

/// Composes bearer extraction, token verification and, optionally, a permission check in front
/// of a protected operation.
#[derive(Debug, Clone)]
pub struct RequestGate<V, Be = DefaultBearerExtractor> {
    verifier: V,
    bearer_extractor: Be,
    requirement: Option<PermissionRequirement>,
}

impl<V> RequestGate<V> {
    /// Any verified credential is admitted.
    pub fn authenticated(verifier: V) -> Self {
        Self::new(verifier, DefaultBearerExtractor::new(), None)
    }

    /// Only verified credentials whose claims satisfy `requirement` are admitted.
    pub fn authorized(verifier: V, requirement: impl Into<PermissionRequirement>) -> Self {
        Self::new(
            verifier,
            DefaultBearerExtractor::new(),
            Some(requirement.into()),
        )
    }
}

impl<V, Be> RequestGate<V, Be> {
    pub const fn new(
        verifier: V,
        bearer_extractor: Be,
        requirement: Option<PermissionRequirement>,
    ) -> Self {
        Self {
            verifier,
            bearer_extractor,
            requirement,
        }
    }

    pub fn layer(self) -> GateLayer<V, Be> {
        GateLayer::new(self)
    }
}

impl<V, Be> RequestGate<V, Be>
where
    V: TokenVerifier + Sync,
    Be: BearerExtractor + Sync,
{
    /// Extracts and verifies the credential.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let credential = self.bearer_extractor.extract_bearer(headers)?;

        self.verifier.verify(credential).await
    }

    #[tracing::instrument(skip_all, fields(requirement = ?self.requirement))]
    pub async fn admit(&self, headers: &HeaderMap) -> Result<Admission, AuthError> {
        let claims = self.authenticate(headers).await?;

        match &self.requirement {
            None => Ok(Admission::Authenticated),
            Some(requirement) => {
                requirement.authorize(&claims)?;

                Ok(Admission::Authorized(requirement.clone()))
            }
        }
    }

    /// Runs `operation` once if the request is admitted, never otherwise.
    pub async fn guard<Op, Fut, T>(
        &self,
        headers: &HeaderMap,
        operation: Op,
    ) -> Result<T, AuthError>
    where
        Op: FnOnce(Admission) -> Fut,
        Fut: Future<Output = T>,
    {
        let admission = self.admit(headers).await?;

        Ok(operation(admission).await)
    }
}
