use axum::{async_trait, extract::FromRequestParts, http::request::Parts, Extension};
use http::StatusCode;

use crate::authorize::permission::PermissionRequirement;

use super::request_gate::Admission;

/// The requirement an authorizing [`RequestGate`](super::RequestGate) found satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Granted(pub PermissionRequirement);

#[async_trait]
impl<S> FromRequestParts<S> for Granted
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let admission = Extension::<Admission>::from_request_parts(parts, state).await;

        match admission.ok().and_then(|Extension(admission)| admission.granted()) {
            Some(granted) => Ok(granted),
            None => {
                tracing::error!(
                    "Requested granted permission was not found. Did you wrap the route with an authorizing `RequestGate`?"
                );

                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
