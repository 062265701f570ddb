use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use http::Request;
use tower::Service;

use crate::{
    authorize::{header::BearerExtractor, jwt::TokenVerifier},
    error::AuthError,
};

use super::request_gate::RequestGate;

/// Admits or refuses a request before the wrapped service sees it.
///
/// On success the [`Admission`](super::Admission) is inserted into the request extensions.
#[derive(Debug, Clone)]
pub struct GateService<S, V, Be> {
    service: S,
    gate: RequestGate<V, Be>,
}

impl<S, V, Be> GateService<S, V, Be> {
    pub fn new(service: S, gate: RequestGate<V, Be>) -> Self {
        Self { service, gate }
    }
}

impl<S, V, Be, B> Service<Request<B>> for GateService<S, V, Be>
where
    V: TokenVerifier + Clone + Send + Sync + 'static,
    Be: BearerExtractor + Clone + Send + Sync + 'static,
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send,
    S::Response: From<AuthError>,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        // The clone was not driven to readiness, keep the ready one for this call.
        let clone = self.service.clone();
        let mut service = std::mem::replace(&mut self.service, clone);
        let gate = self.gate.clone();

        Box::pin(async move {
            let headers = request.headers();

            let admission = match gate.admit(headers).await {
                Ok(admission) => admission,
                Err(err) => return Ok(From::from(err)),
            };

            request.extensions_mut().insert(admission);

            service.call(request).await
        })
    }
}
