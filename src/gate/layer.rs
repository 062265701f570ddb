use tower::Layer;

use super::{request_gate::RequestGate, service::GateService};

#[derive(Debug, Clone)]
pub struct GateLayer<V, Be> {
    gate: RequestGate<V, Be>,
}

impl<V, Be> GateLayer<V, Be> {
    pub fn new(gate: RequestGate<V, Be>) -> Self {
        Self { gate }
    }
}

impl<S, V, Be> Layer<S> for GateLayer<V, Be>
where
    V: Clone,
    Be: Clone,
{
    type Service = GateService<S, V, Be>;

    fn layer(&self, service: S) -> Self::Service {
        GateService::new(service, self.gate.clone())
    }
}
