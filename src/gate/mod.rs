mod granted;
mod layer;
mod request_gate;
mod service;

pub use granted::Granted;
pub use layer::GateLayer;
pub use request_gate::{Admission, RequestGate};
pub use service::GateService;
