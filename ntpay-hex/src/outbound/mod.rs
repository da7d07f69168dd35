//! Outbound adapters: the real gateway clients and the simulation backend.

mod http;
mod paymongo;
mod simulation;
mod xendit;

pub use paymongo::PayMongoBackend;
pub use simulation::SimulationBackend;
pub use xendit::XenditBackend;

pub(crate) use http::build_client;
