//! LocalChat core — everything between the UI surface and the inference
//! backend that does not touch a platform API.

pub mod ports;
pub mod session;
pub mod runtime;
pub mod queue;
pub mod event_bus;
