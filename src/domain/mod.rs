//! Domain layer: checkout value types and the ports the orchestration core
//! depends on.

pub mod event;
pub mod lifecycle;
pub mod outcome;
pub mod ports;
pub mod redirect;
pub mod request;
