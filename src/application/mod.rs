//! Application layer containing the checkout completion orchestration.
//!
//! `DropInHost` is the entry point for one host instance. It gates the two
//! completion sources (the redirect `ResultBridge` and the in-process
//! `EventChannel`) on the host lifecycle and funnels both into a single
//! `ActivityFinalizer`.

pub mod analytics;
pub mod bridge;
pub mod channel;
pub mod finalizer;
pub mod gate;
pub mod host;
