//! Configuration types
//!
//! Board wiring and start-up display settings.

pub mod hardware;

pub use hardware::*;
