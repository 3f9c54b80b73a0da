//! Hardware abstraction traits
//!
//! These traits define the interface between the board logic and the
//! chip-level transport that actually clocks bits into the TM1638.

pub mod transport;

pub use transport::{Tm1638Transport, DISPLAY_REGISTERS, KEY_SCAN_BYTES, MAX_BRIGHTNESS};
