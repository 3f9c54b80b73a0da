//! Board logic for the JY-LKM1638 module
//!
//! The JY-LKM1638 carries a TM1638 driving eight 7-segment digits, eight
//! red/green LEDs and eight push buttons. This crate contains everything
//! that does not depend on how bits reach the chip:
//!
//! - The transport trait the chip driver implements
//! - The board wiring (digit, LED and button remapping)
//! - Number rendering with padding, sign and overflow handling
//! - The board driver that keeps the display mirror
//! - Configuration and error types
//!
//! A bit-banged transport over `embedded-hal` pins lives in
//! `lkm1638-drivers`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod config;
pub mod error;
pub mod remap;
pub mod render;
pub mod segments;
pub mod traits;

pub use board::{LedColor, Lkm1638Board};
pub use config::{BoardConfig, ConfigError};
pub use error::{BoardError, BoardResult};
pub use render::{Integer, PrintOptions, Printed, Radix};
pub use traits::Tm1638Transport;
