//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in lkm1638-core:
//!
//! - Bit-banged TM1638 transport over `embedded-hal` GPIO pins

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod transport;

pub use transport::{Tm1638, Tm1638Error};
