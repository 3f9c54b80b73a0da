//! TM1638 transport implementations

pub mod tm1638;

pub use tm1638::{Tm1638, Tm1638Error};
