//! Number rendering
//!
//! Turns an integer into the segment patterns for a window of digits.
//! This is pure: the board copies the result into its mirror and sends
//! it to the chip.
//!
//! # Layout
//!
//! Values are right-aligned in the window. Unused positions on the left
//! are filled with the pad pattern, or left blank for a negative value.
//! A negative value puts a minus sign in
//! the position directly left of its most significant digit, so it needs
//! one more position than its magnitude has digits.
//!
//! ```text
//!   42    (10, 8 digits) -> [ ][ ][ ][ ][ ][ ][4][2]
//!   -5    (10, 8 digits) -> [ ][ ][ ][ ][ ][ ][-][5]
//!   12345 (10, 4 digits) -> [-][-][-][-]   overflow
//! ```

use heapless::Vec;

use crate::segments::{nibble_segments, SEGMENTS_MINUS, SEGMENTS_OFF, SEGMENTS_OVERFLOW};

/// Most digits any supported value can need (u32 in base 2)
const MAX_VALUE_DIGITS: usize = 32;

/// Integer types that can be printed
///
/// Implemented for the 8, 16 and 32-bit signed and unsigned integers.
pub trait Integer: Copy {
    /// True if the value is below zero
    fn is_negative(self) -> bool;

    /// Absolute value
    fn magnitude(self) -> u32;
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl Integer for $ty {
            fn is_negative(self) -> bool {
                false
            }

            fn magnitude(self) -> u32 {
                u32::from(self)
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Integer for $ty {
            fn is_negative(self) -> bool {
                self < 0
            }

            fn magnitude(self) -> u32 {
                // Widen first so MIN negates without overflow
                i64::from(self).unsigned_abs() as u32
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32);
impl_signed!(i8, i16, i32);

/// Number base (2-16)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Radix(u8);

impl Radix {
    /// Binary
    pub const BIN: Radix = Radix(2);
    /// Octal
    pub const OCT: Radix = Radix(8);
    /// Decimal
    pub const DEC: Radix = Radix(10);
    /// Hexadecimal
    pub const HEX: Radix = Radix(16);

    /// Create a radix, or `None` if outside 2-16
    pub const fn new(radix: u8) -> Option<Self> {
        if radix >= 2 && radix <= 16 {
            Some(Radix(radix))
        } else {
            None
        }
    }

    /// The base as a number
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Radix {
    fn default() -> Self {
        Radix::DEC
    }
}

/// Options for a print call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrintOptions {
    /// Number base (2-16)
    pub radix: u8,
    /// Window width in digits; `None` uses every digit from the cursor to
    /// the right edge
    pub max_digits: Option<u8>,
    /// Segment pattern for unused positions left of a non-negative value
    pub pad: u8,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            radix: 10,
            max_digits: None,
            pad: SEGMENTS_OFF,
        }
    }
}

impl PrintOptions {
    /// Set the number base
    pub const fn radix(mut self, radix: u8) -> Self {
        self.radix = radix;
        self
    }

    /// Set the window width
    pub const fn max_digits(mut self, max_digits: u8) -> Self {
        self.max_digits = Some(max_digits);
        self
    }

    /// Set the pad pattern
    pub const fn pad(mut self, pad: u8) -> Self {
        self.pad = pad;
        self
    }
}

/// Outcome of rendering a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Printed {
    /// The value fit and is shown
    Value,
    /// The value did not fit; the window shows the overflow pattern
    Overflow,
}

/// Digits of `magnitude`, least significant first
fn digits(mut magnitude: u32, radix: Radix) -> Vec<u8, MAX_VALUE_DIGITS> {
    let base = u32::from(radix.get());
    let mut digits = Vec::new();
    loop {
        // Cannot fill up: base 2 needs at most 32 digits for a u32
        let _ = digits.push((magnitude % base) as u8);
        magnitude /= base;
        if magnitude == 0 {
            break;
        }
    }
    digits
}

/// Number of digits needed to show `magnitude` (zero needs one)
pub fn digit_count(magnitude: u32, radix: Radix) -> usize {
    digits(magnitude, radix).len()
}

/// Render `value` right-aligned into `window`
///
/// Every position of `window` is written. Unused positions get `pad`,
/// except for negative values, which are always padded blank. If the
/// value (plus its sign) needs more positions than the window has, every
/// position is set to [`SEGMENTS_OVERFLOW`] and [`Printed::Overflow`] is
/// returned.
pub fn render_window<N: Integer>(value: N, radix: Radix, pad: u8, window: &mut [u8]) -> Printed {
    let digits = digits(value.magnitude(), radix);
    let negative = value.is_negative();

    if digits.len() + usize::from(negative) > window.len() {
        window.fill(SEGMENTS_OVERFLOW);
        return Printed::Overflow;
    }

    let mut slots = window.iter_mut().rev();
    for (&digit, slot) in digits.iter().zip(slots.by_ref()) {
        *slot = nibble_segments(digit);
    }
    let pad = if negative {
        if let Some(slot) = slots.next() {
            *slot = SEGMENTS_MINUS;
        }
        SEGMENTS_OFF
    } else {
        pad
    };
    for slot in slots {
        *slot = pad;
    }

    Printed::Value
}
