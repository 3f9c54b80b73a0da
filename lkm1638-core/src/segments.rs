//! 7-segment patterns
//!
//! Segment lines SEG1..SEG8 of each digit register drive the segments in
//! the usual order:
//!
//! ```text
//!    aaaa
//!   f    b
//!   f    b
//!    gggg
//!   e    c
//!   e    c
//!    dddd  dp
//! ```
//!
//! Bit 0 = a, bit 1 = b, ... bit 6 = g, bit 7 = dp.

/// All segments off
pub const SEGMENTS_OFF: u8 = 0b0000_0000;

/// Minus sign (segment g)
pub const SEGMENTS_MINUS: u8 = 0b0100_0000;

/// Degree symbol (segments a, b, f, g)
pub const SEGMENTS_DEGREE: u8 = 0b0110_0011;

/// Celsius symbol (segments a, d, e, f)
pub const SEGMENTS_C: u8 = 0b0011_1001;

/// Decimal point
pub const SEGMENT_DOT: u8 = 0b1000_0000;

/// Pattern drawn in every position of a print window the value does not fit
pub const SEGMENTS_OVERFLOW: u8 = SEGMENTS_MINUS;

/// Hexadecimal digits 0-F
const HEX_DIGITS: [u8; 16] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
    0b0111_0111, // A
    0b0111_1100, // b
    0b0011_1001, // C
    0b0101_1110, // d
    0b0111_1001, // E
    0b0111_0001, // F
];

/// Segment pattern for a hexadecimal digit (0-15)
///
/// Returns `None` for values above 15.
pub fn digit_segments(digit: u8) -> Option<u8> {
    HEX_DIGITS.get(usize::from(digit)).copied()
}

/// Segment pattern for the low nibble of `digit`
pub(crate) const fn nibble_segments(digit: u8) -> u8 {
    HEX_DIGITS[(digit & 0x0F) as usize]
}

/// Digit value shown by a segment pattern, ignoring the decimal point
///
/// Returns `None` if the pattern is not one of the hex digits.
pub fn segments_digit(segments: u8) -> Option<u8> {
    let segments = segments & !SEGMENT_DOT;
    HEX_DIGITS
        .iter()
        .position(|&pattern| pattern == segments)
        .map(|digit| digit as u8)
}
