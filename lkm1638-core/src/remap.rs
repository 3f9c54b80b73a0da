//! JY-LKM1638 wiring
//!
//! The board does not use the TM1638 lines in the order a reader of the
//! datasheet would expect:
//!
//! - Digit `p` (0 = leftmost) is on GRID(p+1), which the chip stores in
//!   display register `2p`.
//! - The red/green LED `l` (0 = leftmost) hangs off SEG9/SEG10 of the same
//!   grid, i.e. display register `2l + 1`, bit 0 red and bit 1 green.
//! - Switch S(i+1) sits on key line K3, but the switches are spread over the
//!   scan rows as KS1, KS3, KS5, KS7, KS2, KS4, KS6, KS8.
//!
//! Each helper here has an inverse so the tables can be checked as
//! permutations.

use crate::traits::KEY_SCAN_BYTES;

/// Number of 7-segment digits on the board
pub const NUM_DIGITS: u8 = 8;

/// Number of red/green LEDs on the board
pub const NUM_COLOR_LEDS: u8 = 8;

/// Number of push buttons on the board
pub const NUM_BUTTONS: u8 = 8;

/// Button bit for each key scan row (KS1..KS8)
const KEY_ROW_TO_BUTTON: [u8; 8] = [0, 4, 1, 5, 2, 6, 3, 7];

/// Key scan row for each button bit (S1..S8)
const BUTTON_TO_KEY_ROW: [u8; 8] = [0, 2, 4, 6, 1, 3, 5, 7];

/// K3 bit of the low (odd KS) and high (even KS) row in a key scan byte
const K3_LOW_ROW: u8 = 0b0000_0001;
const K3_HIGH_ROW: u8 = 0b0001_0000;

/// Display register holding the segments of digit `pos`
pub fn digit_register(pos: u8) -> Option<u8> {
    (pos < NUM_DIGITS).then(|| pos << 1)
}

/// Digit position stored in display register `address`
pub fn register_digit(address: u8) -> Option<u8> {
    (address < NUM_DIGITS << 1 && address & 1 == 0).then(|| address >> 1)
}

/// Display register holding LED `led`
pub fn led_register(led: u8) -> Option<u8> {
    (led < NUM_COLOR_LEDS).then(|| (led << 1) | 1)
}

/// LED index stored in display register `address`
pub fn register_led(address: u8) -> Option<u8> {
    (address < NUM_COLOR_LEDS << 1 && address & 1 == 1).then(|| address >> 1)
}

/// Button bit wired to key scan row `row` (0 = KS1)
pub fn key_row_button(row: u8) -> Option<u8> {
    KEY_ROW_TO_BUTTON.get(usize::from(row)).copied()
}

/// Key scan row wired to button bit `button` (0 = S1)
pub fn button_key_row(button: u8) -> Option<u8> {
    BUTTON_TO_KEY_ROW.get(usize::from(button)).copied()
}

/// Collapse a raw key scan into one bit per scan row
///
/// Bit `r` is set when K3 of row KS(r+1) is closed. The other key lines
/// are not populated on this board and are ignored.
pub fn key_scan_rows(scan: &[u8; KEY_SCAN_BYTES]) -> u8 {
    scan.iter().enumerate().fold(0u8, |rows, (n, &byte)| {
        let mut rows = rows;
        if byte & K3_LOW_ROW != 0 {
            rows |= 1 << (2 * n);
        }
        if byte & K3_HIGH_ROW != 0 {
            rows |= 1 << (2 * n + 1);
        }
        rows
    })
}

/// Reorder a row mask into a button mask (bit i = S(i+1))
pub fn rows_to_buttons(rows: u8) -> u8 {
    permute(rows, &KEY_ROW_TO_BUTTON)
}

/// Reorder a button mask into a row mask
pub fn buttons_to_rows(buttons: u8) -> u8 {
    permute(buttons, &BUTTON_TO_KEY_ROW)
}

/// Button mask for a raw key scan
pub fn key_scan_buttons(scan: &[u8; KEY_SCAN_BYTES]) -> u8 {
    rows_to_buttons(key_scan_rows(scan))
}

/// Move bit `i` of `mask` to bit `table[i]`
fn permute(mask: u8, table: &[u8; 8]) -> u8 {
    table
        .iter()
        .enumerate()
        .filter(|&(bit, _)| mask & (1 << bit) != 0)
        .fold(0, |out, (_, &target)| out | (1 << target))
}
