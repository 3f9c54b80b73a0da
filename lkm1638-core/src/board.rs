//! JY-LKM1638 board
//!
//! [`Lkm1638Board`] keeps a mirror of everything shown on the board (digit
//! segments, decimal points, LED colours) and translates board-level
//! operations into TM1638 register writes through the wiring in
//! [`crate::remap`].
//!
//! # Usage
//!
//! ```ignore
//! let transport = Tm1638::new(clk, dio, stb, delay)?;
//! let mut board = Lkm1638Board::new(transport, BoardConfig::default())?;
//! board.init()?;
//!
//! board.print(-42i16)?;               // "     -42"
//! board.set_color_led(0, LedColor::Red)?;
//! if board.read_buttons()? & 0x01 != 0 {
//!     board.dot_on(7)?;
//! }
//! ```
//!
//! # Print cursor
//!
//! Print calls write a window that starts at the print cursor and, unless
//! a width is given, runs to the right edge. Printing never moves the
//! cursor; set it explicitly with [`Lkm1638Board::set_print_pos`].
//!
//! # Mirror and errors
//!
//! The mirror is updated before the chip is written. If the transport
//! fails the error is returned as [`BoardError::Transport`] and the
//! intended state can be re-sent later with [`Lkm1638Board::refresh`].

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::remap::{self, NUM_COLOR_LEDS, NUM_DIGITS};
use crate::render::{self, Integer, PrintOptions, Printed, Radix};
use crate::segments::{digit_segments, SEGMENTS_OFF, SEGMENT_DOT};
use crate::traits::{Tm1638Transport, DISPLAY_REGISTERS, MAX_BRIGHTNESS};

/// State of one red/green LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
}

impl LedColor {
    /// LED register value (SEG9 = red, SEG10 = green)
    pub const fn bits(self) -> u8 {
        match self {
            LedColor::Off => 0b00,
            LedColor::Red => 0b01,
            LedColor::Green => 0b10,
        }
    }
}

/// JY-LKM1638 board driver
pub struct Lkm1638Board<T> {
    transport: T,
    config: BoardConfig,
    /// Segment patterns per digit, without the dot bit from `dots`
    digits: [u8; NUM_DIGITS as usize],
    /// Bit n = decimal point of digit n
    dots: u8,
    leds: [LedColor; NUM_COLOR_LEDS as usize],
    /// Print cursor (0-7)
    cursor: u8,
    brightness: u8,
    display_on: bool,
}

impl<T: Tm1638Transport> Lkm1638Board<T> {
    /// Create a board on top of `transport`
    ///
    /// Nothing is sent to the chip until [`Self::init`] or another
    /// operation is called.
    pub fn new(transport: T, config: BoardConfig) -> BoardResult<Self, T::Error> {
        config.validate()?;

        Ok(Self {
            transport,
            brightness: config.brightness,
            display_on: config.display_on,
            config,
            digits: [SEGMENTS_OFF; NUM_DIGITS as usize],
            dots: 0,
            leds: [LedColor::Off; NUM_COLOR_LEDS as usize],
            cursor: 0,
        })
    }

    /// Blank the board and apply the configured display state
    pub fn init(&mut self) -> BoardResult<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "LKM1638 init (brightness={=u8}, display_on={})",
            self.brightness,
            self.display_on
        );

        self.clear()?;
        self.apply_display()
    }

    /// Get the configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    ///
    /// Writes made directly through the transport are not reflected in the
    /// mirror and are overwritten by the next [`Self::refresh`].
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the board and return the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Read the push buttons
    ///
    /// Bit i is set while switch S(i+1) is held.
    pub fn read_buttons(&mut self) -> BoardResult<u8, T::Error> {
        let scan = self
            .transport
            .read_key_scan()
            .map_err(BoardError::Transport)?;
        Ok(remap::key_scan_buttons(&scan))
    }

    /// Turn every segment, dot and LED off
    pub fn clear(&mut self) -> BoardResult<(), T::Error> {
        self.digits = [SEGMENTS_OFF; NUM_DIGITS as usize];
        self.dots = 0;
        self.leds = [LedColor::Off; NUM_COLOR_LEDS as usize];

        self.transport
            .write_registers(0, &[0; DISPLAY_REGISTERS])
            .map_err(BoardError::Transport)
    }

    /// Set one LED
    pub fn set_color_led(&mut self, led: u8, color: LedColor) -> BoardResult<(), T::Error> {
        let address = remap::led_register(led).ok_or(BoardError::LedOutOfRange(led))?;
        let slot = self
            .leds
            .get_mut(usize::from(led))
            .ok_or(BoardError::LedOutOfRange(led))?;
        *slot = color;

        #[cfg(feature = "defmt")]
        defmt::trace!("LED {=u8} -> {}", led, color);

        self.transport
            .write_register(address, color.bits())
            .map_err(BoardError::Transport)
    }

    /// Set every LED whose bit is set in `leds` to `color`
    pub fn color_leds_on(&mut self, leds: u8, color: LedColor) -> BoardResult<(), T::Error> {
        for led in 0..NUM_COLOR_LEDS {
            if leds & (1 << led) != 0 {
                self.set_color_led(led, color)?;
            }
        }
        Ok(())
    }

    /// Turn off every LED whose bit is set in `leds`
    pub fn color_leds_off(&mut self, leds: u8) -> BoardResult<(), T::Error> {
        self.color_leds_on(leds, LedColor::Off)
    }

    /// Current colour of LED `led`
    pub fn led_color(&self, led: u8) -> Option<LedColor> {
        self.leds.get(usize::from(led)).copied()
    }

    /// Send the whole mirror to the chip in one exchange
    pub fn refresh(&mut self) -> BoardResult<(), T::Error> {
        let image = self.register_image();
        self.transport
            .write_registers(0, &image)
            .map_err(BoardError::Transport)
    }

    /// Light the decimal point of digit `pos`
    pub fn dot_on(&mut self, pos: u8) -> BoardResult<(), T::Error> {
        remap::digit_register(pos).ok_or(BoardError::DigitOutOfRange(pos))?;
        self.dots |= 1 << pos;
        self.write_digit(pos)
    }

    /// Clear the decimal point of digit `pos`
    pub fn dot_off(&mut self, pos: u8) -> BoardResult<(), T::Error> {
        remap::digit_register(pos).ok_or(BoardError::DigitOutOfRange(pos))?;
        self.dots &= !(1 << pos);
        self.write_digit(pos)
    }

    /// Set all decimal points at once (bit n = digit n)
    pub fn set_dots(&mut self, dots: u8) -> BoardResult<(), T::Error> {
        self.dots = dots;
        for pos in 0..NUM_DIGITS {
            self.write_digit(pos)?;
        }
        Ok(())
    }

    /// Current decimal points
    pub fn dots(&self) -> u8 {
        self.dots
    }

    /// Move the print cursor
    pub fn set_print_pos(&mut self, pos: u8) -> BoardResult<(), T::Error> {
        if pos >= NUM_DIGITS {
            return Err(BoardError::CursorOutOfRange(pos));
        }
        self.cursor = pos;
        Ok(())
    }

    /// Current print cursor
    pub fn print_pos(&self) -> u8 {
        self.cursor
    }

    /// Show a raw segment pattern on digit `pos`
    ///
    /// The decimal point from [`Self::dots`] is added on the wire. A dot
    /// bit in `segments` turns that decimal point on, so it can later be
    /// cleared with [`Self::dot_off`].
    pub fn set_segments_digit(&mut self, pos: u8, segments: u8) -> BoardResult<(), T::Error> {
        self.store_segments(pos, segments)?;
        self.write_digit(pos)
    }

    /// Show a hexadecimal digit (0-15) on digit `pos`
    pub fn set_digit(&mut self, pos: u8, digit: u8) -> BoardResult<(), T::Error> {
        let segments = digit_segments(digit).ok_or(BoardError::DigitValueOutOfRange(digit))?;
        self.set_segments_digit(pos, segments)
    }

    /// Segment pattern stored for digit `pos`, without its decimal point
    pub fn segments_at(&self, pos: u8) -> Option<u8> {
        self.digits.get(usize::from(pos)).copied()
    }

    /// Segment patterns of all digits, without decimal points
    pub fn digits(&self) -> &[u8; NUM_DIGITS as usize] {
        &self.digits
    }

    /// Print a decimal value at the cursor, right-aligned to the edge
    pub fn print<N: Integer>(&mut self, value: N) -> BoardResult<Printed, T::Error> {
        self.print_with(value, PrintOptions::default())
    }

    /// Print a value in the given radix at the cursor
    pub fn print_radix<N: Integer>(&mut self, value: N, radix: u8) -> BoardResult<Printed, T::Error> {
        self.print_with(value, PrintOptions::default().radix(radix))
    }

    /// Print a value with explicit options
    ///
    /// The window starts at the cursor and is `options.max_digits` wide
    /// (default: up to the last digit). A value that does not fit shows
    /// the overflow pattern across the window and returns
    /// [`Printed::Overflow`].
    pub fn print_with<N: Integer>(
        &mut self,
        value: N,
        options: PrintOptions,
    ) -> BoardResult<Printed, T::Error> {
        let radix = Radix::new(options.radix).ok_or(BoardError::InvalidRadix(options.radix))?;

        let start = self.cursor;
        let remaining = NUM_DIGITS - start;
        let len = options.max_digits.unwrap_or(remaining);
        if len == 0 || len > remaining {
            return Err(BoardError::InvalidWindow { start, len });
        }

        let mut buffer = [SEGMENTS_OFF; NUM_DIGITS as usize];
        let window = &mut buffer[..usize::from(len)];
        let printed = render::render_window(value, radix, options.pad, window);

        #[cfg(feature = "defmt")]
        if printed == Printed::Overflow {
            defmt::warn!("Value does not fit {=u8} digits at position {=u8}", len, start);
        }

        // Mirror holds the whole window before the first write
        for (pos, &segments) in (start..).zip(window.iter()) {
            self.store_segments(pos, segments)?;
        }
        for pos in start..start + len {
            self.write_digit(pos)?;
        }

        Ok(printed)
    }

    /// Set the display brightness (0-7)
    pub fn set_brightness(&mut self, brightness: u8) -> BoardResult<(), T::Error> {
        if brightness > MAX_BRIGHTNESS {
            return Err(BoardError::BrightnessOutOfRange(brightness));
        }
        self.brightness = brightness;
        self.apply_display()
    }

    /// Current brightness
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Switch the display on
    pub fn display_on(&mut self) -> BoardResult<(), T::Error> {
        self.display_on = true;
        self.apply_display()
    }

    /// Switch the display off (the mirror and chip RAM are kept)
    pub fn display_off(&mut self) -> BoardResult<(), T::Error> {
        self.display_on = false;
        self.apply_display()
    }

    /// True if the display is switched on
    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    fn apply_display(&mut self) -> BoardResult<(), T::Error> {
        self.transport
            .set_display(self.display_on, self.brightness)
            .map_err(BoardError::Transport)
    }

    /// Put `segments` into the mirror, moving its dot bit into `dots`
    fn store_segments(&mut self, pos: u8, segments: u8) -> BoardResult<(), T::Error> {
        let slot = self
            .digits
            .get_mut(usize::from(pos))
            .ok_or(BoardError::DigitOutOfRange(pos))?;
        *slot = segments & !SEGMENT_DOT;
        if segments & SEGMENT_DOT != 0 {
            self.dots |= 1 << pos;
        }
        Ok(())
    }

    /// Digit segments with the decimal point merged in
    fn wire_segments(&self, pos: u8) -> Option<u8> {
        let segments = *self.digits.get(usize::from(pos))?;
        if self.dots & (1 << pos) != 0 {
            Some(segments | SEGMENT_DOT)
        } else {
            Some(segments)
        }
    }

    /// Send digit `pos` from the mirror to the chip
    fn write_digit(&mut self, pos: u8) -> BoardResult<(), T::Error> {
        let address = remap::digit_register(pos).ok_or(BoardError::DigitOutOfRange(pos))?;
        let data = self
            .wire_segments(pos)
            .ok_or(BoardError::DigitOutOfRange(pos))?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Digit {=u8} -> {=u8:#b}", pos, data);

        self.transport
            .write_register(address, data)
            .map_err(BoardError::Transport)
    }

    /// All sixteen display registers as the mirror describes them
    fn register_image(&self) -> [u8; DISPLAY_REGISTERS] {
        let mut image = [0; DISPLAY_REGISTERS];
        for index in 0..NUM_DIGITS {
            let digit = remap::digit_register(index).zip(self.wire_segments(index));
            let led = remap::led_register(index).zip(self.led_color(index).map(LedColor::bits));
            for (address, data) in digit.into_iter().chain(led) {
                if let Some(register) = image.get_mut(usize::from(address)) {
                    *register = data;
                }
            }
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::segments::{segments_digit, SEGMENTS_C, SEGMENTS_MINUS, SEGMENTS_OVERFLOW};
    use crate::traits::KEY_SCAN_BYTES;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockError;

    /// Mock TM1638 keeping a register image
    struct MockTransport {
        registers: [u8; DISPLAY_REGISTERS],
        exchanges: usize,
        keys: [u8; KEY_SCAN_BYTES],
        display: Option<(bool, u8)>,
        fail: bool,
        /// Fail every exchange once this many have succeeded
        fail_after: Option<usize>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                registers: [0; DISPLAY_REGISTERS],
                exchanges: 0,
                keys: [0; KEY_SCAN_BYTES],
                display: None,
                fail: false,
                fail_after: None,
            }
        }

        fn digit(&self, pos: u8) -> u8 {
            self.registers[usize::from(pos) * 2]
        }

        fn led(&self, led: u8) -> u8 {
            self.registers[usize::from(led) * 2 + 1]
        }

        fn digit_values(&self) -> [Option<u8>; 8] {
            core::array::from_fn(|pos| segments_digit(self.digit(pos as u8)))
        }

        fn exchange(&mut self) -> Result<(), MockError> {
            if self.fail || self.fail_after.is_some_and(|limit| self.exchanges >= limit) {
                return Err(MockError);
            }
            self.exchanges += 1;
            Ok(())
        }
    }

    impl Tm1638Transport for MockTransport {
        type Error = MockError;

        fn write_register(&mut self, address: u8, data: u8) -> Result<(), Self::Error> {
            self.exchange()?;
            self.registers[usize::from(address)] = data;
            Ok(())
        }

        fn write_registers(&mut self, start: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.exchange()?;
            let start = usize::from(start);
            self.registers[start..start + data.len()].copy_from_slice(data);
            Ok(())
        }

        fn read_key_scan(&mut self) -> Result<[u8; KEY_SCAN_BYTES], Self::Error> {
            self.exchange()?;
            Ok(self.keys)
        }

        fn set_display(&mut self, on: bool, brightness: u8) -> Result<(), Self::Error> {
            self.exchange()?;
            self.display = Some((on, brightness));
            Ok(())
        }
    }

    fn board() -> Lkm1638Board<MockTransport> {
        Lkm1638Board::new(MockTransport::new(), BoardConfig::default()).unwrap()
    }

    fn seg(digit: u8) -> u8 {
        digit_segments(digit).unwrap()
    }

    #[test]
    fn test_new_validates_config() {
        let config = BoardConfig::default().with_brightness(8);
        let result = Lkm1638Board::new(MockTransport::new(), config);
        assert!(matches!(
            result,
            Err(BoardError::Config(ConfigError::BrightnessOutOfRange(8)))
        ));
    }

    #[test]
    fn test_init_blanks_and_enables_display() {
        let mut transport = MockTransport::new();
        transport.registers = [0xFF; DISPLAY_REGISTERS];
        let config = BoardConfig::default().with_brightness(5);
        let mut board = Lkm1638Board::new(transport, config).unwrap();

        board.init().unwrap();

        let transport = board.release();
        assert_eq!(transport.registers, [0; DISPLAY_REGISTERS]);
        assert_eq!(transport.display, Some((true, 5)));
        assert_eq!(transport.exchanges, 2);
    }

    #[test]
    fn test_init_honours_display_off_config() {
        let config = BoardConfig::default().with_brightness(4).display_off();
        let mut board = Lkm1638Board::new(MockTransport::new(), config).unwrap();

        board.init().unwrap();

        assert!(!board.is_display_on());
        assert_eq!(board.transport().display, Some((false, 4)));
    }

    #[test]
    fn test_print_right_aligns_decimal() {
        let mut board = board();
        assert_eq!(board.print(42u16), Ok(Printed::Value));

        let transport = board.transport();
        for pos in 0..6 {
            assert_eq!(transport.digit(pos), SEGMENTS_OFF);
        }
        assert_eq!(transport.digit(6), seg(4));
        assert_eq!(transport.digit(7), seg(2));
    }

    #[test]
    fn test_print_negative_puts_sign_left_of_digit() {
        let mut board = board();
        board.print(-5i8).unwrap();

        assert_eq!(board.transport().digit(6), SEGMENTS_MINUS);
        assert_eq!(board.transport().digit(7), seg(5));
        assert_eq!(board.digits()[..6], [SEGMENTS_OFF; 6]);
    }

    #[test]
    fn test_print_negative_pads_blank() {
        let mut board = board();
        let options = PrintOptions::default().max_digits(5).pad(seg(0));
        assert_eq!(board.print_with(-12i16, options), Ok(Printed::Value));

        assert_eq!(
            board.digits()[..5],
            [SEGMENTS_OFF, SEGMENTS_OFF, SEGMENTS_MINUS, seg(1), seg(2)]
        );
        assert_eq!(board.transport().digit(0), SEGMENTS_OFF);
    }

    #[test]
    fn test_print_signed_minimums() {
        let mut board = board();

        board.print(i8::MIN).unwrap();
        assert_eq!(board.transport().digit(4), SEGMENTS_MINUS);
        assert_eq!(
            board.transport().digit_values()[5..],
            [Some(1), Some(2), Some(8)]
        );

        board.print(i16::MIN).unwrap();
        assert_eq!(board.transport().digit(2), SEGMENTS_MINUS);
        assert_eq!(
            board.transport().digit_values()[3..],
            [Some(3), Some(2), Some(7), Some(6), Some(8)]
        );

        // 0x80000000 plus sign needs nine digits
        assert_eq!(board.print_radix(i32::MIN, 16), Ok(Printed::Overflow));
        assert_eq!(board.print_radix(i16::MIN, 16), Ok(Printed::Value));
        assert_eq!(board.transport().digit(3), SEGMENTS_MINUS);
        assert_eq!(
            board.transport().digit_values()[4..],
            [Some(8), Some(0), Some(0), Some(0)]
        );
    }

    #[test]
    fn test_print_uses_cursor_and_leaves_it() {
        let mut board = board();
        board.set_segments_digit(0, SEGMENTS_C).unwrap();
        board.set_print_pos(4).unwrap();

        let options = PrintOptions::default().max_digits(2);
        board.print_with(7u8, options).unwrap();

        assert_eq!(board.print_pos(), 4);
        assert_eq!(board.transport().digit(0), SEGMENTS_C);
        assert_eq!(board.transport().digit(4), SEGMENTS_OFF);
        assert_eq!(board.transport().digit(5), seg(7));
        assert_eq!(board.transport().digit(6), SEGMENTS_OFF);

        // Same position again overwrites the same window
        board.print_with(31u8, options).unwrap();
        assert_eq!(board.transport().digit_values()[4..6], [Some(3), Some(1)]);
    }

    #[test]
    fn test_print_default_window_runs_to_edge() {
        let mut board = board();
        board.set_print_pos(5).unwrap();

        assert_eq!(board.print(999u16), Ok(Printed::Value));
        assert_eq!(board.print(1000u16), Ok(Printed::Overflow));
        assert_eq!(board.digits()[5..], [SEGMENTS_OVERFLOW; 3]);
        assert_eq!(board.digits()[..5], [SEGMENTS_OFF; 5]);
    }

    #[test]
    fn test_print_overflow_fills_window() {
        let mut board = board();
        board.set_print_pos(2).unwrap();

        let options = PrintOptions::default().max_digits(4);
        assert_eq!(board.print_with(123_456u32, options), Ok(Printed::Overflow));
        assert_eq!(board.digits()[2..6], [SEGMENTS_OVERFLOW; 4]);
        assert_eq!(board.digits()[6..], [SEGMENTS_OFF; 2]);
    }

    #[test]
    fn test_print_zero_pad_and_hex() {
        let mut board = board();
        let options = PrintOptions::default().radix(16).max_digits(4).pad(seg(0));
        board.print_with(0xAu8, options).unwrap();

        assert_eq!(
            board.transport().digit_values()[..4],
            [Some(0), Some(0), Some(0), Some(0xA)]
        );
    }

    #[test]
    fn test_print_rejects_bad_window() {
        let mut board = board();
        board.set_print_pos(6).unwrap();

        let options = PrintOptions::default().max_digits(3);
        assert_eq!(
            board.print_with(1u8, options),
            Err(BoardError::InvalidWindow { start: 6, len: 3 })
        );

        let options = PrintOptions::default().max_digits(0);
        assert_eq!(
            board.print_with(1u8, options),
            Err(BoardError::InvalidWindow { start: 6, len: 0 })
        );
        assert_eq!(board.print_radix(1u8, 17), Err(BoardError::InvalidRadix(17)));
        assert_eq!(board.transport().exchanges, 0);
    }

    #[test]
    fn test_cursor_range() {
        let mut board = board();
        assert_eq!(board.set_print_pos(7), Ok(()));
        assert_eq!(board.set_print_pos(8), Err(BoardError::CursorOutOfRange(8)));
        assert_eq!(board.print_pos(), 7);
    }

    #[test]
    fn test_set_digit_ranges() {
        let mut board = board();
        assert_eq!(board.set_digit(8, 1), Err(BoardError::DigitOutOfRange(8)));
        assert_eq!(board.set_digit(0, 16), Err(BoardError::DigitValueOutOfRange(16)));
        assert_eq!(board.set_segments_digit(9, 0xFF), Err(BoardError::DigitOutOfRange(9)));
        assert_eq!(board.dot_on(8), Err(BoardError::DigitOutOfRange(8)));
        assert_eq!(board.dot_off(200), Err(BoardError::DigitOutOfRange(200)));
        assert_eq!(board.transport().exchanges, 0);
        assert_eq!(board.dots(), 0);
    }

    #[test]
    fn test_dot_merges_with_segments() {
        let mut board = board();
        board.set_digit(3, 8).unwrap();
        board.set_digit(4, 1).unwrap();

        board.dot_on(3).unwrap();
        assert_eq!(board.transport().digit(3), seg(8) | SEGMENT_DOT);
        assert_eq!(board.transport().digit(4), seg(1));
        assert_eq!(board.segments_at(3), Some(seg(8)));
        assert_eq!(board.dots(), 0b0000_1000);

        // A new digit keeps the dot
        board.set_digit(3, 2).unwrap();
        assert_eq!(board.transport().digit(3), seg(2) | SEGMENT_DOT);

        board.dot_off(3).unwrap();
        assert_eq!(board.transport().digit(3), seg(2));
        assert_eq!(board.dots(), 0);
    }

    #[test]
    fn test_set_dots_writes_each_digit() {
        let mut board = board();
        board.set_dots(0b1000_0001).unwrap();

        assert_eq!(board.transport().exchanges, 8);
        assert_eq!(board.transport().digit(0), SEGMENT_DOT);
        assert_eq!(board.transport().digit(7), SEGMENT_DOT);
        assert_eq!(board.transport().digit(3), SEGMENTS_OFF);
    }

    #[test]
    fn test_color_led() {
        let mut board = board();

        board.set_color_led(2, LedColor::Red).unwrap();
        assert_eq!(board.transport().led(2), 0b01);
        board.set_color_led(2, LedColor::Green).unwrap();
        assert_eq!(board.transport().led(2), 0b10);
        assert_eq!(board.led_color(2), Some(LedColor::Green));
        board.set_color_led(2, LedColor::Off).unwrap();
        assert_eq!(board.transport().led(2), 0);

        assert_eq!(
            board.set_color_led(8, LedColor::Red),
            Err(BoardError::LedOutOfRange(8))
        );
        assert_eq!(board.led_color(8), None);
        // LEDs never touch digit registers
        assert_eq!(board.transport().digit(2), SEGMENTS_OFF);
    }

    #[test]
    fn test_color_leds_batch() {
        let mut board = board();

        board.color_leds_on(0b1000_0101, LedColor::Green).unwrap();
        assert_eq!(board.transport().exchanges, 3);
        for led in 0..8 {
            let expected = if [0, 2, 7].contains(&led) { 0b10 } else { 0 };
            assert_eq!(board.transport().led(led), expected);
        }

        board.color_leds_off(0b0000_0101).unwrap();
        assert_eq!(board.transport().led(0), 0);
        assert_eq!(board.transport().led(2), 0);
        assert_eq!(board.transport().led(7), 0b10);
    }

    #[test]
    fn test_read_buttons_remaps_switches() {
        let mut board = board();

        // S1 on KS1 (byte 0 bit 0), S8 on KS8 (byte 3 bit 4)
        board.transport_mut().keys = [0x01, 0x00, 0x00, 0x10];
        assert_eq!(board.read_buttons(), Ok(0b1000_0001));

        // S5 on KS2 (byte 0 bit 4)
        board.transport_mut().keys = [0x10, 0x00, 0x00, 0x00];
        assert_eq!(board.read_buttons(), Ok(0b0001_0000));

        board.transport_mut().keys = [0x00; KEY_SCAN_BYTES];
        assert_eq!(board.read_buttons(), Ok(0));
    }

    #[test]
    fn test_clear_then_refresh_is_all_off() {
        let mut board = board();
        board.print(-1234i16).unwrap();
        board.set_dots(0xFF).unwrap();
        board.color_leds_on(0xFF, LedColor::Red).unwrap();

        board.clear().unwrap();
        board.refresh().unwrap();

        assert_eq!(board.transport().registers, [0; DISPLAY_REGISTERS]);
        assert_eq!(board.digits(), &[SEGMENTS_OFF; 8]);
        assert_eq!(board.dots(), 0);
        assert_eq!(board.led_color(0), Some(LedColor::Off));
    }

    #[test]
    fn test_refresh_resends_mirror() {
        let mut board = board();
        board.set_digit(0, 1).unwrap();
        board.dot_on(0).unwrap();
        board.set_color_led(7, LedColor::Green).unwrap();

        // Chip lost its RAM
        board.transport_mut().registers = [0; DISPLAY_REGISTERS];
        let before = board.transport().exchanges;
        board.refresh().unwrap();

        assert_eq!(board.transport().exchanges, before + 1);
        assert_eq!(board.transport().digit(0), seg(1) | SEGMENT_DOT);
        assert_eq!(board.transport().led(7), 0b10);
    }

    #[test]
    fn test_transport_errors_propagate() {
        let mut board = board();
        board.transport_mut().fail = true;

        assert_eq!(board.set_digit(1, 5), Err(BoardError::Transport(MockError)));
        assert_eq!(board.read_buttons(), Err(BoardError::Transport(MockError)));
        assert_eq!(board.print(1u8), Err(BoardError::Transport(MockError)));
        assert_eq!(board.init(), Err(BoardError::Transport(MockError)));

        // The mirror still holds what was asked for; refresh delivers it
        board.transport_mut().fail = false;
        board.set_digit(1, 5).unwrap();
        board.refresh().unwrap();
        assert_eq!(board.transport().digit(1), seg(5));
    }

    #[test]
    fn test_print_failure_keeps_whole_window_for_refresh() {
        let mut board = board();
        // First digit goes out, the second write fails
        board.transport_mut().fail_after = Some(1);

        assert_eq!(board.print(42u16), Err(BoardError::Transport(MockError)));
        assert_eq!(board.digits()[6..], [seg(4), seg(2)]);
        assert_eq!(board.transport().digit(6), SEGMENTS_OFF);

        board.transport_mut().fail_after = None;
        board.refresh().unwrap();
        assert_eq!(board.transport().digit(6), seg(4));
        assert_eq!(board.transport().digit(7), seg(2));
    }

    #[test]
    fn test_segment_dot_bit_moves_to_dots() {
        let mut board = board();
        board.set_segments_digit(2, 0xFF).unwrap();

        assert_eq!(board.transport().digit(2), 0xFF);
        assert_eq!(board.segments_at(2), Some(0xFF & !SEGMENT_DOT));
        assert_eq!(board.dots(), 0b0000_0100);

        board.dot_off(2).unwrap();
        assert_eq!(board.transport().digit(2), 0xFF & !SEGMENT_DOT);
        assert_eq!(board.dots(), 0);
    }

    #[test]
    fn test_display_control() {
        let mut board = board();

        board.set_brightness(5).unwrap();
        assert_eq!(board.transport().display, Some((true, 5)));
        assert_eq!(board.brightness(), 5);

        assert_eq!(
            board.set_brightness(8),
            Err(BoardError::BrightnessOutOfRange(8))
        );

        board.display_off().unwrap();
        assert_eq!(board.transport().display, Some((false, 5)));
        assert!(!board.is_display_on());

        board.display_on().unwrap();
        assert_eq!(board.transport().display, Some((true, 5)));
    }

    #[test]
    fn test_works_through_mutable_reference() {
        let mut transport = MockTransport::new();
        {
            let mut board = Lkm1638Board::new(&mut transport, BoardConfig::default()).unwrap();
            board.set_digit(0, 0xF).unwrap();
        }
        assert_eq!(transport.digit(0), seg(0xF));
    }

    proptest! {
        #[test]
        fn prop_dot_touches_only_its_digit(
            pos in 0u8..8,
            patterns in any::<[u8; 8]>(),
        ) {
            let mut board = board();
            for (index, &pattern) in (0u8..).zip(patterns.iter()) {
                board.set_segments_digit(index, pattern & !SEGMENT_DOT).unwrap();
            }

            board.dot_on(pos).unwrap();
            for index in 0..8u8 {
                let base = patterns[usize::from(index)] & !SEGMENT_DOT;
                let expected = if index == pos { base | SEGMENT_DOT } else { base };
                prop_assert_eq!(board.transport().digit(index), expected);
            }
            prop_assert_eq!(board.dots(), 1 << pos);

            board.dot_off(pos).unwrap();
            for index in 0..8u8 {
                prop_assert_eq!(
                    board.transport().digit(index),
                    patterns[usize::from(index)] & !SEGMENT_DOT
                );
            }
        }

        #[test]
        fn prop_printed_value_reads_back(value in 0u32..100_000_000) {
            let mut board = board();
            prop_assert_eq!(board.print(value), Ok(Printed::Value));

            let decoded = board
                .transport()
                .digit_values()
                .iter()
                .flatten()
                .fold(0u32, |acc, &digit| acc * 10 + u32::from(digit));
            prop_assert_eq!(decoded, value);
        }
    }
}
