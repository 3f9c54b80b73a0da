//! TM1638 bit-banged transport
//!
//! The TM1638 talks a three-wire serial protocol that looks like SPI but
//! shares one line for both directions, so it is driven here by toggling
//! GPIOs.
//!
//! # Wire Protocol
//!
//! - STB low frames a command and its data bytes; STB high ends the frame
//! - Bytes are shifted LSB first; the chip latches DIO on the CLK rising edge
//! - Key data is shifted out by the chip after each CLK falling edge
//! - After the read command DIO must be released and the host waits tWAIT
//!   (at least 1 us) before clocking in the first bit
//!
//! DIO must be open-drain with a pull-up (or otherwise able to both drive
//! and sense the line), hence `OutputPin + InputPin`.
//!
//! # Commands
//!
//! | Command | Meaning |
//! |---------|---------|
//! | `0x40`  | Write display, auto-increment address |
//! | `0x44`  | Write display, fixed address |
//! | `0x42`  | Read key scan (4 bytes) |
//! | `0xC0 \| n` | Set address to register n |
//! | `0x80`  | Display off |
//! | `0x88 \| b` | Display on, brightness b (0-7) |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, InputPin, OutputPin, PinState};
use lkm1638_core::traits::{Tm1638Transport, DISPLAY_REGISTERS, KEY_SCAN_BYTES, MAX_BRIGHTNESS};

/// TM1638 command bytes
pub mod cmd {
    /// Data command: write display, auto-increment address
    pub const WRITE_AUTO_INCREMENT: u8 = 0x40;
    /// Data command: write display, fixed address
    pub const WRITE_FIXED: u8 = 0x44;
    /// Data command: read key scan data
    pub const READ_KEYS: u8 = 0x42;
    /// Address command (OR with register 0x00-0x0F)
    pub const ADDRESS: u8 = 0xC0;
    /// Display control: off
    pub const DISPLAY_OFF: u8 = 0x80;
    /// Display control: on (OR with brightness 0-7)
    pub const DISPLAY_ON: u8 = 0x88;
}

/// Half a CLK period; the chip is rated for 1 MHz
const CLOCK_HALF_PERIOD_US: u32 = 1;

/// tWAIT between the read command and the first key bit
const T_WAIT_US: u32 = 2;

/// TM1638 transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tm1638Error {
    /// A GPIO operation failed
    Pin(ErrorKind),
    /// Register address above 0x0F
    InvalidAddress(u8),
    /// Burst write runs past register 0x0F
    InvalidLength {
        /// First register
        start: u8,
        /// Number of bytes
        len: usize,
    },
    /// Brightness above 7
    InvalidBrightness(u8),
}

fn pin_error<E: embedded_hal::digital::Error>(e: E) -> Tm1638Error {
    Tm1638Error::Pin(e.kind())
}

/// Bit-banged TM1638
pub struct Tm1638<CLK, DIO, STB, D> {
    clk: CLK,
    dio: DIO,
    stb: STB,
    delay: D,
}

impl<CLK, DIO, STB, D> Tm1638<CLK, DIO, STB, D>
where
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    STB: OutputPin,
    D: DelayNs,
{
    /// Create a new TM1638 transport and put the lines in their idle state
    pub fn new(clk: CLK, dio: DIO, stb: STB, delay: D) -> Result<Self, Tm1638Error> {
        let mut tm = Self {
            clk,
            dio,
            stb,
            delay,
        };

        // Idle: strobe inactive, clock high, DIO released
        tm.stb.set_high().map_err(pin_error)?;
        tm.clk.set_high().map_err(pin_error)?;
        tm.dio.set_high().map_err(pin_error)?;

        Ok(tm)
    }

    /// Consume the transport and return the pins and delay
    pub fn release(self) -> (CLK, DIO, STB, D) {
        (self.clk, self.dio, self.stb, self.delay)
    }

    /// Run `body` inside one STB frame
    ///
    /// STB is released even when `body` fails, so a broken exchange never
    /// runs into the next one.
    fn frame<R>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<R, Tm1638Error>,
    ) -> Result<R, Tm1638Error> {
        self.stb.set_low().map_err(pin_error)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);

        let result = body(self);
        let ended = self.end();
        let value = result?;
        ended?;
        Ok(value)
    }

    /// Release STB to end a frame
    fn end(&mut self) -> Result<(), Tm1638Error> {
        self.clk.set_high().map_err(pin_error)?;
        self.stb.set_high().map_err(pin_error)?;
        self.dio.set_high().map_err(pin_error)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        Ok(())
    }

    /// Shift one byte out on DIO, LSB first
    fn shift_out(&mut self, byte: u8) -> Result<(), Tm1638Error> {
        for bit in 0..8 {
            self.clk.set_low().map_err(pin_error)?;
            self.dio
                .set_state(PinState::from(byte & (1 << bit) != 0))
                .map_err(pin_error)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);

            // Chip latches DIO here
            self.clk.set_high().map_err(pin_error)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        }
        Ok(())
    }

    /// Clock one byte in from DIO, LSB first
    ///
    /// DIO must already be released.
    fn shift_in(&mut self) -> Result<u8, Tm1638Error> {
        let mut byte = 0u8;
        for bit in 0..8 {
            self.clk.set_low().map_err(pin_error)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);

            if self.dio.is_high().map_err(pin_error)? {
                byte |= 1 << bit;
            }

            self.clk.set_high().map_err(pin_error)?;
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        }
        Ok(byte)
    }

    /// Send a single-byte command frame
    fn command(&mut self, command: u8) -> Result<(), Tm1638Error> {
        self.frame(|tm| tm.shift_out(command))
    }
}

impl<CLK, DIO, STB, D> Tm1638Transport for Tm1638<CLK, DIO, STB, D>
where
    CLK: OutputPin,
    DIO: OutputPin + InputPin,
    STB: OutputPin,
    D: DelayNs,
{
    type Error = Tm1638Error;

    fn write_register(&mut self, address: u8, data: u8) -> Result<(), Self::Error> {
        if usize::from(address) >= DISPLAY_REGISTERS {
            return Err(Tm1638Error::InvalidAddress(address));
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("TM1638 [{=u8:#x}] <- {=u8:#x}", address, data);

        self.command(cmd::WRITE_FIXED)?;
        self.frame(|tm| {
            tm.shift_out(cmd::ADDRESS | address)?;
            tm.shift_out(data)
        })
    }

    fn write_registers(&mut self, start: u8, data: &[u8]) -> Result<(), Self::Error> {
        if usize::from(start) + data.len() > DISPLAY_REGISTERS {
            return Err(Tm1638Error::InvalidLength {
                start,
                len: data.len(),
            });
        }
        if data.is_empty() {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("TM1638 [{=u8:#x}..] <- {=[u8]:#x}", start, data);

        self.command(cmd::WRITE_AUTO_INCREMENT)?;
        self.frame(|tm| {
            tm.shift_out(cmd::ADDRESS | start)?;
            data.iter().try_for_each(|&byte| tm.shift_out(byte))
        })
    }

    fn read_key_scan(&mut self) -> Result<[u8; KEY_SCAN_BYTES], Self::Error> {
        let keys = self.frame(|tm| {
            tm.shift_out(cmd::READ_KEYS)?;

            // Hand DIO over to the chip
            tm.dio.set_high().map_err(pin_error)?;
            tm.delay.delay_us(T_WAIT_US);

            let mut keys = [0u8; KEY_SCAN_BYTES];
            for byte in keys.iter_mut() {
                *byte = tm.shift_in()?;
            }
            Ok(keys)
        })?;

        #[cfg(feature = "defmt")]
        defmt::trace!("TM1638 keys {=[u8]:#x}", &keys[..]);

        Ok(keys)
    }

    fn set_display(&mut self, on: bool, brightness: u8) -> Result<(), Self::Error> {
        if brightness > MAX_BRIGHTNESS {
            return Err(Tm1638Error::InvalidBrightness(brightness));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("TM1638 display on={} brightness={=u8}", on, brightness);

        if on {
            self.command(cmd::DISPLAY_ON | brightness)
        } else {
            self.command(cmd::DISPLAY_OFF)
        }
    }
}
