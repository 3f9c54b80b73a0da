//! TM1638 transport trait
//!
//! The TM1638 exposes sixteen display registers (00H..0FH) and a 4-byte
//! key scan. Everything the board layer needs from the chip fits into
//! four transactions, so that is all this trait asks for.

/// Number of display registers on the TM1638
pub const DISPLAY_REGISTERS: usize = 16;

/// Number of bytes returned by a key scan read
pub const KEY_SCAN_BYTES: usize = 4;

/// Highest display brightness (pulse width 14/16)
pub const MAX_BRIGHTNESS: u8 = 7;

/// Byte-level access to a TM1638
///
/// Each method is one strobe-framed exchange with the chip (plus the data
/// command that selects the addressing mode). Implementations are expected
/// to be synchronous and to report every failed exchange.
pub trait Tm1638Transport {
    /// Error type for a failed exchange
    type Error;

    /// Write one display register using fixed addressing
    ///
    /// - `address`: register 0x00-0x0F
    fn write_register(&mut self, address: u8, data: u8) -> Result<(), Self::Error>;

    /// Write consecutive display registers using auto-increment addressing
    ///
    /// `start + data.len()` must not run past register 0x0F.
    fn write_registers(&mut self, start: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read the raw key scan bytes
    ///
    /// Byte `n` holds K3/K2/K1 of scan row KS(2n+1) in bits 0-2 and of
    /// KS(2n+2) in bits 4-6.
    fn read_key_scan(&mut self) -> Result<[u8; KEY_SCAN_BYTES], Self::Error>;

    /// Switch the display on or off and set its brightness (0-7)
    fn set_display(&mut self, on: bool, brightness: u8) -> Result<(), Self::Error>;
}

impl<T: Tm1638Transport + ?Sized> Tm1638Transport for &mut T {
    type Error = T::Error;

    fn write_register(&mut self, address: u8, data: u8) -> Result<(), Self::Error> {
        T::write_register(self, address, data)
    }

    fn write_registers(&mut self, start: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write_registers(self, start, data)
    }

    fn read_key_scan(&mut self) -> Result<[u8; KEY_SCAN_BYTES], Self::Error> {
        T::read_key_scan(self)
    }

    fn set_display(&mut self, on: bool, brightness: u8) -> Result<(), Self::Error> {
        T::set_display(self, on, brightness)
    }
}
