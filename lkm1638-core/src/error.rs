//! Board errors

use core::fmt;

use crate::config::ConfigError;

/// Result type for board operations over a transport with error `E`
pub type BoardResult<T, E> = Result<T, BoardError<E>>;

/// Errors reported by the board
///
/// `E` is the error type of the underlying transport. Range errors carry
/// the rejected argument; nothing is written to the chip when one is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError<E> {
    /// The transport failed to complete an exchange
    Transport(E),
    /// Invalid board configuration
    Config(ConfigError),
    /// Digit position outside 0-7
    DigitOutOfRange(u8),
    /// LED index outside 0-7
    LedOutOfRange(u8),
    /// Print cursor outside 0-7
    CursorOutOfRange(u8),
    /// Digit value above 15
    DigitValueOutOfRange(u8),
    /// Brightness above 7
    BrightnessOutOfRange(u8),
    /// Radix outside 2-16
    InvalidRadix(u8),
    /// Print window is empty or runs past the last digit
    InvalidWindow {
        /// First position of the window
        start: u8,
        /// Requested width
        len: u8,
    },
}

impl<E> From<ConfigError> for BoardError<E> {
    fn from(e: ConfigError) -> Self {
        BoardError::Config(e)
    }
}

impl<E: fmt::Debug> fmt::Display for BoardError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Transport(e) => write!(f, "transport error: {:?}", e),
            BoardError::Config(e) => write!(f, "invalid configuration: {:?}", e),
            BoardError::DigitOutOfRange(pos) => write!(f, "digit position {} out of range", pos),
            BoardError::LedOutOfRange(led) => write!(f, "LED {} out of range", led),
            BoardError::CursorOutOfRange(pos) => write!(f, "print position {} out of range", pos),
            BoardError::DigitValueOutOfRange(digit) => {
                write!(f, "digit value {} is not a hex digit", digit)
            }
            BoardError::BrightnessOutOfRange(level) => {
                write!(f, "brightness {} out of range", level)
            }
            BoardError::InvalidRadix(radix) => write!(f, "radix {} not supported", radix),
            BoardError::InvalidWindow { start, len } => {
                write!(f, "{} digits from position {} do not fit the display", len, start)
            }
        }
    }
}
