//! Hardware configuration types
//!
//! How the display comes up after `init`. The CLK, DIO and STB lines
//! themselves are the pins handed to the transport.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::MAX_BRIGHTNESS;

/// Brightness applied by `init` unless configured otherwise
pub const DEFAULT_BRIGHTNESS: u8 = 2;

/// Board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Display brightness (0-7)
    pub brightness: u8,
    /// Switch the display on during `init`
    pub display_on: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            display_on: true,
        }
    }
}

impl BoardConfig {
    /// Set the start-up brightness
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    /// Leave the display off after `init`
    pub fn display_off(mut self) -> Self {
        self.display_on = false;
        self
    }

    /// Check the configuration for mistakes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::BrightnessOutOfRange(self.brightness));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Brightness above 7
    BrightnessOutOfRange(u8),
}
