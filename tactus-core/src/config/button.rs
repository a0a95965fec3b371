//! Button timing configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::button::DEBOUNCE_USEC;

/// Click and long-press timing
///
/// A zero value disables the feature: without a click window every release
/// is reported as a single click immediately, without a hold time no
/// long-press is ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Window to wait for a further press to count multiple clicks, usually ~200ms
    pub click_usec: u32,
    /// Press duration to detect a long-press, usually ~500ms
    pub hold_usec: u32,
}

impl ButtonConfig {
    /// No click counting, no long-press detection
    pub const DISABLED: Self = Self {
        click_usec: 0,
        hold_usec: 0,
    };

    /// Check if multiple clicks are counted
    pub const fn counts_clicks(&self) -> bool {
        self.click_usec > 0
    }

    /// Check if long-presses are detected
    pub const fn detects_hold(&self) -> bool {
        self.hold_usec > 0
    }

    /// Check the long-press time is longer than the debounce time
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detects_hold() && self.hold_usec <= DEBOUNCE_USEC {
            return Err(ConfigError::InvalidButtonTiming);
        }

        Ok(())
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            click_usec: 200 * 1000,
            hold_usec: 500 * 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ButtonConfig::default();
        assert!(config.counts_clicks());
        assert!(config.detects_hold());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_disabled() {
        assert!(!ButtonConfig::DISABLED.counts_clicks());
        assert!(!ButtonConfig::DISABLED.detects_hold());
        assert_eq!(ButtonConfig::DISABLED.validate(), Ok(()));
    }

    #[test]
    fn test_hold_shorter_than_debounce() {
        let config = ButtonConfig {
            click_usec: 0,
            hold_usec: 3000,
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidButtonTiming));
    }
}
