//! Solenoid controller configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Supply current supervision
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentLimit {
    /// Maximum filtered current in amperes before every port is shut off
    pub max: f32,
    /// Low-pass coefficient per 1ms tick (0 = use raw readings)
    pub alpha: f32,
}

/// Resistance range of a usable coil
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResistanceRange {
    /// Below this the port is treated as a short circuit (ohms)
    pub min: f32,
    /// Above this the port is treated as not connected (ohms)
    pub max: f32,
}

/// Fade ramps, adjusted one step per millisecond
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FadeConfig {
    /// Fade-in time in seconds
    pub in_sec: f32,
    /// Fade-out time in seconds
    pub out_sec: f32,
}

/// Reduced holding power after the peak period
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HoldConfig {
    /// Time at full pulse power before dropping to hold power
    pub peak_usec: u32,
    /// Fraction of the peak duty cycle kept while holding
    pub fraction: f32,
}

/// Solenoid controller configuration
///
/// ```
/// use tactus_core::config::*;
///
/// let config = SolenoidConfig {
///     current: CurrentLimit { max: 3.0, alpha: 0.001 },
///     resistance: ResistanceRange { min: 6.0, max: 60.0 },
///     fade: FadeConfig { in_sec: 0.35, out_sec: 0.35 },
///     hold: HoldConfig { peak_usec: 100 * 1000, fraction: 0.5 },
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolenoidConfig {
    pub current: CurrentLimit,
    pub resistance: ResistanceRange,
    pub fade: FadeConfig,
    pub hold: HoldConfig,
}

impl Default for SolenoidConfig {
    fn default() -> Self {
        Self {
            current: CurrentLimit {
                max: 3.0,
                alpha: 0.001,
            },
            resistance: ResistanceRange {
                min: 6.0,
                max: 60.0,
            },
            fade: FadeConfig {
                in_sec: 0.35,
                out_sec: 0.35,
            },
            hold: HoldConfig {
                peak_usec: 100 * 1000,
                fraction: 0.5,
            },
        }
    }
}

impl SolenoidConfig {
    /// Check the values are physically meaningful
    pub fn validate(&self) -> Result<(), ConfigError> {
        let current = &self.current;
        if !(current.max.is_finite() && current.max > 0.0) || !(0.0..=1.0).contains(&current.alpha)
        {
            return Err(ConfigError::InvalidCurrentLimit);
        }

        let range = &self.resistance;
        if !(range.min.is_finite() && range.max.is_finite()) || range.min < 0.0 || range.min >= range.max {
            return Err(ConfigError::InvalidResistanceRange);
        }

        let fade = &self.fade;
        if !(fade.in_sec.is_finite() && fade.in_sec >= 0.0)
            || !(fade.out_sec.is_finite() && fade.out_sec >= 0.0)
        {
            return Err(ConfigError::InvalidFade);
        }

        if !(0.0..=1.0).contains(&self.hold.fraction) {
            return Err(ConfigError::InvalidHold);
        }

        Ok(())
    }
}
