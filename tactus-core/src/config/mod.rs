//! Configuration types
//!
//! Read-only after construction. The persisted form is a postcard-encoded
//! [`ConfigRecord`], written by the protocol layer on `writeConfiguration`.

pub mod button;
#[cfg(feature = "serde")]
pub mod record;
pub mod solenoid;

pub use button::ButtonConfig;
#[cfg(feature = "serde")]
pub use record::{ConfigRecord, RECORD_MAGIC, RECORD_VERSION};
pub use solenoid::{CurrentLimit, FadeConfig, HoldConfig, ResistanceRange, SolenoidConfig};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Current limit is not a positive finite value, or alpha is outside 0..=1
    InvalidCurrentLimit,
    /// Resistance range is empty, negative or not finite
    InvalidResistanceRange,
    /// Fade duration is negative or not finite
    InvalidFade,
    /// Hold fraction is outside 0..=1
    InvalidHold,
    /// Long-press time does not exceed the debounce time
    InvalidButtonTiming,
    /// Stored record does not start with the expected magic
    BadMagic,
    /// Stored record was written by a different format version
    VersionMismatch,
    /// Output buffer too small for the encoded record
    BufferTooSmall,
    /// Stored record could not be decoded
    Decode,
}
