//! Persisted configuration record
//!
//! The record is what a flash/EEPROM layer stores. It carries a magic and a
//! format version so stale or foreign data is rejected instead of being
//! decoded into nonsense.

use serde::{Deserialize, Serialize};

use super::{ButtonConfig, ConfigError, SolenoidConfig};

/// Magic number to identify a configuration record
pub const RECORD_MAGIC: u32 = 0x7ed6_3a8b;

/// Current record format version
pub const RECORD_VERSION: u16 = 1;

/// Complete persisted configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u16,
    /// Solenoid controller settings
    pub solenoid: SolenoidConfig,
    /// Button timing shared by all buttons
    pub button: ButtonConfig,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self::new(SolenoidConfig::default(), ButtonConfig::default())
    }
}

impl ConfigRecord {
    /// Wrap a configuration in a record of the current format
    pub const fn new(solenoid: SolenoidConfig, button: ButtonConfig) -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            solenoid,
            button,
        }
    }

    /// Encode into `buf`, returning the used part
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::BufferTooSmall)
    }

    /// Decode and validate a stored record
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;

        if record.magic != RECORD_MAGIC {
            return Err(ConfigError::BadMagic);
        }

        if record.version != RECORD_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        record.solenoid.validate()?;
        record.button.validate()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encoded_record() {
        let mut config = SolenoidConfig::default();
        config.current.max = 2.5;
        let record = ConfigRecord::new(config, ButtonConfig::DISABLED);

        let mut buf = [0u8; 128];
        let bytes = record.encode(&mut buf).unwrap();
        let decoded = ConfigRecord::decode(bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_bad_magic() {
        let mut record = ConfigRecord::default();
        record.magic = 0xdead_beef;

        let mut buf = [0u8; 128];
        let bytes = record.encode(&mut buf).unwrap();
        assert_eq!(ConfigRecord::decode(bytes), Err(ConfigError::BadMagic));
    }

    #[test]
    fn test_version_mismatch() {
        let mut record = ConfigRecord::default();
        record.version = RECORD_VERSION + 1;

        let mut buf = [0u8; 128];
        let bytes = record.encode(&mut buf).unwrap();
        assert_eq!(ConfigRecord::decode(bytes), Err(ConfigError::VersionMismatch));
    }

    #[test]
    fn test_invalid_content_rejected() {
        let mut record = ConfigRecord::default();
        record.solenoid.resistance.min = 100.0;

        let mut buf = [0u8; 128];
        let bytes = record.encode(&mut buf).unwrap();
        assert_eq!(
            ConfigRecord::decode(bytes),
            Err(ConfigError::InvalidResistanceRange)
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let record = ConfigRecord::default();
        let mut buf = [0u8; 4];
        assert_eq!(record.encode(&mut buf).err(), Some(ConfigError::BufferTooSmall));
    }

    #[test]
    fn test_truncated() {
        let record = ConfigRecord::default();
        let mut buf = [0u8; 128];
        let len = record.encode(&mut buf).unwrap().len();
        assert_eq!(ConfigRecord::decode(&buf[..len / 2]), Err(ConfigError::Decode));
    }
}
