//! Request methods of the device protocol
//!
//! Requests arrive as JSON objects keyed by the method name, e.g.
//! `{"method": "getAll"}`. Names are case-sensitive.

/// Request methods the device answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    /// Return metadata, system state, configuration and status
    GetAll,
    /// Import and persist a new configuration
    WriteConfiguration,
    /// Reset the persisted configuration to defaults
    EraseConfiguration,
    /// Restart the device
    Reboot,
    /// Restart with the extra MIDI ports enabled to reach child devices
    RebootWithPorts,
    /// Receive one packet of a firmware update
    WriteFirmware,
    /// Change the MIDI channel the device listens on
    SwitchChannel,
}

/// Method name that does not match any [`Method`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownMethod;

impl Method {
    /// Every method, in protocol documentation order
    pub const ALL: [Method; 7] = [
        Method::GetAll,
        Method::WriteConfiguration,
        Method::EraseConfiguration,
        Method::Reboot,
        Method::RebootWithPorts,
        Method::WriteFirmware,
        Method::SwitchChannel,
    ];

    /// Wire name of the method
    pub const fn name(self) -> &'static str {
        match self {
            Method::GetAll => "getAll",
            Method::WriteConfiguration => "writeConfiguration",
            Method::EraseConfiguration => "eraseConfiguration",
            Method::Reboot => "reboot",
            Method::RebootWithPorts => "rebootWithPorts",
            Method::WriteFirmware => "writeFirmware",
            Method::SwitchChannel => "switchChannel",
        }
    }

    /// Look up a method by its wire name
    pub fn from_name(name: &str) -> Result<Self, UnknownMethod> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or(UnknownMethod)
    }

    /// Check if the method ends with the device restarting
    pub fn restarts_device(self) -> bool {
        matches!(self, Method::Reboot | Method::RebootWithPorts)
    }

    /// Check if the method changes persisted state
    pub fn writes_storage(self) -> bool {
        matches!(
            self,
            Method::WriteConfiguration | Method::EraseConfiguration | Method::WriteFirmware
        )
    }
}

impl core::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.name()), Ok(method));
        }
    }

    #[test]
    fn test_unknown_and_case() {
        assert_eq!(Method::from_name("getall"), Err(UnknownMethod));
        assert_eq!(Method::from_name(""), Err(UnknownMethod));
        assert_eq!("switchChannel".parse::<Method>(), Ok(Method::SwitchChannel));
    }

    #[test]
    fn test_classification() {
        assert!(Method::RebootWithPorts.restarts_device());
        assert!(!Method::GetAll.restarts_device());
        assert!(Method::EraseConfiguration.writes_storage());
        assert!(!Method::SwitchChannel.writes_storage());
    }
}
