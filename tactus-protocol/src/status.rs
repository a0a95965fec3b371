//! Status snapshots for protocol replies
//!
//! The solenoid controller fills a [`SolenoidReport`] when the device
//! answers a `getAll` request. Values follow the controller accessors:
//! resistance is -1 for an unknown or open port and 0 for a short circuit.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of ports a report can carry
pub const MAX_REPORT_PORTS: usize = 16;

/// Status of one solenoid port
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortReport {
    /// Port index
    pub port: u8,
    /// Measured coil resistance in ohms (-1 unknown/open, 0 short circuit)
    pub resistance: f32,
    /// Current PWM duty cycle (0.0-1.0)
    pub duty: f32,
    /// Whether a pulse is being driven
    pub active: bool,
}

impl PortReport {
    /// Check if a usable coil was measured on this port
    pub fn is_connected(&self) -> bool {
        self.resistance > 0.0
    }
}

/// Status of a solenoid controller
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolenoidReport {
    /// Filtered supply current in amperes
    pub current: f32,
    /// Whether all ports have been qualified by the resistance probe
    pub ready: bool,
    /// Per-port status
    pub ports: Vec<PortReport, MAX_REPORT_PORTS>,
}

impl SolenoidReport {
    /// Number of ports currently driving a pulse
    pub fn active_ports(&self) -> usize {
        self.ports.iter().filter(|p| p.active).count()
    }

    /// Number of ports with a usable coil
    pub fn connected_ports(&self) -> usize {
        self.ports.iter().filter(|p| p.is_connected()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SolenoidReport {
        let mut report = SolenoidReport {
            current: 0.25,
            ready: true,
            ports: Vec::new(),
        };
        report
            .ports
            .push(PortReport {
                port: 0,
                resistance: 20.0,
                duty: 0.5,
                active: true,
            })
            .unwrap();
        report
            .ports
            .push(PortReport {
                port: 1,
                resistance: -1.0,
                duty: 0.0,
                active: false,
            })
            .unwrap();
        report
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.active_ports(), 1);
        assert_eq!(report.connected_ports(), 1);
    }

    #[test]
    fn test_short_circuit_not_connected() {
        let port = PortReport {
            port: 3,
            resistance: 0.0,
            duty: 0.0,
            active: false,
        };
        assert!(!port.is_connected());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_encoding() {
        let report = report();
        let mut buf = [0u8; 64];
        let used = postcard::to_slice(&report, &mut buf).unwrap();
        let decoded: SolenoidReport = postcard::from_bytes(used).unwrap();
        assert_eq!(decoded, report);
    }
}
