//! Coil classification from the resistance probe
//!
//! With the main rail off, switching a single port on connects the coil to
//! 3.3V through a 100Ω reference resistor. The coil side has a diode with a
//! drop of about 0.3V:
//!
//! ```text
//!   open  (∞)  →  V_out = 3.3V
//!   short (0Ω) →  V_out = 0.3V
//!
//!   R = ((V_out − 0.3) · 100) / (3.3 − V_out)
//! ```

use crate::config::ResistanceRange;
use crate::filter::LowPass;

/// Divider supply voltage
pub const PROBE_SUPPLY_VOLTS: f32 = 3.3;

/// Reference resistor of the divider in ohms
pub const DIVIDER_OHMS: f32 = 100.0;

/// Forward drop of the diode in series with the coil
pub const DIODE_DROP_VOLTS: f32 = 0.3;

/// Low-pass coefficient applied to each probe reading
pub const PROBE_ALPHA: f32 = 0.3;

/// Electrical state of a port's load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoilState {
    /// Open, or resistance too high to be useful
    #[default]
    NotConnected,
    /// Resistance within the configured range
    Connected,
    /// Shorted, or resistance too low
    ShortCircuit,
}

/// Convert the divider output voltage to the coil resistance
///
/// Voltages at or above the divider supply read as an open port.
pub fn divider_resistance(volts: f32) -> f32 {
    if volts >= PROBE_SUPPLY_VOLTS {
        return f32::INFINITY;
    }

    ((volts - DIODE_DROP_VOLTS) * DIVIDER_OHMS) / (PROBE_SUPPLY_VOLTS - volts)
}

/// Classify a resistance; both range limits count as connected
pub fn classify(ohms: f32, range: &ResistanceRange) -> CoilState {
    if ohms.is_nan() || ohms > range.max {
        CoilState::NotConnected
    } else if ohms < range.min {
        CoilState::ShortCircuit
    } else {
        CoilState::Connected
    }
}

/// Filtered probe measurement of one port
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilMeasurement {
    state: CoilState,
    /// Last computed resistance, -1 before the first measurement
    resistance: f32,
    voltage: LowPass,
}

impl Default for CoilMeasurement {
    fn default() -> Self {
        Self::new()
    }
}

impl CoilMeasurement {
    /// Create an unmeasured port
    pub const fn new() -> Self {
        Self {
            state: CoilState::NotConnected,
            resistance: -1.0,
            voltage: LowPass::new(PROBE_ALPHA),
        }
    }

    /// Feed one divider reading and reclassify
    ///
    /// The first reading seeds the filter, so a freshly reset port does not
    /// flash a short circuit. Returns true if the classification changed.
    pub fn update(&mut self, volts: f32, range: &ResistanceRange) -> bool {
        // An unreadable divider reads as an open port
        let volts = if volts.is_finite() {
            volts
        } else {
            PROBE_SUPPLY_VOLTS
        };

        let filtered = self.voltage.update(volts);
        self.resistance = divider_resistance(filtered);

        let state = classify(self.resistance, range);
        if state == self.state {
            return false;
        }

        self.state = state;
        true
    }

    /// Current classification
    pub fn state(&self) -> CoilState {
        self.state
    }

    /// Last computed resistance regardless of classification
    pub fn raw_resistance(&self) -> f32 {
        self.resistance
    }

    /// Filtered divider voltage, `None` before the first measurement
    pub fn voltage(&self) -> Option<f32> {
        self.voltage.value()
    }

    /// Usable resistance: -1 when open or unknown, 0 when shorted
    pub fn ohms(&self) -> f32 {
        match self.state {
            CoilState::NotConnected => -1.0,
            CoilState::Connected => self.resistance,
            CoilState::ShortCircuit => 0.0,
        }
    }
}
