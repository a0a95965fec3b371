//! Supply current supervisor
//!
//! The supply current is filtered on every control tick. Exceeding the
//! configured maximum is the single condition that aborts all running
//! pulses; it is handled by the controller, never propagated as an error.

use crate::config::CurrentLimit;
use crate::filter::LowPass;

/// Current condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentStatus {
    /// Filtered current within the limit
    Ok,
    /// Filtered current above the limit
    OverCurrent,
}

/// Filtered supply current with a hard limit
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentMonitor {
    limit: CurrentLimit,
    filter: LowPass,
    /// Last reading was not a number
    sensor_fault: bool,
}

impl CurrentMonitor {
    /// Create a monitor starting at 0A
    pub const fn new(limit: CurrentLimit) -> Self {
        Self {
            limit,
            filter: LowPass::seeded(limit.alpha, 0.0),
            sensor_fault: false,
        }
    }

    /// Feed one reading
    ///
    /// With a zero alpha the reading is taken as is. A non-finite reading
    /// counts as over the limit for this tick but is kept out of the filter.
    pub fn update(&mut self, amps: f32) -> CurrentStatus {
        self.sensor_fault = !amps.is_finite();
        if self.sensor_fault {
            return CurrentStatus::OverCurrent;
        }

        if self.limit.alpha > 0.0 {
            self.filter.update(amps);
        } else {
            self.filter = LowPass::seeded(0.0, amps);
        }

        self.check()
    }

    /// Check the filtered current against the limit
    pub fn check(&self) -> CurrentStatus {
        if !self.sensor_fault && self.current() <= self.limit.max {
            CurrentStatus::Ok
        } else {
            CurrentStatus::OverCurrent
        }
    }

    /// Check if the current is above the limit
    pub fn is_over_limit(&self) -> bool {
        self.check() == CurrentStatus::OverCurrent
    }

    /// Filtered current in amperes
    pub fn current(&self) -> f32 {
        self.filter.value().unwrap_or(0.0)
    }

    /// Restart from 0A
    pub fn reset(&mut self) {
        self.filter = LowPass::seeded(self.limit.alpha, 0.0);
        self.sensor_fault = false;
    }
}
