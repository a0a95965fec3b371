//! PWM solenoid board
//!
//! A MOSFET per port switched by PWM, a common power rail behind a
//! switch, and three analog channels: supply voltage, supply current and the
//! resistance probe divider.
//!
//! Read errors never look like a healthy board:
//! - supply voltage reads 0V, so triggers are rejected
//! - supply current reads infinite, so the controller trips
//! - probe voltage reads as an open port

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use tactus_core::solenoid::coil::PROBE_SUPPLY_VOLTS;
use tactus_core::traits::{Indicator, PowerState, SolenoidHardware};

use crate::indicator::IndicatorSink;
use crate::pwm::set_fraction;
use crate::sensor::{AnalogChannel, AnalogInput};

/// Solenoid board with `N` ports
pub struct SolenoidBoard<PWR, PWM, A, L, const N: usize> {
    power: PWR,
    ports: [PWM; N],
    supply: AnalogChannel<A>,
    current: AnalogChannel<A>,
    probe: AnalogChannel<A>,
    indicators: L,
    /// Last rail state that was switched successfully
    rail: PowerState,
}

impl<PWR, PWM, A, L, const N: usize> SolenoidBoard<PWR, PWM, A, L, N>
where
    PWR: OutputPin,
    PWM: SetDutyCycle,
    A: AnalogInput,
    L: IndicatorSink,
{
    /// Create the board with the rail and every port switched off
    pub fn new(
        power: PWR,
        ports: [PWM; N],
        supply: AnalogChannel<A>,
        current: AnalogChannel<A>,
        probe: AnalogChannel<A>,
        indicators: L,
    ) -> Self {
        let mut board = Self {
            power,
            ports,
            supply,
            current,
            probe,
            indicators,
            rail: PowerState::On,
        };

        board.set_power(PowerState::Off);
        for port in 0..N {
            board.set_pwm_duty(port, 0.0);
        }
        board
    }

    /// Last rail state that was switched successfully
    pub fn rail(&self) -> PowerState {
        self.rail
    }

    pub fn port(&self, port: usize) -> Option<&PWM> {
        self.ports.get(port)
    }

    pub fn indicators(&self) -> &L {
        &self.indicators
    }

    /// Get mutable access to the analog channels (supply, current, probe)
    pub fn channels_mut(&mut self) -> (&mut AnalogChannel<A>, &mut AnalogChannel<A>, &mut AnalogChannel<A>) {
        (&mut self.supply, &mut self.current, &mut self.probe)
    }
}

impl<PWR, PWM, A, L, const N: usize> SolenoidHardware for SolenoidBoard<PWR, PWM, A, L, N>
where
    PWR: OutputPin,
    PWM: SetDutyCycle,
    A: AnalogInput,
    L: IndicatorSink,
{
    fn set_power(&mut self, state: PowerState) -> bool {
        let result = match state {
            PowerState::On => self.power.set_high(),
            PowerState::Off => self.power.set_low(),
        };

        if result.is_err() {
            warn!("power rail switch failed");
            return false;
        }

        self.rail = state;
        true
    }

    fn read_voltage(&mut self) -> f32 {
        self.supply.read().unwrap_or_else(|_| {
            warn!("supply voltage read failed");
            0.0
        })
    }

    fn read_current(&mut self) -> f32 {
        self.current.read().unwrap_or_else(|_| {
            warn!("supply current read failed");
            f32::INFINITY
        })
    }

    fn read_probe_voltage(&mut self) -> f32 {
        self.probe.read().unwrap_or_else(|_| {
            warn!("probe voltage read failed");
            PROBE_SUPPLY_VOLTS
        })
    }

    fn set_pwm_duty(&mut self, port: usize, duty: f32) {
        let Some(pwm) = self.ports.get_mut(port) else {
            return;
        };

        if set_fraction(pwm, duty).is_err() {
            warn!("port {} PWM write failed", port);
        }
    }

    fn set_indicator(&mut self, indicator: Indicator) {
        self.indicators.show(indicator);
    }
}
