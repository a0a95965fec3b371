//! Solenoid power stage capabilities

/// Main power rail state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    On,
    Off,
}

/// Status shown to the user, usually on one LED per port
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Port indicator dark
    Off { port: usize },
    /// Ports are being qualified for the first time
    Initialize,
    /// All ports are qualified
    Ready,
    /// Coil connected; `level` is `1 − R / R_max`
    Resistance { port: usize, level: f32 },
    /// Pulse started at the given power
    Power { port: usize, watts: f32 },
    /// Coil shorted
    ShortCircuit { port: usize },
    /// Supply current limit exceeded, every port switched off
    OverCurrent,
}

/// Hardware the solenoid controller drives
///
/// The controller is polymorphic over this capability set and contains no
/// hardware access itself.
pub trait SolenoidHardware {
    /// Switch the main power rail
    ///
    /// Returns false if the rail could not be switched on; the trigger
    /// requesting it is then dropped.
    fn set_power(&mut self, state: PowerState) -> bool;

    /// Supply voltage in volts
    fn read_voltage(&mut self) -> f32;

    /// Supply current in amperes
    fn read_current(&mut self) -> f32;

    /// Output of the resistance-probe voltage divider in volts
    ///
    /// With the main rail off, switching a single port on connects 3.3V
    /// through a 100Ω divider and a ~0.3V diode to the coil.
    fn read_probe_voltage(&mut self) -> f32;

    /// Set the PWM duty cycle of a port (0.0-1.0)
    fn set_pwm_duty(&mut self, port: usize, duty: f32);

    /// Render a status indicator
    fn set_indicator(&mut self, _indicator: Indicator) {}
}
