//! Solenoid power controller
//!
//! The controller drives `N` solenoid ports from a shared power rail:
//!
//! - Pulses are requested by power (watts) and length (seconds); the PWM
//!   duty cycle follows from the measured coil resistance and the supply
//!   voltage.
//! - While nothing is driven, a background probe measures the resistance of
//!   every port through a voltage divider and classifies the load.
//! - The filtered supply current is checked on every tick; exceeding the
//!   limit releases every port and forces the ports to be qualified again.
//!
//! All hardware access goes through [`SolenoidHardware`](crate::traits::SolenoidHardware).
//!
//! # Example
//!
//! ```
//! use tactus_core::config::SolenoidConfig;
//! use tactus_core::solenoid::{PulseRequest, SolenoidController, TriggerOutcome, TriggerRejection};
//! use tactus_core::traits::{PowerState, SolenoidHardware};
//! use tactus_hal::ManualClock;
//!
//! struct Board;
//!
//! impl SolenoidHardware for Board {
//!     fn set_power(&mut self, _state: PowerState) -> bool { true }
//!     fn read_voltage(&mut self) -> f32 { 12.0 }
//!     fn read_current(&mut self) -> f32 { 0.0 }
//!     fn read_probe_voltage(&mut self) -> f32 { 0.8 }
//!     fn set_pwm_duty(&mut self, _port: usize, _duty: f32) {}
//! }
//!
//! let clock = ManualClock::new(0);
//! let mut solenoids: SolenoidController<_, _, 4> =
//!     SolenoidController::new(SolenoidConfig::default(), Board, &clock);
//! solenoids.reset();
//!
//! // Ports are not qualified yet
//! assert_eq!(
//!     solenoids.trigger(0, PulseRequest::new(5.0, 0.1)),
//!     TriggerOutcome::Rejected(TriggerRejection::NotReady)
//! );
//!
//! for _ in 0..2000 {
//!     clock.advance_ms(1);
//!     solenoids.update();
//! }
//! assert!(solenoids.is_ready());
//! assert_eq!(solenoids.trigger(0, PulseRequest::new(5.0, 0.1)), TriggerOutcome::Accepted);
//! ```

pub mod coil;
mod controller;
pub mod port;
pub mod probe;
mod trigger;

pub use coil::{classify, divider_resistance, CoilMeasurement, CoilState};
pub use controller::{duty_for_watts, SolenoidController, BLANK_USEC, POWER_HOLD_USEC, TICK_USEC};
pub use port::{DriverState, Pulse, SolenoidPort};
pub use probe::{Probe, ProbeState};
pub use trigger::{PulseRequest, TriggerOutcome, TriggerRejection};
