//! Per-port indicator LEDs
//!
//! One dimmable LED per solenoid port. Port indicators set their own LED;
//! controller-wide indicators set all of them:
//!
//! | Indicator | LED |
//! |---|---|
//! | `Off` | off |
//! | `Resistance` | `level` |
//! | `Power`, `ShortCircuit` | full |
//! | `Initialize` | all dim |
//! | `Ready` | all off |
//! | `OverCurrent` | all full |

use embedded_hal::pwm::SetDutyCycle;
use tactus_core::traits::Indicator;

use crate::pwm::set_fraction;

/// Brightness of every LED while the ports are qualified
pub const INITIALIZE_LEVEL: f32 = 0.1;

/// Something that renders controller status
pub trait IndicatorSink {
    fn show(&mut self, indicator: Indicator);
}

impl<T: IndicatorSink + ?Sized> IndicatorSink for &mut T {
    fn show(&mut self, indicator: Indicator) {
        (**self).show(indicator)
    }
}

/// Board without indicators
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl IndicatorSink for NoIndicator {
    fn show(&mut self, _indicator: Indicator) {}
}

/// One PWM-dimmed LED per port
pub struct PortLeds<L, const N: usize> {
    leds: [L; N],
    /// Brightness scale applied to every level
    brightness: f32,
}

impl<L: SetDutyCycle, const N: usize> PortLeds<L, N> {
    /// Create the indicator, switching every LED off
    pub fn new(leds: [L; N], brightness: f32) -> Self {
        let mut indicator = Self { leds, brightness };
        indicator.set_all(0.0);
        indicator
    }

    /// Get the LEDs back
    pub fn free(self) -> [L; N] {
        self.leds
    }

    /// Get access to a single LED
    pub fn led(&self, port: usize) -> Option<&L> {
        self.leds.get(port)
    }

    fn set(&mut self, port: usize, level: f32) {
        let brightness = self.brightness;
        if let Some(led) = self.leds.get_mut(port) {
            if set_fraction(led, level * brightness).is_err() {
                warn!("indicator LED {} write failed", port);
            }
        }
    }

    fn set_all(&mut self, level: f32) {
        for port in 0..N {
            self.set(port, level);
        }
    }
}

impl<L: SetDutyCycle, const N: usize> IndicatorSink for PortLeds<L, N> {
    fn show(&mut self, indicator: Indicator) {
        match indicator {
            Indicator::Off { port } => self.set(port, 0.0),
            Indicator::Resistance { port, level } => self.set(port, level),
            Indicator::Power { port, .. } | Indicator::ShortCircuit { port } => self.set(port, 1.0),
            Indicator::Initialize => self.set_all(INITIALIZE_LEVEL),
            Indicator::Ready => self.set_all(0.0),
            Indicator::OverCurrent => self.set_all(1.0),
        }
    }
}
