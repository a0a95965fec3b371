//! Per-port drive state machine
//!
//! ```text
//!           trigger (fade-in)          duty ≥ target
//!   Idle ─────────────────────► FadeIn ─────────────► Peak
//!     │                                                │
//!     │ trigger                            peak window │ elapsed
//!     └──────────────────────────────────────► Peak ──►Hold
//!                                                      │
//!                  pulse elapsed: FadeOut or release ◄─┘
//! ```
//!
//! Duty changes by one precomputed step per 1ms tick while fading.

use tactus_hal::time::elapsed_usec;

use super::coil::{CoilMeasurement, CoilState};
use crate::config::{FadeConfig, SolenoidConfig};

/// Duty cycles below this are not worth fading
const MIN_FADE_DUTY: f32 = 0.01;

/// Drive state of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    #[default]
    Idle,
    FadeIn,
    Peak,
    Hold,
    FadeOut,
}

/// Parameters of the running pulse
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub start_usec: u32,
    /// Time the target duty was reached
    pub peak_usec: u32,
    pub duration_usec: u32,
    pub fade_in: bool,
    pub fade_out: bool,
    /// Duty cycle delivering the requested power
    pub target: f32,
    /// Duty change per tick while fading
    pub delta: f32,
}

/// Result of one drive step
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    Unchanged,
    Duty(f32),
    Release,
}

/// One solenoid port
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SolenoidPort {
    state: DriverState,
    duty: f32,
    coil: CoilMeasurement,
    pulse: Pulse,
}

impl SolenoidPort {
    /// Create an idle, unmeasured port
    pub const fn new() -> Self {
        Self {
            state: DriverState::Idle,
            duty: 0.0,
            coil: CoilMeasurement::new(),
            pulse: Pulse {
                start_usec: 0,
                peak_usec: 0,
                duration_usec: 0,
                fade_in: false,
                fade_out: false,
                target: 0.0,
                delta: 0.0,
            },
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Current PWM duty cycle
    pub fn duty(&self) -> f32 {
        self.duty
    }

    pub fn coil(&self) -> &CoilMeasurement {
        &self.coil
    }

    pub fn coil_state(&self) -> CoilState {
        self.coil.state()
    }

    pub fn pulse(&self) -> &Pulse {
        &self.pulse
    }

    /// Check if the port is not driving a pulse
    pub fn is_idle(&self) -> bool {
        self.state == DriverState::Idle
    }

    pub(crate) fn coil_mut(&mut self) -> &mut CoilMeasurement {
        &mut self.coil
    }

    /// Start or replace a pulse
    ///
    /// Fades in from the current duty when requested and worthwhile,
    /// otherwise switches straight to the target. Returns the duty to apply
    /// right away, if any.
    pub(crate) fn start(&mut self, pulse: Pulse, fade: &FadeConfig) -> Option<f32> {
        let target = pulse.target;
        self.pulse = pulse;

        let msec = {
            let fade_msec = fade.in_sec * 1000.0;
            let pulse_msec = pulse.duration_usec as f32 / 1000.0;
            if fade_msec > pulse_msec {
                pulse_msec
            } else {
                fade_msec
            }
        };

        if pulse.fade_in && target > MIN_FADE_DUTY && self.duty < target && msec > 0.0 {
            self.pulse.delta = target / msec;
            self.state = DriverState::FadeIn;
            return None;
        }

        // Immediate switch-on, or take-over from a running fade
        self.duty = target;
        self.pulse.peak_usec = pulse.start_usec;
        self.state = DriverState::Peak;
        Some(self.duty)
    }

    /// Advance one tick
    pub(crate) fn step(&mut self, now_usec: u32, config: &SolenoidConfig) -> Step {
        match self.state {
            DriverState::Idle => Step::Unchanged,

            DriverState::FadeIn => {
                self.duty += self.pulse.delta;
                if self.duty >= self.pulse.target {
                    self.duty = self.pulse.target;
                    self.pulse.peak_usec = now_usec;
                    self.state = DriverState::Peak;
                }
                Step::Duty(self.duty)
            }

            DriverState::Peak => {
                // The plunger has moved, drop to the power needed to hold it
                if elapsed_usec(now_usec, self.pulse.peak_usec) > config.hold.peak_usec {
                    self.duty *= config.hold.fraction;
                    self.state = DriverState::Hold;
                    return Step::Duty(self.duty);
                }

                self.finish_if_elapsed(now_usec, &config.fade)
            }

            DriverState::Hold => self.finish_if_elapsed(now_usec, &config.fade),

            DriverState::FadeOut => {
                self.duty -= self.pulse.delta;
                if self.duty <= 0.0 {
                    return Step::Release;
                }
                Step::Duty(self.duty)
            }
        }
    }

    fn finish_if_elapsed(&mut self, now_usec: u32, fade: &FadeConfig) -> Step {
        if elapsed_usec(now_usec, self.pulse.start_usec) < self.pulse.duration_usec {
            return Step::Unchanged;
        }

        if self.begin_fade_out(fade) {
            Step::Unchanged
        } else {
            Step::Release
        }
    }

    /// Switch to fading out, if the pulse asked for it and there is
    /// something left to fade
    pub(crate) fn begin_fade_out(&mut self, fade: &FadeConfig) -> bool {
        if !self.pulse.fade_out || self.duty < MIN_FADE_DUTY {
            return false;
        }

        self.pulse.delta = self.duty / (fade.out_sec * 1000.0);
        self.state = DriverState::FadeOut;
        true
    }

    /// Drop the pulse; the caller switches the PWM output off
    pub(crate) fn release(&mut self) {
        self.state = DriverState::Idle;
        self.duty = 0.0;
        self.pulse = Pulse::default();
    }
}
