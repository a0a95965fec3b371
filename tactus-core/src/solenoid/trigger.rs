//! Trigger requests and their outcome

/// A timed actuation request
///
/// ```
/// use tactus_core::solenoid::PulseRequest;
///
/// let request = PulseRequest::new(5.0, 0.1).fade_in(true);
/// assert!(request.fade_in);
/// assert!(!request.is_release());
/// assert!(PulseRequest::release().is_release());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseRequest {
    /// Electrical power delivered to the coil
    pub watts: f32,
    /// Pulse length
    pub seconds: f32,
    /// Ramp the duty cycle up over the configured fade-in time
    pub fade_in: bool,
    /// Ramp the duty cycle down over the configured fade-out time
    pub fade_out: bool,
}

impl PulseRequest {
    /// Create a request without fades
    pub const fn new(watts: f32, seconds: f32) -> Self {
        Self {
            watts,
            seconds,
            fade_in: false,
            fade_out: false,
        }
    }

    /// Request that stops a running pulse immediately
    pub const fn release() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn fade_in(mut self, fade_in: bool) -> Self {
        self.fade_in = fade_in;
        self
    }

    pub fn fade_out(mut self, fade_out: bool) -> Self {
        self.fade_out = fade_out;
        self
    }

    /// Check if this request stops a pulse instead of starting one
    ///
    /// Zero, negative or non-numeric power or duration all release.
    pub fn is_release(&self) -> bool {
        !(self.watts > 0.0 && self.seconds > 0.0)
    }
}

/// Why a trigger was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerRejection {
    /// No such port
    InvalidPort,
    /// Ports have not been qualified by the resistance probe yet
    NotReady,
    /// Port has no usable coil
    NotConnected,
    /// Supply current is above the limit
    OverCurrent,
    /// Supply voltage missing
    NoSupply,
    /// Main rail could not be switched on
    PowerUnavailable,
}

/// What a trigger did
///
/// Triggers never fail loudly; callers that do not care may ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// Pulse started or replaced
    Accepted,
    /// Port switched off
    Released,
    /// Port fading out
    FadingOut,
    /// Nothing changed
    Rejected(TriggerRejection),
}

impl TriggerOutcome {
    /// Check if the request was acted upon
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}
