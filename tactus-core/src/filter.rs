//! Exponential low-pass filter
//!
//! Analog readings are never used raw. Current and probe voltages are
//! smoothed with a single-pole IIR filter:
//!
//! ```text
//! y[n] = y[n-1] · (1 − α) + x[n] · α
//! ```

/// Single-pole exponential low-pass filter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowPass {
    alpha: f32,
    value: Option<f32>,
}

impl LowPass {
    /// Create an empty filter; the first sample seeds the output
    ///
    /// Seeding avoids a long ramp from an arbitrary start value, which would
    /// read as a short circuit right after a reset.
    pub const fn new(alpha: f32) -> Self {
        Self { alpha, value: None }
    }

    /// Create a filter starting from a known value
    pub const fn seeded(alpha: f32, value: f32) -> Self {
        Self {
            alpha,
            value: Some(value),
        }
    }

    /// Feed one sample and return the filtered value
    pub fn update(&mut self, sample: f32) -> f32 {
        let previous = self.value.unwrap_or(sample);
        let value = previous * (1.0 - self.alpha) + sample * self.alpha;
        self.value = Some(value);
        value
    }

    /// Filtered value, `None` before the first sample
    pub fn value(&self) -> Option<f32> {
        self.value
    }

    /// Smoothing coefficient
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.value = None;
    }
}
