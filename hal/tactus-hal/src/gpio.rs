//! GPIO pin abstractions
//!
//! Provides the digital input capability the button engine samples. Pins
//! are read once per poll; edge interrupts are handled outside this trait.

use core::cell::Cell;

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip. Takes `&mut self` because some HALs need
/// mutable access to sample a pin.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &mut T {
    fn is_high(&mut self) -> bool {
        (**self).is_high()
    }

    fn is_low(&mut self) -> bool {
        (**self).is_low()
    }
}

/// Input pin driven from software
///
/// Used on the host to feed recorded or scripted levels into the button
/// engine. The level lives in a `Cell`, so a shared reference can be handed
/// to a button while the test keeps toggling it.
#[derive(Debug, Default)]
pub struct SimulatedPin {
    high: Cell<bool>,
}

impl SimulatedPin {
    /// Create a pin at the given level
    pub const fn new(high: bool) -> Self {
        Self {
            high: Cell::new(high),
        }
    }

    /// Drive the pin to a level
    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Current level
    pub fn level(&self) -> bool {
        self.high.get()
    }
}

impl InputPin for SimulatedPin {
    fn is_high(&mut self) -> bool {
        self.high.get()
    }
}

impl InputPin for &SimulatedPin {
    fn is_high(&mut self) -> bool {
        self.high.get()
    }
}
