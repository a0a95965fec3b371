//! GPIO button input
//!
//! Adapts an `embedded-hal` input pin to the button engine. A failed read
//! is neither high nor low, so it never reads as a press in either wiring.

use embedded_hal::digital::InputPin as HalInputPin;
use tactus_hal::InputPin;

/// Button input on an `embedded-hal` pin
pub struct GpioInput<P> {
    pin: P,
}

impl<P: HalInputPin> GpioInput<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: HalInputPin> InputPin for GpioInput<P> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high().unwrap_or_else(|_| {
            warn!("button pin read failed");
            false
        })
    }

    fn is_low(&mut self) -> bool {
        self.pin.is_low().unwrap_or_else(|_| {
            warn!("button pin read failed");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Mock input pin; `None` fails the read
    struct MockPin {
        level: Option<bool>,
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl HalInputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            self.level.ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.level.map(|high| !high).ok_or(ErrorKind::Other)
        }
    }

    #[test]
    fn test_levels() {
        let mut input = GpioInput::new(MockPin { level: Some(true) });
        assert!(input.is_high());
        assert!(!input.is_low());

        let mut input = GpioInput::new(MockPin { level: Some(false) });
        assert!(!input.is_high());
        assert!(input.is_low());
    }

    #[test]
    fn test_read_error_is_released() {
        let mut input = GpioInput::new(MockPin { level: None });
        assert!(!input.is_high());
        assert!(!input.is_low());
    }

    #[test]
    fn test_drives_button() {
        use tactus_core::button::{Button, EventSequence, PressedTo, State};
        use tactus_core::config::ButtonConfig;
        use tactus_core::traits::ButtonHandler;

        #[derive(Default)]
        struct Downs(u32);

        impl ButtonHandler for Downs {
            fn handle_down(&mut self, _event: u32) {
                self.0 += 1;
            }
        }

        // Wired to ground: pressed reads low
        let input = GpioInput::new(MockPin { level: Some(false) });
        let mut button = Button::new(input, PressedTo::Ground, false, ButtonConfig::default(), Downs::default());
        let mut sequence = EventSequence::new();

        button.poll(0, &mut sequence);
        button.poll(5000, &mut sequence);
        assert_eq!(button.state(), State::Down);
        assert_eq!(button.handler().0, 1);
    }
}
