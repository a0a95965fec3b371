//! Fractional duty cycles on `embedded-hal` PWM channels

use embedded_hal::pwm::SetDutyCycle;

/// Set a duty cycle given as a fraction (0.0-1.0)
///
/// Values outside the range are clamped; NaN switches the channel off.
pub fn set_fraction<P: SetDutyCycle>(pwm: &mut P, fraction: f32) -> Result<(), P::Error> {
    let max = pwm.max_duty_cycle();
    pwm.set_duty_cycle(fraction_to_duty(fraction, max))
}

/// Convert a fraction to a raw duty value, rounded to nearest
pub fn fraction_to_duty(fraction: f32, max: u16) -> u16 {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    if fraction >= 1.0 {
        return max;
    }

    (fraction * max as f32 + 0.5) as u16
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorType, SetDutyCycle};

    /// PWM channel recording the last duty
    #[derive(Debug, Default)]
    pub struct MockPwm {
        pub duty: u16,
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }
}
