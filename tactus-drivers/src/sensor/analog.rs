//! Analog inputs scaled to physical units
//!
//! The solenoid board senses three analog signals: the supply voltage behind
//! a resistor divider, the supply current across a shunt, and the output of
//! the resistance probe divider.

/// ADC reading trait for platform abstraction
pub trait AnalogInput {
    /// Read the raw conversion result
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self) -> Result<u16, ()> {
        (**self).read()
    }
}

/// Conversion from raw ADC counts to a physical value
///
/// `value = raw / adc_max · vref · gain`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogScale {
    /// ADC reference voltage in volts
    pub vref: f32,
    /// Full-scale reading
    pub adc_max: u16,
    /// Multiplier from pin voltage to the physical value
    pub gain: f32,
}

impl AnalogScale {
    /// Pin voltage as is
    pub const fn direct(vref: f32, adc_max: u16) -> Self {
        Self {
            vref,
            adc_max,
            gain: 1.0,
        }
    }

    /// Voltage behind a divider
    ///
    /// # Arguments
    /// - `top_ohms`: Resistor from the measured voltage to the pin
    /// - `bottom_ohms`: Resistor from the pin to ground
    pub fn divider(vref: f32, adc_max: u16, top_ohms: f32, bottom_ohms: f32) -> Self {
        Self {
            vref,
            adc_max,
            gain: (top_ohms + bottom_ohms) / bottom_ohms,
        }
    }

    /// Current through a shunt, measured by an amplifier
    pub fn shunt(vref: f32, adc_max: u16, shunt_ohms: f32, amplifier_gain: f32) -> Self {
        Self {
            vref,
            adc_max,
            gain: 1.0 / (shunt_ohms * amplifier_gain),
        }
    }

    /// Convert a raw reading
    pub fn convert(&self, raw: u16) -> f32 {
        if self.adc_max == 0 {
            return 0.0;
        }

        raw as f32 / self.adc_max as f32 * self.vref * self.gain
    }
}

/// An analog input with its scale
pub struct AnalogChannel<A> {
    input: A,
    scale: AnalogScale,
}

impl<A: AnalogInput> AnalogChannel<A> {
    pub fn new(input: A, scale: AnalogScale) -> Self {
        Self { input, scale }
    }

    /// Read and convert
    #[allow(clippy::result_unit_err)]
    pub fn read(&mut self) -> Result<f32, ()> {
        let raw = self.input.read()?;
        Ok(self.scale.convert(raw))
    }

    pub fn scale(&self) -> &AnalogScale {
        &self.scale
    }

    /// Get mutable access to the underlying input
    pub fn input_mut(&mut self) -> &mut A {
        &mut self.input
    }

    pub fn free(self) -> A {
        self.input
    }
}

/// Fixed reading for testing
#[cfg(test)]
pub struct DummyAdc(pub Option<u16>);

#[cfg(test)]
impl AnalogInput for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0.ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 0.01 && d > -0.01
    }

    #[test]
    fn test_direct() {
        let scale = AnalogScale::direct(3.3, 4095);
        assert!(close(scale.convert(4095), 3.3));
        assert!(close(scale.convert(0), 0.0));
        assert!(close(scale.convert(993), 0.8));
    }

    #[test]
    fn test_divider() {
        // 100k / 10k: 12V reads as ~1.09V on the pin
        let scale = AnalogScale::divider(3.3, 4095, 100_000.0, 10_000.0);
        let raw = (12.0 / 11.0 / 3.3 * 4095.0) as u16;
        assert!(close(scale.convert(raw), 12.0));
    }

    #[test]
    fn test_shunt() {
        // 10mΩ shunt with a 50x amplifier: 1A reads as 0.5V
        let scale = AnalogScale::shunt(3.3, 4095, 0.01, 50.0);
        let raw = (0.5 / 3.3 * 4095.0) as u16;
        assert!(close(scale.convert(raw), 1.0));
    }

    #[test]
    fn test_channel_error() {
        let mut channel = AnalogChannel::new(DummyAdc(None), AnalogScale::direct(3.3, 4095));
        assert!(channel.read().is_err());

        channel.input_mut().0 = Some(4095);
        assert!(close(channel.read().unwrap(), 3.3));
    }
}
