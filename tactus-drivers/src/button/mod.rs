//! Button inputs

pub mod gpio;

pub use gpio::GpioInput;
