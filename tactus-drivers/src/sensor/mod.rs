//! Analog sensing

pub mod analog;

pub use analog::{AnalogChannel, AnalogInput, AnalogScale};
