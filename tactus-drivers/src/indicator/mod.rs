//! Status indicators

pub mod led;

pub use led::{IndicatorSink, NoIndicator, PortLeds};
