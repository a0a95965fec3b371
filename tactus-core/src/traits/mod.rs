//! Capability traits
//!
//! These traits define the interface between the control loops and the
//! hardware or application they drive. The state machines never touch a
//! register; they only call into these capabilities.

pub mod button;
pub mod solenoid;

pub use button::ButtonHandler;
pub use solenoid::{Indicator, PowerState, SolenoidHardware};
