//! Tactus Hardware Abstraction Layer
//!
//! This crate defines the capabilities the control loops need from the host
//! platform. Chip-specific code implements them; the control logic in
//! `tactus-core` only ever sees these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device application (protocol, loop)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactus-core (buttons, solenoids)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactus-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`time::Clock`] - Monotonic microsecond counter
//! - [`gpio::InputPin`] - Digital input
//!
//! Host builds and tests use [`time::ManualClock`] and
//! [`gpio::SimulatedPin`] in place of real hardware.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, SimulatedPin};
pub use time::{elapsed_usec, Clock, ManualClock};
