//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the capabilities defined
//! in tactus-core and tactus-hal on top of `embedded-hal` 1.0:
//!
//! - Solenoid board (power rail switch, PWM outputs, analog sensing)
//! - Port indicator LEDs
//! - Analog input scaling (supply divider, current shunt, probe divider)
//! - GPIO button inputs

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod button;
pub mod indicator;
pub mod pwm;
pub mod sensor;
pub mod solenoid;
