//! Board-agnostic control logic for Tactus controllers
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits the host platform implements (solenoid power stage,
//!   button event hooks)
//! - Button engine: debounce, click counting and long-press detection
//! - Solenoid power controller: pulse shaping, resistance probing and
//!   over-current shutdown
//! - Current supervision and signal filters
//! - Configuration type definitions and their persisted record
//!
//! Everything runs from a single cooperative superloop. Each `update` call
//! does a bounded amount of work and returns; nothing blocks.

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod button;
pub mod config;
pub mod filter;
pub mod safety;
pub mod solenoid;
pub mod traits;
