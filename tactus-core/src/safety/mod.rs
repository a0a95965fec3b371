//! Safety supervision
//!
//! Detects the over-current condition that forces a full shutdown.

pub mod current;

pub use current::{CurrentMonitor, CurrentStatus};
