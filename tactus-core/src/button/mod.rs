//! Button engine
//!
//! Debounces and classifies raw GPIO samples into Down, Up, Click, Hold and
//! Release events:
//!
//! ```text
//!            press               ≥5ms, pressed              released
//!   Idle ─────────────▶ WaitDown ────────────▶ Down ─────────────────▶ Up
//!    ▲                     │ released            │ ≥ hold               │ │ pressed again
//!    │                     ▼                     ▼                      │ │ within window
//!    └──────────────── Reset ◀──────────────── Hold                     │ └──▶ Down (clicks+1)
//!                        ▲       released                               │
//!                        └──────────────────────────────────────────────┘
//!                                     window elapsed: Click(clicks)
//! ```
//!
//! Each [`Button`] is polled by a [`ButtonDispatcher`], which only scans
//! while an interrupt or a busy button asks for it.

pub mod dispatcher;
pub mod machine;

pub use dispatcher::{ButtonDispatcher, EventSequence, PollButton, RegisterError, WakeFlag};
pub use machine::{Button, PressedTo, Pull, State};

/// Time for a press to settle before it is trusted
pub const DEBOUNCE_USEC: u32 = 5 * 1000;

/// Minimum time between two dispatcher scans
pub const POLL_INTERVAL_USEC: u32 = 1000;
