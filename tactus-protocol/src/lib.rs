//! Device protocol interface
//!
//! The controllers are driven by a higher-level device object that speaks a
//! USB-transported, JSON-encoded request/reply protocol. The transport and
//! the JSON encoding live outside this workspace; this crate defines the
//! parts the control loops share with it:
//!
//! - [`Method`] - the request methods the device answers
//! - [`SolenoidReport`] / [`PortReport`] - status snapshots for replies
//!
//! Reports derive `serde` traits (feature `serde`, on by default) so the
//! protocol layer can encode them with whatever serializer it uses.

#![no_std]
#![deny(unsafe_code)]

pub mod methods;
pub mod status;

pub use methods::{Method, UnknownMethod};
pub use status::{PortReport, SolenoidReport, MAX_REPORT_PORTS};
