//! Solenoid power stage

pub mod board;

pub use board::SolenoidBoard;
