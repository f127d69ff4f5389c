//! Platform abstraction layer
//!
//! Translates raw device state into simulation [`Command`](crate::sim::Command)s.
//! The simulation itself never reads a keyboard or gamepad.

pub mod input;

pub use input::{GamepadState, InputMapper, Key, KeyEvent};
