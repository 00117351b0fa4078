//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events (keyboard, multi-touch)
//! - Storage lives in `persistence`

pub mod input;

pub use input::{Direction, InputCommand, InputKind, InputRouter, RawInput, TouchSample, TouchTracker};
