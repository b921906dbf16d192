//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to simulation input)
//! - Storage lives in `persistence`, audio in `audio`

pub mod input;

pub use input::{KeyState, key_down, key_up};
