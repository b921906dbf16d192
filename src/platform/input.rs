//! Keyboard mapping
//!
//! Browsers report keys by their `KeyboardEvent.key` name. Letter keys come
//! in either case depending on shift and caps lock, so both are accepted.

use crate::sim::{InputEvent, Steer};

/// Direction a key steers in, if any
fn steer_for_key(key: &str) -> Option<Steer> {
    match key {
        "a" | "A" | "ArrowLeft" => Some(Steer::Left),
        "d" | "D" | "ArrowRight" => Some(Steer::Right),
        _ => None,
    }
}

/// Event produced by a key going down
pub fn key_down(key: &str) -> Option<InputEvent> {
    if let Some(steer) = steer_for_key(key) {
        return Some(InputEvent::SteerPressed(steer));
    }
    match key {
        "r" | "R" => Some(InputEvent::Restart),
        "i" | "I" => Some(InputEvent::ToggleAutopilot),
        _ => None,
    }
}

/// Event produced by a key going up
pub fn key_up(key: &str) -> Option<InputEvent> {
    steer_for_key(key).map(InputEvent::SteerReleased)
}

/// Tracks held keys so auto-repeat keydowns are dropped
#[derive(Debug, Default)]
pub struct KeyState {
    held: Vec<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. `repeat` is the browser's auto-repeat flag.
    pub fn press(&mut self, key: &str, repeat: bool) -> Option<InputEvent> {
        if repeat || self.held.iter().any(|k| k == key) {
            return None;
        }
        let event = key_down(key)?;
        self.held.push(key.to_string());
        Some(event)
    }

    /// Key went up
    pub fn release(&mut self, key: &str) -> Option<InputEvent> {
        self.held.retain(|k| k != key);
        key_up(key)
    }

    /// Forget every held key (focus lost); returns the releases to send
    pub fn release_all(&mut self) -> Vec<InputEvent> {
        self.held.drain(..).filter_map(|k| key_up(&k)).collect()
    }
}
