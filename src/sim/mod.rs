//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick at a time, velocities in units per tick
//! - Seeded RNG only
//! - Input consumed as queued edge events at the start of a tick
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod generator;
pub mod state;
pub mod tick;

pub use collision::{lands_on, strikes_spike_from_below};
pub use generator::{decide_pad_kind, initial_layout, spawn_next};
pub use state::{
    GameEvent, GameOverCause, GamePhase, GameState, Oscillation, Pad, PadKind, PadVariant, Player,
    Session, Steer,
};
pub use tick::{InputEvent, tick};
