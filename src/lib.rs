//! Pad Hopper - a single-screen vertical platform hopper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, pads, scrolling, game phases)
//! - `game`: Frame driver connecting the simulation to audio and storage
//! - `renderer`: Draw calls against a 2D canvas surface
//! - `platform`: Browser input mapping
//! - `persistence`: Versioned key-value storage
//! - `highscores` / `settings`: Persisted player data

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical canvas size
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Screen line the player is held at while climbing
    pub const MIDLINE_Y: f32 = CANVAS_HEIGHT / 2.0;

    /// Downward acceleration, units/tick²
    pub const GRAVITY: f32 = 0.5;
    /// Upward velocity applied by a bounce
    pub const JUMP_STRENGTH: f32 = 19.0;
    /// Player sprite diameter
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Horizontal speed while a direction is held, units/tick
    pub const PLAYER_SPEED: f32 = 5.0;
    /// How far below the canvas the player may fall before the run ends
    pub const DEATH_MARGIN: f32 = 200.0;

    /// Pad body size
    pub const PAD_WIDTH: f32 = 80.0;
    pub const PAD_HEIGHT: f32 = 10.0;
    /// Pads are dropped once this far below the canvas
    pub const OFFSCREEN_MARGIN: f32 = 20.0;
    /// Pads in a fresh layout (start pad + generated)
    pub const INITIAL_PAD_COUNT: usize = 8;

    /// Score per unit of upward scroll
    pub const SCROLL_SCORE_FACTOR: f32 = 0.1;
    /// Chance of spawning a pad on a scrolling tick
    pub const SPAWN_CHANCE: f32 = 0.15;
}

/// Wrap a horizontal coordinate into [0, width)
#[inline]
pub fn wrap_x(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid rounds tiny negatives up to `width`
    if wrapped >= width { 0.0 } else { wrapped }
}
