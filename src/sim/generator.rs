//! Procedural pad layout
//!
//! Every pad is placed relative to the highest pad so far: a fixed vertical
//! step upward and a horizontal jump of at least `MIN_HORIZONTAL_GAP`.
//! Variants follow a short priority list gated by score and by hazards
//! already nearby.

use std::f32::consts::TAU;

use rand::Rng;

use super::state::{Oscillation, Pad, PadKind, PadVariant};
use crate::consts::*;

/// Start pad, top-left corner
pub const START_PAD_X: f32 = CANVAS_WIDTH / 2.0 - PAD_WIDTH / 2.0;
pub const START_PAD_Y: f32 = CANVAS_HEIGHT - 100.0;

/// Horizontal band pads are clamped into
pub const MIN_PAD_X: f32 = 20.0;
pub const MAX_PAD_X: f32 = CANVAS_WIDTH - 100.0;
/// Maximum horizontal offset from the previous pad
pub const X_JITTER: f32 = 120.0;
/// Minimum horizontal offset from the previous pad
pub const MIN_HORIZONTAL_GAP: f32 = 60.0;
/// Rejection sampling budget before falling back
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

/// Vertical distance between consecutive pads
pub const MIN_VERTICAL_GAP: f32 = 90.0;
pub const MAX_VERTICAL_GAP: f32 = 130.0;

/// Spikes only appear from this score on
pub const SPIKE_MIN_SCORE: u64 = 300;
pub const SPIKE_CHANCE: f32 = 0.10;
pub const FAKE_CHANCE: f32 = 0.20;
pub const MOVING_CHANCE: f32 = 0.15;
/// Moving pads become common past this score
pub const HARD_MOVING_MIN_SCORE: u64 = 500;
pub const HARD_MOVING_CHANCE: f32 = 0.40;
/// Vertical radius in which an existing hazard blocks another
pub const HAZARD_CLEARANCE: f32 = 150.0;

/// Moving pad oscillation ranges
const MIN_AMPLITUDE: f32 = 30.0;
const MAX_AMPLITUDE: f32 = 70.0;
const MIN_OSC_SPEED: f32 = 0.02;
const MAX_OSC_SPEED: f32 = 0.05;

/// Uniform draws behind one variant decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadRoll {
    pub spike: f32,
    pub fake: f32,
    pub moving: f32,
}

impl PadRoll {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            spike: rng.random(),
            fake: rng.random(),
            moving: rng.random(),
        }
    }

    /// Apply the variant rules in priority order
    pub fn pick(&self, score: u64, existing: &[Pad], y: f32) -> PadVariant {
        if score >= SPIKE_MIN_SCORE
            && self.spike < SPIKE_CHANCE
            && !hazard_near(existing, y, |k| k.is_spike())
        {
            return PadVariant::Spike;
        }
        if self.fake < FAKE_CHANCE && !hazard_near(existing, y, |k| k.is_spike() || k.is_fake()) {
            return PadVariant::Fake;
        }
        if self.moving < moving_chance(score) {
            return PadVariant::Moving;
        }
        PadVariant::Normal
    }
}

fn moving_chance(score: u64) -> f32 {
    if score >= HARD_MOVING_MIN_SCORE {
        HARD_MOVING_CHANCE
    } else {
        MOVING_CHANCE
    }
}

fn hazard_near(existing: &[Pad], y: f32, is_hazard: impl Fn(&PadKind) -> bool) -> bool {
    existing
        .iter()
        .any(|p| (p.pos.y - y).abs() < HAZARD_CLEARANCE && is_hazard(&p.kind))
}

/// Decide the kind of a pad about to be placed at (x, y)
pub fn decide_pad_kind<R: Rng + ?Sized>(
    rng: &mut R,
    score: u64,
    existing: &[Pad],
    x: f32,
    y: f32,
) -> PadKind {
    match PadRoll::draw(rng).pick(score, existing, y) {
        PadVariant::Normal => PadKind::Normal,
        PadVariant::Fake => PadKind::Fake,
        PadVariant::Spike => PadKind::Spike,
        PadVariant::Moving => PadKind::Moving(random_oscillation(rng, x)),
    }
}

/// Oscillation around `center_x` that keeps the pad on the canvas
fn random_oscillation<R: Rng + ?Sized>(rng: &mut R, center_x: f32) -> Oscillation {
    let room = center_x.min(CANVAS_WIDTH - PAD_WIDTH - center_x).max(0.0);
    Oscillation {
        center_x,
        amplitude: rng.random_range(MIN_AMPLITUDE..MAX_AMPLITUDE).min(room),
        speed: rng.random_range(MIN_OSC_SPEED..MAX_OSC_SPEED),
        phase: rng.random_range(0.0..TAU),
    }
}

/// Horizontal position for the pad after one at `prev_x`
///
/// Rejection-samples a jittered, clamped position until it is at least
/// `MIN_HORIZONTAL_GAP` away. After `MAX_PLACEMENT_ATTEMPTS` misses the pad
/// goes to the band edge on the roomier side; only a band too narrow for
/// the gap on either side gets an unconstrained sample.
pub fn place_x<R: Rng + ?Sized>(rng: &mut R, prev_x: f32, min_x: f32, max_x: f32) -> f32 {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = (prev_x + rng.random_range(-X_JITTER..X_JITTER)).clamp(min_x, max_x);
        if (x - prev_x).abs() >= MIN_HORIZONTAL_GAP {
            return x;
        }
    }

    let room_left = prev_x - min_x;
    let room_right = max_x - prev_x;
    if room_right >= MIN_HORIZONTAL_GAP && room_right >= room_left {
        log::debug!("Placement fallback: right edge from {}", prev_x);
        max_x
    } else if room_left >= MIN_HORIZONTAL_GAP {
        log::debug!("Placement fallback: left edge from {}", prev_x);
        min_x
    } else {
        log::warn!(
            "Pad band [{}, {}] too narrow for a {} gap",
            min_x,
            max_x,
            MIN_HORIZONTAL_GAP
        );
        (prev_x + rng.random_range(-X_JITTER..X_JITTER)).clamp(min_x, max_x)
    }
}

/// Next pad above `prev`
pub fn next_pad<R: Rng + ?Sized>(rng: &mut R, prev: &Pad, existing: &[Pad], score: u64) -> Pad {
    let y = prev.pos.y - rng.random_range(MIN_VERTICAL_GAP..MAX_VERTICAL_GAP);
    let x = place_x(rng, prev.anchor_x(), MIN_PAD_X, MAX_PAD_X);
    let kind = decide_pad_kind(rng, score, existing, x, y);
    Pad::new(x, y, kind)
}

/// Fixed start pad followed by generated pads
pub fn initial_layout<R: Rng + ?Sized>(rng: &mut R) -> Vec<Pad> {
    let mut pads = Vec::with_capacity(INITIAL_PAD_COUNT);
    pads.push(Pad::new(START_PAD_X, START_PAD_Y, PadKind::Normal));
    while pads.len() < INITIAL_PAD_COUNT {
        let prev = &pads[pads.len() - 1];
        let pad = next_pad(rng, prev, &pads, 0);
        pads.push(pad);
    }
    pads
}

/// Pad above the highest existing one, or None when there are no pads
pub fn spawn_next<R: Rng + ?Sized>(rng: &mut R, existing: &[Pad], score: u64) -> Option<Pad> {
    let highest = existing.iter().min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
    let pad = next_pad(rng, highest, existing, score);
    log::debug!("Spawned {:?} pad at ({:.0}, {:.0})", pad.kind.variant(), pad.pos.x, pad.pos.y);
    Some(pad)
}
