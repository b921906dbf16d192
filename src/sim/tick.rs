//! Fixed timestep simulation tick
//!
//! Input arrives as a queue of edge events gathered by the host since the
//! previous tick. They are applied first, then one step of the world runs
//! if a run is in progress.

use rand::Rng;

use super::autopilot;
use super::generator;
use super::state::{GameEvent, GameOverCause, GamePhase, GameState, Session, Steer};
use crate::consts::*;

/// Input edges (not levels) collected between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Direction key went down
    SteerPressed(Steer),
    /// Direction key went up
    SteerReleased(Steer),
    /// Play button (title screen only)
    Play,
    /// Restart button or key (game over only)
    Restart,
    /// Attract mode on/off
    ToggleAutopilot,
}

/// Outcome of testing the player against every pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    None,
    Bounced,
    Fatal(GameOverCause),
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &[InputEvent]) {
    for &event in input {
        apply_input(state, event);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    advance(state);
}

fn apply_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::Play => {
            if state.phase == GamePhase::NotStarted {
                state.start_run();
            }
        }
        InputEvent::Restart => {
            if state.phase == GamePhase::GameOver {
                state.start_run();
            }
        }
        InputEvent::ToggleAutopilot => {
            state.autopilot = !state.autopilot;
            // Hand control back with nothing held
            if !state.autopilot {
                if let Some(session) = state.session.as_mut() {
                    session.player.steer = Steer::Idle;
                }
            }
            log::info!("Autopilot: {}", state.autopilot);
        }
        InputEvent::SteerPressed(steer) => {
            if let (GamePhase::Playing, Some(session)) = (state.phase, state.session.as_mut()) {
                session.player.press(steer);
            }
        }
        InputEvent::SteerReleased(steer) => {
            if let (GamePhase::Playing, Some(session)) = (state.phase, state.session.as_mut()) {
                session.player.release(steer);
            }
        }
    }
}

/// One world step: pads, collisions, scrolling, player physics
fn advance(state: &mut GameState) {
    let Some(session) = state.session.as_mut() else {
        return;
    };
    session.time_ticks += 1;

    if state.autopilot {
        session.player.steer = autopilot::steer_for(session);
    }

    match resolve_pads(session) {
        Contact::Fatal(cause) => {
            state.end_run(cause);
            return;
        }
        Contact::Bounced => state.events.push(GameEvent::Bounce),
        Contact::None => {}
    }

    if let Some(delta) = scroll_compensate(session) {
        session.score += (delta * SCROLL_SCORE_FACTOR).floor() as u64;

        if state.rng.random::<f32>() < SPAWN_CHANCE {
            if let Some(mut pad) =
                generator::spawn_next(&mut state.rng, &session.pads, session.score)
            {
                pad.update(session.time_ticks);
                session.pads.push(pad);
                state.events.push(GameEvent::PadSpawned);
            }
        }
    }

    session.player.update();

    if session.player.has_fallen() {
        state.end_run(GameOverCause::Fell);
    }
}

/// Update every pad and test it against the player.
///
/// Walks the pads in reverse so off-screen ones can be removed in place.
/// A fake landing or a spike from below ends the walk immediately.
fn resolve_pads(session: &mut Session) -> Contact {
    let now = session.time_ticks;
    let mut contact = Contact::None;

    for i in (0..session.pads.len()).rev() {
        let pad = &mut session.pads[i];
        pad.update(now);

        if session.player.hits_landing(pad) {
            if pad.kind.is_fake() {
                return Contact::Fatal(GameOverCause::FakePad);
            }
            session.player.jump();
            contact = Contact::Bounced;
        } else if session.player.hits_spike_from_below(pad) {
            return Contact::Fatal(GameOverCause::SpikeFromBelow);
        }

        if pad.is_offscreen() {
            session.pads.remove(i);
        }
    }

    contact
}

/// Hold the player at the midline by moving the world down instead.
/// Returns the distance scrolled, if any.
fn scroll_compensate(session: &mut Session) -> Option<f32> {
    let y = session.player.pos.y;
    if y >= MIDLINE_Y {
        return None;
    }

    let delta = MIDLINE_Y - y;
    session.player.prev_pos.y += delta;
    session.player.pos.y = MIDLINE_Y;
    session.scroll_offset += delta;
    for pad in &mut session.pads {
        pad.pos.y += delta;
    }
    Some(delta)
}
