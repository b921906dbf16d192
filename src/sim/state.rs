//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; the host owns exactly one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision;
use super::generator;
use crate::consts::*;
use crate::wrap_x;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no run exists yet
    NotStarted,
    /// Simulation running
    Playing,
    /// Run ended, session frozen until restart
    GameOver,
}

/// Horizontal input held by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    #[default]
    Idle,
    Right,
}

impl Steer {
    /// -1, 0 or 1
    pub fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Idle => 0.0,
            Steer::Right => 1.0,
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the sprite
    pub pos: Vec2,
    /// Center at the previous tick (for swept collision)
    pub prev_pos: Vec2,
    /// Vertical velocity (positive = falling)
    pub vel_y: f32,
    /// Sprite diameter
    pub size: f32,
    /// Held horizontal direction
    pub steer: Steer,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel_y: 0.0,
            size: PLAYER_SIZE,
            steer: Steer::Idle,
        }
    }

    /// Integrate one tick of gravity and horizontal movement
    pub fn update(&mut self) {
        self.prev_pos = self.pos;
        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;
        self.pos.x = wrap_x(self.pos.x + self.steer.sign() * PLAYER_SPEED, CANVAS_WIDTH);
    }

    /// True once the player has dropped past the death line
    pub fn has_fallen(&self) -> bool {
        self.pos.y > CANVAS_HEIGHT + DEATH_MARGIN
    }

    pub fn jump(&mut self) {
        self.vel_y = -JUMP_STRENGTH;
    }

    /// Key-down edge
    pub fn press(&mut self, steer: Steer) {
        self.steer = steer;
    }

    /// Key-up edge. Only clears the direction it was holding, so releasing
    /// the opposite key mid-turn doesn't stop the player.
    pub fn release(&mut self, steer: Steer) {
        if self.steer == steer {
            self.steer = Steer::Idle;
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size / 2.0
    }

    #[inline]
    pub fn prev_top(&self) -> f32 {
        self.prev_pos.y - self.size / 2.0
    }

    #[inline]
    pub fn prev_bottom(&self) -> f32 {
        self.prev_pos.y + self.size / 2.0
    }

    /// Horizontal extent used for collisions, narrower than the sprite
    pub fn hitbox_x(&self) -> (f32, f32) {
        let half = self.size / 4.0;
        (self.pos.x - half, self.pos.x + half)
    }

    pub fn hits_landing(&self, pad: &Pad) -> bool {
        collision::lands_on(self, pad)
    }

    pub fn hits_spike_from_below(&self, pad: &Pad) -> bool {
        collision::strikes_spike_from_below(self, pad)
    }
}

/// Horizontal oscillation of a moving pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub center_x: f32,
    pub amplitude: f32,
    /// Radians per tick
    pub speed: f32,
    pub phase: f32,
}

impl Oscillation {
    pub fn x_at(&self, tick: u64) -> f32 {
        self.center_x + self.amplitude * (tick as f32 * self.speed + self.phase).sin()
    }
}

/// Pad behavior
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PadKind {
    #[default]
    Normal,
    /// Looks solid, ends the run when landed on
    Fake,
    /// Bounces from above, ends the run when hit from below
    Spike,
    /// Normal pad sliding side to side
    Moving(Oscillation),
}

/// Payload-free pad tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadVariant {
    Normal,
    Fake,
    Spike,
    Moving,
}

impl PadKind {
    pub fn variant(&self) -> PadVariant {
        match self {
            PadKind::Normal => PadVariant::Normal,
            PadKind::Fake => PadVariant::Fake,
            PadKind::Spike => PadVariant::Spike,
            PadKind::Moving(_) => PadVariant::Moving,
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, PadKind::Fake)
    }

    pub fn is_spike(&self) -> bool {
        matches!(self, PadKind::Spike)
    }
}

/// A platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pad {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PadKind,
}

impl Pad {
    pub fn new(x: f32, y: f32, kind: PadKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: PAD_WIDTH,
            height: PAD_HEIGHT,
            kind,
        }
    }

    /// Advance variant motion to the given tick
    pub fn update(&mut self, tick: u64) {
        if let PadKind::Moving(osc) = self.kind {
            self.pos.x = osc.x_at(tick);
        }
    }

    pub fn is_offscreen(&self) -> bool {
        self.pos.y > CANVAS_HEIGHT + OFFSCREEN_MARGIN
    }

    /// Horizontal reference for placing the next pad
    pub fn anchor_x(&self) -> f32 {
        match self.kind {
            PadKind::Moving(osc) => osc.center_x,
            _ => self.pos.x,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    FakePad,
    SpikeFromBelow,
    Fell,
}

/// Events for the host (audio, persistence), drained after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RunStarted,
    Bounce,
    PadSpawned,
    GameOver { cause: GameOverCause, score: u64 },
    NewHighScore(u64),
}

/// One playthrough: the player, its pads and progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub player: Player,
    /// Insertion order, not spatial order
    pub pads: Vec<Pad>,
    pub score: u64,
    /// Total distance the world has scrolled
    pub scroll_offset: f32,
    /// Ticks simulated in this run
    pub time_ticks: u64,
}

impl Session {
    /// Fresh run: generated layout with the player resting on the start pad
    pub fn new<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pads = generator::initial_layout(rng);
        for pad in &mut pads {
            pad.update(0);
        }
        let start = &pads[0];
        let player = Player::new(Vec2::new(start.center_x(), start.top() - PLAYER_SIZE / 2.0));
        Self::with_layout(player, pads)
    }

    /// Session from explicit parts
    pub fn with_layout(player: Player, pads: Vec<Pad>) -> Self {
        Self {
            player,
            pads,
            score: 0,
            scroll_offset: 0.0,
            time_ticks: 0,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    /// Present in Playing and GameOver only
    pub session: Option<Session>,
    /// Best score seen, seeded from storage by the host
    pub high_score: u64,
    /// Attract mode: the simulation steers itself
    pub autopilot: bool,
    /// Runs started since creation
    pub runs: u32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Title-screen state with the given seed and stored high score
    pub fn new(seed: u64, high_score: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            session: None,
            high_score,
            autopilot: false,
            runs: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Playing state around an existing session
    pub fn from_session(seed: u64, high_score: u64, session: Session) -> Self {
        let mut state = Self::new(seed, high_score);
        state.session = Some(session);
        state.phase = GamePhase::Playing;
        state
    }

    /// Current run score (0 on the title screen)
    pub fn score(&self) -> u64 {
        self.session.as_ref().map(|s| s.score).unwrap_or(0)
    }

    /// Begin a new run (Play or Restart)
    pub fn start_run(&mut self) {
        self.record_high_score();
        self.session = Some(Session::new(&mut self.rng));
        self.phase = GamePhase::Playing;
        self.runs += 1;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run {} started", self.runs);
    }

    /// Freeze the session and settle the score
    pub fn end_run(&mut self, cause: GameOverCause) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        let score = self.score();
        self.events.push(GameEvent::GameOver { cause, score });
        log::info!("Game over ({:?}) with score {}", cause, score);
        self.record_high_score();
    }

    fn record_high_score(&mut self) {
        let score = self.score();
        if score > self.high_score {
            self.high_score = score;
            self.events.push(GameEvent::NewHighScore(score));
            log::info!("New high score: {}", score);
        }
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_jump_overrides_velocity() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.vel_y = 7.25;
        player.jump();
        assert_eq!(player.vel_y, -JUMP_STRENGTH);
        player.vel_y = -3.0;
        player.jump();
        assert_eq!(player.vel_y, -JUMP_STRENGTH);
    }

    #[test]
    fn test_update_applies_gravity_and_records_previous() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.vel_y = 2.0;
        player.update();
        assert_eq!(player.vel_y, 2.5);
        assert_eq!(player.prev_pos, Vec2::new(100.0, 100.0));
        assert_eq!(player.pos.y, 102.5);
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut player = Player::new(Vec2::new(CANVAS_WIDTH - 2.0, 100.0));
        player.press(Steer::Right);
        player.update();
        assert!((player.pos.x - 3.0).abs() < 1e-4);

        let mut player = Player::new(Vec2::new(2.0, 100.0));
        player.press(Steer::Left);
        player.update();
        assert!((player.pos.x - (CANVAS_WIDTH - 3.0)).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_update_keeps_x_on_canvas(
            x in -1e6f32..1e6,
            steer in prop_oneof![Just(Steer::Left), Just(Steer::Idle), Just(Steer::Right)],
        ) {
            let mut player = Player::new(Vec2::new(x, 100.0));
            player.steer = steer;
            player.update();
            prop_assert!(player.pos.x >= 0.0 && player.pos.x < CANVAS_WIDTH, "x = {}", player.pos.x);
        }
    }

    #[test]
    fn test_release_only_clears_matching_direction() {
        let mut player = Player::new(Vec2::ZERO);
        player.press(Steer::Left);
        player.press(Steer::Right);
        // Letting go of the key pressed first must not stop the turn
        player.release(Steer::Left);
        assert_eq!(player.steer, Steer::Right);
        player.release(Steer::Right);
        assert_eq!(player.steer, Steer::Idle);
    }

    #[test]
    fn test_has_fallen_threshold() {
        let mut player = Player::new(Vec2::new(0.0, CANVAS_HEIGHT + DEATH_MARGIN));
        assert!(!player.has_fallen());
        player.pos.y += 0.1;
        assert!(player.has_fallen());
    }

    #[test]
    fn test_moving_pad_follows_oscillation() {
        let osc = Oscillation {
            center_x: 150.0,
            amplitude: 40.0,
            speed: 0.05,
            phase: 0.0,
        };
        let mut pad = Pad::new(150.0, 200.0, PadKind::Moving(osc));
        pad.update(0);
        assert!((pad.pos.x - 150.0).abs() < 1e-4);
        // Quarter period puts the pad at the peak
        let quarter = (std::f32::consts::FRAC_PI_2 / osc.speed).round() as u64;
        pad.update(quarter);
        assert!((pad.pos.x - 190.0).abs() < 0.1);
        assert_eq!(pad.anchor_x(), 150.0);
    }

    #[test]
    fn test_static_pads_do_not_move() {
        for kind in [PadKind::Normal, PadKind::Fake, PadKind::Spike] {
            let mut pad = Pad::new(42.0, 10.0, kind);
            pad.update(1234);
            assert_eq!(pad.pos.x, 42.0);
        }
    }

    #[test]
    fn test_pad_offscreen() {
        let mut pad = Pad::new(0.0, CANVAS_HEIGHT + OFFSCREEN_MARGIN, PadKind::Normal);
        assert!(!pad.is_offscreen());
        pad.pos.y += 1.0;
        assert!(pad.is_offscreen());
    }

    #[test]
    fn test_new_session_rests_player_on_start_pad() {
        let mut rng = Pcg32::seed_from_u64(7);
        let session = Session::new(&mut rng);
        assert_eq!(session.pads.len(), INITIAL_PAD_COUNT);
        let start = &session.pads[0];
        assert_eq!(start.kind, PadKind::Normal);
        assert_eq!(session.player.bottom(), start.top());
        assert_eq!(session.player.pos.x, start.center_x());
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut state = GameState::new(1, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.session.is_none());

        state.start_run();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.session.is_some());

        state.end_run(GameOverCause::Fell);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.session.is_some());

        // Ending twice doesn't emit a second game-over
        state.end_run(GameOverCause::Fell);
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut session = Session::with_layout(Player::new(Vec2::ZERO), Vec::new());
        session.score = 50;
        let mut state = GameState::from_session(3, 100, session);
        state.end_run(GameOverCause::FakePad);
        assert_eq!(state.high_score, 100);
        assert!(!state.drain_events().contains(&GameEvent::NewHighScore(50)));

        let mut session = Session::with_layout(Player::new(Vec2::ZERO), Vec::new());
        session.score = 150;
        let mut state = GameState::from_session(3, 100, session);
        state.end_run(GameOverCause::FakePad);
        assert_eq!(state.high_score, 150);
        assert!(state.drain_events().contains(&GameEvent::NewHighScore(150)));
    }
}
