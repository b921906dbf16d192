//! Frame driver
//!
//! Owns the simulation state together with its collaborators (storage and
//! audio). The host feeds it input events and frame deltas; it runs fixed
//! ticks from an accumulator and turns simulation events into sounds and
//! saved high scores.

use crate::audio::{AudioBackend, SoundEffect};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, InputEvent, tick};

/// Longest frame delta accepted, in seconds
const MAX_FRAME_DT: f32 = 0.1;

pub struct Game<S: KeyValueStore, A: AudioBackend> {
    pub state: GameState,
    high_score: HighScore,
    settings: Settings,
    store: S,
    audio: A,
    accumulator: f32,
    pending: Vec<InputEvent>,
}

impl<S: KeyValueStore, A: AudioBackend> Game<S, A> {
    /// Load persisted data and sit on the title screen
    pub fn new(seed: u64, store: S, mut audio: A) -> Self {
        let high_score = HighScore::load(&store);
        let settings = Settings::load(&store);
        audio.set_volume(settings.sfx_level(), settings.music_level());
        Self {
            state: GameState::new(seed, high_score.best),
            high_score,
            settings,
            store,
            audio,
            accumulator: 0.0,
            pending: Vec::new(),
        }
    }

    /// Queue an input edge for the next tick
    pub fn push_input(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Run as many fixed ticks as `dt` seconds cover. Returns ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() {
            log::warn!("Ignoring frame delta {}", dt);
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop whatever the substep cap couldn't absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick with everything queued so far
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.state, &input);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::RunStarted => {
                    if self.settings.music_enabled && !self.audio.is_music_playing() {
                        self.audio.start_music();
                    }
                }
                GameEvent::Bounce => self.audio.play(SoundEffect::Bounce),
                GameEvent::PadSpawned => {}
                GameEvent::GameOver { .. } => {
                    self.audio.stop_music();
                    self.audio.play(SoundEffect::GameOver);
                }
                GameEvent::NewHighScore(score) => {
                    if self.high_score.submit(score) {
                        if let Err(err) = self.high_score.save(&mut self.store) {
                            log::warn!("Failed to save high score: {}", err);
                        }
                        self.audio.play(SoundEffect::HighScore);
                    }
                }
            }
        }
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace and persist the settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.audio
            .set_volume(self.settings.sfx_level(), self.settings.music_level());
        if !self.settings.music_enabled {
            self.audio.stop_music();
        }
        if let Err(err) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", err);
        }
    }

    /// Window focus changed
    pub fn set_focused(&mut self, focused: bool) {
        if self.settings.mute_on_blur {
            self.audio.set_muted(!focused);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
