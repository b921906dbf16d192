//! Audio cues and background music
//!
//! The game talks to an `AudioBackend`. On the web, `AudioManager` builds
//! short cues from Web Audio oscillators and loops a music file through an
//! `<audio>` element. Without a working context every call is a no-op.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player bounced off a pad
    Bounce,
    /// Run ended
    GameOver,
    /// New high score
    HighScore,
}

/// Playback seam between the game and the platform
pub trait AudioBackend {
    /// Fire-and-forget cue
    fn play(&mut self, effect: SoundEffect);
    /// Effective levels (0.0 - 1.0) for cues and music
    fn set_volume(&mut self, sfx: f32, music: f32);
    fn set_muted(&mut self, muted: bool);
    /// Start the music loop from wherever it is
    fn start_music(&mut self);
    /// Stop and rewind the music loop
    fn stop_music(&mut self);
    fn is_music_playing(&self) -> bool;
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator note: pitch glides from `from_hz` to `to_hz` while the
/// gain decays from `level` over `length` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub from_hz: f32,
    pub to_hz: f32,
    /// Start offset from the trigger, seconds
    pub at: f64,
    pub length: f64,
    /// Peak gain before the effect volume is applied
    pub level: f32,
}

impl Tone {
    const fn note(wave: Wave, hz: f32, at: f64, length: f64, level: f32) -> Self {
        Self {
            wave,
            from_hz: hz,
            to_hz: hz,
            at,
            length,
            level,
        }
    }

    pub fn end(&self) -> f64 {
        self.at + self.length
    }
}

/// Springy chirp up
const BOUNCE: &[Tone] = &[Tone {
    wave: Wave::Square,
    from_hz: 220.0,
    to_hz: 660.0,
    at: 0.0,
    length: 0.12,
    level: 0.2,
}];

/// Long whistling drop, then a thud at the bottom
const GAME_OVER: &[Tone] = &[
    Tone {
        wave: Wave::Sawtooth,
        from_hz: 880.0,
        to_hz: 110.0,
        at: 0.0,
        length: 0.7,
        level: 0.18,
    },
    Tone {
        wave: Wave::Sine,
        from_hz: 90.0,
        to_hz: 45.0,
        at: 0.7,
        length: 0.25,
        level: 0.4,
    },
];

/// Major arpeggio after the drop has landed, top note held
const HIGH_SCORE: &[Tone] = &[
    Tone::note(Wave::Triangle, 523.25, 1.05, 0.12, 0.25),
    Tone::note(Wave::Triangle, 659.25, 1.15, 0.12, 0.25),
    Tone::note(Wave::Triangle, 783.99, 1.25, 0.12, 0.25),
    Tone::note(Wave::Triangle, 1046.5, 1.35, 0.45, 0.3),
];

/// Tones making up a cue
pub fn cue(effect: SoundEffect) -> &'static [Tone] {
    match effect {
        SoundEffect::Bounce => BOUNCE,
        SoundEffect::GameOver => GAME_OVER,
        SoundEffect::HighScore => HIGH_SCORE,
    }
}

/// Silent backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn set_volume(&mut self, _sfx: f32, _music: f32) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn is_music_playing(&self) -> bool {
        false
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioBackend, SoundEffect, Tone, Wave, cue};

    /// Music track, relative to the page
    pub const MUSIC_PATH: &str = "assets/music.mp3";

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(MUSIC_PATH)
        }
    }

    impl AudioManager {
        pub fn new(music_path: &str) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }
            let music = HtmlAudioElement::new_with_src(music_path).ok();
            match &music {
                Some(el) => el.set_loop(true),
                None => log::warn!("Failed to load {} - music disabled", music_path),
            }
            Self {
                ctx,
                music,
                sfx_volume: 0.8,
                music_volume: 0.4,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_sfx(&self) -> f32 {
            if self.muted { 0.0 } else { self.sfx_volume }
        }

        fn apply_music_volume(&self) {
            if let Some(music) = &self.music {
                let vol = if self.muted { 0.0 } else { self.music_volume };
                music.set_volume(vol as f64);
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Schedule one tone of a cue
        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let osc_type = match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.from_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.at;
            let end = t + tone.length;

            gain.gain().set_value_at_time(vol * tone.level, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if tone.to_hz != tone.from_hz {
                osc.frequency().set_value_at_time(tone.from_hz, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.to_hz, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }

    impl AudioBackend for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_sfx();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in cue(effect) {
                self.play_tone(ctx, tone, vol);
            }
        }

        fn set_volume(&mut self, sfx: f32, music: f32) {
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            self.music_volume = music.clamp(0.0, 1.0);
            self.apply_music_volume();
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.apply_music_volume();
        }

        fn start_music(&mut self) {
            if let Some(music) = &self.music {
                // Rejected until the page has seen a user gesture
                if music.play().is_err() {
                    log::warn!("Music playback refused");
                }
            }
        }

        fn stop_music(&mut self) {
            if let Some(music) = &self.music {
                let _ = music.pause();
                music.set_current_time(0.0);
            }
        }

        fn is_music_playing(&self) -> bool {
            self.music.as_ref().is_some_and(|m| !m.paused())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue_end(effect: SoundEffect) -> f64 {
        cue(effect).iter().map(Tone::end).fold(0.0, f64::max)
    }

    #[test]
    fn test_bounce_chirps_up() {
        let tones = cue(SoundEffect::Bounce);
        assert_eq!(tones.len(), 1);
        assert!(tones[0].to_hz > tones[0].from_hz);
        assert!(cue_end(SoundEffect::Bounce) < 0.2);
    }

    #[test]
    fn test_game_over_drops() {
        let tones = cue(SoundEffect::GameOver);
        assert!(tones.iter().all(|t| t.to_hz <= t.from_hz));
        assert!(tones[0].from_hz > tones[tones.len() - 1].to_hz);
    }

    #[test]
    fn test_high_score_follows_game_over() {
        let tones = cue(SoundEffect::HighScore);
        let first = tones.iter().map(|t| t.at).fold(f64::INFINITY, f64::min);
        assert!(first >= cue_end(SoundEffect::GameOver));
        // Rising arpeggio
        assert!(tones.windows(2).all(|w| w[1].from_hz > w[0].from_hz));
    }

    #[test]
    fn test_tones_are_playable() {
        for effect in [SoundEffect::Bounce, SoundEffect::GameOver, SoundEffect::HighScore] {
            for tone in cue(effect) {
                // Exponential ramps need positive targets
                assert!(tone.from_hz > 0.0 && tone.to_hz > 0.0);
                assert!(tone.length > 0.0 && tone.at >= 0.0);
                assert!(tone.level > 0.01 && tone.level <= 1.0);
            }
        }
    }
}
