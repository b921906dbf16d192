//! 2D rendering
//!
//! `draw_frame` turns a `GameState` into a handful of primitive calls on a
//! `Surface`. The browser backend draws them on a canvas; tests record them.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{GamePhase, GameState, Pad, PadVariant, Session};

/// RGBA colour, components in 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// Colour palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(30, 30, 50);
    pub const PAD_NORMAL: Color = Color::rgb(0, 200, 255);
    pub const PAD_FAKE: Color = Color::rgb(255, 70, 70);
    pub const PAD_MOVING: Color = Color::rgb(120, 255, 140);
    pub const PAD_SPIKE: Color = Color::rgb(200, 200, 210);
    pub const SPIKE_TEETH: Color = Color::rgb(255, 220, 80);
    pub const PLAYER: Color = Color::rgb(255, 255, 255);
    pub const TEXT: Color = Color::rgb(255, 255, 255);
    pub const OVERLAY: Color = Color::rgb(0, 0, 0).with_alpha(0.6);
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Drawing primitives the game needs, in canvas units
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color);
    /// `pos` is the top-left corner
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, radius: f32, color: Color);
    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);
    /// `pos` is the baseline anchor
    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: Align, color: Color);
}

/// Teeth drawn under a spike pad
const SPIKE_TEETH: usize = 5;
/// Tooth height below the pad
const SPIKE_DEPTH: f32 = 8.0;
const PAD_RADIUS: f32 = 4.0;

fn pad_color(variant: PadVariant) -> Color {
    match variant {
        PadVariant::Normal => palette::PAD_NORMAL,
        PadVariant::Fake => palette::PAD_FAKE,
        PadVariant::Spike => palette::PAD_SPIKE,
        PadVariant::Moving => palette::PAD_MOVING,
    }
}

/// Draw one pad, with teeth for spikes
pub fn draw_pad<S: Surface + ?Sized>(surface: &mut S, pad: &Pad) {
    let variant = pad.kind.variant();
    surface.fill_rect(
        pad.pos,
        Vec2::new(pad.width, pad.height),
        PAD_RADIUS,
        pad_color(variant),
    );

    if variant == PadVariant::Spike {
        let tooth = pad.width / SPIKE_TEETH as f32;
        let base = pad.bottom();
        for i in 0..SPIKE_TEETH {
            let left = pad.left() + i as f32 * tooth;
            surface.fill_triangle(
                Vec2::new(left, base),
                Vec2::new(left + tooth, base),
                Vec2::new(left + tooth / 2.0, base + SPIKE_DEPTH),
                palette::SPIKE_TEETH,
            );
        }
    }
}

fn draw_session<S: Surface + ?Sized>(surface: &mut S, session: &Session) {
    for pad in &session.pads {
        draw_pad(surface, pad);
    }

    let player = &session.player;
    let r = player.size / 2.0;
    surface.fill_ellipse(player.pos, Vec2::splat(r), palette::PLAYER);

    surface.text(
        &format!("Score: {}", session.score),
        Vec2::new(10.0, 30.0),
        20.0,
        Align::Left,
        palette::TEXT,
    );
}

/// Render a full frame
pub fn draw_frame<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.clear(palette::BACKGROUND);

    if let Some(session) = &state.session {
        draw_session(surface, session);
    }

    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;
    match state.phase {
        GamePhase::NotStarted => {
            surface.text("Pad Hopper", Vec2::new(cx, cy - 40.0), 40.0, Align::Center, palette::TEXT);
            surface.text(
                "Press Play to start",
                Vec2::new(cx, cy + 10.0),
                20.0,
                Align::Center,
                palette::TEXT,
            );
            surface.text(
                &format!("High Score: {}", state.high_score),
                Vec2::new(cx, cy + 45.0),
                18.0,
                Align::Center,
                palette::TEXT,
            );
        }
        GamePhase::Playing => {
            if state.autopilot {
                surface.text(
                    "AUTO",
                    Vec2::new(CANVAS_WIDTH - 10.0, 30.0),
                    16.0,
                    Align::Right,
                    palette::TEXT,
                );
            }
        }
        GamePhase::GameOver => {
            surface.fill_rect(
                Vec2::new(40.0, cy - 110.0),
                Vec2::new(CANVAS_WIDTH - 80.0, 200.0),
                12.0,
                palette::OVERLAY,
            );
            surface.text("Game Over", Vec2::new(cx, cy - 55.0), 36.0, Align::Center, palette::TEXT);
            surface.text(
                &format!("Score: {}", state.score()),
                Vec2::new(cx, cy - 10.0),
                22.0,
                Align::Center,
                palette::TEXT,
            );
            surface.text(
                &format!("High Score: {}", state.high_score),
                Vec2::new(cx, cy + 22.0),
                18.0,
                Align::Center,
                palette::TEXT,
            );
            surface.text(
                "Press R to restart",
                Vec2::new(cx, cy + 60.0),
                18.0,
                Align::Center,
                palette::TEXT,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PadKind, Player};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Ellipse(Vec2),
        Rect(Vec2, Color),
        Triangle(Vec2, Vec2, Vec2),
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for Recorder {
        fn clear(&mut self, _color: Color) {
            self.calls.push(Call::Clear);
        }
        fn fill_ellipse(&mut self, center: Vec2, _radii: Vec2, _color: Color) {
            self.calls.push(Call::Ellipse(center));
        }
        fn fill_rect(&mut self, pos: Vec2, _size: Vec2, _radius: f32, color: Color) {
            self.calls.push(Call::Rect(pos, color));
        }
        fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, _color: Color) {
            self.calls.push(Call::Triangle(a, b, c));
        }
        fn text(&mut self, text: &str, _pos: Vec2, _size: f32, _align: Align, _color: Color) {
            self.calls.push(Call::Text(text.to_string()));
        }
    }

    fn playing_state(pads: Vec<Pad>, score: u64) -> GameState {
        let mut session = Session::with_layout(Player::new(Vec2::new(200.0, 300.0)), pads);
        session.score = score;
        GameState::from_session(1, 90, session)
    }

    #[test]
    fn test_title_screen_shows_high_score() {
        let state = GameState::new(1, 1234);
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        assert_eq!(rec.calls[0], Call::Clear);
        assert!(rec.texts().contains(&"High Score: 1234"));
        assert!(!rec.calls.iter().any(|c| matches!(c, Call::Ellipse(_))));
    }

    #[test]
    fn test_pads_coloured_by_variant() {
        let pads = vec![
            Pad::new(10.0, 100.0, PadKind::Normal),
            Pad::new(110.0, 200.0, PadKind::Fake),
        ];
        let state = playing_state(pads, 42);
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);

        assert!(rec.calls.contains(&Call::Rect(Vec2::new(10.0, 100.0), palette::PAD_NORMAL)));
        assert!(rec.calls.contains(&Call::Rect(Vec2::new(110.0, 200.0), palette::PAD_FAKE)));
        assert!(rec.calls.contains(&Call::Ellipse(Vec2::new(200.0, 300.0))));
        assert!(rec.texts().contains(&"Score: 42"));
    }

    #[test]
    fn test_spike_teeth_point_down() {
        let pad = Pad::new(40.0, 100.0, PadKind::Spike);
        let mut rec = Recorder::default();
        draw_pad(&mut rec, &pad);

        let teeth: Vec<_> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Triangle(a, b, tip) => Some((*a, *b, *tip)),
                _ => None,
            })
            .collect();
        assert_eq!(teeth.len(), SPIKE_TEETH);
        for (a, b, tip) in teeth {
            assert_eq!(a.y, pad.bottom());
            assert_eq!(b.y, pad.bottom());
            assert!(tip.y > pad.bottom());
            assert!(a.x >= pad.left() && b.x <= pad.right() + 1e-3);
        }
    }

    #[test]
    fn test_game_over_panel() {
        let mut state = playing_state(Vec::new(), 77);
        state.phase = GamePhase::GameOver;
        let mut rec = Recorder::default();
        draw_frame(&state, &mut rec);
        let texts = rec.texts();
        assert!(texts.contains(&"Game Over"));
        assert!(texts.contains(&"Score: 77"));
        assert!(texts.contains(&"High Score: 90"));
        assert!(texts.contains(&"Press R to restart"));
    }

    #[test]
    fn test_css_colour() {
        assert_eq!(Color::rgb(30, 30, 50).to_css(), "rgba(30, 30, 50, 1)");
        assert_eq!(palette::OVERLAY.to_css(), "rgba(0, 0, 0, 0.6)");
    }
}
