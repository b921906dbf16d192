//! Pad Hopper entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use pad_hopper::Game;
    use pad_hopper::audio::AudioManager;
    use pad_hopper::consts::SIM_DT;
    use pad_hopper::persistence::LocalStore;
    use pad_hopper::platform::KeyState;
    use pad_hopper::renderer::{CanvasSurface, draw_frame};
    use pad_hopper::sim::{GamePhase, InputEvent};

    /// Browser-side game wrapper
    struct App {
        game: Game<LocalStore, AudioManager>,
        surface: CanvasSurface,
        keys: KeyState,
        last_time: f64,
        // Track phase to toggle DOM buttons
        last_phase: Option<GamePhase>,
    }

    impl App {
        fn push(&mut self, event: Option<InputEvent>) {
            if let Some(event) = event {
                // Browsers only allow audio after a user gesture
                self.game.audio().resume();
                self.game.push_input(event);
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.game.update(dt);
            draw_frame(&self.game.state, &mut self.surface);
            self.update_buttons();
        }

        /// Show the button that fits the current phase
        fn update_buttons(&mut self) {
            let phase = self.game.state.phase;
            if self.last_phase == Some(phase) {
                return;
            }
            self.last_phase = Some(phase);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            set_hidden(&document, "play-btn", phase != GamePhase::NotStarted);
            set_hidden(&document, "restart-btn", phase != GamePhase::GameOver);
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Pad Hopper starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let surface = CanvasSurface::new(&canvas, window.device_pixel_ratio())
            .ok_or("2d context unavailable")?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, LocalStore::new(), AudioManager::default());
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            surface,
            keys: KeyState::new(),
            last_time: 0.0,
            last_phase: None,
        }));

        setup_input_handlers(&window, app.clone());
        setup_buttons(&document, app.clone());
        setup_focus_handlers(&window, &document, app.clone());

        request_animation_frame(app);

        log::info!("Pad Hopper running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let input = a.keys.press(&event.key(), event.repeat());
                if input.is_some() {
                    event.prevent_default();
                }
                a.push(input);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let input = a.keys.release(&event.key());
                a.push(input);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for (id, event) in [("play-btn", InputEvent::Play), ("restart-btn", InputEvent::Restart)] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{} button", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().push(Some(event));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(window: &web_sys::Window, document: &Document, app: Rc<RefCell<App>>) {
        // Window blur (click outside): drop held keys, mute
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                for release in a.keys.release_all() {
                    a.game.push_input(release);
                }
                a.game.set_focused(false);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.set_focused(true);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                let mut a = app.borrow_mut();
                a.game.set_focused(visible);
                // Don't replay the hidden time as a burst of ticks
                a.last_time = 0.0;
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Ticks before the headless demo gives up on a run
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICK_LIMIT: u32 = 60 * 60 * 5;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_RUNS: u32 = 3;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pad_hopper::Game;
    use pad_hopper::audio::NullAudio;
    use pad_hopper::persistence::MemoryStore;
    use pad_hopper::sim::{GamePhase, InputEvent};

    env_logger::init();
    log::info!("Pad Hopper (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let mut game = Game::new(seed, MemoryStore::new(), NullAudio);
    game.push_input(InputEvent::ToggleAutopilot);
    game.push_input(InputEvent::Play);

    for run in 1..=DEMO_RUNS {
        let mut ticks = 0;
        while game.state.phase == GamePhase::Playing || ticks == 0 {
            game.step();
            ticks += 1;
            if ticks >= DEMO_TICK_LIMIT {
                println!("Run {}: still alive after {} ticks, stopping", run, ticks);
                return;
            }
        }
        println!(
            "Run {}: score {} after {} ticks (high score {})",
            run,
            game.state.score(),
            ticks,
            game.high_score()
        );
        game.push_input(InputEvent::Restart);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
