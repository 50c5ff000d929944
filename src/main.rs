//! Lane Runner entry point
//!
//! Web: runs the lane game in the page, handing each frame to the external
//! renderer. Native: headless simulation with scripted input.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use lane_runner::consts::*;
    use lane_runner::platform::web::DomScoreDisplay;
    use lane_runner::platform::{ScoreDisplay, log_events, refresh_score};
    use lane_runner::sim::{
        FieldInput, FieldState, GameState, RapierWorld, TickInput, build_field_snapshot,
        build_snapshot, tick, tick_field,
    };
    use lane_runner::{GameMode, Settings, Typeface, pointer_to_lane_x};

    // The renderer listens for this event and reconciles its scene graph
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            window.dispatchEvent(new CustomEvent('lane-runner:frame', { detail: JSON.parse(json) }));
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// The running game, one of the two modes
    enum Session {
        Lane {
            state: GameState,
            input: TickInput,
        },
        Field {
            state: Box<FieldState<RapierWorld>>,
            /// Key presses collected since the last frame
            pending: FieldInput,
        },
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        last_time: f64,
        display: DomScoreDisplay,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let session = match settings.mode {
                GameMode::Lane => Session::Lane {
                    state: GameState::new(settings.params()),
                    input: TickInput::default(),
                },
                GameMode::Field => Session::Field {
                    state: Box::new(FieldState::new(
                        RapierWorld::new(),
                        js_sys::Date::now() as u64,
                    )),
                    pending: FieldInput::default(),
                },
            };
            Self {
                session,
                settings,
                last_time: 0.0,
                display: DomScoreDisplay::new("scoreValue"),
            }
        }

        fn update(&mut self, dt: f32) {
            let dt = dt.clamp(0.0, MAX_FRAME_DT);
            match &mut self.session {
                Session::Lane { state, input } => {
                    tick(state, input, dt);
                    let events = state.drain_events();
                    refresh_score(&mut self.display, &events);
                    log_events(&events, self.settings.verbose_collisions);
                }
                Session::Field { state, pending } => {
                    let input = std::mem::take(pending);
                    let before = state.score;
                    tick_field(state.as_mut(), &input, dt);
                    for event in state.drain_events() {
                        log::debug!("{:?}", event);
                    }
                    if state.score != before {
                        self.display.show_score(state.score);
                    }
                }
            }
        }

        fn present(&self) {
            let json = match &self.session {
                Session::Lane { state, .. } => serde_json::to_string(&build_snapshot(state)),
                Session::Field { state, .. } => {
                    serde_json::to_string(&build_field_snapshot(state.as_ref()))
                }
            };
            match json {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot encode failed: {}", e),
            }
        }

        fn steer(&mut self, x: f32) {
            if let Session::Lane { input, .. } = &mut self.session {
                input.target_x = Some(x);
            }
        }
    }

    fn viewport_width() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Lane Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window, nothing to run");
            return;
        };

        let settings = Settings::load();
        // Write back so the stored document lists every field
        settings.save();
        log::info!(
            "Mode: {}, ruleset: {}",
            settings.mode.as_str(),
            settings.ruleset.as_str()
        );
        let mode = settings.mode;
        let font_url = settings.font_url.clone();
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Obstacles wait for the typeface; the loop runs meanwhile
        if mode == GameMode::Lane {
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = Typeface::fetch(&font_url).await;
                let mut g = game.borrow_mut();
                let verbose = g.settings.verbose_collisions;
                if let Session::Lane { state, .. } = &mut g.session {
                    state.on_font_loaded(result);
                    log_events(&state.drain_events(), verbose);
                }
            });
        }

        setup_input_handlers(&window, game.clone());

        game.borrow_mut().display.show_score(0);
        request_animation_frame(game);

        log::info!("Lane Runner running!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = pointer_to_lane_x(event.client_x() as f32, viewport_width());
                game.borrow_mut().steer(x);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (phones)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let x = pointer_to_lane_x(touch.client_x() as f32, viewport_width());
                    game.borrow_mut().steer(x);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key down (field nudges and reset)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(input) = FieldInput::from_key(&event.key()) else {
                    return;
                };
                if let Session::Field { pending, .. } = &mut game.borrow_mut().session {
                    pending.merge(input);
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.present();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use clap::Parser;
    use log::LevelFilter;

    use lane_runner::consts::*;
    use lane_runner::platform::{LogScoreDisplay, ScoreDisplay, log_events, refresh_score};
    use lane_runner::sim::{
        FieldInput, FieldState, GameState, Nudge, RapierWorld, TickInput, build_field_snapshot,
        build_snapshot, tick, tick_field,
    };
    use lane_runner::{AssetError, GameMode, Ruleset, Settings, Typeface};

    /// Headless Lane Runner simulation
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Game mode to simulate (lane, field)
        #[arg(long, default_value = "lane", value_parser = parse_mode)]
        mode: GameMode,

        /// Ruleset (classic, colored, bounding-box)
        #[arg(long, default_value = "bounding-box", value_parser = parse_ruleset)]
        ruleset: Ruleset,

        /// Simulated seconds
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,

        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// RNG seed (field mode)
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Typeface JSON for obstacle labels
        #[arg(long)]
        font: Option<std::path::PathBuf>,

        /// Print the final frame snapshot as JSON
        #[arg(long)]
        dump: bool,

        /// Log level (off, error, warn, info, debug, trace)
        #[arg(long, default_value = "info")]
        log_level: LevelFilter,
    }

    fn parse_mode(s: &str) -> Result<GameMode, String> {
        GameMode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (expected lane or field)"))
    }

    fn parse_ruleset(s: &str) -> Result<Ruleset, String> {
        Ruleset::from_str(s).ok_or_else(|| {
            format!("unknown ruleset '{s}' (expected classic, colored or bounding-box)")
        })
    }

    /// Scripted pointer: sweeps across the lane and a bit beyond
    fn sweep_x(t: f32) -> f32 {
        (t * 0.7).sin() * 5.5
    }

    pub fn run(args: Args) {
        env_logger::Builder::new()
            .filter_level(args.log_level)
            .init();

        let fps = args.fps.max(1);
        let dt = 1.0 / fps as f32;
        let frames = (args.seconds.max(0.0) * fps as f32) as u64;

        match args.mode {
            GameMode::Lane => run_lane(&args, dt, frames),
            GameMode::Field => run_field(&args, dt, frames),
        }
    }

    fn run_lane(args: &Args, dt: f32, frames: u64) {
        let ruleset = args.ruleset;
        let settings = Settings::from_ruleset(ruleset);
        let mut state = GameState::new(settings.params());
        let mut display = LogScoreDisplay::default();

        log::info!("Lane Runner (headless) - ruleset {}", ruleset.as_str());

        let font = match &args.font {
            Some(path) => Typeface::from_path(path),
            None => Err(AssetError::Fetch("no --font given".into())),
        };
        state.on_font_loaded(font);

        display.show_score(0);
        for frame in 0..frames {
            let t = frame as f32 * dt;
            let input = TickInput {
                target_x: Some(sweep_x(t)),
            };
            tick(&mut state, &input, dt.min(MAX_FRAME_DT));
            let events = state.drain_events();
            refresh_score(&mut display, &events);
            log_events(&events, settings.verbose_collisions);
        }

        log::info!(
            "Finished {} frames: score {}, player scale {:.3}, {} projectiles in flight",
            frames,
            state.score,
            state.player.scale,
            state.projectiles.len()
        );

        if args.dump {
            match serde_json::to_string_pretty(&build_snapshot(&state)) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Snapshot encode failed: {}", e),
            }
        }
    }

    fn run_field(args: &Args, dt: f32, frames: u64) {
        let mut state = FieldState::new(RapierWorld::new(), args.seed);
        log::info!("Lane Runner field (headless) - seed {}", args.seed);

        for frame in 0..frames {
            let t = frame as f32 * dt;
            // Tap toward the sweep target twice a second, reset every 20 s
            let mut input = FieldInput::default();
            if frame % (fps_of(dt) / 2).max(1) == 0 {
                input.nudge = Some(if sweep_x(t) > state.player_position.x {
                    Nudge::Right
                } else {
                    Nudge::Left
                });
            }
            if frame > 0 && frame % (fps_of(dt) * 20) == 0 {
                input.reset = true;
            }
            tick_field(&mut state, &input, dt.min(MAX_FRAME_DT));
            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        log::info!("Finished {} frames: collected {}", frames, state.score);

        if args.dump {
            match serde_json::to_string_pretty(&build_field_snapshot(&state)) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Snapshot encode failed: {}", e),
            }
        }
    }

    fn fps_of(dt: f32) -> u64 {
        (1.0 / dt).round() as u64
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let args = Args::try_parse_from(["lane-runner"]).unwrap();
            assert_eq!(args.mode, GameMode::Lane);
            assert_eq!(args.ruleset, Ruleset::BoundingBox);
            assert_eq!(args.log_level, LevelFilter::Info);
        }

        #[test]
        fn test_parses_names() {
            let args = Args::try_parse_from([
                "lane-runner",
                "--mode",
                "field",
                "--ruleset",
                "classic",
                "--log-level",
                "debug",
            ])
            .unwrap();
            assert_eq!(args.mode, GameMode::Field);
            assert_eq!(args.ruleset, Ruleset::Classic);
            assert_eq!(args.log_level, LevelFilter::Debug);
        }

        #[test]
        fn test_rejects_typos() {
            assert!(Args::try_parse_from(["lane-runner", "--mode", "feild"]).is_err());
            assert!(Args::try_parse_from(["lane-runner", "--ruleset", "clasic"]).is_err());
            assert!(Args::try_parse_from(["lane-runner", "--log-level", "loud"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    headless::run(headless::Args::parse());
}
