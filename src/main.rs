//! Brick Bounce entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use brick_bounce::audio::AudioManager;
    use brick_bounce::consts::*;
    use brick_bounce::hud::{HudCache, SCORE_ANCHOR};
    use brick_bounce::renderer::{RenderState, screen_to_world};
    use brick_bounce::sim::{GameEvent, GameState, TickInput, tick};
    use brick_bounce::{PolicyTuning, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        tuning: PolicyTuning,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        hud: HudCache,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::default();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            let mut state = GameState::new(seed);
            state.particles_enabled = settings.particles;
            Self {
                state,
                tuning: PolicyTuning::default(),
                settings,
                audio,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                hud: HudCache::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Convert a client position to a world-space pointer x
        fn set_pointer(&mut self, canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) {
            let rect = canvas.get_bounding_client_rect();
            let (w, h) = (rect.width() as f32, rect.height() as f32);
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            // Canvas may be CSS-scaled; map back onto the fixed layout size
            let px = (client_x - rect.left() as f32) * CANVAS_SIZE.0 as f32 / w;
            let py = (client_y - rect.top() as f32) * CANVAS_SIZE.1 as f32 / h;
            self.input.pointer_x = Some(screen_to_world(px, py).x);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, &self.tuning, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pressed = false;
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play(&cue),
                    GameEvent::BallSpawned { pos } => log::debug!("ball spawned at {:?}", pos),
                    GameEvent::BallLost { pos } => log::debug!("ball lost at {:?}", pos),
                    GameEvent::BrickBroken { id, .. } => log::debug!("brick {} broken", id),
                    GameEvent::ParticleBurst { .. } => {}
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(text) = self.hud.score_changed(self.state.score) {
                if let Some(el) = document.get_element_by_id("hud-score") {
                    el.set_text_content(Some(&text));
                }
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Brick Bounce starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Fixed layout resolution; CSS handles scaling
        let (width, height) = CANVAS_SIZE;
        canvas.set_width(width);
        canvas.set_height(height);

        if let Some(el) = document.get_element_by_id("hud-score") {
            let style = format!(
                "position:absolute;left:{}px;top:{}px;font-size:{}px;transform:translate(-50%,-50%)",
                SCORE_ANCHOR.x, SCORE_ANCHOR.y, SCORE_ANCHOR.size
            );
            let _ = el.set_attribute("style", &style);
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Brick Bounce running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().set_pointer(
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - serve
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pressed = true;
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().set_pointer(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - serve
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.pressed = true;
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    g.set_pointer(&canvas_clone, touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => g.input.pressed = true,
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
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
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

/// Ticks simulated by the headless build (one minute of play)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_TICKS: u64 = 60 * 60;

/// Read and parse an optional JSON config file, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_json_or_default<T: Default>(
    path: Option<String>,
    what: &str,
    parse: impl FnOnce(&str) -> Result<T, serde_json::Error>,
) -> T {
    let Some(path) = path else {
        return T::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => parse(&json).unwrap_or_else(|e| {
            log::error!("Invalid {} file {}: {}", what, path, e);
            T::default()
        }),
        Err(e) => {
            log::error!("Cannot read {} file {}: {}", what, path, e);
            T::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_bounce::audio::AudioManager;
    use brick_bounce::consts::SIM_DT;
    use brick_bounce::hud::score_text;
    use brick_bounce::sim::{GameEvent, GameState, TickInput, tick};
    use brick_bounce::{PolicyTuning, Settings};

    env_logger::init();
    log::info!("Brick Bounce (native) starting...");
    log::info!("Rendering requires the web build; running a headless idle-mode session");

    // Usage: brick-bounce [tuning.json] [settings.json]
    let mut args = std::env::args().skip(1);
    let tuning = load_json_or_default(args.next(), "tuning", PolicyTuning::from_json);
    let settings = load_json_or_default(args.next(), "settings", Settings::from_json);
    match tuning.to_json() {
        Ok(json) => log::info!("Tuning: {}", json),
        Err(e) => log::warn!("Cannot print tuning: {}", e),
    }

    let mut audio = AudioManager::new();
    audio.apply_settings(&settings);

    let mut state = GameState::new(0xB41C);
    state.particles_enabled = settings.particles;
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    for _ in 0..HEADLESS_TICKS {
        tick(&mut state, &input, &tuning, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::BallSpawned { pos } => log::info!("Ball served at {:?}", pos),
                GameEvent::BallLost { pos } => log::info!("Ball lost at {:?}", pos),
                GameEvent::BrickBroken { id, pos } => {
                    log::debug!("Brick {} broken at {:?}", id, pos)
                }
                GameEvent::Sound(cue) => audio.play(&cue),
                GameEvent::ParticleBurst { .. } => {}
            }
        }
    }

    log::info!(
        "{} after {} ticks ({} bricks left)",
        score_text(state.score),
        state.time_ticks,
        state.bricks.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
