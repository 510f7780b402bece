//! Nebula Arcade entry point
//!
//! Browser: wires DOM input to the game manager and drives it with
//! requestAnimationFrame. Native: runs a short headless session and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use nebula_arcade::platform::FrameToken;
    use nebula_arcade::renderer::CanvasPainter;
    use nebula_arcade::sim::GameConfig;
    use nebula_arcade::{GameCallbacks, GameManager, QualityPreset, Tuning};

    /// Mirrors score and mode into the page HUD
    struct HudCallbacks {
        document: Document,
    }

    impl HudCallbacks {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn show_fps(&self, fps: u32) {
            self.set_text("hud-fps", &fps.to_string());
        }
    }

    impl GameCallbacks for HudCallbacks {
        fn on_score_update(&mut self, _points: u32, total: u64) {
            self.set_text("hud-score", &total.to_string());
        }

        fn on_play_mode_toggle(&mut self, play_mode: bool) {
            if play_mode {
                self.set_text("hud-score", "0");
            }
            self.set_text("play-toggle", if play_mode { "Exit game" } else { "Play" });
            if let Some(hud) = self.document.get_element_by_id("hud") {
                let _ = hud.set_attribute("class", if play_mode { "" } else { "hidden" });
            }
        }
    }

    /// Everything the browser callbacks share
    struct Host {
        manager: GameManager<HudCallbacks>,
        painter: CanvasPainter,
        canvas: HtmlCanvasElement,
    }

    type SharedHost = Rc<RefCell<Host>>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Nebula Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        let (width, height) = fit_canvas(&window, &canvas);
        let tuning = tuning_from_page(&canvas);
        let config = GameConfig::with_size(width, height);

        let manager = GameManager::new(
            config,
            tuning,
            HudCallbacks {
                document: document.clone(),
            },
        );
        let painter = CanvasPainter::new(&canvas)?;
        let host = Rc::new(RefCell::new(Host {
            manager,
            painter,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&window, &document, &canvas, host.clone())?;

        let first = host.borrow_mut().manager.start();
        if let Some(token) = first {
            request_animation_frame(host, token);
        }

        log::info!("Nebula Arcade running ({}x{})", width, height);
        Ok(())
    }

    /// Size the canvas backing store to the window and return that size
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
        let dimension = |v: Result<JsValue, JsValue>, fallback: f64| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
        };
        let width = dimension(window.inner_width(), 800.0).max(1.0);
        let height = dimension(window.inner_height(), 600.0).max(1.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        (width.floor(), height.floor())
    }

    /// Optional balance overrides from `<canvas data-tuning='{...}'>`, then an
    /// optional `data-quality="low|medium|high"` particle preset
    fn tuning_from_page(canvas: &HtmlCanvasElement) -> Tuning {
        let tuning = match canvas.get_attribute("data-tuning") {
            None => Tuning::default(),
            Some(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from data-tuning");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring data-tuning: {}", e);
                    Tuning::default()
                }
            },
        };

        let Some(name) = canvas.get_attribute("data-quality") else {
            return tuning;
        };
        match QualityPreset::from_str(&name) {
            Some(preset) => {
                log::info!("Quality preset: {}", preset.as_str());
                tuning.with_quality(preset)
            }
            None => {
                log::warn!("Unknown data-quality {:?}, keeping {} particles", name, tuning.max_particles);
                tuning
            }
        }
    }

    fn setup_input_handlers(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
        host: SharedHost,
    ) -> Result<(), JsValue> {
        // Pointer anywhere on the page steers the ship and the waves
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .manager
                    .on_pointer_move(event.client_x() as f64, event.client_y() as f64);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click on the canvas fires in play mode
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .manager
                    .on_click(event.offset_x() as f64, event.offset_y() as f64);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window resize
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let mut h = host.borrow_mut();
                let (width, height) = fit_canvas(&window, &h.canvas);
                h.manager.on_resize(width, height);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard: P toggles, Escape leaves play mode
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                match event.key().as_str() {
                    "p" | "P" => h.manager.toggle_play_mode(),
                    "Escape" => h.manager.set_play_mode(false),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Play/exit button
        if let Some(btn) = document.get_element_by_id("play-toggle") {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().manager.toggle_play_mode();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        } else {
            log::warn!("No #play-toggle button; use the P key to play");
        }

        // Pause the loop while the tab is hidden
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let token = {
                    let mut h = host.borrow_mut();
                    if hidden {
                        h.manager.stop();
                        None
                    } else {
                        h.manager.start()
                    }
                };
                if let Some(token) = token {
                    request_animation_frame(host.clone(), token);
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(host: SharedHost, token: FrameToken) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; frame loop halted");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, token, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    /// Frames between FPS readouts
    const FPS_REFRESH_FRAMES: u64 = 30;

    fn game_loop(host: SharedHost, token: FrameToken, time: f64) {
        let next = {
            let mut h = host.borrow_mut();
            let Host {
                manager, painter, ..
            } = &mut *h;
            let next = manager.frame(token, time);
            if next.is_some() {
                if let Err(e) = painter.render(&manager.scene()) {
                    log::warn!("Render error: {:?}", e);
                }
                if token.frame() % FPS_REFRESH_FRAMES == 0 {
                    let fps = manager.fps();
                    manager.callbacks_mut().show_fps(fps);
                }
            }
            next
        };

        if let Some(next) = next {
            request_animation_frame(host, next);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::DVec2;

    use nebula_arcade::sim::{Engine, GameConfig};
    use nebula_arcade::{GameCallbacks, GameManager, QualityPreset, Tuning};

    /// Session length in frames (30 s at 60 fps)
    const FRAMES: u64 = 1800;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames between auto-aimed shots
    const FIRE_EVERY: u64 = 12;

    struct ScoreLog;

    impl GameCallbacks for ScoreLog {
        fn on_score_update(&mut self, points: u32, total: u64) {
            log::info!("+{} (total {})", points, total);
        }

        fn on_play_mode_toggle(&mut self, play_mode: bool) {
            log::info!("Play mode: {}", play_mode);
        }
    }

    /// Command line: `[TUNING_JSON] [--quality low|medium|high]`
    #[derive(Debug, Default, PartialEq)]
    pub struct Options {
        pub tuning_path: Option<String>,
        pub quality: Option<QualityPreset>,
    }

    impl Options {
        pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
            let mut options = Options::default();
            let mut args = args.into_iter();
            while let Some(arg) = args.next() {
                let quality = if arg == "--quality" {
                    args.next()
                } else if let Some(value) = arg.strip_prefix("--quality=") {
                    Some(value.to_string())
                } else {
                    options.tuning_path = Some(arg);
                    continue;
                };
                match quality.as_deref().and_then(QualityPreset::from_str) {
                    Some(preset) => options.quality = Some(preset),
                    None => log::warn!("Ignoring unknown quality {:?}", quality),
                }
            }
            options
        }

        /// Tuning from the file (or defaults) with the quality preset applied
        pub fn tuning(&self) -> Tuning {
            let tuning = match &self.tuning_path {
                Some(path) => load_tuning(path),
                None => Tuning::default(),
            };
            match self.quality {
                Some(preset) => {
                    log::info!("Quality preset: {}", preset.as_str());
                    tuning.with_quality(preset)
                }
                None => tuning,
            }
        }
    }

    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load_tuning(path: &str) -> Tuning {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read {}: {}; using default tuning", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning in {}: {}; using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Closest live target to `from`, asteroids and aliens alike
    fn nearest_target(engine: &Engine, from: DVec2) -> Option<DVec2> {
        let asteroids = engine.asteroids().iter().map(|a| a.body.pos);
        let aliens = engine.aliens().iter().map(|a| a.body.pos);
        asteroids
            .chain(aliens)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    /// Play an auto-aiming session with a sweeping pointer
    pub fn run(tuning: Tuning) {
        let engine = Engine::new(GameConfig::default(), tuning);
        let mut game = GameManager::with_engine(engine, ScoreLog);

        let Some(mut token) = game.start() else {
            log::error!("Frame loop failed to start");
            return;
        };
        game.toggle_play_mode();

        for frame in 0..FRAMES {
            let t = frame as f64 / 60.0;
            let config = *game.engine().config();
            game.on_pointer_move(
                config.center_x() + t.cos() * config.canvas_width * 0.4,
                config.canvas_height / 2.0 + (t * 0.7).sin() * config.canvas_height * 0.4,
            );

            if frame % FIRE_EVERY == 0 {
                if let Some(target) = nearest_target(game.engine(), game.ship_center()) {
                    game.on_click(target.x, target.y);
                }
            }

            match game.frame(token, 1000.0 + frame as f64 * FRAME_MS) {
                Some(next) => token = next,
                None => break,
            }
        }

        let engine = game.engine();
        log::info!(
            "Session over: score {}, {} fps, {} asteroids / {} aliens / {} bullets live",
            game.score(),
            game.fps(),
            engine.asteroids().len(),
            engine.aliens().len(),
            engine.bullets().len(),
        );
        game.stop();
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Nebula Arcade (native headless) starting...");

    let options = headless::Options::parse(std::env::args().skip(1));
    headless::run(options.tuning());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
