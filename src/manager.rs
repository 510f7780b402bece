//! Game manager: drives the engine once per animation frame
//!
//! The host owns scheduling (requestAnimationFrame in the browser, a plain loop
//! natively) and calls in with input events and frame callbacks. The manager
//! stages pointer input, owns play mode and the score total, and reports
//! changes through injected callbacks.

use glam::DVec2;

use crate::platform::{FrameLoop, FrameStats, FrameToken};
use crate::renderer::Scene;
use crate::sim::{Engine, GameConfig, GameEvent, ShipState, TickInput};
use crate::tuning::Tuning;

/// Observer for score and mode changes
pub trait GameCallbacks {
    /// A target was destroyed; `total` already includes `points`
    fn on_score_update(&mut self, points: u32, total: u64);

    /// Play mode was switched on or off
    fn on_play_mode_toggle(&mut self, _play_mode: bool) {}
}

/// Callbacks that ignore everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl GameCallbacks for NoopCallbacks {
    fn on_score_update(&mut self, _points: u32, _total: u64) {}
}

pub struct GameManager<C: GameCallbacks> {
    engine: Engine,
    callbacks: C,
    ship: ShipState,
    /// Latest pointer position, consumed by the next tick
    pointer: DVec2,
    score: u64,
    frames: FrameLoop,
    stats: FrameStats,
    /// Render clock (seconds)
    time: f64,
}

impl<C: GameCallbacks> GameManager<C> {
    pub fn new(config: GameConfig, tuning: Tuning, callbacks: C) -> Self {
        Self::with_engine(Engine::new(config, tuning), callbacks)
    }

    /// Wrap an existing engine (seeded engines in tests and headless runs)
    pub fn with_engine(engine: Engine, callbacks: C) -> Self {
        let config = engine.config();
        let center = DVec2::new(config.center_x(), config.canvas_height / 2.0);
        Self {
            engine,
            callbacks,
            ship: ShipState::Idle,
            pointer: center,
            score: 0,
            frames: FrameLoop::new(),
            stats: FrameStats::new(),
            time: 0.0,
        }
    }

    // === Loop control ===

    /// Start the frame loop. Returns the token for the first frame callback,
    /// or `None` when already running.
    pub fn start(&mut self) -> Option<FrameToken> {
        let token = self.frames.start()?;
        self.stats.reset();
        log::info!("Game loop started");
        Some(token)
    }

    /// Stop the frame loop. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        if self.frames.is_running() {
            log::info!("Game loop stopped");
        }
        self.frames.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Animation-frame callback body. Runs one tick if `token` is current and
    /// returns the token to schedule next; stale tokens do nothing.
    pub fn frame(&mut self, token: FrameToken, timestamp_ms: f64) -> Option<FrameToken> {
        let Some(next) = self.frames.accept(token) else {
            log::trace!("Ignoring stale frame callback (frame {})", token.frame());
            return None;
        };
        self.stats.record(timestamp_ms);
        self.time = timestamp_ms * 0.001;
        self.step();
        Some(next)
    }

    /// Advance exactly one frame, independent of the loop state
    pub fn step(&mut self) {
        self.ship.advance(self.engine.tuning().ship_transition_step);

        let input = TickInput {
            pointer: self.pointer,
            ship_center: self.ship_center(),
            play_mode: self.ship.is_playing(),
        };
        self.engine.tick(&input);

        for event in self.engine.drain_events() {
            match event {
                GameEvent::Scored { target, points, .. } => {
                    self.score += u64::from(points);
                    log::debug!("{:?} destroyed (+{}), score {}", target, points, self.score);
                    self.callbacks.on_score_update(points, self.score);
                }
            }
        }
    }

    // === Host input ===

    /// Record the latest pointer position; consumed by the next tick
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = DVec2::new(x, y);
    }

    /// Fire from the ship toward the click in play mode. Returns whether a
    /// bullet was fired.
    pub fn on_click(&mut self, x: f64, y: f64) -> bool {
        if !self.ship.is_playing() {
            return false;
        }
        let from = self.ship_center();
        self.engine.fire_bullet(from, DVec2::new(x, y), true);
        true
    }

    /// Flip play mode. Entering resets the score and starts the ship's glide;
    /// leaving clears all gameplay entities.
    pub fn toggle_play_mode(&mut self) {
        if self.ship.is_playing() {
            self.engine.reset();
            self.ship.exit_play();
        } else {
            self.score = 0;
            self.ship.enter_play();
        }
        let play_mode = self.ship.is_playing();
        log::info!("Play mode {}", if play_mode { "on" } else { "off" });
        self.callbacks.on_play_mode_toggle(play_mode);
    }

    /// Switch to `play_mode` if not already there
    pub fn set_play_mode(&mut self, play_mode: bool) {
        if self.ship.is_playing() != play_mode {
            self.toggle_play_mode();
        }
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        let config = self.engine.config();
        if width != config.canvas_width || height != config.canvas_height {
            log::info!("Resize to {}x{}", width, height);
        }
        self.engine.resize(width, height);
    }

    // === Queries ===

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Everything the renderer needs for this frame
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            engine: &self.engine,
            ship_center: self.ship_center(),
            aim_angle: self.ship.aim_angle(self.engine.config(), self.pointer),
            play_mode: self.ship.is_playing(),
            time: self.time,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ship.is_playing()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Ship glide progress toward center, 0 when idle
    pub fn ship_progress(&self) -> f64 {
        self.ship.progress()
    }

    pub fn ship_center(&self) -> DVec2 {
        self.ship.center(self.engine.config())
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    pub fn fps(&self) -> u32 {
        self.stats.fps()
    }

    /// Render clock in seconds (timestamp of the last frame)
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        scores: Vec<(u32, u64)>,
        toggles: Vec<bool>,
    }

    impl GameCallbacks for Recorder {
        fn on_score_update(&mut self, points: u32, total: u64) {
            self.scores.push((points, total));
        }

        fn on_play_mode_toggle(&mut self, play_mode: bool) {
            self.toggles.push(play_mode);
        }
    }

    fn manager() -> GameManager<Recorder> {
        let tuning = Tuning {
            asteroid_spawn_chance: 0.0,
            alien_spawn_chance: 0.0,
            ..Tuning::default()
        };
        let engine = Engine::with_seed(GameConfig::default(), tuning, 11);
        GameManager::with_engine(engine, Recorder::default())
    }

    #[test]
    fn test_pointer_starts_at_canvas_center() {
        let m = manager();
        assert_eq!(m.pointer(), DVec2::new(400.0, 300.0));
        assert!(!m.is_playing());
        assert_eq!(m.ship_center(), DVec2::new(400.0, 100.0));
    }

    #[test]
    fn test_pointer_move_takes_effect_on_next_frame() {
        let mut m = manager();
        let phases = |m: &GameManager<Recorder>| {
            m.engine().waves().iter().map(|w| w.phase).collect::<Vec<_>>()
        };
        let before = phases(&m);

        m.on_pointer_move(800.0, 320.0);
        assert_eq!(m.pointer(), DVec2::new(800.0, 320.0));
        assert_eq!(phases(&m), before);
        assert!(m.engine().particles().is_empty());

        m.step();
        // Pointer at the right edge: full forward drift
        for ((wave, after), was) in m.engine().waves().iter().zip(phases(&m)).zip(before) {
            assert!((after - was - wave.speed * 0.05).abs() < 1e-12);
        }
        let aim = m.scene().aim_angle;
        assert!((aim - (220.0f64).atan2(400.0)).abs() < 1e-12);
    }

    #[test]
    fn test_toggle_on_resets_score_and_starts_glide() {
        let mut m = manager();
        m.score = 90;
        m.toggle_play_mode();
        assert!(m.is_playing());
        assert_eq!(m.score(), 0);
        assert_eq!(m.ship_progress(), 0.0);
        assert_eq!(m.callbacks().toggles, vec![true]);

        let mut last = 0.0;
        for _ in 0..10 {
            m.step();
            assert!(m.ship_progress() > last);
            last = m.ship_progress();
        }
        assert!(last < 1.0);
        for _ in 0..100 {
            m.step();
        }
        assert_eq!(m.ship_progress(), 1.0);
        assert_eq!(m.ship_center(), DVec2::new(400.0, 300.0));
    }

    #[test]
    fn test_toggle_off_mid_glide_resets_and_clears() {
        let mut m = manager();
        m.toggle_play_mode();
        for _ in 0..10 {
            m.step();
        }
        m.on_click(700.0, 500.0);
        m.engine.spawn_asteroid_at(DVec2::new(50.0, 50.0), DVec2::ZERO, 20.0);
        m.engine.spawn_alien_at(DVec2::new(700.0, 50.0), DVec2::ZERO, 10.0);
        m.engine.spawn_explosion(DVec2::new(10.0, 10.0), 5.0);
        m.engine.spawn_particle(DVec2::new(10.0, 10.0), DVec2::ZERO, None);
        assert!(m.ship_progress() > 0.0 && m.ship_progress() < 1.0);

        m.toggle_play_mode();

        assert!(!m.is_playing());
        assert_eq!(m.ship_progress(), 0.0);
        assert!(m.engine().asteroids().is_empty());
        assert!(m.engine().aliens().is_empty());
        assert!(m.engine().bullets().is_empty());
        assert!(m.engine().explosions().is_empty());
        assert_eq!(m.engine().particles().len(), 1);
        assert_eq!(m.callbacks().toggles, vec![true, false]);
    }

    #[test]
    fn test_click_only_fires_in_play_mode() {
        let mut m = manager();
        assert!(!m.on_click(100.0, 100.0));
        assert!(m.engine().bullets().is_empty());

        m.toggle_play_mode();
        assert!(m.on_click(400.0, 500.0));
        let bullet = &m.engine().bullets()[0];
        assert!(bullet.is_player_bullet);
        assert_eq!(bullet.body.pos, DVec2::new(400.0, 100.0));
        assert!((bullet.body.vel - DVec2::new(0.0, 8.0)).length() < 1e-9);
    }

    #[test]
    fn test_click_on_ship_center_gives_stationary_bullet() {
        let mut m = manager();
        m.toggle_play_mode();
        assert!(m.on_click(400.0, 100.0));
        assert_eq!(m.engine().bullets()[0].body.vel, DVec2::ZERO);
    }

    #[test]
    fn test_kills_accumulate_score_through_callbacks() {
        let mut m = manager();
        m.toggle_play_mode();
        // Ship at (400, 100): targets straight below
        m.engine.spawn_asteroid_at(DVec2::new(400.0, 180.0), DVec2::ZERO, 20.0);
        m.engine.spawn_alien_at(DVec2::new(400.0, 180.0), DVec2::ZERO, 10.0);

        m.on_click(400.0, 180.0);
        m.on_click(400.0, 180.0);
        for _ in 0..20 {
            m.step();
        }

        assert_eq!(m.score(), 30);
        assert_eq!(m.callbacks().scores, vec![(10, 10), (20, 30)]);
        assert!(m.engine().asteroids().is_empty());
        assert!(m.engine().aliens().is_empty());
    }

    #[test]
    fn test_score_resets_on_reentering_play() {
        let mut m = manager();
        m.toggle_play_mode();
        m.engine.spawn_asteroid_at(DVec2::new(400.0, 150.0), DVec2::ZERO, 20.0);
        m.on_click(400.0, 150.0);
        for _ in 0..10 {
            m.step();
        }
        assert_eq!(m.score(), 10);

        m.toggle_play_mode();
        assert_eq!(m.score(), 10);
        m.toggle_play_mode();
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn test_set_play_mode_only_toggles_on_change() {
        let mut m = manager();
        m.set_play_mode(false);
        assert!(m.callbacks().toggles.is_empty());
        m.set_play_mode(true);
        m.set_play_mode(true);
        assert_eq!(m.callbacks().toggles, vec![true]);
    }

    #[test]
    fn test_frame_runs_only_with_current_token() {
        let mut m = manager();
        // Off-center pointer so every tick visibly drifts the waves
        m.on_pointer_move(800.0, 300.0);
        let t0 = m.start().unwrap();
        assert!(m.start().is_none());

        let t1 = m.frame(t0, 1000.0).unwrap();
        assert_eq!(m.time(), 1.0);
        let phase_after_one = m.engine().waves()[0].phase;

        m.stop();
        m.stop();
        assert!(!m.is_running());
        assert!(m.frame(t1, 1016.0).is_none());
        assert_eq!(m.time(), 1.0);
        assert_eq!(m.engine().waves()[0].phase, phase_after_one);

        let fresh = m.start().unwrap();
        assert!(m.frame(t1, 1032.0).is_none());
        assert!(m.frame(fresh, 1048.0).is_some());
        assert!(m.engine().waves()[0].phase != phase_after_one);
    }

    #[test]
    fn test_stop_before_start_is_harmless() {
        let mut m = manager();
        m.stop();
        assert!(!m.is_running());
        assert!(m.start().is_some());
    }

    #[test]
    fn test_scene_reflects_mode_and_aim() {
        let mut m = manager();
        m.on_pointer_move(400.0, 500.0);
        let scene = m.scene();
        assert!(!scene.play_mode);
        assert_eq!(scene.ship_center, DVec2::new(400.0, 100.0));
        assert!((scene.aim_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(scene.waves().len(), 6);
        let hull = scene.ship_hull();
        assert!((hull[0] - DVec2::new(400.0, 120.0)).length() < 1e-9);
    }

    #[test]
    fn test_resize_forwards_to_engine() {
        let mut m = manager();
        m.on_resize(1024.0, 768.0);
        assert_eq!(m.engine().config().canvas_width, 1024.0);
        assert_eq!(m.engine().config().canvas_height, 768.0);
        assert_eq!(m.ship_center().x, 512.0);
    }
}
