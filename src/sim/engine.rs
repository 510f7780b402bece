//! Simulation engine: entity collections, spawning and read-only queries
//!
//! The engine is the only writer of entity state. The per-frame update lives in
//! `tick.rs`; collision resolution in `collision.rs`.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{
    Alien, Asteroid, Body, Bullet, Color, Explosion, GameConfig, GameEvent, Particle, Wave,
};
use crate::consts::*;
use crate::spread;
use crate::tuning::Tuning;

/// Translucent wave palette (blue, purple, pink, cyan, emerald, amber)
const WAVE_PALETTE: [Color; WAVE_COUNT] = [
    Color::rgba(59, 130, 246, 26),
    Color::rgba(139, 92, 246, 20),
    Color::rgba(236, 72, 153, 15),
    Color::rgba(6, 182, 212, 26),
    Color::rgba(16, 185, 129, 20),
    Color::rgba(245, 158, 11, 15),
];

/// Screen edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Speed ranges for edge spawns
#[derive(Debug, Clone, Copy)]
struct EdgeSpeed {
    /// Minimum inward speed
    inward_min: f64,
    /// Random inward speed added on top of the minimum
    inward_range: f64,
    /// Max lateral speed either way
    lateral: f64,
}

const ASTEROID_SPEED: EdgeSpeed = EdgeSpeed {
    inward_min: 1.0,
    inward_range: 2.0,
    lateral: 1.0,
};

const ALIEN_SPEED: EdgeSpeed = EdgeSpeed {
    inward_min: 0.5,
    inward_range: 1.5,
    lateral: 0.75,
};

/// Owns every live entity and the background waves
#[derive(Debug, Clone)]
pub struct Engine {
    pub(super) config: GameConfig,
    pub(super) tuning: Tuning,
    pub(super) rng: Pcg32,
    pub(super) particles: Vec<Particle>,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) aliens: Vec<Alien>,
    pub(super) bullets: Vec<Bullet>,
    pub(super) explosions: Vec<Explosion>,
    pub(super) waves: Vec<Wave>,
    /// Events produced since the last drain
    pub(super) events: Vec<GameEvent>,
}

impl Engine {
    /// Engine seeded from the thread RNG
    pub fn new(config: GameConfig, tuning: Tuning) -> Self {
        Self::with_rng(config, tuning, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Engine with a fixed seed (reproducible spawns)
    pub fn with_seed(config: GameConfig, tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(config, tuning, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, tuning: Tuning, rng: Pcg32) -> Self {
        let mut engine = Self {
            config,
            tuning,
            rng,
            particles: Vec::new(),
            asteroids: Vec::new(),
            aliens: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            waves: Vec::with_capacity(WAVE_COUNT),
            events: Vec::new(),
        };
        engine.regenerate_waves();
        engine
    }

    // === Queries (renderer contract) ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    // === Configuration ===

    /// Apply new canvas dimensions.
    ///
    /// The config is swapped as a single value. Waves are only rebuilt when the
    /// size actually changed; live entities are left alone.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width == self.config.canvas_width && height == self.config.canvas_height {
            return;
        }
        self.config = GameConfig {
            canvas_width: width,
            canvas_height: height,
            ..self.config
        };
        self.regenerate_waves();
        log::debug!("Canvas resized to {}x{}, waves regenerated", width, height);
    }

    /// Clear gameplay entities (leaving play mode). Particles and waves stay.
    pub fn reset(&mut self) {
        self.asteroids.clear();
        self.aliens.clear();
        self.bullets.clear();
        self.explosions.clear();
    }

    // === Spawning ===

    /// Spawn one particle near `pos` with jittered position, velocity, size and lifetime
    pub fn spawn_particle(&mut self, pos: DVec2, vel: DVec2, color: Option<Color>) {
        let jitter_pos = self.jitter(PARTICLE_POS_JITTER);
        let jitter_vel = self.jitter(PARTICLE_VEL_JITTER);
        let size = self.rng.random_range(1.0..3.0);
        let max_life = self.rng.random_range(PARTICLE_MIN_LIFE..PARTICLE_MAX_LIFE);
        let opacity = self.rng.random_range(0.8..1.0);

        self.particles.push(Particle {
            body: Body::new(pos + jitter_pos, vel + jitter_vel, max_life, opacity),
            size,
            color: color.unwrap_or_default(),
        });
    }

    /// Spawn an asteroid just outside a random edge, heading inward
    pub fn spawn_asteroid(&mut self) {
        let (pos, vel) = self.edge_entry(ASTEROID_SPEED);
        let size = self.rng.random_range(10.0..30.0);
        self.spawn_asteroid_at(pos, vel, size);
    }

    /// Spawn an asteroid with explicit motion; rotation and opacity are randomized
    pub fn spawn_asteroid_at(&mut self, pos: DVec2, vel: DVec2, size: f64) {
        let rotation = self.rng.random_range(0.0..TAU);
        let rotation_speed = spread(self.unit(), 0.05);
        let opacity = self.rng.random_range(0.8..1.0);

        self.asteroids.push(Asteroid {
            body: Body::new(pos, vel, ASTEROID_MAX_LIFE, opacity),
            size,
            rotation,
            rotation_speed,
        });
    }

    /// Spawn an alien just outside a random edge, heading inward
    pub fn spawn_alien(&mut self) {
        let (pos, vel) = self.edge_entry(ALIEN_SPEED);
        let size = self.rng.random_range(8.0..23.0);
        self.spawn_alien_at(pos, vel, size);
    }

    /// Spawn an alien with explicit motion; the shoot timer starts at a random
    /// value so aliens don't fire in lockstep
    pub fn spawn_alien_at(&mut self, pos: DVec2, vel: DVec2, size: f64) {
        let opacity = self.rng.random_range(0.9..1.0);
        let shoot_timer = self.rng.random_range(0..100);

        self.aliens.push(Alien {
            body: Body::new(pos, vel, ALIEN_MAX_LIFE, opacity),
            size,
            shoot_timer,
        });
    }

    /// Fire a bullet from `from` toward `to` at the tuned bullet speed
    pub fn fire_bullet(&mut self, from: DVec2, to: DVec2, is_player_bullet: bool) {
        self.bullets.push(Bullet::aimed(
            from,
            to,
            self.tuning.bullet_speed,
            is_player_bullet,
        ));
    }

    pub fn spawn_explosion(&mut self, pos: DVec2, size: f64) {
        self.explosions.push(Explosion::new(pos, size));
    }

    // === Internals ===

    #[inline]
    pub(super) fn unit(&mut self) -> f64 {
        self.rng.random()
    }

    /// Random offset in [-half, half) on each axis
    pub(super) fn jitter(&mut self, half: f64) -> DVec2 {
        let x = spread(self.unit(), half);
        let y = spread(self.unit(), half);
        DVec2::new(x, y)
    }

    /// Pick an edge uniformly and return a position just outside it plus an
    /// inward velocity with a random lateral component
    fn edge_entry(&mut self, speed: EdgeSpeed) -> (DVec2, DVec2) {
        let edge = Edge::ALL[self.rng.random_range(0..Edge::ALL.len())];
        let w = self.config.canvas_width;
        let h = self.config.canvas_height;

        let along_x = self.unit() * w;
        let along_y = self.unit() * h;
        let inward = speed.inward_min + self.unit() * speed.inward_range;
        let lateral = spread(self.unit(), speed.lateral);

        match edge {
            Edge::Top => (
                DVec2::new(along_x, -SPAWN_MARGIN),
                DVec2::new(lateral, inward),
            ),
            Edge::Right => (
                DVec2::new(w + SPAWN_MARGIN, along_y),
                DVec2::new(-inward, lateral),
            ),
            Edge::Bottom => (
                DVec2::new(along_x, h + SPAWN_MARGIN),
                DVec2::new(lateral, -inward),
            ),
            Edge::Left => (
                DVec2::new(-SPAWN_MARGIN, along_y),
                DVec2::new(inward, lateral),
            ),
        }
    }

    fn regenerate_waves(&mut self) {
        let band = self.config.canvas_height / WAVE_COUNT as f64;
        self.waves.clear();
        for (i, color) in WAVE_PALETTE.iter().enumerate() {
            let wave = Wave {
                amplitude: 30.0 + self.unit() * 50.0,
                frequency: 0.01 + self.unit() * 0.02,
                phase: self.unit() * TAU,
                speed: 0.5 + self.unit() * 1.5,
                color: *color,
                opacity: 0.3 + self.unit() * 0.4,
                baseline_y: band * i as f64 + WAVE_TOP_MARGIN,
            };
            self.waves.push(wave);
        }
    }
}
