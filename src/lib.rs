//! Nebula Arcade - ambient canvas background with a built-in arcade mini-game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, spawning, collisions, lifecycle)
//! - `manager`: Host loop glue (input relay, play mode, score, callbacks)
//! - `platform`: Frame scheduling tokens and frame statistics
//! - `renderer`: Geometry for painting plus the wasm Canvas2D painter
//! - `tuning`: Data-driven game balance

pub mod manager;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use manager::{GameCallbacks, GameManager, NoopCallbacks};
pub use tuning::{QualityPreset, Tuning, TuningError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Distance outside the canvas edge where enemies appear
    pub const SPAWN_MARGIN: f64 = 50.0;
    /// Enemies further than this outside the canvas are culled
    pub const CULL_MARGIN: f64 = 100.0;

    /// Particle lifetime range in frames (max exclusive)
    pub const PARTICLE_MIN_LIFE: u32 = 20;
    pub const PARTICLE_MAX_LIFE: u32 = 50;
    /// Random position/velocity jitter applied to every spawned particle
    pub const PARTICLE_POS_JITTER: f64 = 5.0;
    pub const PARTICLE_VEL_JITTER: f64 = 1.0;
    /// Trail particles are emitted this far behind the ship
    pub const TRAIL_OFFSET: f64 = 25.0;
    /// Pointer "speed" below which no trail is emitted
    pub const TRAIL_MIN_SPEED: f64 = 0.1;

    pub const ASTEROID_MAX_LIFE: u32 = 1000;
    pub const ALIEN_MAX_LIFE: u32 = 1500;
    pub const BULLET_MAX_LIFE: u32 = 100;
    pub const EXPLOSION_MAX_LIFE: u32 = 30;

    /// Explosion radius growth per frame
    pub const EXPLOSION_GROWTH: f64 = 2.0;
    /// Size of the puff left when a bullet leaves the canvas
    pub const EXIT_EXPLOSION_SIZE: f64 = 5.0;

    /// Score for destroying targets
    pub const ASTEROID_POINTS: u32 = 10;
    pub const ALIEN_POINTS: u32 = 20;

    /// Number of background waves
    pub const WAVE_COUNT: usize = 6;
    /// Baseline offset of the first wave from the top edge
    pub const WAVE_TOP_MARGIN: f64 = 100.0;
}

/// Uniform offset in [-half, half) from a unit sample in [0, 1)
#[inline]
pub fn spread(unit: f64, half: f64) -> f64 {
    (unit - 0.5) * 2.0 * half
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn heading(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate `point` by `angle` around the origin, then translate by `origin`
#[inline]
pub fn place(point: DVec2, angle: f64, origin: DVec2) -> DVec2 {
    origin + DVec2::from_angle(angle).rotate(point)
}
