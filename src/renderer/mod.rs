//! Rendering module
//!
//! `shapes` holds platform-free geometry. The Canvas2D painter is only built
//! for wasm32 and reads a `Scene`; it never writes simulation state.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;

use glam::DVec2;

use crate::sim::{Alien, Asteroid, Bullet, Engine, Explosion, GameConfig, Particle, Wave};

/// Read-only snapshot of everything one frame needs to draw
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub engine: &'a Engine,
    /// Effective ship center (mode and transition progress applied)
    pub ship_center: DVec2,
    /// Ship heading toward the pointer (radians)
    pub aim_angle: f64,
    /// Gameplay entities are only drawn in play mode
    pub play_mode: bool,
    /// Render clock in seconds, drives wave and bubble animation
    pub time: f64,
}

impl<'a> Scene<'a> {
    pub fn config(&self) -> &'a GameConfig {
        self.engine.config()
    }

    pub fn waves(&self) -> &'a [Wave] {
        self.engine.waves()
    }

    pub fn particles(&self) -> &'a [Particle] {
        self.engine.particles()
    }

    pub fn asteroids(&self) -> &'a [Asteroid] {
        self.engine.asteroids()
    }

    pub fn aliens(&self) -> &'a [Alien] {
        self.engine.aliens()
    }

    pub fn bullets(&self) -> &'a [Bullet] {
        self.engine.bullets()
    }

    pub fn explosions(&self) -> &'a [Explosion] {
        self.engine.explosions()
    }

    /// Ship hull in canvas space
    pub fn ship_hull(&self) -> Vec<DVec2> {
        let size = self.config().ship_size;
        shapes::placed(&shapes::ship_hull(size), self.aim_angle, self.ship_center)
    }
}
