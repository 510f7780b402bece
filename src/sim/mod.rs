//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One `tick` per frame, no wall-clock time
//! - Randomness only through the engine's own RNG (seedable for tests)
//! - No rendering or platform dependencies

pub mod collision;
pub mod engine;
pub mod ship;
pub mod state;
pub mod tick;

pub use collision::{CollisionWorld, is_hit, resolve_bullet_hits};
pub use engine::Engine;
pub use ship::ShipState;
pub use state::{
    Alien, Asteroid, Body, Bullet, Color, Explosion, GameConfig, GameEvent, Lifecycle, Particle,
    TargetKind, Wave,
};
pub use tick::TickInput;
