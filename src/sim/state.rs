//! Entity records and engine configuration
//!
//! Plain data shared between the simulation and the renderer. The engine owns
//! every collection; nothing here mutates itself beyond simple integration.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Opaque RGBA color token (0xRRGGBBAA), passed through to the renderer unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Default particle color (#06b6d4)
    pub const CYAN: Color = Color::rgba(0x06, 0xb6, 0xd4, 0xff);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(u32::from_be_bytes([r, g, b, a]))
    }

    pub fn components(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// CSS `rgba()` string for canvas fill/stroke styles
    pub fn to_css(self) -> String {
        let [r, g, b, a] = self.components();
        format!("rgba({r}, {g}, {b}, {:.3})", a as f64 / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::CYAN
    }
}

/// Age/opacity bookkeeping shared by every expiring entity
pub trait Lifecycle {
    /// Frames elapsed since spawn
    fn life(&self) -> u32;
    fn max_life(&self) -> u32;
    fn opacity(&self) -> f64;

    /// Dead entities are removed in the same frame this turns true
    fn is_expired(&self) -> bool {
        self.life() > self.max_life() || self.opacity() <= 0.0
    }
}

/// Position, velocity and lifecycle common to all moving entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub life: u32,
    pub max_life: u32,
    pub opacity: f64,
}

impl Body {
    pub fn new(pos: DVec2, vel: DVec2, max_life: u32, opacity: f64) -> Self {
        Self {
            pos,
            vel,
            life: 0,
            max_life,
            opacity,
        }
    }

    /// Advance one frame: move by velocity and age by one
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.life += 1;
    }
}

impl Lifecycle for Body {
    fn life(&self) -> u32 {
        self.life
    }
    fn max_life(&self) -> u32 {
        self.max_life
    }
    fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Ambient or trail particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub size: f64,
    pub color: Color,
}

/// Destructible rock drifting in from an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub body: Body,
    /// Radius in pixels
    pub size: f64,
    /// Current rotation (radians), render only
    pub rotation: f64,
    pub rotation_speed: f64,
}

/// Enemy that periodically fires at the player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alien {
    pub body: Body,
    /// Radius in pixels
    pub size: f64,
    /// Frames since the last shot
    pub shoot_timer: u32,
}

/// Projectile with a direction fixed at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    /// Only player bullets damage targets
    pub is_player_bullet: bool,
}

impl Bullet {
    /// Bullet travelling from `from` toward `to` at `speed`.
    ///
    /// A zero-length aim vector gives a stationary bullet that simply expires.
    pub fn aimed(from: DVec2, to: DVec2, speed: f64, is_player_bullet: bool) -> Self {
        let vel = (to - from).normalize_or_zero() * speed;
        Self {
            body: Body::new(from, vel, BULLET_MAX_LIFE, 1.0),
            is_player_bullet,
        }
    }
}

/// Expanding, fading ring left behind by a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: DVec2,
    /// Current radius, grows every frame
    pub size: f64,
    pub life: u32,
    pub max_life: u32,
    pub opacity: f64,
}

impl Explosion {
    pub fn new(pos: DVec2, size: f64) -> Self {
        Self {
            pos,
            size,
            life: 0,
            max_life: EXPLOSION_MAX_LIFE,
            opacity: 1.0,
        }
    }
}

impl Lifecycle for Explosion {
    fn life(&self) -> u32 {
        self.life
    }
    fn max_life(&self) -> u32 {
        self.max_life
    }
    fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Decorative background sinusoid. Never collides, never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub speed: f64,
    pub color: Color,
    pub opacity: f64,
    /// Resting y of the wave centerline
    pub baseline_y: f64,
}

/// Canvas and ship geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Ship half-length in pixels
    pub ship_size: f64,
    /// Ship center distance from the top edge outside play mode
    pub ship_idle_offset_y: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            ship_size: 20.0,
            ship_idle_offset_y: 100.0,
        }
    }
}

impl GameConfig {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.canvas_width / 2.0
    }

    /// Whether `pos` lies inside the canvas grown by `margin` on every side
    #[inline]
    pub fn contains(&self, pos: DVec2, margin: f64) -> bool {
        pos.x >= -margin
            && pos.x <= self.canvas_width + margin
            && pos.y >= -margin
            && pos.y <= self.canvas_height + margin
    }
}

/// What a player bullet destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Asteroid,
    Alien,
}

impl TargetKind {
    pub fn points(self) -> u32 {
        match self {
            TargetKind::Asteroid => ASTEROID_POINTS,
            TargetKind::Alien => ALIEN_POINTS,
        }
    }
}

/// Events emitted by a tick for the host to consume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player bullet destroyed a target
    Scored {
        target: TargetKind,
        pos: DVec2,
        points: u32,
    },
}
