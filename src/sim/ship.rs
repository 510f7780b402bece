//! Player ship position state machine
//!
//! Idle: the ship hovers near the top of the canvas.
//! Playing: it glides to the canvas center over a fixed number of frames.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::GameConfig;
use crate::heading;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShipState {
    #[default]
    Idle,
    /// `progress` runs 0 -> 1 while the ship moves to center
    Playing { progress: f64 },
}

impl ShipState {
    pub fn is_playing(&self) -> bool {
        matches!(self, ShipState::Playing { .. })
    }

    /// Animation progress toward center (0 when idle)
    pub fn progress(&self) -> f64 {
        match *self {
            ShipState::Idle => 0.0,
            ShipState::Playing { progress } => progress,
        }
    }

    /// Start the glide to center from the idle position
    pub fn enter_play(&mut self) {
        *self = ShipState::Playing { progress: 0.0 };
    }

    /// Snap back to idle; progress resets immediately
    pub fn exit_play(&mut self) {
        *self = ShipState::Idle;
    }

    /// Advance the glide by `step`, saturating at 1.0
    pub fn advance(&mut self, step: f64) {
        if let ShipState::Playing { progress } = self {
            *progress = (*progress + step).min(1.0);
        }
    }

    /// Effective ship center for the current state
    pub fn center(&self, config: &GameConfig) -> DVec2 {
        let top = config.ship_idle_offset_y;
        let middle = config.canvas_height / 2.0;
        let y = match *self {
            ShipState::Idle => top,
            ShipState::Playing { progress } => top + (middle - top) * progress,
        };
        DVec2::new(config.center_x(), y)
    }

    /// Rendered heading of the ship: always faces the pointer
    pub fn aim_angle(&self, config: &GameConfig, pointer: DVec2) -> f64 {
        heading(self.center(config), pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_idle_center_near_top() {
        let config = GameConfig::with_size(800.0, 600.0);
        let ship = ShipState::Idle;
        assert_eq!(ship.center(&config), DVec2::new(400.0, 100.0));
        assert_eq!(ship.progress(), 0.0);
    }

    #[test]
    fn test_glide_to_center() {
        let config = GameConfig::with_size(800.0, 600.0);
        let mut ship = ShipState::Idle;
        ship.enter_play();
        assert_eq!(ship.center(&config).y, 100.0);

        for _ in 0..25 {
            ship.advance(0.02);
        }
        assert!((ship.progress() - 0.5).abs() < 1e-9);
        assert!((ship.center(&config).y - 200.0).abs() < 1e-9);

        for _ in 0..100 {
            ship.advance(0.02);
        }
        assert_eq!(ship.progress(), 1.0);
        assert_eq!(ship.center(&config), DVec2::new(400.0, 300.0));
    }

    #[test]
    fn test_exit_resets_progress() {
        let mut ship = ShipState::Idle;
        ship.enter_play();
        ship.advance(0.3);
        ship.exit_play();
        assert_eq!(ship, ShipState::Idle);
        assert_eq!(ship.progress(), 0.0);
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut ship = ShipState::Idle;
        ship.advance(0.5);
        assert_eq!(ship, ShipState::Idle);
    }

    #[test]
    fn test_aim_angle_follows_pointer() {
        let config = GameConfig::with_size(800.0, 600.0);
        let ship = ShipState::Idle;
        let below = ship.aim_angle(&config, DVec2::new(400.0, 500.0));
        assert!((below - FRAC_PI_2).abs() < 1e-12);
        let right = ship.aim_angle(&config, DVec2::new(700.0, 100.0));
        assert!(right.abs() < 1e-12);
    }
}
