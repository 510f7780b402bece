//! Per-frame simulation tick
//!
//! One call advances the whole world by exactly one frame. All external state
//! the tick needs arrives through `TickInput`; nothing is looked up globally.

use glam::DVec2;

use super::collision::{CollisionWorld, resolve_bullet_hits};
use super::engine::Engine;
use super::state::{Bullet, Explosion, Lifecycle};
use crate::consts::*;

/// Host state snapshot consumed by a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Latest pointer position (canvas pixels)
    pub pointer: DVec2,
    /// Effective ship center for this frame
    pub ship_center: DVec2,
    /// Gameplay entities only simulate in play mode
    pub play_mode: bool,
}

impl Engine {
    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &TickInput) {
        self.update_waves(input);
        self.update_particles(input);

        if input.play_mode {
            self.spawn_enemies();
            self.update_asteroids();
            self.update_aliens(input.ship_center);
            self.update_bullets();
            self.resolve_collisions();
            self.update_explosions();
        }
    }

    /// Waves drift with the pointer's horizontal offset from the ship.
    ///
    /// Centered pointer: no drift. Crossing sides reverses direction.
    fn update_waves(&mut self, input: &TickInput) {
        let center_x = self.config.center_x();
        if center_x <= 0.0 {
            return;
        }
        let offset = ((input.pointer.x - center_x) / center_x).clamp(-1.0, 1.0);
        let drift = self.tuning.wave_drift;
        for wave in &mut self.waves {
            wave.phase += offset * wave.speed * drift;
        }
    }

    fn update_particles(&mut self, input: &TickInput) {
        if !input.play_mode {
            self.emit_trail(input);
        }

        let fade = self.tuning.particle_fade;
        self.particles.retain_mut(|p| {
            p.body.integrate();
            p.body.opacity = (p.body.opacity - fade).max(0.0);
            !p.body.is_expired()
        });
    }

    /// Exhaust trail behind the ship, pointing away from the pointer.
    ///
    /// Emission rate scales with how far the pointer is from the ship and stops
    /// at the particle cap.
    fn emit_trail(&mut self, input: &TickInput) {
        let center = input.ship_center;
        let max_distance = center.length();
        if max_distance <= 0.0 {
            return;
        }
        let offset = input.pointer - center;
        let speed = offset.length() / max_distance * 2.0;
        let cap = self.tuning.max_particles;
        if speed <= TRAIL_MIN_SPEED || self.particles.len() >= cap {
            return;
        }

        let dir = offset.normalize_or_zero();
        let slots = (speed * 2.0).floor() as usize + 1;
        for _ in 0..slots {
            if self.particles.len() >= cap {
                break;
            }
            if self.unit() < self.tuning.trail_emit_chance {
                let pos = center - dir * TRAIL_OFFSET;
                let vel = -dir * speed * 2.0;
                self.spawn_particle(pos, vel, None);
            }
        }
    }

    fn spawn_enemies(&mut self) {
        if self.unit() < self.tuning.asteroid_spawn_chance {
            self.spawn_asteroid();
        }
        if self.unit() < self.tuning.alien_spawn_chance {
            self.spawn_alien();
        }
    }

    fn update_asteroids(&mut self) {
        let config = self.config;
        self.asteroids.retain_mut(|a| {
            a.body.integrate();
            a.rotation += a.rotation_speed;
            !a.body.is_expired() && config.contains(a.body.pos, CULL_MARGIN)
        });
    }

    /// Move aliens and let any whose timer ran out fire at the ship
    fn update_aliens(&mut self, target: DVec2) {
        let config = self.config;
        let interval = self.tuning.alien_fire_interval;
        let speed = self.tuning.bullet_speed;
        let bullets = &mut self.bullets;

        self.aliens.retain_mut(|alien| {
            alien.body.integrate();
            alien.shoot_timer += 1;
            if alien.shoot_timer > interval {
                bullets.push(Bullet::aimed(alien.body.pos, target, speed, false));
                alien.shoot_timer = 0;
            }
            !alien.body.is_expired() && config.contains(alien.body.pos, CULL_MARGIN)
        });
    }

    /// Move bullets; ones leaving the canvas burst into a small, pointless explosion
    fn update_bullets(&mut self) {
        let config = self.config;
        let explosions = &mut self.explosions;

        self.bullets.retain_mut(|b| {
            b.body.integrate();
            if !config.contains(b.body.pos, 0.0) {
                explosions.push(Explosion::new(b.body.pos, EXIT_EXPLOSION_SIZE));
                return false;
            }
            !b.body.is_expired()
        });
    }

    fn resolve_collisions(&mut self) {
        let hits = resolve_bullet_hits(
            CollisionWorld {
                bullets: &mut self.bullets,
                asteroids: &mut self.asteroids,
                aliens: &mut self.aliens,
                explosions: &mut self.explosions,
                events: &mut self.events,
            },
            self.tuning.hit_margin,
        );
        if hits > 0 {
            log::debug!("{} target(s) destroyed", hits);
        }
    }

    fn update_explosions(&mut self) {
        self.explosions.retain_mut(|e| {
            e.life += 1;
            e.size += EXPLOSION_GROWTH;
            e.opacity = (1.0 - e.life as f64 / e.max_life as f64).max(0.0);
            !e.is_expired()
        });
    }
}
