//! Bullet-vs-target collision detection
//!
//! Targets are circles (asteroids and aliens, radius = size). Bullets are points.
//! Only player bullets deal damage; alien shots pass through everything.

use glam::DVec2;

use super::state::{Alien, Asteroid, Bullet, Explosion, GameEvent, TargetKind};

/// Whether a bullet at `bullet` hits a circular target.
///
/// Strictly-less: a bullet exactly `radius + margin` away is a miss.
#[inline]
pub fn is_hit(bullet: DVec2, target: DVec2, radius: f64, margin: f64) -> bool {
    bullet.distance(target) < radius + margin
}

/// Mutable views over everything a collision pass touches
pub struct CollisionWorld<'a> {
    pub bullets: &'a mut Vec<Bullet>,
    pub asteroids: &'a mut Vec<Asteroid>,
    pub aliens: &'a mut Vec<Alien>,
    pub explosions: &'a mut Vec<Explosion>,
    pub events: &'a mut Vec<GameEvent>,
}

/// Resolve all player-bullet hits for this frame.
///
/// Each bullet scores at most one target. Bullets and targets are walked from
/// the back so removals never shift an index that is still to be visited.
/// Returns the number of hits.
pub fn resolve_bullet_hits(world: CollisionWorld<'_>, margin: f64) -> usize {
    let CollisionWorld {
        bullets,
        asteroids,
        aliens,
        explosions,
        events,
    } = world;

    let mut hits = 0;
    let mut i = bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = &bullets[i];
        if !bullet.is_player_bullet {
            continue;
        }
        let pos = bullet.body.pos;

        let target = if let Some(idx) = asteroids
            .iter()
            .rposition(|a| is_hit(pos, a.body.pos, a.size, margin))
        {
            let asteroid = asteroids.remove(idx);
            Some((TargetKind::Asteroid, asteroid.body.pos, asteroid.size))
        } else if let Some(idx) = aliens
            .iter()
            .rposition(|a| is_hit(pos, a.body.pos, a.size, margin))
        {
            let alien = aliens.remove(idx);
            Some((TargetKind::Alien, alien.body.pos, alien.size))
        } else {
            None
        };

        if let Some((kind, at, size)) = target {
            bullets.remove(i);
            explosions.push(Explosion::new(at, size));
            events.push(GameEvent::Scored {
                target: kind,
                pos: at,
                points: kind.points(),
            });
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Body;
    use proptest::prelude::*;

    fn asteroid(x: f64, y: f64, size: f64) -> Asteroid {
        Asteroid {
            body: Body::new(DVec2::new(x, y), DVec2::ZERO, 1000, 1.0),
            size,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    fn alien(x: f64, y: f64, size: f64) -> Alien {
        Alien {
            body: Body::new(DVec2::new(x, y), DVec2::ZERO, 1500, 1.0),
            size,
            shoot_timer: 0,
        }
    }

    fn bullet(x: f64, y: f64, is_player: bool) -> Bullet {
        Bullet {
            body: Body::new(DVec2::new(x, y), DVec2::ZERO, 100, 1.0),
            is_player_bullet: is_player,
        }
    }

    #[derive(Default)]
    struct Fixture {
        bullets: Vec<Bullet>,
        asteroids: Vec<Asteroid>,
        aliens: Vec<Alien>,
        explosions: Vec<Explosion>,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn resolve(&mut self) -> usize {
            resolve_bullet_hits(
                CollisionWorld {
                    bullets: &mut self.bullets,
                    asteroids: &mut self.asteroids,
                    aliens: &mut self.aliens,
                    explosions: &mut self.explosions,
                    events: &mut self.events,
                },
                5.0,
            )
        }
    }

    #[test]
    fn test_boundary_is_a_miss() {
        let target = DVec2::new(0.0, 0.0);
        assert!(!is_hit(DVec2::new(25.0, 0.0), target, 20.0, 5.0));
        assert!(is_hit(DVec2::new(24.999, 0.0), target, 20.0, 5.0));
    }

    #[test]
    fn test_asteroid_hit_scores_ten() {
        let mut f = Fixture {
            bullets: vec![bullet(110.0, 100.0, true)],
            asteroids: vec![asteroid(100.0, 100.0, 20.0)],
            ..Default::default()
        };
        assert_eq!(f.resolve(), 1);
        assert!(f.bullets.is_empty());
        assert!(f.asteroids.is_empty());
        assert_eq!(f.explosions.len(), 1);
        assert_eq!(f.explosions[0].pos, DVec2::new(100.0, 100.0));
        assert_eq!(f.explosions[0].size, 20.0);
        assert_eq!(
            f.events,
            vec![GameEvent::Scored {
                target: TargetKind::Asteroid,
                pos: DVec2::new(100.0, 100.0),
                points: 10,
            }]
        );
    }

    #[test]
    fn test_alien_hit_scores_twenty() {
        let mut f = Fixture {
            bullets: vec![bullet(50.0, 52.0, true)],
            aliens: vec![alien(50.0, 50.0, 10.0)],
            ..Default::default()
        };
        assert_eq!(f.resolve(), 1);
        assert!(f.aliens.is_empty());
        assert!(matches!(
            f.events[0],
            GameEvent::Scored { target: TargetKind::Alien, points: 20, .. }
        ));
    }

    #[test]
    fn test_one_hit_per_bullet() {
        let mut f = Fixture {
            bullets: vec![bullet(100.0, 100.0, true)],
            asteroids: vec![asteroid(100.0, 100.0, 20.0), asteroid(102.0, 100.0, 20.0)],
            aliens: vec![alien(100.0, 101.0, 15.0)],
            ..Default::default()
        };
        assert_eq!(f.resolve(), 1);
        assert_eq!(f.events.len(), 1);
        assert_eq!(f.asteroids.len() + f.aliens.len(), 2);
        assert_eq!(f.explosions.len(), 1);
    }

    #[test]
    fn test_alien_bullets_never_damage() {
        let mut f = Fixture {
            bullets: vec![bullet(100.0, 100.0, false), bullet(50.0, 50.0, false)],
            asteroids: vec![asteroid(100.0, 100.0, 20.0)],
            aliens: vec![alien(50.0, 50.0, 15.0)],
            ..Default::default()
        };
        assert_eq!(f.resolve(), 0);
        assert_eq!(f.bullets.len(), 2);
        assert_eq!(f.asteroids.len(), 1);
        assert_eq!(f.aliens.len(), 1);
        assert!(f.events.is_empty());
        assert!(f.explosions.is_empty());
    }

    #[test]
    fn test_many_bullets_many_targets_no_skips() {
        // Every other bullet is on top of its own asteroid; the rest miss
        let mut f = Fixture::default();
        for i in 0..10 {
            let x = i as f64 * 100.0;
            f.asteroids.push(asteroid(x, 0.0, 10.0));
            f.bullets.push(bullet(x, 0.0, true));
            f.bullets.push(bullet(x, 500.0, true));
        }
        assert_eq!(f.resolve(), 10);
        assert!(f.asteroids.is_empty());
        assert_eq!(f.bullets.len(), 10);
        assert!(f.bullets.iter().all(|b| b.body.pos.y == 500.0));
        let total: u32 = f
            .events
            .iter()
            .map(|GameEvent::Scored { points, .. }| *points)
            .sum();
        assert_eq!(total, 100);
    }

    proptest! {
        #[test]
        fn hit_iff_inside_reach(d in 0.0f64..60.0, size in 8.0f64..30.0) {
            let hit = is_hit(DVec2::new(d, 0.0), DVec2::ZERO, size, 5.0);
            prop_assert_eq!(hit, d < size + 5.0);
        }

        #[test]
        fn player_hit_removes_exactly_one_target(
            dx in -20.0f64..20.0,
            dy in -20.0f64..20.0,
            extra in 0usize..4,
        ) {
            let mut f = Fixture {
                bullets: vec![bullet(dx, dy, true)],
                ..Default::default()
            };
            for _ in 0..=extra {
                f.asteroids.push(asteroid(0.0, 0.0, 25.0));
            }
            prop_assert_eq!(f.resolve(), 1);
            prop_assert_eq!(f.asteroids.len(), extra);
            prop_assert_eq!(f.events.len(), 1);
        }
    }
}
