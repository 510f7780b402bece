//! Shape generation for 2D primitives
//!
//! Everything here is pure geometry in canvas pixels, so it can be tested
//! without a browser. The painter only strokes/fills what these return.

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::DVec2;

use crate::place;
use crate::sim::{GameConfig, Wave};

/// Vertices in an asteroid outline
pub const ASTEROID_POINTS: usize = 12;

/// Horizontal spacing of wave samples (px)
pub const WAVE_STEP: f64 = 2.0;

/// Number of drifting background bubbles
pub const BUBBLE_COUNT: usize = 15;

/// Ship hull in local space (nose along +x), `size` is the half-length
pub fn ship_hull(size: f64) -> [DVec2; 4] {
    [
        DVec2::new(size, 0.0),
        DVec2::new(-size * 0.8, -size * 0.4),
        DVec2::new(-size * 0.3, 0.0),
        DVec2::new(-size * 0.8, size * 0.4),
    ]
}

/// Darker cockpit detail inside the hull
pub fn ship_detail(size: f64) -> [DVec2; 4] {
    [
        DVec2::new(size * 0.7, 0.0),
        DVec2::new(-size * 0.2, -size * 0.2),
        DVec2::new(-size * 0.1, 0.0),
        DVec2::new(-size * 0.2, size * 0.2),
    ]
}

/// Engine glow ellipse: local center and (x, y) radii
pub fn engine_glow(size: f64) -> (DVec2, DVec2) {
    (
        DVec2::new(-size * 0.4, 0.0),
        DVec2::new(size * 0.3, size * 0.1),
    )
}

/// Rotate local points by `angle` and move them to `origin`
pub fn placed(points: &[DVec2], angle: f64, origin: DVec2) -> Vec<DVec2> {
    points.iter().map(|&p| place(p, angle, origin)).collect()
}

/// Lumpy asteroid outline in local space (unrotated, centered on the origin)
pub fn asteroid_outline(size: f64) -> Vec<DVec2> {
    (0..ASTEROID_POINTS)
        .map(|i| {
            let angle = i as f64 / ASTEROID_POINTS as f64 * TAU;
            let radius = size * (0.6 + (angle * 3.0).sin() * 0.2);
            DVec2::from_angle(angle) * radius
        })
        .collect()
}

/// Asteroid outlines memoised per half-pixel size bucket.
///
/// Bounded: once `capacity` buckets are stored the cache starts over.
#[derive(Debug, Clone)]
pub struct OutlineCache {
    outlines: HashMap<u32, Vec<DVec2>>,
    capacity: usize,
}

impl Default for OutlineCache {
    fn default() -> Self {
        Self::new(64)
    }
}

impl OutlineCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            outlines: HashMap::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    fn bucket(size: f64) -> u32 {
        (size.max(0.0) * 2.0).round() as u32
    }

    /// Outline for `size`, computed at the bucket's representative size
    pub fn outline(&mut self, size: f64) -> &[DVec2] {
        let key = Self::bucket(size);
        if !self.outlines.contains_key(&key) && self.outlines.len() >= self.capacity {
            log::trace!("Outline cache full ({} entries), clearing", self.outlines.len());
            self.outlines.clear();
        }
        self.outlines
            .entry(key)
            .or_insert_with(|| asteroid_outline(key as f64 / 2.0))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.outlines.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}

/// Height of a wave at `x` for render time `time` (seconds)
pub fn wave_y(wave: &Wave, x: f64, time: f64) -> f64 {
    wave.baseline_y
        + (x * wave.frequency + time * wave.speed + wave.phase).sin() * wave.amplitude
        + (x * wave.frequency * 2.0 + time * wave.speed * 1.5).sin() * wave.amplitude * 0.3
}

/// Wave polyline across the full canvas width, one sample every `WAVE_STEP` px
pub fn wave_points(wave: &Wave, width: f64, time: f64) -> Vec<DVec2> {
    let samples = (width / WAVE_STEP).floor().max(0.0) as usize + 1;
    (0..samples)
        .map(|i| {
            let x = i as f64 * WAVE_STEP;
            DVec2::new(x, wave_y(wave, x, time))
        })
        .collect()
}

/// A decorative bubble floating through the wave band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub pos: DVec2,
    pub radius: f64,
    pub alpha: f64,
}

/// Bubbles drifting right and bobbing around the vertical center; purely a
/// function of time, nothing is simulated
pub fn bubbles(config: &GameConfig, time: f64) -> [Bubble; BUBBLE_COUNT] {
    let wrap = config.canvas_width + 30.0;
    std::array::from_fn(|i| {
        let i = i as f64;
        let x = (time * 10.0 + i * 120.0).rem_euclid(wrap) - 15.0;
        let y = config.canvas_height / 2.0
            + (time * 1.2 + i).sin() * 60.0
            + (time * 0.4 + i * 0.3).sin() * 30.0;
        Bubble {
            pos: DVec2::new(x, y),
            radius: 2.0 + (time * 1.5 + i).sin(),
            alpha: 0.2 + (time * 2.0 + i).sin() * 0.1,
        }
    })
}
