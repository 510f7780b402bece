//! Canvas2D painter (wasm32 only)
//!
//! Draw order: waves, bubbles, particles, ship, then asteroids, aliens,
//! bullets and explosions when in play mode.

use std::f64::consts::TAU;

use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Scene;
use super::shapes::{self, OutlineCache};
use crate::sim::{Alien, Asteroid, Color, Explosion, Wave};

mod palette {
    pub const SHIP_HULL: &str = "#3b82f6";
    pub const SHIP_DETAIL: &str = "#1e40af";
    pub const SHIP_GLOW: &str = "#06b6d4";
    pub const BUBBLE: &str = "rgba(147, 197, 253, 0.4)";
    pub const ROCK_LIGHT: &str = "#9ca3af";
    pub const ROCK_MID: &str = "#6b7280";
    pub const ROCK_DARK: &str = "#4b5563";
    pub const ROCK_HIGHLIGHT: &str = "#d1d5db";
    pub const ALIEN: &str = "#ef4444";
    pub const WHITE: &str = "#ffffff";
    pub const BLACK: &str = "#000000";
    pub const BULLET: &str = "#fbbf24";
    pub const BLAST_RING: &str = "#fbbf24";
    pub const BLAST_FILL: &str = "#ef4444";
}

/// Bullet dot radius (px)
const BULLET_RADIUS: f64 = 2.0;

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    outlines: OutlineCache,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;
        Ok(Self {
            ctx,
            outlines: OutlineCache::default(),
        })
    }

    /// Paint one frame
    pub fn render(&mut self, scene: &Scene<'_>) -> Result<(), JsValue> {
        let config = scene.config();
        self.ctx
            .clear_rect(0.0, 0.0, config.canvas_width, config.canvas_height);

        for wave in scene.waves() {
            self.draw_wave(wave, config.canvas_width, config.canvas_height, scene.time)?;
        }
        self.draw_bubbles(scene)?;
        self.draw_particles(scene)?;
        self.draw_ship(scene)?;

        if scene.play_mode {
            for asteroid in scene.asteroids() {
                self.draw_asteroid(asteroid)?;
            }
            for alien in scene.aliens() {
                self.draw_alien(alien)?;
            }
            self.draw_bullets(scene)?;
            for explosion in scene.explosions() {
                self.draw_explosion(explosion)?;
            }
        }
        Ok(())
    }

    fn trace(&self, points: &[DVec2]) {
        let ctx = &self.ctx;
        ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            ctx.move_to(first.x, first.y);
            for p in rest {
                ctx.line_to(p.x, p.y);
            }
        }
    }

    fn disc(&self, center: DVec2, radius: f64, style: &str) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(style);
        ctx.begin_path();
        ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU)?;
        ctx.fill();
        Ok(())
    }

    fn draw_wave(&self, wave: &Wave, width: f64, height: f64, time: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(wave.opacity);
        let color = wave.color.to_css();
        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(2.0);

        self.trace(&shapes::wave_points(wave, width, time));
        ctx.stroke();

        // Fill from the curve down to the bottom edge, strongest at the baseline
        let [r, g, b, a] = wave.color.components();
        let faded = Color::rgba(r, g, b, a / 2).to_css();
        let gradient = ctx.create_linear_gradient(
            0.0,
            wave.baseline_y - wave.amplitude,
            0.0,
            wave.baseline_y + wave.amplitude,
        );
        gradient.add_color_stop(0.0, &faded)?;
        gradient.add_color_stop(0.5, &color)?;
        gradient.add_color_stop(1.0, &faded)?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.line_to(width, height);
        ctx.line_to(0.0, height);
        ctx.close_path();
        ctx.fill();

        ctx.restore();
        Ok(())
    }

    fn draw_bubbles(&self, scene: &Scene<'_>) -> Result<(), JsValue> {
        for bubble in shapes::bubbles(scene.config(), scene.time) {
            self.ctx.save();
            self.ctx.set_global_alpha(bubble.alpha);
            self.disc(bubble.pos, bubble.radius, palette::BUBBLE)?;
            self.ctx.restore();
        }
        Ok(())
    }

    fn draw_particles(&self, scene: &Scene<'_>) -> Result<(), JsValue> {
        for p in scene.particles() {
            self.ctx.save();
            self.ctx.set_global_alpha(p.body.opacity);
            self.disc(p.body.pos, p.size, &p.color.to_css())?;
            self.ctx.restore();
        }
        Ok(())
    }

    fn draw_ship(&self, scene: &Scene<'_>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let size = scene.config().ship_size;

        ctx.save();
        ctx.translate(scene.ship_center.x, scene.ship_center.y)?;
        ctx.rotate(scene.aim_angle)?;

        ctx.set_fill_style_str(palette::SHIP_HULL);
        self.trace(&shapes::ship_hull(size));
        ctx.close_path();
        ctx.fill();

        ctx.set_fill_style_str(palette::SHIP_DETAIL);
        self.trace(&shapes::ship_detail(size));
        ctx.close_path();
        ctx.fill();

        let (glow, radii) = shapes::engine_glow(size);
        ctx.set_fill_style_str(palette::SHIP_GLOW);
        ctx.begin_path();
        ctx.ellipse(glow.x, glow.y, radii.x, radii.y, 0.0, 0.0, TAU)?;
        ctx.fill();

        ctx.restore();
        Ok(())
    }

    fn draw_asteroid(&mut self, asteroid: &Asteroid) -> Result<(), JsValue> {
        let size = asteroid.size;
        let ctx = &self.ctx;
        ctx.save();
        ctx.translate(asteroid.body.pos.x, asteroid.body.pos.y)?;
        ctx.rotate(asteroid.rotation)?;
        ctx.set_global_alpha(asteroid.body.opacity);

        let gradient =
            ctx.create_radial_gradient(-size * 0.3, -size * 0.3, 0.0, 0.0, 0.0, size)?;
        gradient.add_color_stop(0.0, palette::ROCK_LIGHT)?;
        gradient.add_color_stop(0.5, palette::ROCK_MID)?;
        gradient.add_color_stop(1.0, palette::ROCK_DARK)?;
        ctx.set_fill_style_canvas_gradient(&gradient);

        let outline = self.outlines.outline(size);
        ctx.begin_path();
        if let Some((first, rest)) = outline.split_first() {
            ctx.move_to(first.x, first.y);
            for p in rest {
                ctx.line_to(p.x, p.y);
            }
        }
        ctx.close_path();
        ctx.fill();

        self.disc(DVec2::splat(-size * 0.25), size * 0.15, palette::ROCK_HIGHLIGHT)?;
        self.disc(DVec2::new(size * 0.2, size * 0.1), size * 0.08, palette::ROCK_DARK)?;
        self.disc(DVec2::new(-size * 0.1, size * 0.2), size * 0.06, palette::ROCK_DARK)?;

        self.ctx.restore();
        Ok(())
    }

    fn draw_alien(&self, alien: &Alien) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let size = alien.size;
        ctx.save();
        ctx.translate(alien.body.pos.x, alien.body.pos.y)?;
        ctx.set_global_alpha(alien.body.opacity);

        ctx.set_fill_style_str(palette::ALIEN);
        ctx.begin_path();
        ctx.ellipse(0.0, 0.0, size, size * 0.8, 0.0, 0.0, TAU)?;
        ctx.fill();

        for (radius, style) in [(0.15, palette::WHITE), (0.08, palette::BLACK)] {
            for side in [-1.0, 1.0] {
                self.disc(DVec2::new(side * size * 0.3, -size * 0.2), size * radius, style)?;
            }
        }

        ctx.restore();
        Ok(())
    }

    fn draw_bullets(&self, scene: &Scene<'_>) -> Result<(), JsValue> {
        for bullet in scene.bullets() {
            self.disc(bullet.body.pos, BULLET_RADIUS, palette::BULLET)?;
        }
        Ok(())
    }

    fn draw_explosion(&self, explosion: &Explosion) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (pos, size) = (explosion.pos, explosion.size);
        ctx.save();
        ctx.set_global_alpha(explosion.opacity);

        ctx.set_stroke_style_str(palette::BLAST_RING);
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.arc(pos.x, pos.y, size, 0.0, TAU)?;
        ctx.stroke();

        self.disc(pos, size * 0.7, palette::BLAST_FILL)?;
        self.disc(pos, size * 0.3, palette::WHITE)?;

        ctx.restore();
        Ok(())
    }
}
