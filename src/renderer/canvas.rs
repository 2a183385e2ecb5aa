//! Canvas 2D renderer
//!
//! Paints one `FrameView` per animation frame: backdrop, fruit, halves,
//! floating scores and the in-canvas HUD. Reads game state, never writes it.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backdrop::{
    Backdrop, Layer, horizontal_grid, layer_shift, parallax_offset, ridge_points, vertical_grid,
    wrap,
};
use crate::consts::{FLOATING_SCORE_TIMER, MISS_LIMIT, SLICED_TIMER};
use crate::settings::Settings;
use crate::sim::{Bounds, FloatingScore, FrameView, Fruit, SlicedFruit};
use crate::tuning::LevelSettings;

/// Halves never fade below this, so they stay visible while falling away
const MIN_PIECE_ALPHA: f64 = 0.25;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    seed: u64,
    backdrop: Backdrop,
    /// Level and canvas size the backdrop was laid out for
    backdrop_key: Option<(u8, u32, u32)>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, seed: u64) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            seed,
            backdrop: Backdrop {
                stars: Vec::new(),
                clouds: Vec::new(),
            },
            backdrop_key: None,
        })
    }

    /// Re-lay the stars and clouds when the level or canvas size changes
    fn refresh_backdrop(&mut self, level: &LevelSettings, settings: &Settings, bounds: Bounds) {
        let key = (level.level, bounds.width as u32, bounds.height as u32);
        if self.backdrop_key != Some(key) {
            self.backdrop = Backdrop::generate(self.seed, level, settings.quality, bounds);
            self.backdrop_key = Some(key);
            log::debug!(
                "Backdrop for level {}: {} stars, {} clouds",
                level.level,
                self.backdrop.stars.len(),
                self.backdrop.clouds.len()
            );
        }
    }

    /// Draw a full frame with `level` supplying palette and glow
    pub fn render(
        &mut self,
        view: &FrameView<'_>,
        level: &LevelSettings,
        settings: &Settings,
    ) -> Result<(), JsValue> {
        self.refresh_backdrop(level, settings, view.bounds);
        let offset = parallax_offset(view.pointer, view.bounds);

        self.draw_sky(level, view.bounds)?;
        self.draw_stars(level, settings, offset, view.bounds)?;
        self.draw_clouds(level, offset)?;
        self.draw_ridge(Layer::Midground, &level.palette.midground, offset, view.bounds);
        self.draw_grid(level, offset, view.bounds);
        self.draw_ridge(Layer::Foreground, &level.palette.foreground, offset, view.bounds);

        let glow = if settings.quality.glow_enabled() {
            level.glow_intensity as f64
        } else {
            0.0
        };
        for sliced in view.sliced {
            self.draw_sliced(sliced, glow)?;
        }
        for fruit in view.fruits {
            let hovered = view.pointer.is_some_and(|p| {
                let reach = fruit.radius * settings.hit_factor;
                fruit.pos.distance_squared(p) <= reach * reach
            });
            self.draw_fruit(fruit, level, glow, hovered)?;
        }
        for score in view.floating_scores {
            self.draw_floating_score(score)?;
        }
        self.draw_hud(view, level)
    }

    fn draw_sky(&self, level: &LevelSettings, bounds: Bounds) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let h = bounds.height as f64;
        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let [top, mid, bottom] = &level.palette.sky;
        gradient.add_color_stop(0.0, top)?;
        gradient.add_color_stop(0.5, mid)?;
        gradient.add_color_stop(1.0, bottom)?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, bounds.width as f64, h);
        Ok(())
    }

    fn draw_stars(
        &self,
        level: &LevelSettings,
        settings: &Settings,
        offset: glam::Vec2,
        bounds: Bounds,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let shift = layer_shift(offset, Layer::Stars);
        let halos = settings.quality.glow_enabled();

        for star in &self.backdrop.stars {
            let p = wrap(star.pos + shift, bounds);
            ctx.set_global_alpha(star.opacity as f64);
            if halos && star.glow {
                ctx.set_shadow_color(&level.palette.stars);
                ctx.set_shadow_blur(5.0);
            }
            ctx.set_fill_style_str("#ffffff");
            ctx.begin_path();
            ctx.arc(p.x as f64, p.y as f64, star.radius as f64, 0.0, TAU)?;
            ctx.fill();
            ctx.set_shadow_blur(0.0);
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_clouds(&self, level: &LevelSettings, offset: glam::Vec2) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let shift = layer_shift(offset, Layer::Clouds);
        ctx.set_fill_style_str(&level.palette.cloud);
        for cloud in &self.backdrop.clouds {
            for part in &cloud.parts {
                let p = cloud.pos + part.offset + shift;
                ctx.begin_path();
                ctx.arc(p.x as f64, p.y as f64, part.radius as f64, 0.0, TAU)?;
                ctx.fill();
            }
        }
        Ok(())
    }

    fn draw_ridge(&self, layer: Layer, color: &str, offset: glam::Vec2, bounds: Bounds) {
        let ctx = &self.ctx;
        let (w, h) = (bounds.width as f64, bounds.height as f64);
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.move_to(0.0, h);
        for p in ridge_points(layer, offset, bounds) {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.line_to(w, h);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_grid(&self, level: &LevelSettings, offset: glam::Vec2, bounds: Bounds) {
        let ctx = &self.ctx;
        let (w, h) = (bounds.width as f64, bounds.height as f64);
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str(&level.palette.grid);

        for line in horizontal_grid(offset, bounds) {
            ctx.set_global_alpha(line.opacity as f64);
            ctx.begin_path();
            ctx.move_to(0.0, line.at as f64);
            ctx.line_to(w, line.at as f64);
            ctx.stroke();
        }
        for line in vertical_grid(offset, bounds) {
            ctx.set_global_alpha(line.opacity as f64);
            ctx.begin_path();
            ctx.move_to(line.at as f64, 0.0);
            ctx.line_to(line.at as f64, h);
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_fruit(
        &self,
        fruit: &Fruit,
        level: &LevelSettings,
        glow: f64,
        hovered: bool,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let r = fruit.radius as f64;
        let color = fruit.kind.color();

        ctx.save();
        ctx.translate(fruit.pos.x as f64, fruit.pos.y as f64)?;
        ctx.rotate(fruit.rotation as f64)?;

        ctx.set_shadow_color(color);
        ctx.set_shadow_blur(glow);

        // Body: lit from the upper left
        let body = ctx.create_radial_gradient(-r * 0.3, -r * 0.3, r * 0.1, 0.0, 0.0, r)?;
        body.add_color_stop(0.0, fruit.kind.highlight())?;
        body.add_color_stop(1.0, color)?;
        ctx.set_fill_style_canvas_gradient(&body);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, r, 0.0, TAU)?;
        ctx.fill();

        // Segment lines
        ctx.set_shadow_blur(0.0);
        ctx.set_stroke_style_str("rgba(255, 255, 255, 0.35)");
        ctx.set_line_width(1.5);
        for i in 0..8 {
            let a = i as f64 * TAU / 8.0;
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);
            ctx.line_to(a.cos() * r * 0.8, a.sin() * r * 0.8);
            ctx.stroke();
        }

        ctx.set_stroke_style_str(&level.palette.secondary);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(0.0, 0.0, r, 0.0, TAU)?;
        ctx.stroke();
        ctx.restore();

        if hovered {
            ctx.set_stroke_style_str(&level.palette.primary);
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.arc(fruit.pos.x as f64, fruit.pos.y as f64, r + 8.0, 0.0, TAU)?;
            ctx.stroke();
        }
        Ok(())
    }

    fn draw_sliced(&self, sliced: &SlicedFruit, glow: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let r = sliced.radius as f64;
        let alpha = (sliced.timer / SLICED_TIMER) as f64;
        ctx.set_global_alpha(alpha.clamp(MIN_PIECE_ALPHA, 1.0));
        ctx.set_fill_style_str(sliced.kind.color());
        ctx.set_shadow_color(sliced.kind.color());
        ctx.set_shadow_blur(glow * 0.5);

        for piece in &sliced.pieces {
            let p = sliced.piece_pos(piece);
            ctx.save();
            ctx.translate(p.x as f64, p.y as f64)?;
            ctx.rotate(piece.rotation as f64)?;
            ctx.begin_path();
            ctx.arc(0.0, 0.0, r, 0.0, PI)?;
            ctx.close_path();
            ctx.fill();
            // Cut face
            ctx.set_stroke_style_str(sliced.kind.highlight());
            ctx.set_line_width(3.0);
            ctx.begin_path();
            ctx.move_to(-r, 0.0);
            ctx.line_to(r, 0.0);
            ctx.stroke();
            ctx.restore();
        }

        ctx.set_shadow_blur(0.0);
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_floating_score(&self, score: &FloatingScore) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_global_alpha((score.timer / FLOATING_SCORE_TIMER).clamp(0.0, 1.0) as f64);
        ctx.set_font("bold 24px monospace");
        ctx.set_text_align("center");
        ctx.set_fill_style_str(score.color);
        ctx.fill_text(
            &format!("+{}", score.value),
            score.pos.x as f64,
            score.pos.y as f64,
        )?;
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_hud(&self, view: &FrameView<'_>, level: &LevelSettings) -> Result<(), JsValue> {
        let Some(level_no) = view.level else {
            return Ok(());
        };
        let ctx = &self.ctx;
        ctx.set_font("bold 20px monospace");
        ctx.set_text_align("left");
        ctx.set_fill_style_str(&level.palette.secondary);
        ctx.fill_text(&format!("SCORE {}", view.score), 16.0, 32.0)?;
        ctx.fill_text(&format!("LEVEL {}", level_no), 16.0, 58.0)?;

        ctx.set_text_align("right");
        let marks: String = (0..MISS_LIMIT)
            .map(|i| if i < view.misses { 'X' } else { '-' })
            .collect();
        ctx.set_fill_style_str(&level.palette.primary);
        ctx.fill_text(&marks, view.bounds.width as f64 - 16.0, 32.0)?;
        Ok(())
    }
}
