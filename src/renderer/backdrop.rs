//! Parallax backdrop layout
//!
//! Pure geometry: where the stars, clouds, ridges and grid lines go for a
//! given pointer position. The canvas renderer only paints what this returns.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::QualityPreset;
use crate::sim::Bounds;
use crate::tuning::LevelSettings;

/// Maximum layer shift in pixels, reached with the pointer at a canvas edge
pub const PARALLAX_STRENGTH: f32 = 20.0;
/// Grid line spacing in pixels
pub const GRID_SPACING: f32 = 40.0;
/// Circles per cloud
const CLOUD_PARTS: usize = 5;

/// Depth layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Stars,
    Clouds,
    Midground,
    Foreground,
}

impl Layer {
    /// Share of the pointer offset this layer follows
    pub fn factor(&self) -> f32 {
        match self {
            Layer::Stars => 0.2,
            Layer::Clouds => 0.4,
            Layer::Midground => 0.5,
            Layer::Foreground => 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub opacity: f32,
    /// Drawn with a soft halo
    pub glow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudPart {
    pub offset: Vec2,
    pub radius: f32,
}

/// A cluster of overlapping circles
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub parts: Vec<CloudPart>,
}

/// Mountain silhouette shape
#[derive(Debug, Clone, Copy)]
struct Ridge {
    segments: usize,
    /// Sine sweep across the canvas width
    sweep: f32,
    base: f32,
    /// Peak height as a fraction of canvas height
    scale: f32,
}

impl Ridge {
    fn for_layer(layer: Layer) -> Option<Self> {
        match layer {
            Layer::Midground => Some(Self {
                segments: 15,
                sweep: 1.5 * PI,
                base: 0.3,
                scale: 0.4,
            }),
            Layer::Foreground => Some(Self {
                segments: 10,
                sweep: PI,
                base: 0.5,
                scale: 0.3,
            }),
            Layer::Stars | Layer::Clouds => None,
        }
    }
}

/// Static star and cloud layout for one level and canvas size
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub stars: Vec<Star>,
    pub clouds: Vec<Cloud>,
}

impl Backdrop {
    /// Lay out stars in the upper 70% and clouds in the upper half of the canvas
    pub fn generate(
        seed: u64,
        level: &LevelSettings,
        quality: QualityPreset,
        bounds: Bounds,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed ^ u64::from(level.level));
        let star_count = (level.star_count as f32 * quality.star_density()).round() as usize;
        let cloud_count = if quality.clouds_enabled() {
            level.cloud_count as usize
        } else {
            0
        };

        let stars = (0..star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..bounds.width),
                    rng.random_range(0.0..bounds.height * 0.7),
                ),
                radius: rng.random_range(0.5..2.0),
                opacity: rng.random_range(0.5..1.0),
                glow: rng.random_bool(0.3),
            })
            .collect();

        let clouds = (0..cloud_count)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random_range(0.0..bounds.width),
                    rng.random_range(0.0..bounds.height * 0.5),
                );
                let radius: f32 = rng.random_range(30.0..80.0);
                let parts = (0..CLOUD_PARTS)
                    .map(|_| CloudPart {
                        offset: Vec2::new(
                            rng.random_range(-0.5f32..0.5) * radius,
                            rng.random_range(-0.25f32..0.25) * radius,
                        ),
                        radius: radius * rng.random_range(0.5f32..1.0),
                    })
                    .collect();
                Cloud { pos, parts }
            })
            .collect();

        Self { stars, clouds }
    }
}

/// Pointer-driven offset: zero at the centre, `PARALLAX_STRENGTH / 2` at the edges
pub fn parallax_offset(pointer: Option<Vec2>, bounds: Bounds) -> Vec2 {
    let Some(p) = pointer else {
        return Vec2::ZERO;
    };
    let size = Vec2::new(bounds.width, bounds.height);
    (p / size - Vec2::splat(0.5)) * PARALLAX_STRENGTH
}

/// Shift for one layer
#[inline]
pub fn layer_shift(offset: Vec2, layer: Layer) -> Vec2 {
    offset * layer.factor()
}

/// Wrap a point back onto the canvas (stars drift off one edge, onto the other)
pub fn wrap(p: Vec2, bounds: Bounds) -> Vec2 {
    Vec2::new(p.x.rem_euclid(bounds.width), p.y.rem_euclid(bounds.height))
}

/// Silhouette vertices for a mountain layer, left to right, without the
/// bottom corners. Empty for layers that are not ridges.
pub fn ridge_points(layer: Layer, offset: Vec2, bounds: Bounds) -> Vec<Vec2> {
    let Some(ridge) = Ridge::for_layer(layer) else {
        return Vec::new();
    };
    let shift = layer_shift(offset, layer);
    let step = bounds.width / ridge.segments as f32;

    (0..=ridge.segments)
        .map(|i| {
            let t = i as f32 / ridge.segments as f32;
            let height = (t * ridge.sweep).sin() * 0.5 + ridge.base;
            // Vertical parallax is halved so the ridge line barely bobs
            let lift = height * bounds.height * ridge.scale + shift.y * 0.5;
            Vec2::new(i as f32 * step + shift.x, bounds.height - lift)
        })
        .collect()
}

/// One grid line: its position along the perpendicular axis and opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub at: f32,
    pub opacity: f32,
}

/// Horizontal lines fade toward the bottom and shift more the lower they sit
pub fn horizontal_grid(offset: Vec2, bounds: Bounds) -> Vec<GridLine> {
    let count = (bounds.height / GRID_SPACING).ceil() as usize;
    (0..count)
        .map(|i| {
            let y = i as f32 * GRID_SPACING;
            let depth = y / bounds.height;
            GridLine {
                at: y + offset.y * (0.3 + depth * 0.4),
                opacity: 1.0 - depth * 0.7,
            }
        })
        .collect()
}

/// Vertical lines are brightest and steadiest near the centre
pub fn vertical_grid(offset: Vec2, bounds: Bounds) -> Vec<GridLine> {
    let count = (bounds.width / GRID_SPACING).ceil() as usize;
    (0..count)
        .map(|i| {
            let x = i as f32 * GRID_SPACING;
            let from_centre = (x / bounds.width - 0.5).abs();
            GridLine {
                at: x + offset.x * (0.4 + from_centre * 0.4),
                opacity: 0.8 - from_centre * 0.6,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::LevelTable;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    #[test]
    fn test_parallax_offset() {
        assert_eq!(parallax_offset(None, bounds()), Vec2::ZERO);
        assert_eq!(parallax_offset(Some(Vec2::new(400.0, 300.0)), bounds()), Vec2::ZERO);

        let corner = parallax_offset(Some(Vec2::new(800.0, 0.0)), bounds());
        assert!((corner.x - 10.0).abs() < 1e-5);
        assert!((corner.y + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_nearer_layers_move_more() {
        let offset = Vec2::new(10.0, -4.0);
        let layers = [Layer::Stars, Layer::Clouds, Layer::Midground, Layer::Foreground];
        let shifts: Vec<f32> = layers.iter().map(|&l| layer_shift(offset, l).x).collect();
        assert!(shifts.windows(2).all(|w| w[0] < w[1]));
        assert!((shifts[3] - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_wrap() {
        let p = wrap(Vec2::new(-5.0, 610.0), bounds());
        assert!((p.x - 795.0).abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_generate_is_seeded_and_in_bounds() {
        let level = LevelTable::default().get(2).unwrap().clone();
        let a = Backdrop::generate(42, &level, QualityPreset::High, bounds());
        let b = Backdrop::generate(42, &level, QualityPreset::High, bounds());
        assert_eq!(a, b);
        assert_eq!(a.stars.len(), level.star_count as usize);
        assert_eq!(a.clouds.len(), level.cloud_count as usize);
        for star in &a.stars {
            assert!(star.pos.x >= 0.0 && star.pos.x < 800.0);
            assert!(star.pos.y >= 0.0 && star.pos.y < 420.0);
        }
        assert!(a.clouds.iter().all(|c| c.parts.len() == CLOUD_PARTS));
    }

    #[test]
    fn test_quality_thins_the_sky() {
        let level = LevelTable::default().get(1).unwrap().clone();
        let low = Backdrop::generate(1, &level, QualityPreset::Low, bounds());
        assert_eq!(low.stars.len(), 25);
        assert!(low.clouds.is_empty());
    }

    #[test]
    fn test_ridges() {
        let mid = ridge_points(Layer::Midground, Vec2::ZERO, bounds());
        assert_eq!(mid.len(), 16);
        assert_eq!(mid[0], Vec2::new(0.0, 600.0 - 0.3 * 600.0 * 0.4));
        assert!((mid[15].x - 800.0).abs() < 1e-3);

        let front = ridge_points(Layer::Foreground, Vec2::new(10.0, 0.0), bounds());
        assert_eq!(front.len(), 11);
        assert!((front[0].x - 8.0).abs() < 1e-5);
        // Highest point mid-canvas
        assert!((front[5].y - (600.0 - 600.0 * 0.3)).abs() < 1e-3);

        assert!(ridge_points(Layer::Stars, Vec2::ZERO, bounds()).is_empty());
    }

    #[test]
    fn test_grid_lines() {
        let h = horizontal_grid(Vec2::ZERO, bounds());
        assert_eq!(h.len(), 15);
        assert_eq!(h[0], GridLine { at: 0.0, opacity: 1.0 });
        assert!(h.windows(2).all(|w| w[1].opacity < w[0].opacity));

        let v = vertical_grid(Vec2::new(10.0, 0.0), bounds());
        assert_eq!(v.len(), 20);
        assert!((v[10].at - 404.0).abs() < 1e-4);
    }
}
