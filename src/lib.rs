//! Neon Fruit - A fruit-slicing arcade game for the browser canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, slicing, game state)
//! - `tuning`: Data-driven level table
//! - `settings`: Player-facing options (slice trigger, hit area, quality)
//! - `renderer`: Canvas 2D drawing (backdrop layout is platform-independent)
//! - `error`: Typed configuration and transition errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, GameError, TransitionError};
pub use settings::{QualityPreset, Settings, SliceRemoval, SliceTrigger};
pub use tuning::{LevelSettings, LevelTable};

use glam::Vec2;

/// Game configuration constants
///
/// Physics constants are per animation frame, not per second.
pub mod consts {
    /// Fruit radius range (uniform draw)
    pub const FRUIT_RADIUS_MIN: f32 = 40.0;
    pub const FRUIT_RADIUS_MAX: f32 = 70.0;
    /// New fruit starts this many radii above the top edge
    pub const SPAWN_HEIGHT_RADII: f32 = 2.0;

    /// Velocity caps, scaled by the level's velocity multiplier
    pub const VELOCITY_CAP_X: f32 = 2.0;
    pub const VELOCITY_CAP_Y: f32 = 4.0;
    /// Horizontal speed kept after hitting a side wall
    pub const WALL_RESTITUTION: f32 = 0.9;

    /// Fruit-fruit bounce damping (bonus collisions only)
    pub const BONUS_RESTITUTION: f32 = 0.8;
    /// Points for a fruit-fruit contact (bonus collisions only)
    pub const BONUS_POINTS: u32 = 10;

    /// Default hit area as a multiple of the fruit radius
    pub const DEFAULT_HIT_FACTOR: f32 = 1.2;
    pub const MIN_HIT_FACTOR: f32 = 1.0;
    pub const MAX_HIT_FACTOR: f32 = 1.5;

    /// Speed at which the two halves leave the cut (times velocity multiplier)
    pub const PIECE_SPEED: f32 = 1.5;
    /// Upward kick added to both halves
    pub const PIECE_UPWARD_BIAS: f32 = 1.0;
    /// Display spin added per unit of horizontal piece velocity
    pub const PIECE_SPIN: f32 = 0.01;

    /// Sliced fruit lifetime budget (frames at decay rate 1)
    pub const SLICED_TIMER: f32 = 120.0;
    /// Floating score lifetime budget (frames at decay rate 1)
    pub const FLOATING_SCORE_TIMER: f32 = 60.0;

    /// Spawn immediately when the board is empty for this long
    pub const STARVATION_SPAWN_MS: f64 = 500.0;
    /// Longest frame delta fed to the spawn clock (tab switches, stalls)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Missed fruit allowed before the run ends
    pub const MISS_LIMIT: u32 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
