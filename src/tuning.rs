//! Data-driven level table
//!
//! Each difficulty level maps to the simulation constants the spawner and
//! physics read every frame, plus the palette the renderer draws with.
//! The table is read-only once a level is selected.

use serde::{Deserialize, Serialize};

use crate::consts::{VELOCITY_CAP_X, VELOCITY_CAP_Y};
use crate::error::ConfigError;

/// Colours for one level's backdrop and neon accents (CSS colour strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    /// Vertical sky gradient, top to bottom
    pub sky: [String; 3],
    pub grid: String,
    pub midground: String,
    pub foreground: String,
    pub stars: String,
    pub cloud: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#FF00FF".into(),
            secondary: "#00FFFF".into(),
            sky: ["#0D0221".into(), "#3D0E61".into(), "#4A00E0".into()],
            grid: "rgba(255, 0, 255, 0.2)".into(),
            midground: "rgba(124, 58, 237, 0.5)".into(),
            foreground: "rgba(76, 29, 149, 0.8)".into(),
            stars: "rgba(255, 255, 255, 0.8)".into(),
            cloud: "rgba(139, 92, 246, 0.3)".into(),
        }
    }
}

/// Tunables for a single difficulty level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub level: u8,
    /// Scales spawn velocities, velocity caps and piece speed
    pub velocity_multiplier: f32,
    pub spawn_interval_ms: u32,
    /// Maximum fruit alive at once
    pub max_fruits: u32,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Score for each slice
    pub point_value: u32,

    // Cosmetic only
    #[serde(default)]
    pub glow_intensity: f32,
    #[serde(default)]
    pub star_count: u32,
    #[serde(default)]
    pub cloud_count: u32,
    #[serde(default)]
    pub palette: Palette,
}

impl LevelSettings {
    /// Horizontal velocity cap
    #[inline]
    pub fn cap_x(&self) -> f32 {
        VELOCITY_CAP_X * self.velocity_multiplier
    }

    /// Vertical velocity cap
    #[inline]
    pub fn cap_y(&self) -> f32 {
        VELOCITY_CAP_Y * self.velocity_multiplier
    }

    /// Timer units consumed per frame by transient effects (faster on higher levels)
    #[inline]
    pub fn decay_rate(&self) -> f32 {
        1.0 + self.level as f32 * 0.1
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::Invalid {
            level: self.level,
            reason,
        };
        if self.level == 0 {
            return Err(invalid("level numbers start at 1"));
        }
        if !self.velocity_multiplier.is_finite() || self.velocity_multiplier <= 0.0 {
            return Err(invalid("velocity_multiplier must be positive"));
        }
        if self.spawn_interval_ms == 0 {
            return Err(invalid("spawn_interval_ms must be positive"));
        }
        if self.max_fruits == 0 {
            return Err(invalid("max_fruits must be positive"));
        }
        // Halves only ever leave the board if something pulls them down
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(invalid("gravity must be finite and positive"));
        }
        Ok(())
    }
}

/// All selectable levels, sorted by level number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelSettings>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelSettings {
                    level: 1,
                    velocity_multiplier: 1.0,
                    spawn_interval_ms: 2000,
                    max_fruits: 6,
                    gravity: 0.05,
                    point_value: 100,
                    glow_intensity: 15.0,
                    star_count: 100,
                    cloud_count: 5,
                    palette: Palette::default(),
                },
                LevelSettings {
                    level: 2,
                    velocity_multiplier: 1.5,
                    spawn_interval_ms: 1500,
                    max_fruits: 8,
                    gravity: 0.07,
                    point_value: 150,
                    glow_intensity: 25.0,
                    star_count: 150,
                    cloud_count: 7,
                    palette: Palette {
                        primary: "#FF0080".into(),
                        secondary: "#00FFFF".into(),
                        sky: ["#0F0326".into(), "#4B0082".into(), "#6A00E0".into()],
                        grid: "rgba(255, 0, 128, 0.3)".into(),
                        midground: "rgba(139, 92, 246, 0.5)".into(),
                        foreground: "rgba(88, 28, 135, 0.8)".into(),
                        stars: "rgba(255, 255, 255, 0.8)".into(),
                        cloud: "rgba(167, 139, 250, 0.3)".into(),
                    },
                },
                LevelSettings {
                    level: 3,
                    velocity_multiplier: 2.2,
                    spawn_interval_ms: 1000,
                    max_fruits: 10,
                    gravity: 0.1,
                    point_value: 250,
                    glow_intensity: 35.0,
                    star_count: 200,
                    cloud_count: 10,
                    palette: Palette {
                        primary: "#FF0000".into(),
                        secondary: "#FFFF00".into(),
                        sky: ["#0A001F".into(), "#300350".into(), "#8A00E0".into()],
                        grid: "rgba(255, 0, 0, 0.4)".into(),
                        midground: "rgba(167, 139, 250, 0.5)".into(),
                        foreground: "rgba(109, 40, 217, 0.8)".into(),
                        stars: "rgba(255, 255, 255, 0.9)".into(),
                        cloud: "rgba(196, 181, 253, 0.3)".into(),
                    },
                },
            ],
        }
    }
}

impl LevelTable {
    /// Build a table from explicit levels (validated, sorted, no duplicates)
    pub fn new(mut levels: Vec<LevelSettings>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::Empty);
        }
        for level in &levels {
            level.validate()?;
        }
        levels.sort_by_key(|l| l.level);
        if let Some(dup) = levels.windows(2).find(|w| w[0].level == w[1].level) {
            return Err(ConfigError::Invalid {
                level: dup[0].level,
                reason: "defined more than once",
            });
        }
        Ok(Self { levels })
    }

    /// Parse a replacement table: a JSON array of level objects
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelSettings> = serde_json::from_str(json)?;
        let table = Self::new(levels)?;
        log::info!("Loaded level table with {} levels", table.levels.len());
        Ok(table)
    }

    /// Look up a level; unknown levels are an error, never a default
    pub fn get(&self, level: u8) -> Result<&LevelSettings, ConfigError> {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .ok_or(ConfigError::UnknownLevel(level))
    }

    pub fn levels(&self) -> impl Iterator<Item = &LevelSettings> {
        self.levels.iter()
    }
}
