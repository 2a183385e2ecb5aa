//! Game settings and preferences
//!
//! Read once at startup from the page URL query string. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HIT_FACTOR, MAX_HIT_FACTOR, MIN_HIT_FACTOR};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Fraction of the level's star count to draw
    pub fn star_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to draw the cloud layer
    pub fn clouds_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether to draw canvas shadow glow (expensive on some browsers)
    pub fn glow_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Which pointer events slice fruit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SliceTrigger {
    /// Pointer/touch movement slices whatever it passes over
    #[default]
    Hover,
    /// Only mouse down / touch start slices
    Press,
}

/// When a sliced fruit is dropped from the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SliceRemoval {
    /// Once both halves have fallen below the canvas, whatever the timer says
    #[default]
    OffScreen,
    /// As soon as the decay timer runs out
    TimerExpiry,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub slice_trigger: SliceTrigger,
    pub slice_removal: SliceRemoval,
    /// Hit radius as a multiple of fruit radius, within [1.0, 1.5]
    pub hit_factor: f32,
    /// Fruit bounce off each other for a few bonus points
    pub bonus_collisions: bool,
    pub quality: QualityPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slice_trigger: SliceTrigger::Hover,
            slice_removal: SliceRemoval::OffScreen,
            hit_factor: DEFAULT_HIT_FACTOR,
            bonus_collisions: false,
            quality: QualityPreset::Medium,
        }
    }
}

impl Settings {
    /// Set the hit factor, clamped to the allowed range
    pub fn set_hit_factor(&mut self, factor: f32) {
        if factor.is_finite() {
            self.hit_factor = factor.clamp(MIN_HIT_FACTOR, MAX_HIT_FACTOR);
        }
    }

    /// Parse a URL query string such as `?trigger=press&hit=1.4&quality=high`.
    ///
    /// Unknown keys and malformed values are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let applied = match (key, value) {
                ("trigger", "hover") => {
                    settings.slice_trigger = SliceTrigger::Hover;
                    true
                }
                ("trigger", "press" | "click") => {
                    settings.slice_trigger = SliceTrigger::Press;
                    true
                }
                ("removal", "offscreen") => {
                    settings.slice_removal = SliceRemoval::OffScreen;
                    true
                }
                ("removal", "timer") => {
                    settings.slice_removal = SliceRemoval::TimerExpiry;
                    true
                }
                ("hit", v) => match v.parse::<f32>() {
                    Ok(f) if f.is_finite() => {
                        settings.set_hit_factor(f);
                        true
                    }
                    _ => false,
                },
                ("bonus", "1" | "true" | "on" | "") => {
                    settings.bonus_collisions = true;
                    true
                }
                ("bonus", "0" | "false" | "off") => {
                    settings.bonus_collisions = false;
                    true
                }
                ("quality", v) => match QualityPreset::parse(v) {
                    Some(q) => {
                        settings.quality = q;
                        true
                    }
                    None => false,
                },
                _ => false,
            };
            if !applied {
                log::warn!("Ignoring setting '{}'", pair);
            }
        }

        log::info!(
            "Settings: trigger={:?} removal={:?} hit={:.2} bonus={} quality={}",
            settings.slice_trigger,
            settings.slice_removal,
            settings.hit_factor,
            settings.bonus_collisions,
            settings.quality.as_str()
        );
        settings
    }
}
