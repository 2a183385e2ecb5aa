//! Lifecycle pruning for fruit and transient effects

use super::state::{Bounds, FloatingScore, Fruit, SlicedFruit};
use crate::settings::SliceRemoval;

/// Drop fruit that fell past the bottom edge; returns how many were missed
pub fn prune_fruits(fruits: &mut Vec<Fruit>, bounds: Bounds) -> u32 {
    let before = fruits.len();
    fruits.retain(|f| !f.is_below(bounds));
    (before - fruits.len()) as u32
}

/// Age sliced fruit and drop the finished ones
pub fn decay_sliced(
    sliced: &mut Vec<SlicedFruit>,
    rate: f32,
    removal: SliceRemoval,
    bounds: Bounds,
) {
    sliced.retain_mut(|s| {
        s.timer = (s.timer - rate).max(0.0);
        match removal {
            SliceRemoval::OffScreen => !s.all_pieces_below(bounds),
            SliceRemoval::TimerExpiry => s.timer > 0.0,
        }
    });
}

/// Age floating scores and drop expired ones
pub fn decay_floating(scores: &mut Vec<FloatingScore>, rate: f32) {
    scores.retain_mut(|s| {
        s.timer = (s.timer - rate).max(0.0);
        s.timer > 0.0
    });
}
