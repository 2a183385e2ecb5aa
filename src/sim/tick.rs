//! Per-frame simulation tick
//!
//! Spawner, then physics, then pruning. Pointer input is applied between
//! frames through `GameState::pointer`.

use super::physics::{bonus_collisions, step_floating_score, step_fruit, step_sliced};
use super::prune::{decay_floating, decay_sliced, prune_fruits};
use super::spawn::try_spawn;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Advance the game by one animation frame.
///
/// `dt_ms` is the wall-clock time since the previous frame; it only drives
/// the spawn clock; physics is per frame.
pub fn tick(state: &mut GameState, dt_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(level) = state.level.as_ref() else {
        return;
    };
    state.time_ticks += 1;

    // Spawner
    let dt_ms = dt_ms.clamp(0.0, MAX_FRAME_MS);
    let live = state.fruits.len();
    if state.spawn_clock.poll(dt_ms, live, level) {
        let batch = try_spawn(&mut state.rng, &mut state.ids, live, level, state.bounds);
        if !batch.is_empty() {
            log::debug!(
                "Spawned {} fruit (tick {}, live {})",
                batch.len(),
                state.time_ticks,
                live + batch.len()
            );
        }
        state.fruits.extend(batch);
    }

    // Physics
    for fruit in &mut state.fruits {
        step_fruit(fruit, level, state.bounds);
    }
    if state.settings.bonus_collisions {
        let contacts = bonus_collisions(&mut state.fruits);
        state.score += u64::from(contacts * BONUS_POINTS);
    }
    for sliced in &mut state.sliced {
        step_sliced(sliced, level);
    }
    for score in &mut state.floating_scores {
        step_floating_score(score, level);
    }

    // Lifecycle
    let rate = level.decay_rate();
    decay_sliced(
        &mut state.sliced,
        rate,
        state.settings.slice_removal,
        state.bounds,
    );
    decay_floating(&mut state.floating_scores, rate);
    let missed = prune_fruits(&mut state.fruits, state.bounds);
    state.record_misses(missed);
}
