//! Fruit spawning
//!
//! A frame-driven clock decides when a batch is due; `try_spawn` decides how
//! many fruit the batch holds and rolls each one.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Bounds, EntityIds, Fruit, FruitKind};
use crate::consts::*;
use crate::tuning::LevelSettings;

/// Spawn cadence, fed with each frame's wall-clock delta
#[derive(Debug, Clone, Default)]
pub struct SpawnClock {
    /// Time since the last batch was attempted
    since_spawn_ms: f64,
    /// Time accumulated toward the next interval tick
    interval_ms: f64,
}

impl SpawnClock {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the clock; true when a batch should be attempted this frame.
    ///
    /// Due on every `spawn_interval_ms` boundary while below the fruit cap, and
    /// also whenever the board is empty and the last batch was over
    /// `STARVATION_SPAWN_MS` ago.
    pub fn poll(&mut self, dt_ms: f64, live: usize, level: &LevelSettings) -> bool {
        let dt_ms = dt_ms.max(0.0);
        self.since_spawn_ms += dt_ms;
        self.interval_ms += dt_ms;

        let mut due = false;
        let interval = level.spawn_interval_ms as f64;
        if self.interval_ms >= interval {
            // One tick per boundary, no backlog after a stall
            self.interval_ms %= interval;
            due = live < level.max_fruits as usize;
        }
        if live == 0 && self.since_spawn_ms > STARVATION_SPAWN_MS {
            due = true;
        }

        if due {
            self.since_spawn_ms = 0.0;
        }
        due
    }

    pub fn since_spawn_ms(&self) -> f64 {
        self.since_spawn_ms
    }
}

/// Number of fruit in the next batch: 1-2 plus half the level, within the cap
pub fn batch_size<R: Rng>(rng: &mut R, live: usize, level: &LevelSettings) -> usize {
    let wanted = rng.random_range(1..=2usize) + (level.level / 2) as usize;
    let room = (level.max_fruits as usize).saturating_sub(live);
    wanted.min(room)
}

/// Roll a single fruit just above the top edge
pub fn spawn_fruit<R: Rng>(rng: &mut R, id: u32, level: &LevelSettings, bounds: Bounds) -> Fruit {
    let vm = level.velocity_multiplier;
    let kind = FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())];
    let radius = rng.random_range(FRUIT_RADIUS_MIN..FRUIT_RADIUS_MAX);

    // Whole fruit within the canvas width; centre it on very narrow canvases
    let x = if bounds.width > 2.0 * radius {
        rng.random_range(radius..=bounds.width - radius)
    } else {
        bounds.width / 2.0
    };
    let y = -radius * SPAWN_HEIGHT_RADII;

    Fruit {
        id,
        kind,
        pos: Vec2::new(x, y),
        vel: Vec2::new(
            rng.random_range(-vm..=vm),
            rng.random_range(0.5 * vm..=1.5 * vm),
        ),
        radius,
        rotation: rng.random_range(0.0..TAU),
        angular_vel: rng.random_range(-0.01 * vm..=0.01 * vm),
    }
}

/// Create the next batch of fruit (possibly empty when the board is full)
pub fn try_spawn<R: Rng>(
    rng: &mut R,
    ids: &mut EntityIds,
    live: usize,
    level: &LevelSettings,
    bounds: Bounds,
) -> Vec<Fruit> {
    let count = batch_size(rng, live, level);
    (0..count)
        .map(|_| spawn_fruit(rng, ids.next_id(), level, bounds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::LevelTable;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level(n: u8) -> LevelSettings {
        LevelTable::default().get(n).unwrap().clone()
    }

    #[test]
    fn test_spawned_fruit_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bounds = Bounds::new(800.0, 600.0);
        for n in 1..=3 {
            let lvl = level(n);
            let vm = lvl.velocity_multiplier;
            for id in 0..200 {
                let f = spawn_fruit(&mut rng, id, &lvl, bounds);
                assert!(f.radius >= FRUIT_RADIUS_MIN && f.radius < FRUIT_RADIUS_MAX);
                assert!(f.pos.x - f.radius >= -1e-3 && f.pos.x + f.radius <= bounds.width + 1e-3);
                assert!(f.pos.y <= -2.0 * f.radius + 1e-4);
                assert!(f.vel.x.abs() <= vm);
                assert!(f.vel.y >= 0.5 * vm && f.vel.y <= 1.5 * vm);
                assert!(f.rotation >= 0.0 && f.rotation < TAU);
                assert!(f.angular_vel.abs() <= 0.01 * vm + 1e-6);
            }
        }
    }

    #[test]
    fn test_narrow_canvas_centres_fruit() {
        let mut rng = Pcg32::seed_from_u64(2);
        let f = spawn_fruit(&mut rng, 0, &level(1), Bounds::new(50.0, 600.0));
        assert_eq!(f.pos.x, 25.0);
    }

    #[test]
    fn test_batch_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(3);
        let lvl = level(3);
        for _ in 0..100 {
            // Level 3: 1-2 plus 1
            let n = batch_size(&mut rng, 0, &lvl);
            assert!((2..=3).contains(&n));
            assert!(batch_size(&mut rng, 9, &lvl) <= 1);
            assert_eq!(batch_size(&mut rng, 10, &lvl), 0);
            assert_eq!(batch_size(&mut rng, 12, &lvl), 0);
        }
    }

    #[test]
    fn test_try_spawn_assigns_increasing_ids() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ids = EntityIds::default();
        let bounds = Bounds::new(800.0, 600.0);
        let a = try_spawn(&mut rng, &mut ids, 0, &level(2), bounds);
        let b = try_spawn(&mut rng, &mut ids, a.len(), &level(2), bounds);
        let all: Vec<u32> = a.iter().chain(b.iter()).map(|f| f.id).collect();
        assert!(!all.is_empty());
        assert!(all.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_clock_interval_cadence() {
        let lvl = level(1); // 2000 ms
        let mut clock = SpawnClock::default();
        // Board not empty, so only the interval applies
        assert!(!clock.poll(1000.0, 1, &lvl));
        assert!(!clock.poll(999.0, 1, &lvl));
        assert!(clock.poll(1.0, 1, &lvl));
        assert!(!clock.poll(16.0, 1, &lvl));
        // Full board: interval passes without a batch
        assert!(!clock.poll(2000.0, 6, &lvl));
    }

    #[test]
    fn test_clock_starvation_rule() {
        let lvl = level(1);
        let mut clock = SpawnClock::default();
        assert!(!clock.poll(400.0, 0, &lvl));
        assert!(!clock.poll(100.0, 0, &lvl));
        assert!(clock.poll(1.0, 0, &lvl));
        assert_eq!(clock.since_spawn_ms(), 0.0);
        assert!(!clock.poll(300.0, 0, &lvl));
    }
}
