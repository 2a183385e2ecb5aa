//! Pointer hit testing and slicing
//!
//! At most one fruit is sliced per pointer event: the first hit in spawn order.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::state::{
    FloatingScore, Fruit, GamePhase, GameState, Piece, PointerEvent, PointerKind, SliceEvent,
    SlicedFruit,
};
use crate::consts::*;
use crate::settings::SliceTrigger;
use crate::tuning::LevelSettings;
use crate::{normalize_angle, polar_to_cartesian};

/// Index of the first fruit whose hit circle contains `pointer`
pub fn find_hit(fruits: &[Fruit], pointer: Vec2, hit_factor: f32) -> Option<usize> {
    fruits.iter().position(|f| {
        let reach = f.radius * hit_factor;
        f.pos.distance_squared(pointer) <= reach * reach
    })
}

/// Cut a fruit in two along the pointer direction
pub fn slice_fruit(fruit: &Fruit, pointer: Vec2, level: &LevelSettings) -> SlicedFruit {
    let to_pointer = pointer - fruit.pos;
    let slice_angle = to_pointer.y.atan2(to_pointer.x);
    let speed = PIECE_SPEED * level.velocity_multiplier;
    let kick = Vec2::new(0.0, PIECE_UPWARD_BIAS);

    // Halves fly apart perpendicular to the cut, both nudged upward
    let piece = |side: f32, rotation: f32| Piece {
        offset: Vec2::ZERO,
        vel: polar_to_cartesian(speed, slice_angle + side * FRAC_PI_2) - kick,
        rotation: normalize_angle(rotation),
    };

    SlicedFruit {
        id: fruit.id,
        kind: fruit.kind,
        origin: fruit.pos,
        radius: fruit.radius,
        slice_angle,
        timer: SLICED_TIMER,
        pieces: [piece(-1.0, slice_angle), piece(1.0, slice_angle + PI)],
    }
}

fn triggers_slice(trigger: SliceTrigger, kind: PointerKind) -> bool {
    match trigger {
        SliceTrigger::Hover => true,
        SliceTrigger::Press => kind == PointerKind::Press,
    }
}

impl GameState {
    /// Feed one pointer event into the game.
    ///
    /// The pointer position is always tracked. Slicing only happens while
    /// playing, and only for events the slice trigger accepts.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<SliceEvent> {
        self.pointer = Some(event.pos);

        if self.phase != GamePhase::Playing
            || !triggers_slice(self.settings.slice_trigger, event.kind)
        {
            return None;
        }
        let level = self.level.as_ref()?;

        let idx = find_hit(&self.fruits, event.pos, self.settings.hit_factor)?;
        let fruit = self.fruits.remove(idx);
        let sliced = slice_fruit(&fruit, event.pos, level);
        let points = level.point_value;

        self.score += u64::from(points);
        self.floating_scores.push(FloatingScore {
            id: self.ids.next_id(),
            pos: Vec2::new(fruit.pos.x, fruit.pos.y - fruit.radius),
            value: points,
            timer: FLOATING_SCORE_TIMER,
            color: fruit.kind.color(),
        });
        log::debug!("Sliced fruit {} for {} (score {})", fruit.id, points, self.score);

        let event = SliceEvent {
            fruit_id: fruit.id,
            kind: fruit.kind,
            points,
            slice_angle: sliced.slice_angle,
        };
        self.sliced.push(sliced);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Bounds, FruitKind};
    use crate::tuning::LevelTable;

    fn fruit(id: u32, x: f32, y: f32, radius: f32) -> Fruit {
        Fruit {
            id,
            kind: FruitKind::Orange,
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, 1.0),
            radius,
            rotation: 0.0,
            angular_vel: 0.0,
        }
    }

    fn playing(settings: Settings) -> GameState {
        let mut s = GameState::new(11, settings, Bounds::new(800.0, 600.0));
        s.select_level(1, &LevelTable::default()).unwrap();
        s
    }

    fn at(x: f32, y: f32, kind: PointerKind) -> PointerEvent {
        PointerEvent {
            pos: Vec2::new(x, y),
            kind,
        }
    }

    #[test]
    fn test_hit_radius_scales_with_factor() {
        let fruits = [fruit(0, 100.0, 100.0, 50.0)];
        assert_eq!(find_hit(&fruits, Vec2::new(130.0, 140.0), 1.0), Some(0));
        // 60 px away: only inside the enlarged hit circle
        assert_eq!(find_hit(&fruits, Vec2::new(160.0, 100.0), 1.0), None);
        assert_eq!(find_hit(&fruits, Vec2::new(160.0, 100.0), 1.2), Some(0));
        assert_eq!(find_hit(&fruits, Vec2::new(161.0, 100.0), 1.2), None);
    }

    #[test]
    fn test_first_fruit_in_order_wins() {
        let fruits = [fruit(4, 100.0, 100.0, 50.0), fruit(5, 110.0, 100.0, 50.0)];
        assert_eq!(find_hit(&fruits, Vec2::new(105.0, 100.0), 1.2), Some(0));
    }

    #[test]
    fn test_pieces_fly_apart_and_up() {
        let lvl = LevelTable::default().get(1).unwrap().clone();
        // Cut straight to the right: halves go up and down the cut, minus the kick
        let s = slice_fruit(&fruit(9, 100.0, 100.0, 50.0), Vec2::new(130.0, 100.0), &lvl);
        assert_eq!(s.id, 9);
        assert_eq!(s.origin, Vec2::new(100.0, 100.0));
        assert!(s.slice_angle.abs() < 1e-6);
        assert_eq!(s.timer, SLICED_TIMER);

        let [a, b] = s.pieces;
        assert_eq!(a.offset, Vec2::ZERO);
        assert!((a.vel.y - (-1.5 - 1.0)).abs() < 1e-5);
        assert!((b.vel.y - (1.5 - 1.0)).abs() < 1e-5);
        assert!(a.vel.x.abs() < 1e-5 && b.vel.x.abs() < 1e-5);
    }

    #[test]
    fn test_slice_scores_and_spawns_effects() {
        let mut s = playing(Settings::default());
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));

        let ev = s.pointer(at(100.0, 100.0, PointerKind::Move)).unwrap();
        assert_eq!(ev.fruit_id, 0);
        assert_eq!(ev.points, 100);
        assert_eq!(s.score, 100);
        assert!(s.fruits.is_empty());
        assert_eq!(s.sliced.len(), 1);

        let fs = &s.floating_scores[0];
        assert_eq!(fs.value, 100);
        assert_eq!(fs.pos, Vec2::new(100.0, 50.0));
        assert_eq!(fs.color, FruitKind::Orange.color());
        assert_eq!(fs.timer, FLOATING_SCORE_TIMER);
    }

    #[test]
    fn test_widest_hit_factor() {
        let mut settings = Settings::default();
        settings.set_hit_factor(1.5);
        let mut s = playing(settings);
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));
        assert!(s.pointer(at(174.0, 100.0, PointerKind::Move)).is_some());
        assert_eq!((s.sliced.len(), s.floating_scores.len()), (1, 1));
    }

    #[test]
    fn test_one_slice_per_event() {
        let mut s = playing(Settings::default());
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));
        s.fruits.push(fruit(1, 120.0, 100.0, 50.0));

        let ev = s.pointer(at(110.0, 100.0, PointerKind::Move)).unwrap();
        assert_eq!(ev.fruit_id, 0);
        assert_eq!(s.fruits.len(), 1);
        assert_eq!(s.score, 100);

        // Same spot again takes the other one
        let ev = s.pointer(at(110.0, 100.0, PointerKind::Move)).unwrap();
        assert_eq!(ev.fruit_id, 1);
        assert_eq!(s.score, 200);
    }

    #[test]
    fn test_miss_leaves_state_alone() {
        let mut s = playing(Settings::default());
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));
        assert!(s.pointer(at(500.0, 500.0, PointerKind::Press)).is_none());
        assert_eq!(s.fruits.len(), 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.pointer, Some(Vec2::new(500.0, 500.0)));
    }

    #[test]
    fn test_press_trigger_ignores_moves() {
        let settings = Settings {
            slice_trigger: SliceTrigger::Press,
            ..Settings::default()
        };
        let mut s = playing(settings);
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));

        assert!(s.pointer(at(100.0, 100.0, PointerKind::Move)).is_none());
        assert_eq!(s.fruits.len(), 1);
        assert!(s.pointer(at(100.0, 100.0, PointerKind::Press)).is_some());
        assert!(s.fruits.is_empty());
    }

    #[test]
    fn test_no_slicing_outside_play() {
        let mut s = GameState::new(1, Settings::default(), Bounds::new(800.0, 600.0));
        s.fruits.push(fruit(0, 100.0, 100.0, 50.0));
        assert!(s.pointer(at(100.0, 100.0, PointerKind::Press)).is_none());
        assert_eq!(s.fruits.len(), 1);
        assert_eq!(s.pointer, Some(Vec2::new(100.0, 100.0)));
    }
}
