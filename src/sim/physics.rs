//! Per-frame physics
//!
//! Fixed step: one call per animation frame, constants are per frame.
//! Gravity, then velocity clamp, then integration, then wall response.

use glam::Vec2;

use super::state::{Bounds, FloatingScore, Fruit, Piece, SlicedFruit};
use crate::consts::*;
use crate::normalize_angle;
use crate::tuning::LevelSettings;

/// Clamp each velocity component to the level's caps
#[inline]
pub fn clamp_velocity(vel: Vec2, level: &LevelSettings) -> Vec2 {
    let (cx, cy) = (level.cap_x(), level.cap_y());
    Vec2::new(vel.x.clamp(-cx, cx), vel.y.clamp(-cy, cy))
}

/// Gravity and clamp, shared by fruit and pieces
#[inline]
fn accelerate(vel: Vec2, level: &LevelSettings) -> Vec2 {
    clamp_velocity(vel + Vec2::new(0.0, level.gravity), level)
}

/// Lossy bounce off the side walls. Returns true on contact.
pub fn bounce_walls(fruit: &mut Fruit, bounds: Bounds) -> bool {
    if fruit.pos.x - fruit.radius < 0.0 {
        fruit.pos.x = fruit.radius;
        fruit.vel.x = fruit.vel.x.abs() * WALL_RESTITUTION;
        true
    } else if fruit.pos.x + fruit.radius > bounds.width {
        fruit.pos.x = bounds.width - fruit.radius;
        fruit.vel.x = -fruit.vel.x.abs() * WALL_RESTITUTION;
        true
    } else {
        false
    }
}

/// Advance one fruit by one frame
pub fn step_fruit(fruit: &mut Fruit, level: &LevelSettings, bounds: Bounds) {
    fruit.vel = accelerate(fruit.vel, level);
    fruit.pos += fruit.vel;
    fruit.rotation = normalize_angle(fruit.rotation + fruit.angular_vel);
    bounce_walls(fruit, bounds);
}

/// Advance one half independently of its twin
pub fn step_piece(piece: &mut Piece, level: &LevelSettings) {
    piece.vel = accelerate(piece.vel, level);
    piece.offset += piece.vel;
    piece.rotation = normalize_angle(piece.rotation + piece.vel.x * PIECE_SPIN);
}

pub fn step_sliced(sliced: &mut SlicedFruit, level: &LevelSettings) {
    for piece in &mut sliced.pieces {
        step_piece(piece, level);
    }
}

/// Floating scores rise at the level's speed
pub fn step_floating_score(score: &mut FloatingScore, level: &LevelSettings) {
    score.pos.y -= level.velocity_multiplier;
}

/// Fruit-fruit contacts (bonus mode only): each approaching overlapping pair
/// reverses and damps both velocities. Returns the number of contacts.
pub fn bonus_collisions(fruits: &mut [Fruit]) -> u32 {
    let mut contacts = 0;
    for i in 0..fruits.len() {
        for j in (i + 1)..fruits.len() {
            let (a, b) = (&fruits[i], &fruits[j]);
            let delta = a.pos - b.pos;
            let reach = a.radius + b.radius;
            let approaching = (a.vel - b.vel).dot(delta) < 0.0;
            if delta.length_squared() < reach * reach && approaching {
                fruits[i].vel = -fruits[i].vel * BONUS_RESTITUTION;
                fruits[j].vel = -fruits[j].vel * BONUS_RESTITUTION;
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FruitKind;
    use crate::tuning::LevelTable;
    use proptest::prelude::*;

    fn level(n: u8) -> LevelSettings {
        LevelTable::default().get(n).unwrap().clone()
    }

    fn fruit(pos: Vec2, vel: Vec2, radius: f32) -> Fruit {
        Fruit {
            id: 0,
            kind: FruitKind::Orange,
            pos,
            vel,
            radius,
            rotation: 0.0,
            angular_vel: 0.05,
        }
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        // Caps high enough that 5 px/frame is not clamped
        let mut lvl = level(1);
        lvl.velocity_multiplier = 2.0;
        lvl.gravity = 0.05;
        let bounds = Bounds::new(800.0, 600.0);
        let mut f = fruit(Vec2::new(100.0, -50.0), Vec2::new(0.0, 5.0), 50.0);

        for _ in 0..10 {
            step_fruit(&mut f, &lvl, bounds);
        }
        // Gravity lands before integration: 5*10 + 0.05*(1+..+10)
        let expected = -50.0 + 50.0 + 0.05 * 55.0;
        assert!((f.pos.y - expected).abs() < 1e-3, "y = {}", f.pos.y);
        assert_eq!(f.pos.x, 100.0);
        assert!(!f.is_below(bounds));
    }

    #[test]
    fn test_vertical_speed_is_capped() {
        let lvl = level(1);
        let mut f = fruit(Vec2::new(100.0, 0.0), Vec2::new(0.0, 5.0), 50.0);
        step_fruit(&mut f, &lvl, Bounds::new(800.0, 600.0));
        assert_eq!(f.vel.y, lvl.cap_y());
        assert_eq!(f.pos.y, 4.0);
    }

    #[test]
    fn test_left_wall_bounce() {
        let lvl = level(1);
        let mut f = fruit(Vec2::new(45.0, 100.0), Vec2::new(-1.5, 1.0), 50.0);
        step_fruit(&mut f, &lvl, Bounds::new(800.0, 600.0));
        assert_eq!(f.pos.x, 50.0);
        assert!(f.vel.x > 0.0);
        assert!((f.vel.x - 1.5 * WALL_RESTITUTION).abs() < 1e-6);
    }

    #[test]
    fn test_right_wall_bounce() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut f = fruit(Vec2::new(790.0, 100.0), Vec2::new(1.0, 0.0), 40.0);
        assert!(bounce_walls(&mut f, bounds));
        assert_eq!(f.pos.x, 760.0);
        assert!((f.vel.x + 0.9).abs() < 1e-6);

        let mut inside = fruit(Vec2::new(400.0, 100.0), Vec2::new(1.0, 0.0), 40.0);
        assert!(!bounce_walls(&mut inside, bounds));
    }

    #[test]
    fn test_pieces_move_independently() {
        let lvl = level(2);
        let mut sliced = SlicedFruit {
            id: 3,
            kind: FruitKind::Lemon,
            origin: Vec2::new(200.0, 200.0),
            radius: 40.0,
            slice_angle: 0.0,
            timer: SLICED_TIMER,
            pieces: [
                Piece {
                    offset: Vec2::ZERO,
                    vel: Vec2::new(2.0, -1.0),
                    rotation: 0.0,
                },
                Piece {
                    offset: Vec2::ZERO,
                    vel: Vec2::new(-2.0, -1.0),
                    rotation: 0.0,
                },
            ],
        };
        for _ in 0..20 {
            step_sliced(&mut sliced, &lvl);
        }
        let [a, b] = sliced.pieces;
        assert!(a.offset.x > 0.0 && b.offset.x < 0.0);
        assert!((a.offset.x + b.offset.x).abs() < 1e-4);
        assert!((a.offset.y - b.offset.y).abs() < 1e-4);
        // Gravity has turned the upward kick around
        assert!(a.vel.y > 0.0);
        assert_eq!(sliced.origin, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_floating_score_rises() {
        let lvl = level(3);
        let mut s = FloatingScore {
            id: 1,
            pos: Vec2::new(10.0, 100.0),
            value: 250,
            timer: FLOATING_SCORE_TIMER,
            color: "#fff",
        };
        step_floating_score(&mut s, &lvl);
        assert!((s.pos.y - (100.0 - 2.2)).abs() < 1e-5);
    }

    #[test]
    fn test_bonus_collision_reflects_once() {
        let mut fruits = vec![
            fruit(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 30.0),
            fruit(Vec2::new(150.0, 100.0), Vec2::new(-1.0, 0.0), 30.0),
        ];
        assert_eq!(bonus_collisions(&mut fruits), 1);
        assert!((fruits[0].vel.x + 0.8).abs() < 1e-6);
        assert!((fruits[1].vel.x - 0.8).abs() < 1e-6);
        // Now separating: no second contact
        assert_eq!(bonus_collisions(&mut fruits), 0);
    }

    proptest! {
        #[test]
        fn prop_clamp_holds_every_frame(
            level_no in 1u8..=3,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            x in 0.0f32..800.0,
            frames in 1usize..200,
        ) {
            let lvl = level(level_no);
            let bounds = Bounds::new(800.0, 600.0);
            let mut f = fruit(Vec2::new(x, -100.0), Vec2::new(vx, vy), 45.0);
            for _ in 0..frames {
                f.vel = accelerate(f.vel, &lvl);
                prop_assert!(f.vel.x.abs() <= lvl.cap_x());
                prop_assert!(f.vel.y.abs() <= lvl.cap_y());
                f.pos += f.vel;
                bounce_walls(&mut f, bounds);
            }
        }

        #[test]
        fn prop_radius_fixed_and_fall_monotone(
            level_no in 1u8..=3,
            vx in -3.0f32..3.0,
            vy in 0.0f32..3.0,
            x in 60.0f32..740.0,
            radius in 40.0f32..70.0,
            frames in 1usize..300,
        ) {
            let lvl = level(level_no);
            let bounds = Bounds::new(800.0, 600.0);
            let mut f = fruit(Vec2::new(x, -2.0 * radius), Vec2::new(vx, vy), radius);
            let mut last_y = f.pos.y;
            for _ in 0..frames {
                step_fruit(&mut f, &lvl, bounds);
                prop_assert_eq!(f.radius, radius);
                prop_assert!(f.pos.y >= last_y);
                prop_assert!(f.pos.x >= radius - 1e-3 && f.pos.x <= bounds.width - radius + 1e-3);
                last_y = f.pos.y;
                if f.is_below(bounds) {
                    break;
                }
            }
        }
    }
}
