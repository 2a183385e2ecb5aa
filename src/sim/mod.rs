//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-frame physics, no variable timestep
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod physics;
pub mod prune;
pub mod slice;
pub mod spawn;
pub mod state;
pub mod tick;

pub use physics::{bonus_collisions, clamp_velocity, step_fruit, step_sliced};
pub use prune::{decay_floating, decay_sliced, prune_fruits};
pub use slice::{find_hit, slice_fruit};
pub use spawn::{SpawnClock, try_spawn};
pub use state::{
    Bounds, EntityIds, FloatingScore, FrameView, Fruit, FruitKind, GamePhase, GameState, Piece,
    PointerEvent, PointerKind, SliceEvent, SlicedFruit,
};
pub use tick::tick;
