//! Game state and core simulation types
//!
//! Everything the frame loop mutates and the renderer reads lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::spawn::SpawnClock;
use crate::consts::MISS_LIMIT;
use crate::error::{GameError, TransitionError};
use crate::settings::Settings;
use crate::tuning::{LevelSettings, LevelTable};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Title screen, waiting for "start"
    Title,
    /// Choosing a difficulty
    LevelSelect,
    /// Active gameplay
    Playing,
    /// Too many fruit missed
    GameOver,
}

/// Fruit varieties (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FruitKind {
    Orange,
    Lemon,
    Lime,
}

impl FruitKind {
    pub const ALL: [FruitKind; 3] = [FruitKind::Orange, FruitKind::Lemon, FruitKind::Lime];

    /// Neon body colour
    pub fn color(&self) -> &'static str {
        match self {
            FruitKind::Orange => "#FF6D00",
            FruitKind::Lemon => "#FFEA00",
            FruitKind::Lime => "#76FF03",
        }
    }

    /// Lighter colour for the specular highlight
    pub fn highlight(&self) -> &'static str {
        match self {
            FruitKind::Orange => "#FFAB40",
            FruitKind::Lemon => "#FFFF8D",
            FruitKind::Lime => "#CCFF90",
        }
    }
}

/// Drawing surface size in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// A falling, un-sliced fruit
#[derive(Debug, Clone, Serialize)]
pub struct Fruit {
    pub id: u32,
    pub kind: FruitKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub angular_vel: f32,
}

impl Fruit {
    /// True once the whole fruit has dropped past the bottom edge
    #[inline]
    pub fn is_below(&self, bounds: Bounds) -> bool {
        self.pos.y - self.radius > bounds.height
    }
}

/// One half of a sliced fruit
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Piece {
    /// Offset from the slice origin
    pub offset: Vec2,
    pub vel: Vec2,
    /// Display rotation
    pub rotation: f32,
}

/// A fruit that has been cut in two
#[derive(Debug, Clone, Serialize)]
pub struct SlicedFruit {
    /// Id of the fruit that was sliced
    pub id: u32,
    pub kind: FruitKind,
    pub origin: Vec2,
    pub radius: f32,
    /// Direction of the cut (pointer relative to fruit centre)
    pub slice_angle: f32,
    /// Remaining lifetime; never increases, never below zero
    pub timer: f32,
    pub pieces: [Piece; 2],
}

impl SlicedFruit {
    #[inline]
    pub fn piece_pos(&self, piece: &Piece) -> Vec2 {
        self.origin + piece.offset
    }

    /// Both halves have fallen more than a radius below the bottom edge
    pub fn all_pieces_below(&self, bounds: Bounds) -> bool {
        self.pieces
            .iter()
            .all(|p| self.piece_pos(p).y > bounds.height + self.radius)
    }
}

/// "+N" text that drifts up from a slice
#[derive(Debug, Clone, Serialize)]
pub struct FloatingScore {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub timer: f32,
    pub color: &'static str,
}

/// Pointer event in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pos: Vec2,
    pub kind: PointerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse move or touch move
    Move,
    /// Mouse down or touch start
    Press,
}

/// Result of a successful slice
#[derive(Debug, Clone, PartialEq)]
pub struct SliceEvent {
    pub fruit_id: u32,
    pub kind: FruitKind,
    pub points: u32,
    pub slice_angle: f32,
}

/// Monotonic entity id source, reset per session
#[derive(Debug, Clone, Default)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Read-only snapshot handed to the renderer once per frame
#[derive(Debug, Serialize)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub level: Option<u8>,
    pub score: u64,
    pub misses: u32,
    pub bounds: Bounds,
    pub pointer: Option<Vec2>,
    pub fruits: &'a [Fruit],
    pub sliced: &'a [SlicedFruit],
    pub floating_scores: &'a [FloatingScore],
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Selected level (set on entering Playing)
    pub level: Option<LevelSettings>,
    pub settings: Settings,
    pub score: u64,
    /// Fruit that fell off the bottom un-sliced
    pub misses: u32,
    /// Live fruit, in spawn order
    pub fruits: Vec<Fruit>,
    pub sliced: Vec<SlicedFruit>,
    pub floating_scores: Vec<FloatingScore>,
    pub spawn_clock: SpawnClock,
    pub ids: EntityIds,
    pub bounds: Bounds,
    /// Last known pointer position
    pub pointer: Option<Vec2>,
    /// Frames simulated in the current session
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, settings: Settings, bounds: Bounds) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            level: None,
            settings,
            score: 0,
            misses: 0,
            fruits: Vec::new(),
            sliced: Vec::new(),
            floating_scores: Vec::new(),
            spawn_clock: SpawnClock::default(),
            ids: EntityIds::default(),
            bounds,
            pointer: None,
            time_ticks: 0,
        }
    }

    /// Level settings for the running session
    pub fn level_settings(&self) -> Option<&LevelSettings> {
        self.level.as_ref()
    }

    /// Title -> LevelSelect
    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Title => {
                self.phase = GamePhase::LevelSelect;
                log::info!("Level select");
                Ok(())
            }
            from => Err(TransitionError::Invalid {
                from,
                action: "start",
            }),
        }
    }

    /// Title/LevelSelect -> Playing with a fresh session
    pub fn select_level(&mut self, level: u8, table: &LevelTable) -> Result<(), GameError> {
        if !matches!(self.phase, GamePhase::Title | GamePhase::LevelSelect) {
            return Err(TransitionError::Invalid {
                from: self.phase,
                action: "select a level",
            }
            .into());
        }
        let settings = table.get(level)?.clone();

        self.teardown();
        self.score = 0;
        self.misses = 0;
        self.level = Some(settings);
        self.phase = GamePhase::Playing;
        log::info!("Level {} started (seed {})", level, self.seed);
        Ok(())
    }

    /// Back to the title screen from anywhere but the title itself
    pub fn back(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            GamePhase::Title => Err(TransitionError::Invalid {
                from: GamePhase::Title,
                action: "go back",
            }),
            from => {
                if from == GamePhase::Playing {
                    log::info!("Run abandoned with score {}", self.score);
                }
                self.teardown();
                self.score = 0;
                self.misses = 0;
                self.phase = GamePhase::Title;
                Ok(())
            }
        }
    }

    /// Record missed fruit; ends the run at the miss limit
    pub(crate) fn record_misses(&mut self, count: u32) {
        if count == 0 || self.phase != GamePhase::Playing {
            return;
        }
        self.misses = (self.misses + count).min(MISS_LIMIT);
        log::debug!("Missed {} fruit ({}/{})", count, self.misses, MISS_LIMIT);
        if self.misses >= MISS_LIMIT {
            self.teardown();
            self.phase = GamePhase::GameOver;
            log::info!("Game over with score {}", self.score);
        }
    }

    /// Drop every live entity and stop the spawner
    fn teardown(&mut self) {
        self.fruits.clear();
        self.sliced.clear();
        self.floating_scores.clear();
        self.spawn_clock.reset();
        self.ids.reset();
        self.time_ticks = 0;
    }

    /// Canvas was resized; keep live fruit inside the new width
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        let w = self.bounds.width;
        for fruit in &mut self.fruits {
            let max_x = (w - fruit.radius).max(fruit.radius);
            fruit.pos.x = fruit.pos.x.clamp(fruit.radius.min(max_x), max_x);
        }
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            phase: self.phase,
            level: self.level.as_ref().map(|l| l.level),
            score: self.score,
            misses: self.misses,
            bounds: self.bounds,
            pointer: self.pointer,
            fruits: &self.fruits,
            sliced: &self.sliced,
            floating_scores: &self.floating_scores,
        }
    }
}
