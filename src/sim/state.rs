//! Game state and core simulation types
//!
//! Everything one session mutates lives in [`GameState`]; the tick loop is
//! its only writer while a session is playing.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balls::Balls;
use super::grid::{BrickGrid, GridLayout};
use super::paddle::Paddle;
use super::powerup::{PowerUpKind, PowerUps};
use crate::settings::Tuning;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, level selectable
    Start,
    /// Simulation running
    Playing,
    /// Every ball was lost
    GameOver,
    /// Every destructible brick was cleared
    Won,
}

impl GamePhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Discrete events for audio/visual collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallHit,
    PaddleHit,
    /// Ball bounced off an indestructible cell
    BrickHit { column: usize, row: usize },
    BrickDestroyed {
        column: usize,
        row: usize,
        points: u32,
    },
    PowerUpSpawned { kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    BallLost,
    Won,
    GameOver,
}

/// Play field bounds (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub field: Field,
    pub phase: GamePhase,
    pub level: u32,
    /// Points this session (monotonic while playing)
    pub points: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub grid: BrickGrid,
    pub paddle: Paddle,
    pub balls: Balls,
    pub power_ups: PowerUps,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Fresh state in `Start` with an empty grid of the given layout
    pub fn new(tuning: Tuning, field: Field, grid: BrickGrid, seed: u64) -> Self {
        let paddle = Paddle::new(&tuning, field.width);
        let balls = Balls::new(tuning.max_balls, tuning.ball_radius);
        Self {
            tuning,
            field,
            phase: GamePhase::Start,
            level: 0,
            points: 0,
            time_ticks: 0,
            grid,
            paddle,
            balls,
            power_ups: PowerUps::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Grid layout used for this session
    pub fn layout(&self) -> &GridLayout {
        self.grid.layout()
    }

    /// Reset per-session state and enter `Playing`
    ///
    /// The grid must already hold the level layout.
    pub fn begin(&mut self, level: u32) {
        self.level = level;
        self.points = 0;
        self.time_ticks = 0;
        self.power_ups.clear();
        self.paddle.set_field_width(self.field.width);
        self.paddle.reset();
        self.paddle.set_position(self.field.width / 2.0);
        self.balls.clear();
        self.spawn_ball();
        self.phase = GamePhase::Playing;
    }

    /// Seed the opening ball above the paddle center
    pub fn spawn_ball(&mut self) {
        let pos = Vec2::new(
            self.field.width / 2.0,
            self.field.height - self.tuning.ball_spawn_offset_y,
        );
        let (dx, dy) = self.tuning.ball_initial_vel;
        self.balls.push(pos, Vec2::new(dx, dy));
    }
}
