//! Brick Breaker - grid brick breaker physics engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balls, paddle, bricks, power-ups)
//! - `session`: Session lifecycle and collaborator wiring
//! - `platform`: Frame scheduling and resize debouncing
//! - `persistence`: Storage backends for level progress
//! - `settings`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, FetchError, GridError, ProgressError, SessionError};
pub use progress::UnlockedLevels;
pub use session::{Collaborators, GridSource, Session, SessionObserver};
pub use settings::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of selectable levels, the last one is procedural
    pub const LEVEL_COUNT: u32 = 16;
    /// Level whose layout comes from the map service
    pub const PROCEDURAL_LEVEL: u32 = 15;

    /// Ball defaults (velocities are pixels per tick)
    pub const BALL_RADIUS: f32 = 3.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_INITIAL_VEL: (f32, f32) = (0.0, -5.0);
    /// Spawn height above the bottom edge
    pub const BALL_SPAWN_OFFSET_Y: f32 = 30.0;
    pub const MAX_BALLS: usize = 60_000;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 8.0;
    pub const PADDLE_DEFAULT_WIDTH: f32 = 140.0;
    pub const PADDLE_MAX_WIDTH: f32 = 450.0;
    pub const PADDLE_WIDTH_INCREASE: f32 = 60.0;
    /// Width boost duration in seconds
    pub const PADDLE_BOOST_DURATION: f32 = 8.0;
    pub const PADDLE_BOTTOM_OFFSET: f32 = 5.0;
    /// Horizontal velocity at the very edge of the paddle, before renormalizing
    pub const PADDLE_IMPACT_MULTIPLIER: f32 = 6.0;
    pub const PADDLE_CURVE_EXPONENT: f32 = 1.5;
    /// Minimum |dy| after a paddle bounce, as a fraction of ball speed
    pub const PADDLE_MIN_VERTICAL_FRACTION: f32 = 0.4;

    /// Brick grid defaults
    pub const BRICK_TARGET_SIZE: f32 = 5.0;
    pub const BRICK_PADDING: f32 = 2.0;
    pub const BRICK_OFFSET_LEFT: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 50.0;
    pub const BRICK_HEIGHT_COVERAGE: f32 = 0.5;
    pub const PROCEDURAL_HEIGHT_COVERAGE: f32 = 0.35;
    pub const POINTS_PER_BRICK: u32 = 10;
    /// Random nudge added to both velocity components on a brick bounce
    pub const BRICK_BOUNCE_JITTER: f32 = 0.05;

    /// Power-up defaults
    pub const POWERUP_DROP_CHANCE: f64 = 0.05;
    pub const POWERUP_MULTI_CHANCE: f64 = 0.7;
    pub const POWERUP_FALL_SPEED: f32 = 3.0;
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const MULTI_SOFT_CAP: usize = 5_000;
    pub const MULTI_LIMIT: usize = 2_000;
    pub const MULTI_VELOCITY_VARIATION: f32 = 3.0;

    /// Minimum gap between two plays of the same sound (seconds)
    pub const SOUND_THROTTLE: f64 = 0.030;
    /// Quiet period before a resize is applied (seconds)
    pub const RESIZE_DEBOUNCE: f64 = 0.100;
}
