//! Game tuning
//!
//! Every gameplay constant lives here so a host can override balance from
//! JSON without rebuilding. Missing fields fall back to [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    pub ball_radius: f32,
    /// Constant ball speed (pixels per tick)
    pub ball_speed: f32,
    pub ball_initial_vel: (f32, f32),
    pub ball_spawn_offset_y: f32,
    /// Fixed capacity of the ball store
    pub max_balls: usize,

    // === Paddle ===
    pub paddle_height: f32,
    pub paddle_default_width: f32,
    pub paddle_max_width: f32,
    pub paddle_width_increase: f32,
    /// Seconds before a widened paddle reverts
    pub paddle_boost_duration: f32,
    pub paddle_bottom_offset: f32,
    pub paddle_impact_multiplier: f32,
    pub paddle_curve_exponent: f32,
    pub paddle_min_vertical_fraction: f32,

    // === Bricks ===
    pub brick_target_size: f32,
    pub brick_padding: f32,
    pub brick_offset_left: f32,
    pub brick_offset_top: f32,
    pub brick_height_coverage: f32,
    pub procedural_height_coverage: f32,
    pub points_per_brick: u32,
    pub brick_bounce_jitter: f32,

    // === Power-ups ===
    pub powerup_drop_chance: f64,
    pub powerup_multi_chance: f64,
    pub powerup_fall_speed: f32,
    pub powerup_radius: f32,
    pub multi_soft_cap: usize,
    pub multi_limit: usize,
    pub multi_velocity_variation: f32,

    // === Host ===
    pub sound_throttle: f64,
    pub resize_debounce: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            ball_initial_vel: BALL_INITIAL_VEL,
            ball_spawn_offset_y: BALL_SPAWN_OFFSET_Y,
            max_balls: MAX_BALLS,

            paddle_height: PADDLE_HEIGHT,
            paddle_default_width: PADDLE_DEFAULT_WIDTH,
            paddle_max_width: PADDLE_MAX_WIDTH,
            paddle_width_increase: PADDLE_WIDTH_INCREASE,
            paddle_boost_duration: PADDLE_BOOST_DURATION,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_impact_multiplier: PADDLE_IMPACT_MULTIPLIER,
            paddle_curve_exponent: PADDLE_CURVE_EXPONENT,
            paddle_min_vertical_fraction: PADDLE_MIN_VERTICAL_FRACTION,

            brick_target_size: BRICK_TARGET_SIZE,
            brick_padding: BRICK_PADDING,
            brick_offset_left: BRICK_OFFSET_LEFT,
            brick_offset_top: BRICK_OFFSET_TOP,
            brick_height_coverage: BRICK_HEIGHT_COVERAGE,
            procedural_height_coverage: PROCEDURAL_HEIGHT_COVERAGE,
            points_per_brick: POINTS_PER_BRICK,
            brick_bounce_jitter: BRICK_BOUNCE_JITTER,

            powerup_drop_chance: POWERUP_DROP_CHANCE,
            powerup_multi_chance: POWERUP_MULTI_CHANCE,
            powerup_fall_speed: POWERUP_FALL_SPEED,
            powerup_radius: POWERUP_RADIUS,
            multi_soft_cap: MULTI_SOFT_CAP,
            multi_limit: MULTI_LIMIT,
            multi_velocity_variation: MULTI_VELOCITY_VARIATION,

            sound_throttle: SOUND_THROTTLE,
            resize_debounce: RESIZE_DEBOUNCE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the values the physics relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("paddle_height", self.paddle_height),
            ("paddle_default_width", self.paddle_default_width),
            ("brick_target_size", self.brick_target_size),
            ("powerup_fall_speed", self.powerup_fall_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let margins = [
            ("brick_padding", self.brick_padding),
            ("brick_offset_left", self.brick_offset_left),
            ("brick_offset_top", self.brick_offset_top),
        ];
        for (field, value) in margins {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                });
            }
        }

        if self.paddle_default_width > self.paddle_max_width {
            return Err(ConfigError::PaddleWidthBounds {
                default_width: self.paddle_default_width,
                max_width: self.paddle_max_width,
            });
        }
        if self.max_balls == 0 {
            return Err(ConfigError::ZeroBallCapacity);
        }

        let fraction = self.paddle_min_vertical_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "paddle_min_vertical_fraction",
                value: fraction as f64,
            });
        }
        if !(self.paddle_curve_exponent >= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "paddle_curve_exponent",
                value: self.paddle_curve_exponent as f64,
            });
        }

        let probabilities = [
            ("powerup_drop_chance", self.powerup_drop_chance),
            ("powerup_multi_chance", self.powerup_multi_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let coverages = [
            ("brick_height_coverage", self.brick_height_coverage),
            ("procedural_height_coverage", self.procedural_height_coverage),
        ];
        for (field, value) in coverages {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f64,
                });
            }
        }

        Ok(())
    }

    /// Minimum vertical speed after a paddle bounce
    pub fn min_vertical_speed(&self) -> f32 {
        self.ball_speed * self.paddle_min_vertical_fraction
    }
}
