//! Paddle position and width
//!
//! Pure position/width store: collision against the paddle is resolved by
//! the physics step, which only reads [`Paddle::rect`].

use serde::{Deserialize, Serialize};

use crate::settings::Tuning;

/// Pending revert of a width boost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthBoost {
    /// Seconds until the paddle reverts to its default width
    pub remaining: f32,
}

/// Axis-aligned paddle rectangle in field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PaddleRect {
    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    width: f32,
    default_width: f32,
    max_width: f32,
    height: f32,
    bottom_offset: f32,
    /// Field width the position is clamped against
    field_width: f32,
    boost: Option<WidthBoost>,
}

impl Paddle {
    /// Paddle centered in a field of the given width
    pub fn new(tuning: &Tuning, field_width: f32) -> Self {
        let width = tuning.paddle_default_width;
        let mut paddle = Self {
            x: 0.0,
            width,
            default_width: width,
            max_width: tuning.paddle_max_width,
            height: tuning.paddle_height,
            bottom_offset: tuning.paddle_bottom_offset,
            field_width,
            boost: None,
        };
        paddle.set_position(field_width / 2.0);
        paddle
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn default_width(&self) -> f32 {
        self.default_width
    }

    #[inline]
    pub fn boost(&self) -> Option<WidthBoost> {
        self.boost
    }

    /// Center the paddle on a pointer sample, keeping it inside the field
    pub fn set_position(&mut self, pointer_x: f32) {
        if !pointer_x.is_finite() {
            return;
        }
        self.x = pointer_x - self.width / 2.0;
        self.clamp_to_field();
    }

    /// New field bounds after a resize; position is only re-clamped
    pub fn set_field_width(&mut self, field_width: f32) {
        self.field_width = field_width;
        self.clamp_to_field();
    }

    fn clamp_to_field(&mut self) {
        let max_x = (self.field_width - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }

    /// Widen the paddle and restart the revert timer
    ///
    /// The timer is replaced, never extended: the paddle reverts `duration`
    /// seconds after the most recent pickup.
    pub fn grant_width_boost(&mut self, amount: f32, duration: f32) {
        let center = self.x + self.width / 2.0;
        self.width = (self.width + amount).clamp(self.default_width, self.max_width);
        self.boost = Some(WidthBoost {
            remaining: duration,
        });
        self.x = center - self.width / 2.0;
        self.clamp_to_field();
    }

    /// Count down the boost timer. Returns true when the paddle reverted.
    pub fn advance_timer(&mut self, dt: f32) -> bool {
        let Some(boost) = self.boost.as_mut() else {
            return false;
        };
        boost.remaining -= dt;
        if boost.remaining > 0.0 {
            return false;
        }
        log::debug!("Paddle width boost expired");
        self.reset();
        true
    }

    /// Cancel any pending boost and restore the default width
    pub fn reset(&mut self) {
        self.boost = None;
        self.width = self.default_width;
        self.clamp_to_field();
    }

    /// Rectangle for a field of the given height
    pub fn rect(&self, field_height: f32) -> PaddleRect {
        PaddleRect {
            left: self.x,
            top: field_height - self.height - self.bottom_offset,
            width: self.width,
            height: self.height,
        }
    }
}
