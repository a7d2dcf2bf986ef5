//! Collision detection and response for axis-aligned geometry
//!
//! Balls are tested by their bounding box against bricks and the paddle.
//! Every response ends by renormalizing to the constant ball speed.

use glam::Vec2;

use super::paddle::PaddleRect;

/// Which velocity component a contact flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Result of resolving a ball against a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxContact {
    /// Ball center pushed out to the box boundary
    pub pos: Vec2,
    pub vel: Vec2,
    pub axis: Axis,
}

/// Ball bounding box overlaps the box at `origin` with `size`
#[inline]
pub fn ball_box_overlap(pos: Vec2, radius: f32, origin: Vec2, size: Vec2) -> bool {
    pos.x + radius > origin.x
        && pos.x - radius < origin.x + size.x
        && pos.y + radius > origin.y
        && pos.y - radius < origin.y + size.y
}

/// Bounce a ball off a box along its shallowest penetration axis
///
/// The flipped component is pointed away from the box center and the ball
/// is moved to touch the box edge, so the same box cannot re-trigger next tick.
pub fn resolve_box_contact(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    origin: Vec2,
    size: Vec2,
) -> BoxContact {
    let half = size * 0.5;
    let center = origin + half;
    let delta = pos - center;
    let overlap_x = (half.x + radius) - delta.x.abs();
    let overlap_y = (half.y + radius) - delta.y.abs();

    let away = |d: f32| if d > 0.0 { 1.0 } else { -1.0 };

    if overlap_x < overlap_y {
        let side = away(delta.x);
        BoxContact {
            pos: Vec2::new(center.x + side * (half.x + radius), pos.y),
            vel: Vec2::new(side * vel.x.abs(), vel.y),
            axis: Axis::Horizontal,
        }
    } else {
        let side = away(delta.y);
        BoxContact {
            pos: Vec2::new(pos.x, center.y + side * (half.y + radius)),
            vel: Vec2::new(vel.x, side * vel.y.abs()),
            axis: Axis::Vertical,
        }
    }
}

/// Rescale a velocity to `speed`, sending degenerate vectors straight up
#[inline]
pub fn with_speed(vel: Vec2, speed: f32) -> Vec2 {
    let dir = vel.normalize_or_zero();
    if dir == Vec2::ZERO {
        Vec2::new(0.0, -speed)
    } else {
        dir * speed
    }
}

/// Outgoing velocity for a ball striking the paddle
///
/// The hit offset from the paddle center (-1 at the left edge, +1 at the
/// right) is raised to `exponent` so shots near the center stay steep.
/// The result always points up, has length `speed` and a vertical
/// component of at least `min_vertical`.
pub fn paddle_deflection(
    ball_x: f32,
    incoming: Vec2,
    rect: &PaddleRect,
    speed: f32,
    impact: f32,
    exponent: f32,
    min_vertical: f32,
) -> Vec2 {
    let half = rect.width / 2.0;
    let offset = ((ball_x - rect.center_x()) / half).clamp(-1.0, 1.0);
    let dx = offset.abs().powf(exponent) * offset.signum() * impact;
    let mut vel = with_speed(Vec2::new(dx, -incoming.y.abs()), speed);

    if vel.y.abs() < min_vertical {
        let vy = -min_vertical;
        let vx = vel.x.signum() * (speed * speed - vy * vy).max(0.0).sqrt();
        vel = Vec2::new(vx, vy);
    }
    vel
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
