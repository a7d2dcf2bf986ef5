//! Ball motion and collision resolution
//!
//! Each live ball is advanced exactly once per tick. Velocities are in
//! pixels per tick and constant between collisions. Collisions are checked
//! against the ball's projected next position in a fixed order: side walls,
//! top wall, paddle, bricks, bottom exit.

use glam::Vec2;
use rand::Rng;

use super::balls::Balls;
use super::collision::{
    ball_box_overlap, paddle_deflection, reflect_velocity, resolve_box_contact, with_speed,
};
use super::grid::{BrickGrid, Cell};
use super::paddle::PaddleRect;
use super::powerup::PowerUps;
use super::state::{Field, GameEvent};
use crate::settings::Tuning;

/// Everything one physics step reads or writes besides the balls
pub struct StepContext<'a, R: Rng> {
    pub field: Field,
    pub paddle: PaddleRect,
    pub grid: &'a mut BrickGrid,
    pub power_ups: &'a mut PowerUps,
    pub tuning: &'a Tuning,
    pub rng: &'a mut R,
}

/// Outcome of one ball's brick check
struct BrickBounce {
    pos: Vec2,
    vel: Vec2,
}

/// Advance every ball once and compact lost balls out of the store
///
/// Returns the points scored this step. Events are appended in ball order.
pub fn step_balls<R: Rng>(
    balls: &mut Balls,
    ctx: &mut StepContext<'_, R>,
    events: &mut Vec<GameEvent>,
) -> u64 {
    let radius = balls.radius();
    let speed = ctx.tuning.ball_speed;
    let field = ctx.field;
    let paddle = ctx.paddle;
    let grid_bottom = ctx.grid.layout().bottom();
    let mut points = 0u64;
    let mut alive = 0;

    for i in 0..balls.len() {
        let mut pos = balls.pos(i);
        let mut vel = balls.vel(i);
        let next = pos + vel;

        // Side walls: pure sign flip
        if next.x > field.width - radius || next.x < radius {
            vel = reflect_velocity(vel, Vec2::X);
            events.push(GameEvent::WallHit);
        }

        // Top wall, otherwise the paddle band; only a ball entering the band
        // from above bounces, one already below it stays lost
        let mut paddle_hit = false;
        if next.y < radius {
            vel = reflect_velocity(vel, Vec2::Y);
            events.push(GameEvent::WallHit);
        } else if next.y > paddle.top - radius
            && pos.y <= paddle.top - radius
            && vel.y > 0.0
            && pos.x + radius >= paddle.left
            && pos.x - radius <= paddle.right()
        {
            vel = paddle_deflection(
                pos.x,
                vel,
                &paddle,
                speed,
                ctx.tuning.paddle_impact_multiplier,
                ctx.tuning.paddle_curve_exponent,
                ctx.tuning.min_vertical_speed(),
            );
            paddle_hit = true;
            events.push(GameEvent::PaddleHit);
        }

        // Bricks, only while the ball is inside the grid's vertical extent
        if pos.y < grid_bottom {
            if let Some(hit) = resolve_bricks(pos, vel, radius, ctx, events, &mut points) {
                pos = hit.pos;
                vel = hit.vel;
            }
        }

        // Bottom exit
        let lost = !paddle_hit && pos.y + vel.y > field.height + radius;
        if lost {
            events.push(GameEvent::BallLost);
            continue;
        }

        pos += vel;
        if !(pos.is_finite() && vel.is_finite()) {
            log::warn!("Dropping ball {} with non-finite state: pos={:?} vel={:?}", i, pos, vel);
            events.push(GameEvent::BallLost);
            continue;
        }

        balls.set(alive, pos, vel);
        alive += 1;
    }

    balls.truncate(alive);
    points
}

/// Resolve the first overlapping occupied cell around the ball
///
/// Candidate cells come from mapping the ball's bounding box onto grid
/// indices, so the cost does not depend on the grid size.
fn resolve_bricks<R: Rng>(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    ctx: &mut StepContext<'_, R>,
    events: &mut Vec<GameEvent>,
    points: &mut u64,
) -> Option<BrickBounce> {
    let layout = *ctx.grid.layout();
    let extent = Vec2::splat(radius);
    let (min_col, max_col, min_row, max_row) = layout.candidate_range(pos - extent, pos + extent)?;
    let size = Vec2::new(layout.cell_width, layout.cell_height);

    for column in min_col..=max_col {
        for row in min_row..=max_row {
            let cell = ctx.grid.get(column, row);
            if !cell.is_occupied() {
                continue;
            }
            let origin = layout.cell_origin(column, row);
            if !ball_box_overlap(pos, radius, origin, size) {
                continue;
            }

            if cell == Cell::Brick {
                ctx.grid.destroy(column, row);
                let award = ctx.tuning.points_per_brick;
                *points += award as u64;
                events.push(GameEvent::BrickDestroyed {
                    column,
                    row,
                    points: award,
                });
                let center = layout.cell_center(column, row);
                if let Some(kind) = ctx.power_ups.maybe_spawn(center, ctx.tuning, ctx.rng) {
                    events.push(GameEvent::PowerUpSpawned { kind, pos: center });
                }
            } else {
                events.push(GameEvent::BrickHit { column, row });
            }

            let contact = resolve_box_contact(pos, vel, radius, origin, size);
            let jitter = ctx.tuning.brick_bounce_jitter;
            let nudge = Vec2::new(
                (ctx.rng.random::<f32>() - 0.5) * jitter,
                (ctx.rng.random::<f32>() - 0.5) * jitter,
            );
            return Some(BrickBounce {
                pos: contact.pos,
                vel: with_speed(contact.vel + nudge, ctx.tuning.ball_speed),
            });
        }
    }
    None
}
