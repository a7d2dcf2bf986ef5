//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand_pcg::Pcg32;

use super::physics::{StepContext, step_balls};
use super::powerup::apply_effect;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer/touch x sample in field coordinates
    pub pointer_x: Option<f32>,
    /// Demo mode: the paddle follows the most urgent ball
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
///
/// Order: input, paddle timer, power-ups, balls, terminal check. Does
/// nothing outside `Playing`. `dt` is in seconds and only drives timers;
/// ball and pickup velocities are per tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    // Input
    let target = if input.autopilot {
        autopilot_target(state)
    } else {
        input.pointer_x
    };
    if let Some(x) = target {
        state.paddle.set_position(x);
    }
    state.paddle.advance_timer(dt);

    // Power-ups
    let paddle_rect = state.paddle.rect(state.field.height);
    let collected = state
        .power_ups
        .update(&paddle_rect, state.field.height, &state.tuning);
    for kind in collected {
        apply_effect(
            kind,
            &mut state.balls,
            &mut state.paddle,
            &state.tuning,
            &mut state.rng,
        );
        events.push(GameEvent::PowerUpCollected { kind });
    }

    // Balls
    let mut ctx: StepContext<'_, Pcg32> = StepContext {
        field: state.field,
        paddle: state.paddle.rect(state.field.height),
        grid: &mut state.grid,
        power_ups: &mut state.power_ups,
        tuning: &state.tuning,
        rng: &mut state.rng,
    };
    state.points += step_balls(&mut state.balls, &mut ctx, &mut events);

    // Terminal check: a cleared grid wins even if the last ball was lost this tick
    if state.grid.remaining() == 0 {
        state.phase = GamePhase::Won;
        events.push(GameEvent::Won);
        log::info!(
            "Level {} cleared after {} ticks ({} points)",
            state.level,
            state.time_ticks,
            state.points
        );
    } else if state.balls.is_empty() {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
        log::info!(
            "Level {} lost after {} ticks ({} points, {} bricks left)",
            state.level,
            state.time_ticks,
            state.points,
            state.grid.remaining()
        );
    }

    events
}

/// Pure variant of [`tick`]: returns the next state instead of mutating
pub fn step(state: &GameState, dt: f32, input: &TickInput) -> (GameState, Vec<GameEvent>) {
    let mut next = state.clone();
    let events = tick(&mut next, input, dt);
    (next, events)
}

/// Where the demo paddle should be: under the lowest descending ball
///
/// An oscillating offset keeps the ball off the paddle center so rallies
/// don't settle into a vertical loop.
fn autopilot_target(state: &GameState) -> Option<f32> {
    let ball_x = state
        .balls
        .iter()
        .filter(|(_, vel)| vel.y > 0.0)
        .max_by(|(a, _), (b, _)| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
        .or_else(|| state.balls.iter().next())
        .map(|(pos, _)| pos.x)?;

    let time_factor = state.time_ticks as f32 * 0.01;
    let offset = (time_factor.sin() * 0.4) + (time_factor * 0.7).sin() * 0.2;
    Some(ball_x + offset * state.paddle.width() / 2.0)
}
