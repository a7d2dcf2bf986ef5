//! Falling pickups dropped by destroyed bricks

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::balls::Balls;
use super::collision::with_speed;
use super::paddle::{Paddle, PaddleRect};
use crate::settings::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Two extra balls per source ball
    MultiplyBalls,
    /// Temporarily wider paddle
    WidenPaddle,
}

/// A falling pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// Pending pickups for the current session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    items: Vec<PowerUp>,
}

impl PowerUps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, power_up: PowerUp) {
        self.items.push(power_up);
    }

    /// Roll for a drop at a destroyed brick's center
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        pos: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<PowerUpKind> {
        if !rng.random_bool(tuning.powerup_drop_chance) {
            return None;
        }
        let kind = if rng.random_bool(tuning.powerup_multi_chance) {
            PowerUpKind::MultiplyBalls
        } else {
            PowerUpKind::WidenPaddle
        };
        self.items.push(PowerUp { pos, kind });
        Some(kind)
    }

    /// Move every pickup down one tick and collect those touching the paddle
    ///
    /// Returns the collected kinds in spawn order. Pickups below the field
    /// are dropped without effect.
    pub fn update(
        &mut self,
        paddle: &PaddleRect,
        field_height: f32,
        tuning: &Tuning,
    ) -> Vec<PowerUpKind> {
        let radius = tuning.powerup_radius;
        let mut collected = Vec::new();
        self.items.retain_mut(|p| {
            p.pos.y += tuning.powerup_fall_speed;
            let in_band = p.pos.y + radius > paddle.top && p.pos.y - radius < paddle.bottom();
            let over_paddle = p.pos.x > paddle.left && p.pos.x < paddle.right();
            if in_band && over_paddle {
                collected.push(p.kind);
                return false;
            }
            p.pos.y < field_height
        });
        collected
    }
}

/// Apply a collected pickup
pub fn apply_effect<R: Rng>(
    kind: PowerUpKind,
    balls: &mut Balls,
    paddle: &mut Paddle,
    tuning: &Tuning,
    rng: &mut R,
) {
    match kind {
        PowerUpKind::MultiplyBalls => {
            let added = multiply_balls(balls, tuning, rng);
            log::debug!("Multi-ball: +{} (now {})", added, balls.len());
        }
        PowerUpKind::WidenPaddle => {
            paddle.grant_width_boost(tuning.paddle_width_increase, tuning.paddle_boost_duration);
        }
    }
}

/// Clone up to `multi_limit` balls, two per source ball
///
/// Declines when more than `multi_soft_cap` balls are live. Clones aim up,
/// deviate symmetrically from the source's horizontal velocity and keep its
/// speed. Returns the number of balls added.
pub fn multiply_balls<R: Rng>(balls: &mut Balls, tuning: &Tuning, rng: &mut R) -> usize {
    let count = balls.len();
    if count > tuning.multi_soft_cap {
        return 0;
    }

    let limit = count.min(tuning.multi_limit);
    let mut added = 0;
    for i in 0..limit {
        if balls.remaining_capacity() < 2 {
            break;
        }
        let pos = balls.pos(i);
        let vel = balls.vel(i);
        let speed = vel.length();
        let deviation = (rng.random::<f32>() - 0.5) * tuning.multi_velocity_variation;
        let up = -vel.y.abs();

        for dx in [vel.x + deviation, vel.x - deviation] {
            let clone = with_speed(Vec2::new(dx, up), speed);
            if balls.push(pos, clone) {
                added += 1;
            }
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn paddle_rect() -> PaddleRect {
        PaddleRect {
            left: 100.0,
            top: 587.0,
            width: 140.0,
            height: 8.0,
        }
    }

    #[test]
    fn test_spawn_rolls_are_bounded_by_drop_chance() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut power_ups = PowerUps::new();
        let spawned = (0..10_000)
            .filter(|_| power_ups.maybe_spawn(Vec2::ZERO, &tuning, &mut rng).is_some())
            .count();
        // 5% drop chance, generous bounds
        assert!(spawned > 300 && spawned < 700, "spawned {spawned}");
        assert_eq!(power_ups.len(), spawned);
    }

    #[test]
    fn test_certain_drop() {
        let tuning = Tuning {
            powerup_drop_chance: 1.0,
            powerup_multi_chance: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut power_ups = PowerUps::new();
        let kind = power_ups.maybe_spawn(Vec2::new(50.0, 60.0), &tuning, &mut rng);
        assert_eq!(kind, Some(PowerUpKind::WidenPaddle));
        assert_eq!(power_ups.iter().next().unwrap().pos, Vec2::new(50.0, 60.0));
    }

    #[test]
    fn test_pickup_collected_over_paddle() {
        let tuning = Tuning::default();
        let mut power_ups = PowerUps::new();
        power_ups.push(PowerUp {
            pos: Vec2::new(170.0, 570.0),
            kind: PowerUpKind::MultiplyBalls,
        });
        let mut collected = Vec::new();
        for _ in 0..20 {
            collected.extend(power_ups.update(&paddle_rect(), 600.0, &tuning));
        }
        assert_eq!(collected, vec![PowerUpKind::MultiplyBalls]);
        assert!(power_ups.is_empty());
    }

    #[test]
    fn test_missed_pickup_falls_out() {
        let tuning = Tuning::default();
        let mut power_ups = PowerUps::new();
        power_ups.push(PowerUp {
            pos: Vec2::new(20.0, 570.0),
            kind: PowerUpKind::WidenPaddle,
        });
        let mut collected = Vec::new();
        for _ in 0..20 {
            collected.extend(power_ups.update(&paddle_rect(), 600.0, &tuning));
        }
        assert!(collected.is_empty());
        assert!(power_ups.is_empty());
    }

    #[test]
    fn test_multiply_one_ball_makes_three() {
        let tuning = Tuning {
            max_balls: 50,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let mut balls = Balls::new(tuning.max_balls, BALL_RADIUS);
        balls.push(Vec2::new(200.0, 300.0), Vec2::new(3.0, 4.0));

        assert_eq!(multiply_balls(&mut balls, &tuning, &mut rng), 2);
        assert_eq!(balls.len(), 3);
        for (_, vel) in balls.iter() {
            assert!((vel.length() - BALL_SPEED).abs() < 1e-4);
        }
        // Clones head up and mirror around the source's dx
        let (a, b) = (balls.vel(1), balls.vel(2));
        assert!(a.y < 0.0 && b.y < 0.0);
    }

    #[test]
    fn test_multiply_respects_capacity_and_soft_cap() {
        let tuning = Tuning {
            max_balls: 4,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let mut balls = Balls::new(tuning.max_balls, BALL_RADIUS);
        balls.push(Vec2::ZERO, Vec2::new(0.0, 5.0));
        balls.push(Vec2::ZERO, Vec2::new(0.0, 5.0));
        // Room for one pair only
        assert_eq!(multiply_balls(&mut balls, &tuning, &mut rng), 2);
        assert_eq!(balls.len(), 4);

        let capped = Tuning {
            multi_soft_cap: 1,
            ..Default::default()
        };
        let mut balls = Balls::new(100, BALL_RADIUS);
        balls.push(Vec2::ZERO, Vec2::new(0.0, 5.0));
        balls.push(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert_eq!(multiply_balls(&mut balls, &capped, &mut rng), 0);
        assert_eq!(balls.len(), 2);
    }

    #[test]
    fn test_widen_effect_boosts_paddle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut balls = Balls::new(10, BALL_RADIUS);
        let mut paddle = Paddle::new(&tuning, 800.0);
        apply_effect(PowerUpKind::WidenPaddle, &mut balls, &mut paddle, &tuning, &mut rng);
        assert_eq!(paddle.width(), PADDLE_DEFAULT_WIDTH + PADDLE_WIDTH_INCREASE);
        assert!(paddle.boost().is_some());
    }
}
