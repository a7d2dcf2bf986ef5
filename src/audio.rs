//! Sound cues for game events
//!
//! The engine never plays audio itself. This module turns [`GameEvent`]s into
//! throttled, volume-scaled cues that a host audio backend can play.

use std::collections::HashMap;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits wall, paddle or an unbreakable cell
    Hit,
    /// Brick destroyed
    Break,
    /// Pickup collected
    PowerUp,
    /// Last ball lost
    GameOver,
    /// Grid cleared
    Win,
}

impl SoundEffect {
    /// Effect for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallHit | GameEvent::PaddleHit | GameEvent::BrickHit { .. } => {
                Some(SoundEffect::Hit)
            }
            GameEvent::BrickDestroyed { .. } => Some(SoundEffect::Break),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::Won => Some(SoundEffect::Win),
            GameEvent::PowerUpSpawned { .. } | GameEvent::BallLost => None,
        }
    }

    /// Terminal sounds always play
    pub fn is_terminal(self) -> bool {
        matches!(self, SoundEffect::GameOver | SoundEffect::Win)
    }
}

/// Per-effect rate limit
///
/// Each effect kind has its own window, so a burst of hits never silences
/// a brick break.
#[derive(Debug, Clone)]
pub struct SoundThrottle {
    window: f64,
    last_played: HashMap<SoundEffect, f64>,
}

impl SoundThrottle {
    /// `window` in seconds
    pub fn new(window: f64) -> Self {
        Self {
            window,
            last_played: HashMap::new(),
        }
    }

    /// Record and allow the effect unless it played within the window
    pub fn allow(&mut self, effect: SoundEffect, now: f64) -> bool {
        if effect.is_terminal() {
            return true;
        }
        if let Some(&last) = self.last_played.get(&effect) {
            if now - last < self.window {
                return false;
            }
        }
        self.last_played.insert(effect, now);
        true
    }
}

/// A sound the host should play now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    /// 0.0 - 1.0
    pub volume: f32,
}

/// Audio mixer state for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    throttle: SoundThrottle,
}

impl AudioManager {
    pub fn new(throttle_window: f64) -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            throttle: SoundThrottle::new(throttle_window),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cue for an event at time `now` (seconds), after mute and throttling
    pub fn cue(&mut self, event: &GameEvent, now: f64) -> Option<Cue> {
        let effect = SoundEffect::for_event(event)?;
        let volume = self.effective_volume();
        if volume <= 0.0 || !self.throttle.allow(effect, now) {
            return None;
        }
        Some(Cue { effect, volume })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SOUND_THROTTLE;

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::PaddleHit), Some(SoundEffect::Hit));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BrickDestroyed {
                column: 0,
                row: 0,
                points: 10
            }),
            Some(SoundEffect::Break)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Won), Some(SoundEffect::Win));
        assert_eq!(SoundEffect::for_event(&GameEvent::BallLost), None);
    }

    #[test]
    fn test_throttle_is_per_effect() {
        let mut throttle = SoundThrottle::new(SOUND_THROTTLE);
        assert!(throttle.allow(SoundEffect::Hit, 1.0));
        assert!(!throttle.allow(SoundEffect::Hit, 1.01));
        // A different kind inside the same window still plays
        assert!(throttle.allow(SoundEffect::Break, 1.01));
        assert!(throttle.allow(SoundEffect::Hit, 1.04));
    }

    #[test]
    fn test_terminal_sounds_bypass_throttle() {
        let mut throttle = SoundThrottle::new(SOUND_THROTTLE);
        assert!(throttle.allow(SoundEffect::Win, 1.0));
        assert!(throttle.allow(SoundEffect::Win, 1.0));
    }

    #[test]
    fn test_volumes_multiply_and_clamp() {
        let mut audio = AudioManager::new(SOUND_THROTTLE);
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        let cue = audio.cue(&GameEvent::Won, 0.0).unwrap();
        assert!((cue.volume - 0.25).abs() < 1e-6);

        audio.set_master_volume(3.0);
        audio.set_sfx_volume(1.0);
        let cue = audio.cue(&GameEvent::Won, 0.0).unwrap();
        assert!((cue.volume - 1.0).abs() < 1e-6);

        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.cue(&GameEvent::Won, 0.0), None);
    }

    #[test]
    fn test_muted_manager_emits_nothing() {
        let mut audio = AudioManager::new(SOUND_THROTTLE);
        audio.set_muted(true);
        assert_eq!(audio.cue(&GameEvent::WallHit, 0.0), None);
        audio.set_muted(false);
        let cue = audio.cue(&GameEvent::WallHit, 0.0).unwrap();
        assert_eq!(cue.effect, SoundEffect::Hit);
        assert!((cue.volume - 0.8).abs() < 1e-6);
    }
}
