//! Ball store
//!
//! Structure-of-arrays with a fixed capacity. Live balls always occupy
//! slots `0..len`; the physics step compacts lost balls out in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balls {
    xs: Vec<f32>,
    ys: Vec<f32>,
    dxs: Vec<f32>,
    dys: Vec<f32>,
    capacity: usize,
    radius: f32,
}

impl Balls {
    pub fn new(capacity: usize, radius: f32) -> Self {
        // Storage grows on demand up to `capacity`
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
            dxs: Vec::new(),
            dys: Vec::new(),
            capacity,
            radius,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Free slots left
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.len()
    }

    /// Add a ball. Returns false when the store is full.
    pub fn push(&mut self, pos: Vec2, vel: Vec2) -> bool {
        if self.len() >= self.capacity {
            return false;
        }
        self.xs.push(pos.x);
        self.ys.push(pos.y);
        self.dxs.push(vel.x);
        self.dys.push(vel.y);
        true
    }

    #[inline]
    pub fn pos(&self, i: usize) -> Vec2 {
        Vec2::new(self.xs[i], self.ys[i])
    }

    #[inline]
    pub fn vel(&self, i: usize) -> Vec2 {
        Vec2::new(self.dxs[i], self.dys[i])
    }

    /// Overwrite slot `i` (used by compaction, so `i` may trail the read index)
    #[inline]
    pub fn set(&mut self, i: usize, pos: Vec2, vel: Vec2) {
        self.xs[i] = pos.x;
        self.ys[i] = pos.y;
        self.dxs[i] = vel.x;
        self.dys[i] = vel.y;
    }

    /// Drop every ball at or past `len`
    pub fn truncate(&mut self, len: usize) {
        self.xs.truncate(len);
        self.ys.truncate(len);
        self.dxs.truncate(len);
        self.dys.truncate(len);
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        (0..self.len()).map(|i| (self.pos(i), self.vel(i)))
    }
}
