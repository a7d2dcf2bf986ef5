//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Frame scheduling (display refresh on web, a plain loop natively)
//! - Resize debouncing
//!
//! The session only talks to the host through these types, so the same
//! code runs in a browser shell, a native window or a test.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::Field;

/// Token for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host display-refresh hook
///
/// A requested frame fires at most once. Cancelling a handle that already
/// fired or was cancelled is a no-op.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct SchedulerLog {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

/// Scheduler for native loops and tests
///
/// Clones share state, so a driver can keep one clone and hand the other to
/// the session.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScheduler {
    log: Rc<RefCell<SchedulerLog>>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame waiting to fire, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.log.borrow().pending
    }

    /// Consume the pending frame so the driver can deliver it
    pub fn take_pending(&self) -> Option<FrameHandle> {
        self.log.borrow_mut().pending.take()
    }

    /// Total frames requested so far
    pub fn requested(&self) -> usize {
        self.log.borrow().requested
    }

    /// Total frames cancelled before firing
    pub fn cancelled(&self) -> usize {
        self.log.borrow().cancelled
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let handle = FrameHandle(log.next_id);
        log.pending = Some(handle);
        log.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut log = self.log.borrow_mut();
        if log.pending == Some(handle) {
            log.pending = None;
            log.cancelled += 1;
        }
    }
}

/// Collapses bursts of resize events into one update
///
/// Only the latest size is kept; it is released once no new size has arrived
/// for the debounce window.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: f64,
    pending: Option<(Field, f64)>,
}

impl ResizeDebouncer {
    /// `window` in seconds
    pub fn new(window: f64) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a resize at time `now` (seconds)
    pub fn push(&mut self, field: Field, now: f64) {
        self.pending = Some((field, now));
    }

    /// Settled size, once the window has passed since the last push
    pub fn poll(&mut self, now: f64) -> Option<Field> {
        match self.pending {
            Some((field, at)) if now - at >= self.window => {
                self.pending = None;
                Some(field)
            }
            _ => None,
        }
    }

    /// Latest size regardless of the window
    pub fn flush(&mut self) -> Option<Field> {
        self.pending.take().map(|(field, _)| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_scheduler_tracks_requests() {
        let scheduler = HeadlessScheduler::new();
        let mut handle_side = scheduler.clone();
        let a = handle_side.request_frame();
        assert_eq!(scheduler.pending(), Some(a));
        handle_side.cancel_frame(a);
        assert_eq!(scheduler.pending(), None);
        // Second cancel is a no-op
        handle_side.cancel_frame(a);
        assert_eq!(scheduler.cancelled(), 1);

        let b = handle_side.request_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.take_pending(), Some(b));
        handle_side.cancel_frame(b);
        assert_eq!(scheduler.cancelled(), 1, "fired frames are not cancelled");
        assert_eq!(scheduler.requested(), 2);
    }

    #[test]
    fn test_resize_debounce_keeps_latest() {
        let mut debouncer = ResizeDebouncer::new(0.1);
        debouncer.push(Field::new(300.0, 500.0), 1.0);
        debouncer.push(Field::new(320.0, 500.0), 1.05);
        assert_eq!(debouncer.poll(1.1), None);
        assert_eq!(debouncer.poll(1.16), Some(Field::new(320.0, 500.0)));
        assert_eq!(debouncer.poll(2.0), None);
    }
}
