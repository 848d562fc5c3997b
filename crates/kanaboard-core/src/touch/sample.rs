// Kanaboard Touch Samples
// One platform touch report for a single pointer

use std::fmt;

use crate::action::TouchAction;

/// Platform pointer identifier
pub type PointerId = u32;

/// A touch report in the pressed button's local coordinate space.
///
/// `timestamp` is in milliseconds on the host's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub pointer_id: PointerId,
    pub x: f32,
    pub y: f32,
    pub timestamp: u64,
    pub action: TouchAction,
}

impl TouchSample {
    pub fn new(pointer_id: PointerId, x: f32, y: f32, timestamp: u64, action: TouchAction) -> Self {
        Self {
            pointer_id,
            x,
            y,
            timestamp,
            action,
        }
    }

    pub fn down(pointer_id: PointerId, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(pointer_id, x, y, timestamp, TouchAction::Down)
    }

    pub fn moved(pointer_id: PointerId, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(pointer_id, x, y, timestamp, TouchAction::Move)
    }

    pub fn up(pointer_id: PointerId, x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(pointer_id, x, y, timestamp, TouchAction::Up)
    }

    pub fn cancel(pointer_id: PointerId, timestamp: u64) -> Self {
        Self::new(pointer_id, 0.0, 0.0, timestamp, TouchAction::Cancel)
    }
}

impl fmt::Display for TouchSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pointer={} ({:.1}, {:.1}) @{}ms",
            self.action, self.pointer_id, self.x, self.y, self.timestamp
        )
    }
}
