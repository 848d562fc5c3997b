// Kanaboard Meta-State Tracking
// Builds raw key events, with their modifier bitmask, from scan-code transitions

use log::trace;

use crate::action::KeyAction;
use crate::event::RawKeyEvent;
use crate::key::{key_code_for_scan_code, scan};
use crate::modifier::MetaState;
use crate::ScanCode;

/// Side-specific meta bit for a modifier key position
fn side_bit(code: ScanCode) -> Option<MetaState> {
    match code {
        scan::LEFT_SHIFT => Some(MetaState::SHIFT_LEFT_ON),
        scan::RIGHT_SHIFT => Some(MetaState::SHIFT_RIGHT_ON),
        scan::LEFT_ALT => Some(MetaState::ALT_LEFT_ON),
        scan::RIGHT_ALT => Some(MetaState::ALT_RIGHT_ON),
        scan::LEFT_CTRL => Some(MetaState::CTRL_LEFT_ON),
        scan::RIGHT_CTRL => Some(MetaState::CTRL_RIGHT_ON),
        _ => None,
    }
}

/// Tracks held modifier keys the way the platform does for an attached
/// keyboard, so every event carries the meta state in effect after it.
/// Auto-repeats are numbered per key, restarting on each press.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaTracker {
    held: u32,
    repeating: Option<(ScanCode, u32)>,
}

impl MetaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current meta state, generic `*_ON` bits included
    pub fn meta_state(&self) -> MetaState {
        let held = MetaState(self.held);
        let mut bits = self.held;
        if held.has_shift() {
            bits |= MetaState::SHIFT_ON.bits();
        }
        if held.has_alt() {
            bits |= MetaState::ALT_ON.bits();
        }
        if held.has_ctrl() {
            bits |= MetaState::CTRL_ON.bits();
        }
        MetaState(bits)
    }

    /// Record a key transition and build the event for it.
    ///
    /// `value` is the evdev key value: 0 release, 1 press, 2 auto-repeat.
    /// Other values yield `None`.
    pub fn observe(&mut self, code: ScanCode, value: i32) -> Option<RawKeyEvent> {
        let action = KeyAction::from_evdev_value(value)?;
        if let Some(bit) = side_bit(code) {
            match action {
                KeyAction::Down | KeyAction::Repeat => self.held |= bit.bits(),
                KeyAction::Up => self.held &= !bit.bits(),
            }
        }
        let event = RawKeyEvent::new(key_code_for_scan_code(code), code, self.meta_state());
        let event = match action {
            KeyAction::Down => {
                self.repeating = Some((code, 0));
                event
            }
            KeyAction::Repeat => {
                let count = match self.repeating {
                    Some((held, count)) if held == code => count + 1,
                    _ => 1,
                };
                self.repeating = Some((code, count));
                event.repeated(count)
            }
            KeyAction::Up => {
                if matches!(self.repeating, Some((held, _)) if held == code) {
                    self.repeating = None;
                }
                event.with_action(KeyAction::Up)
            }
        };
        trace!("Observed {}", event);
        Some(event)
    }

    /// Forget every held modifier
    pub fn clear(&mut self) {
        self.held = 0;
        self.repeating = None;
    }
}
