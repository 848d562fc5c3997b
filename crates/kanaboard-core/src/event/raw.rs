// Kanaboard Raw Key Events
// Physical key events as delivered by the platform

use std::fmt;

use crate::action::KeyAction;
use crate::modifier::MetaState;
use crate::{KeyCode, ScanCode};

/// A physical key event: platform key code, scan code and modifier bitmask.
///
/// Either code may be zero when the platform does not report it.
/// `repeat_count` is 0 for the initial press and counts auto-repeats after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawKeyEvent {
    pub key_code: KeyCode,
    pub scan_code: ScanCode,
    pub meta_state: MetaState,
    pub action: KeyAction,
    pub repeat_count: u32,
}

impl RawKeyEvent {
    /// Create a key-down event
    pub fn new(key_code: KeyCode, scan_code: ScanCode, meta_state: MetaState) -> Self {
        Self {
            key_code,
            scan_code,
            meta_state,
            action: KeyAction::Down,
            repeat_count: 0,
        }
    }

    /// Key-down event that only carries a scan code
    pub fn from_scan_code(scan_code: ScanCode, meta_state: MetaState) -> Self {
        Self::new(KeyCode::default(), scan_code, meta_state)
    }

    /// Key-down event that only carries a platform key code
    pub fn from_key_code(key_code: KeyCode, meta_state: MetaState) -> Self {
        Self::new(key_code, ScanCode::default(), meta_state)
    }

    /// Same event with the given action
    pub fn with_action(mut self, action: KeyAction) -> Self {
        self.action = action;
        self
    }

    /// Same event as the `count`th auto-repeat of the key
    pub fn repeated(mut self, count: u32) -> Self {
        self.action = KeyAction::Repeat;
        self.repeat_count = count.max(1);
        self
    }

    pub fn is_down(&self) -> bool {
        self.action.is_down()
    }

    pub fn is_repeat(&self) -> bool {
        self.action.is_repeat()
    }
}

impl fmt::Display for RawKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawKeyEvent(key_code={}, scan_code={:#04x}, meta={:#x}, {}",
            self.key_code,
            self.scan_code.code(),
            self.meta_state.bits(),
            self.action
        )?;
        if self.repeat_count > 0 {
            write!(f, " #{}", self.repeat_count)?;
        }
        write!(f, ")")
    }
}
