// Kanaboard Normalized Key Events
// The source-independent key event handed to the conversion engine

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::modifier::{Modifier, ModifierSet};

/// Non-printable keys understood by the conversion engine
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SpecialKey {
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    Space,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// 変換
    Henkan,
    /// 無変換
    Muhenkan,
}

impl SpecialKey {
    /// Function key by number (1-12)
    pub fn function(n: u8) -> Option<Self> {
        use SpecialKey::*;
        const KEYS: [SpecialKey; 12] = [F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12];
        KEYS.get(usize::from(n).checked_sub(1)?).copied()
    }
}

/// What a key event types: a character or a special key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    Char(char),
    Special(SpecialKey),
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyInput::Char(c) => write!(f, "{:?}", c),
            KeyInput::Special(key) => write!(f, "{}", key),
        }
    }
}

/// A key event independent of whether it came from a touch or a physical key.
///
/// Printable keys never carry Shift: the shifted character is stored in
/// `input` instead. An event with no `input` and a non-empty modifier set is
/// a bare modifier press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedKeyEvent {
    pub input: Option<KeyInput>,
    pub modifiers: ModifierSet,
}

impl NormalizedKeyEvent {
    /// A printable character with no modifiers
    pub fn char(c: char) -> Self {
        Self {
            input: Some(KeyInput::Char(c)),
            modifiers: ModifierSet::EMPTY,
        }
    }

    /// A special key with the given modifiers
    pub fn special(key: SpecialKey, modifiers: ModifierSet) -> Self {
        Self {
            input: Some(KeyInput::Special(key)),
            modifiers,
        }
    }

    /// A bare modifier press
    pub fn modifier_only(modifiers: ModifierSet) -> Self {
        Self {
            input: None,
            modifiers,
        }
    }

    /// Build from a software key code point, if it is a valid character
    pub fn from_code_point(code: u32) -> Option<Self> {
        char::from_u32(code).map(Self::char)
    }

    pub fn is_modifier_only(&self) -> bool {
        self.input.is_none()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn as_char(&self) -> Option<char> {
        match self.input {
            Some(KeyInput::Char(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_special(&self) -> Option<SpecialKey> {
        match self.input {
            Some(KeyInput::Special(key)) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for NormalizedKeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.input, self.modifiers.is_empty()) {
            (Some(input), true) => write!(f, "{}", input),
            (Some(input), false) => write!(f, "{}+{}", self.modifiers, input),
            (None, _) => write!(f, "[{}]", self.modifiers),
        }
    }
}
