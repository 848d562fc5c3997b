// Kanaboard Software Key Codes
// Virtual codes carried by on-screen keys and their decoding

use crate::event::{NormalizedKeyEvent, SpecialKey};
use crate::layout::{CompositionMode, LayoutFamily, SoftwareLayout};
use crate::modifier::ModifierSet;

/// Software key codes with a fixed meaning.
///
/// Positive codes are Unicode code points; the control characters below
/// double as editing keys. Negative codes are virtual keys.
pub mod code {
    pub const BACKSPACE: i32 = 8;
    pub const TAB: i32 = 9;
    pub const ENTER: i32 = 10;
    pub const SPACE: i32 = 32;

    pub const LEFT: i32 = -3;
    pub const RIGHT: i32 = -4;
    pub const UP: i32 = -5;
    pub const DOWN: i32 = -6;

    pub const TWELVE_KEY_KANA: i32 = -10;
    pub const TWELVE_KEY_ALPHABET: i32 = -11;
    pub const QWERTY_KANA: i32 = -12;
    pub const QWERTY_ALPHABET: i32 = -13;
    /// Same layout family, other composition mode
    pub const CHARTYPE_TOGGLE: i32 = -14;
    /// Leave the narrow display
    pub const WIDEN: i32 = -20;

    const NAMES: &[(&str, i32)] = &[
        ("backspace", BACKSPACE),
        ("tab", TAB),
        ("enter", ENTER),
        ("space", SPACE),
        ("left", LEFT),
        ("right", RIGHT),
        ("up", UP),
        ("down", DOWN),
        ("twelve_key_kana", TWELVE_KEY_KANA),
        ("twelve_key_alphabet", TWELVE_KEY_ALPHABET),
        ("qwerty_kana", QWERTY_KANA),
        ("qwerty_alphabet", QWERTY_ALPHABET),
        ("chartype_toggle", CHARTYPE_TOGGLE),
        ("widen", WIDEN),
    ];

    /// Parse a software code: a single character stands for itself,
    /// anything else must be a named code (case-insensitive).
    pub fn from_name(text: &str) -> Option<i32> {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(c as i32);
        }
        let lower = text.trim().to_lowercase();
        NAMES
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, code)| *code)
    }
}

/// Meaning of a software key code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftKey {
    /// Text or editing input for the conversion engine
    Input(NormalizedKeyEvent),
    /// Switch to a specific layout and composition mode
    SwitchLayout(SoftwareLayout),
    ToggleCharType,
    Widen,
    /// Negative code with no assigned meaning
    Unknown(i32),
}

impl SoftKey {
    pub fn from_code(value: i32) -> Self {
        let layout = |family, mode| SoftKey::SwitchLayout(SoftwareLayout::new(family, mode));
        let special = |key| SoftKey::Input(NormalizedKeyEvent::special(key, ModifierSet::EMPTY));

        match value {
            code::BACKSPACE => special(SpecialKey::Backspace),
            code::TAB => special(SpecialKey::Tab),
            code::ENTER => special(SpecialKey::Enter),
            code::SPACE => special(SpecialKey::Space),
            code::LEFT => special(SpecialKey::Left),
            code::RIGHT => special(SpecialKey::Right),
            code::UP => special(SpecialKey::Up),
            code::DOWN => special(SpecialKey::Down),
            code::TWELVE_KEY_KANA => layout(LayoutFamily::TwelveKey, CompositionMode::NativeScript),
            code::TWELVE_KEY_ALPHABET => layout(LayoutFamily::TwelveKey, CompositionMode::Latin),
            code::QWERTY_KANA => layout(LayoutFamily::Qwerty, CompositionMode::NativeScript),
            code::QWERTY_ALPHABET => layout(LayoutFamily::Qwerty, CompositionMode::Latin),
            code::CHARTYPE_TOGGLE => SoftKey::ToggleCharType,
            code::WIDEN => SoftKey::Widen,
            _ => u32::try_from(value)
                .ok()
                .and_then(NormalizedKeyEvent::from_code_point)
                .map_or(SoftKey::Unknown(value), SoftKey::Input),
        }
    }

    /// Whether the code changes layout or mode rather than typing
    pub fn is_layout_switch(&self) -> bool {
        matches!(
            self,
            SoftKey::SwitchLayout(_) | SoftKey::ToggleCharType | SoftKey::Widen
        )
    }
}
