// Kanaboard Hardware Keyboard Specifications
// Closed set of physical layouts and the pure key translator over their tables

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::table::{self, KeyEntry, KeyTable, ModeSwitchSignal, TableKey};
use crate::event::{NormalizedKeyEvent, RawKeyEvent};
use crate::input::KeyboardClass;
use crate::layout::{CompositionMode, LayoutFamily, SoftwareLayout};
use crate::modifier::MetaState;
use crate::{KeyCode, ScanCode};

/// A physical keyboard layout the translator knows how to read
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HardwareKeyboardSpecification {
    /// US layout keyed by platform key code
    Default,
    /// JIS 109-key layout keyed by scan code
    #[strum(to_string = "japanese109a", serialize = "japanese_109a", serialize = "jis")]
    Japanese109A,
    /// Numeric keypad keyed by platform key code
    TwelveKey,
}

/// A key event produced by the translator, with its platform-facing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatedKey {
    pub event: NormalizedKeyEvent,
    /// The platform key code the embedding application would see
    pub key_code: KeyCode,
    /// The physical event this came from; `None` for purely virtual keys
    pub raw: Option<RawKeyEvent>,
}

/// Result of translating one physical key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Key(TranslatedKey),
    ModeSwitch(ModeSwitchSignal),
    /// Not ours; forward the raw event to the application unchanged
    NotConsumed,
}

impl Outcome {
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Outcome::NotConsumed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Key(key) if key.raw.is_none() => {
                write!(f, "key {} (virtual {})", key.event, key.key_code)
            }
            Outcome::Key(key) => write!(f, "key {}", key.event),
            Outcome::ModeSwitch(signal) => write!(f, "mode switch {}", signal),
            Outcome::NotConsumed => write!(f, "not consumed"),
        }
    }
}

impl HardwareKeyboardSpecification {
    /// Default specification for a platform keyboard class.
    ///
    /// Keyboards without keys get no specification unless `force_default`
    /// asks for the key-code driven fallback.
    pub fn for_keyboard_class(class: KeyboardClass, force_default: bool) -> Option<Self> {
        match class {
            KeyboardClass::TwelveKey => Some(Self::TwelveKey),
            KeyboardClass::Qwerty => Some(Self::Japanese109A),
            KeyboardClass::NoKeys | KeyboardClass::Undefined if force_default => {
                Some(Self::Default)
            }
            KeyboardClass::NoKeys | KeyboardClass::Undefined => None,
        }
    }

    /// The lookup table for this layout
    pub fn table(self) -> &'static KeyTable {
        match self {
            Self::Default => table::default_layout(),
            Self::Japanese109A => table::japanese_109a(),
            Self::TwelveKey => table::twelve_key(),
        }
    }

    /// Software layout kept behind this keyboard while composing native script
    pub fn native_layout(self) -> SoftwareLayout {
        SoftwareLayout::new(self.layout_family(), CompositionMode::NativeScript)
    }

    /// Software layout kept behind this keyboard while composing Latin text
    pub fn latin_layout(self) -> SoftwareLayout {
        SoftwareLayout::new(self.layout_family(), CompositionMode::Latin)
    }

    /// Paired software layout for a composition mode
    pub fn layout_for(self, mode: CompositionMode) -> SoftwareLayout {
        match mode {
            CompositionMode::NativeScript => self.native_layout(),
            CompositionMode::Latin => self.latin_layout(),
        }
    }

    fn layout_family(self) -> LayoutFamily {
        match self {
            Self::Default => LayoutFamily::Qwerty,
            Self::Japanese109A => LayoutFamily::HardwareQwerty,
            Self::TwelveKey => LayoutFamily::HardwareTwelveKey,
        }
    }

    /// Translate one physical key down.
    ///
    /// Pure: the same inputs always give the same outcome.
    pub fn translate(self, key_code: KeyCode, scan_code: ScanCode, meta: MetaState) -> Outcome {
        self.translate_event(&RawKeyEvent::new(key_code, scan_code, meta))
    }

    /// Translate a physical key event, keeping it as the raw reference.
    pub fn translate_event(self, raw: &RawKeyEvent) -> Outcome {
        let table = self.table();
        let code = match table.keyed_by() {
            TableKey::ScanCode => raw.scan_code.code(),
            TableKey::KeyCode => raw.key_code.code(),
        };
        let Some(entry) = table.get(code) else {
            return Outcome::NotConsumed;
        };
        let meta = raw.meta_state;

        let physical = |event| {
            Outcome::Key(TranslatedKey {
                event,
                key_code: raw.key_code,
                raw: Some(*raw),
            })
        };

        match *entry {
            // Ctrl/Alt chords on printable keys are application shortcuts
            KeyEntry::Printable { .. } if meta.has_ctrl() || meta.has_alt() => {
                Outcome::NotConsumed
            }
            KeyEntry::Printable { normal, shifted } => {
                let c = if meta.has_shift() { shifted } else { normal };
                physical(NormalizedKeyEvent::char(c))
            }
            KeyEntry::Special(key) => physical(NormalizedKeyEvent::special(key, meta.modifiers())),
            KeyEntry::Virtual { key, derived } => Outcome::Key(TranslatedKey {
                event: NormalizedKeyEvent::special(key, meta.modifiers()),
                key_code: derived,
                raw: None,
            }),
            KeyEntry::Modifier(modifier) => physical(NormalizedKeyEvent::modifier_only(
                meta.modifiers().with(modifier),
            )),
            KeyEntry::ModeSwitch(signal) => Outcome::ModeSwitch(signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SpecialKey;
    use crate::key::{keycode, scan};
    use crate::modifier::{Modifier, ModifierSet};
    use std::str::FromStr;

    fn jis(scan_code: u16, meta: MetaState) -> Outcome {
        HardwareKeyboardSpecification::Japanese109A.translate(
            KeyCode::default(),
            ScanCode(scan_code),
            meta,
        )
    }

    fn key_event(outcome: Outcome) -> NormalizedKeyEvent {
        match outcome {
            Outcome::Key(key) => key.event,
            other => panic!("expected a key, got {:?}", other),
        }
    }

    #[test]
    fn test_digit_without_modifiers() {
        let event = key_event(jis(0x02, MetaState::NONE));
        assert_eq!(event.as_char(), Some('1'));
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn test_shifted_digit_consumes_shift() {
        let event = key_event(jis(0x02, MetaState::SHIFT_ON));
        assert_eq!(event.as_char(), Some('!'));
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn test_escape_carries_every_modifier() {
        let meta = MetaState::SHIFT_ON | MetaState::ALT_ON | MetaState::CTRL_ON;
        let event = key_event(jis(0x01, meta));
        assert_eq!(event.as_special(), Some(SpecialKey::Escape));
        let expected: ModifierSet = [Modifier::Shift, Modifier::Alt, Modifier::Ctrl]
            .into_iter()
            .collect();
        assert_eq!(event.modifiers, expected);
    }

    #[test]
    fn test_zenkaku_hankaku_is_toggle() {
        assert_eq!(
            jis(0x29, MetaState::NONE),
            Outcome::ModeSwitch(ModeSwitchSignal::Toggle)
        );
    }

    #[test]
    fn test_unknown_scan_code_not_consumed() {
        assert_eq!(jis(0xF0, MetaState::NONE), Outcome::NotConsumed);
        assert_eq!(jis(0x00, MetaState::NONE), Outcome::NotConsumed);
    }

    #[test]
    fn test_ctrl_printable_passes_through() {
        assert_eq!(jis(scan::A.code(), MetaState::CTRL_ON), Outcome::NotConsumed);
        assert_eq!(jis(scan::A.code(), MetaState::ALT_LEFT_ON), Outcome::NotConsumed);
    }

    #[test]
    fn test_modifier_key_is_modifier_only() {
        let event = key_event(jis(scan::LEFT_SHIFT.code(), MetaState::SHIFT_ON));
        assert!(event.is_modifier_only());
        assert_eq!(event.modifiers, ModifierSet::from(Modifier::Shift));
    }

    #[test]
    fn test_physical_key_keeps_raw_reference() {
        let raw = RawKeyEvent::new(KeyCode(8), scan::KEY_1, MetaState::NONE);
        match HardwareKeyboardSpecification::Japanese109A.translate_event(&raw) {
            Outcome::Key(key) => {
                assert_eq!(key.raw, Some(raw));
                assert_eq!(key.key_code, KeyCode(8));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_twelve_key_pound_is_virtual_enter() {
        let outcome = HardwareKeyboardSpecification::TwelveKey.translate(
            keycode::POUND,
            ScanCode::default(),
            MetaState::NONE,
        );
        match outcome {
            Outcome::Key(key) => {
                assert_eq!(key.event.as_special(), Some(SpecialKey::Enter));
                assert!(key.raw.is_none());
                assert_eq!(key.key_code, keycode::ENTER);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_spec_uses_key_codes() {
        let spec = HardwareKeyboardSpecification::Default;
        let outcome = spec.translate(keycode::A, ScanCode(0xFF), MetaState::SHIFT_ON);
        assert_eq!(key_event(outcome).as_char(), Some('A'));
        assert_eq!(
            spec.translate(keycode::EISU, ScanCode::default(), MetaState::NONE),
            Outcome::ModeSwitch(ModeSwitchSignal::Eisu)
        );
    }

    #[test]
    fn test_paired_layouts() {
        let spec = HardwareKeyboardSpecification::Japanese109A;
        assert_eq!(spec.native_layout().family, LayoutFamily::HardwareQwerty);
        assert_eq!(spec.native_layout().mode, CompositionMode::NativeScript);
        assert_eq!(spec.latin_layout().mode, CompositionMode::Latin);
        assert_eq!(
            HardwareKeyboardSpecification::TwelveKey.layout_for(CompositionMode::Latin),
            SoftwareLayout::new(LayoutFamily::HardwareTwelveKey, CompositionMode::Latin)
        );
    }

    #[test]
    fn test_derived_from_keyboard_class() {
        use HardwareKeyboardSpecification as Spec;
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::TwelveKey, false), Some(Spec::TwelveKey));
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::Qwerty, false), Some(Spec::Japanese109A));
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::NoKeys, false), None);
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::Undefined, false), None);
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::Undefined, true), Some(Spec::Default));
        assert_eq!(Spec::for_keyboard_class(KeyboardClass::Qwerty, true), Some(Spec::Japanese109A));
    }

    #[test]
    fn test_translation_is_deterministic() {
        use strum::IntoEnumIterator;
        let metas = [
            MetaState::NONE,
            MetaState::SHIFT_ON,
            MetaState::SHIFT_ON | MetaState::CTRL_ON,
            MetaState::ALT_ON,
        ];
        for spec in HardwareKeyboardSpecification::iter() {
            for (code, _) in spec.table().iter() {
                for meta in metas {
                    let raw = RawKeyEvent::new(KeyCode(code), ScanCode(code), meta);
                    assert_eq!(spec.translate_event(&raw), spec.translate_event(&raw));
                }
            }
        }
    }

    #[test]
    fn test_printable_never_carries_shift_and_specials_mirror_mask() {
        use strum::IntoEnumIterator;
        let meta = MetaState::SHIFT_ON | MetaState::SHIFT_LEFT_ON;
        for spec in HardwareKeyboardSpecification::iter() {
            for (code, entry) in spec.table().iter() {
                let raw = RawKeyEvent::new(KeyCode(code), ScanCode(code), meta);
                let Outcome::Key(key) = spec.translate_event(&raw) else {
                    continue;
                };
                match entry {
                    KeyEntry::Printable { .. } => assert!(key.event.modifiers.is_empty()),
                    KeyEntry::Special(_) | KeyEntry::Virtual { .. } => {
                        assert_eq!(key.event.modifiers, ModifierSet::from(Modifier::Shift))
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(HardwareKeyboardSpecification::Japanese109A.to_string(), "japanese109a");
        assert_eq!(
            HardwareKeyboardSpecification::from_str("JIS"),
            Ok(HardwareKeyboardSpecification::Japanese109A)
        );
        assert_eq!(
            HardwareKeyboardSpecification::from_str("twelve_key"),
            Ok(HardwareKeyboardSpecification::TwelveKey)
        );
        assert!(HardwareKeyboardSpecification::from_str("dvorak").is_err());
    }
}
