// Kanaboard Hardware Translator Tests
//
// Drive the public translation API with key events the way an attached
// keyboard delivers them.
//
// Run with: cargo test --test translator_test

use kanaboard_core::key::{key_code_for_scan_code, keycode, scan};
use kanaboard_core::{
    HardwareKeyboardSpecification, MetaState, MetaTracker, ModeSwitchSignal, Modifier,
    ModifierSet, NormalizedKeyEvent, Outcome, RawKeyEvent, ScanCode, SpecialKey,
};

// =========================================================================
// Test Helpers
// =========================================================================

fn jis(scan_code: ScanCode, meta: MetaState) -> Outcome {
    HardwareKeyboardSpecification::Japanese109A.translate(
        key_code_for_scan_code(scan_code),
        scan_code,
        meta,
    )
}

fn event_of(outcome: Outcome) -> NormalizedKeyEvent {
    match outcome {
        Outcome::Key(key) => key.event,
        other => panic!("expected a key, got {}", other),
    }
}

/// Press and release each key on a JIS keyboard through a tracker, holding
/// left Shift where asked, and collect the characters produced
fn type_on_jis(strokes: &[(ScanCode, bool)]) -> String {
    let spec = HardwareKeyboardSpecification::Japanese109A;
    let mut tracker = MetaTracker::new();
    let mut typed = String::new();
    for &(code, shifted) in strokes {
        let mut events = Vec::new();
        if shifted {
            events.extend(tracker.observe(scan::LEFT_SHIFT, 1));
        }
        events.extend(tracker.observe(code, 1));
        events.extend(tracker.observe(code, 0));
        if shifted {
            events.extend(tracker.observe(scan::LEFT_SHIFT, 0));
        }
        for raw in events.iter().filter(|raw| raw.is_down()) {
            if let Outcome::Key(key) = spec.translate_event(raw) {
                if let Some(c) = key.event.as_char() {
                    typed.push(c);
                }
            }
        }
    }
    typed
}

// =========================================================================
// JIS keyboard
// =========================================================================

#[test]
fn jis_digit_and_shifted_symbol() {
    assert_eq!(event_of(jis(ScanCode(0x02), MetaState::NONE)), NormalizedKeyEvent::char('1'));

    let shifted = event_of(jis(ScanCode(0x02), MetaState::SHIFT_ON));
    assert_eq!(shifted.as_char(), Some('!'));
    assert_eq!(shifted.modifiers, ModifierSet::EMPTY);
}

#[test]
fn jis_escape_carries_all_modifiers() {
    let meta = MetaState::SHIFT_ON | MetaState::ALT_ON | MetaState::CTRL_ON;
    let event = event_of(jis(ScanCode(0x01), meta));
    assert_eq!(event.as_special(), Some(SpecialKey::Escape));
    assert!(event.has_modifier(Modifier::Shift));
    assert!(event.has_modifier(Modifier::Alt));
    assert!(event.has_modifier(Modifier::Ctrl));
    assert_eq!(event.modifiers.len(), 3);
}

#[test]
fn jis_hankaku_zenkaku_toggles() {
    assert_eq!(
        jis(ScanCode(0x29), MetaState::NONE),
        Outcome::ModeSwitch(ModeSwitchSignal::Toggle)
    );
    assert_eq!(
        jis(scan::KATAKANAHIRAGANA, MetaState::NONE),
        Outcome::ModeSwitch(ModeSwitchSignal::Kana)
    );
}

#[test]
fn jis_symbol_positions_differ_from_us() {
    assert_eq!(event_of(jis(scan::LEFT_BRACE, MetaState::NONE)).as_char(), Some('@'));
    assert_eq!(event_of(jis(scan::APOSTROPHE, MetaState::NONE)).as_char(), Some(':'));
    assert_eq!(
        event_of(jis(scan::APOSTROPHE, MetaState::SHIFT_ON)).as_char(),
        Some('*')
    );
    assert_eq!(event_of(jis(scan::RO, MetaState::SHIFT_ON)).as_char(), Some('_'));
    assert_eq!(
        event_of(jis(ScanCode(3), MetaState::SHIFT_LEFT_ON)).as_char(),
        Some('"')
    );
}

#[test]
fn jis_typing_through_tracker() {
    let strokes = [
        (ScanCode(35), false), // h
        (ScanCode(18), false), // e
        (scan::LEFT_BRACE, false),
        (ScanCode(2), true),
        (ScanCode(7), true),
    ];
    assert_eq!(type_on_jis(&strokes), "he@!&");
}

#[test]
fn jis_unknown_and_ctrl_keys_pass_through() {
    assert_eq!(jis(ScanCode(0x1f0), MetaState::NONE), Outcome::NotConsumed);
    assert_eq!(jis(scan::A, MetaState::CTRL_ON), Outcome::NotConsumed);
    assert!(jis(scan::ENTER, MetaState::CTRL_ON).is_consumed());
}

// =========================================================================
// Twelve-key and default keyboards
// =========================================================================

#[test]
fn twelve_key_pound_is_virtual_enter() {
    let outcome = HardwareKeyboardSpecification::TwelveKey.translate(
        keycode::POUND,
        ScanCode(0),
        MetaState::NONE,
    );
    let Outcome::Key(key) = outcome else {
        panic!("expected a key, got {}", outcome);
    };
    assert_eq!(key.event.as_special(), Some(SpecialKey::Enter));
    assert!(key.raw.is_none());
    assert_eq!(key.key_code, keycode::ENTER);
}

#[test]
fn twelve_key_digits_ignore_shift() {
    let spec = HardwareKeyboardSpecification::TwelveKey;
    let five = kanaboard_core::KeyCode(keycode::NUM_0.code() + 5);
    let event = event_of(spec.translate(five, ScanCode(0), MetaState::SHIFT_ON));
    assert_eq!(event, NormalizedKeyEvent::char('5'));
}

#[test]
fn default_spec_reads_key_codes_not_scan_codes() {
    let spec = HardwareKeyboardSpecification::Default;
    let raw = RawKeyEvent::from_key_code(keycode::YEN, MetaState::NONE);
    assert_eq!(event_of(spec.translate_event(&raw)).as_char(), Some('¥'));

    let raw = RawKeyEvent::new(keycode::A, scan::LEFT_BRACE, MetaState::SHIFT_ON);
    assert_eq!(event_of(spec.translate_event(&raw)).as_char(), Some('A'));
    assert_eq!(
        spec.translate(keycode::EISU, ScanCode(0), MetaState::NONE),
        Outcome::ModeSwitch(ModeSwitchSignal::Eisu)
    );
}

#[test]
fn ime_mode_keys_only_switch_modes() {
    let spec = HardwareKeyboardSpecification::Default;
    for (code, signal) in [
        (keycode::KANA, ModeSwitchSignal::Kana),
        (keycode::KATAKANA_HIRAGANA, ModeSwitchSignal::Kana),
        (keycode::EISU, ModeSwitchSignal::Eisu),
        (keycode::ZENKAKU_HANKAKU, ModeSwitchSignal::Toggle),
    ] {
        let raw = RawKeyEvent::from_key_code(code, MetaState::SHIFT_ON);
        assert_eq!(spec.translate_event(&raw), Outcome::ModeSwitch(signal), "{}", code);
    }
    assert!("kana".parse::<SpecialKey>().is_err());
    assert!("eisu".parse::<SpecialKey>().is_err());
}

// =========================================================================
// Properties over whole tables
// =========================================================================

#[test]
fn every_entry_translates_deterministically() {
    let masks = [
        MetaState::NONE,
        MetaState::SHIFT_ON,
        MetaState::ALT_ON | MetaState::SHIFT_RIGHT_ON,
        MetaState::CTRL_ON | MetaState::CTRL_LEFT_ON,
    ];
    for spec in [
        HardwareKeyboardSpecification::Default,
        HardwareKeyboardSpecification::Japanese109A,
        HardwareKeyboardSpecification::TwelveKey,
    ] {
        for (code, _) in spec.table().iter() {
            for meta in masks {
                let raw = RawKeyEvent::new(
                    kanaboard_core::KeyCode(code),
                    ScanCode(code),
                    meta,
                );
                let first = spec.translate_event(&raw);
                assert_eq!(first, spec.translate_event(&raw), "{} {}", spec, raw);
                if let Outcome::Key(key) = first {
                    if key.event.as_char().is_some() {
                        assert!(!key.event.has_modifier(Modifier::Shift), "{} {}", spec, raw);
                    }
                }
            }
        }
    }
}
