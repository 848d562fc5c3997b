// Kanaboard Hardware Key Tables
// Per-layout lookup tables from physical code to output entry

use std::sync::OnceLock;

use indexmap::IndexMap;
use strum_macros::{Display, EnumString};

use crate::event::SpecialKey;
use crate::key::{keycode, scan};
use crate::modifier::Modifier;
use crate::{KeyCode, ScanCode};

/// A translator outcome that changes composition mode without typing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModeSwitchSignal {
    /// Flip between native-script and Latin composition (半角/全角)
    Toggle,
    /// Switch to native-script composition (かな)
    Kana,
    /// Switch to Latin composition (英数)
    Eisu,
}

/// What a single table position produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEntry {
    /// Printable key: the character without and with Shift
    Printable { normal: char, shifted: char },
    /// Non-printable key; carries the modifiers of the event's mask
    Special(SpecialKey),
    /// Special key synthesized from another physical key. The raw event is
    /// not retained and the platform sees `derived` instead.
    Virtual { key: SpecialKey, derived: KeyCode },
    /// A modifier key on its own
    Modifier(Modifier),
    /// A key with only a mode effect
    ModeSwitch(ModeSwitchSignal),
}

impl KeyEntry {
    pub fn is_printable(&self) -> bool {
        matches!(self, KeyEntry::Printable { .. })
    }
}

/// Which field of a physical event a table is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKey {
    ScanCode,
    KeyCode,
}

/// An immutable mapping from physical code to [`KeyEntry`].
///
/// Entries keep their definition order so a table can be walked
/// exhaustively.
#[derive(Debug)]
pub struct KeyTable {
    name: &'static str,
    keyed_by: TableKey,
    entries: IndexMap<u16, KeyEntry>,
}

impl KeyTable {
    fn new(name: &'static str, keyed_by: TableKey) -> Self {
        Self {
            name,
            keyed_by,
            entries: IndexMap::new(),
        }
    }

    fn insert(&mut self, code: u16, entry: KeyEntry) {
        let previous = self.entries.insert(code, entry);
        debug_assert!(previous.is_none(), "duplicate entry {} in {}", code, self.name);
    }

    fn printable(&mut self, code: u16, normal: char, shifted: char) {
        self.insert(code, KeyEntry::Printable { normal, shifted });
    }

    /// Consecutive codes typing `chars`, shifted to upper case
    fn letters(&mut self, first: u16, chars: &str) {
        for (offset, c) in chars.chars().enumerate() {
            self.printable(first + offset as u16, c, c.to_ascii_uppercase());
        }
    }

    fn special(&mut self, code: u16, key: SpecialKey) {
        self.insert(code, KeyEntry::Special(key));
    }

    fn modifier(&mut self, code: u16, modifier: Modifier) {
        self.insert(code, KeyEntry::Modifier(modifier));
    }

    fn mode_switch(&mut self, code: u16, signal: ModeSwitchSignal) {
        self.insert(code, KeyEntry::ModeSwitch(signal));
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keyed_by(&self) -> TableKey {
        self.keyed_by
    }

    pub fn get(&self, code: u16) -> Option<&KeyEntry> {
        self.entries.get(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All (code, entry) pairs in definition order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &KeyEntry)> + '_ {
        self.entries.iter().map(|(code, entry)| (*code, entry))
    }

    /// The code of the first entry producing `signal`
    pub fn mode_switch_code(&self, signal: ModeSwitchSignal) -> Option<u16> {
        self.iter()
            .find(|(_, entry)| **entry == KeyEntry::ModeSwitch(signal))
            .map(|(code, _)| code)
    }
}

fn function_keys(table: &mut KeyTable, codes: impl IntoIterator<Item = u16>) {
    for (n, code) in (1u8..=12).zip(codes) {
        if let Some(key) = SpecialKey::function(n) {
            table.special(code, key);
        }
    }
}

/// JIS (109-key) keyboard, keyed by scan code
pub fn japanese_109a() -> &'static KeyTable {
    static TABLE: OnceLock<KeyTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = KeyTable::new("japanese109a", TableKey::ScanCode);
        let s = |code: ScanCode| code.code();

        t.special(s(scan::ESC), SpecialKey::Escape);
        // Number row, JIS shifted symbols. Shift+0 has no glyph of its own.
        for (offset, (normal, shifted)) in [
            ('1', '!'),
            ('2', '"'),
            ('3', '#'),
            ('4', '$'),
            ('5', '%'),
            ('6', '&'),
            ('7', '\''),
            ('8', '('),
            ('9', ')'),
            ('0', '0'),
        ]
        .into_iter()
        .enumerate()
        {
            t.printable(s(scan::KEY_1) + offset as u16, normal, shifted);
        }
        t.printable(s(scan::MINUS), '-', '=');
        t.printable(s(scan::EQUAL), '^', '~');
        t.printable(s(scan::YEN), '\\', '|');
        t.special(s(scan::BACKSPACE), SpecialKey::Backspace);
        t.special(s(scan::TAB), SpecialKey::Tab);
        t.letters(s(scan::Q), "qwertyuiop");
        t.printable(s(scan::LEFT_BRACE), '@', '`');
        t.printable(s(scan::RIGHT_BRACE), '[', '{');
        t.special(s(scan::ENTER), SpecialKey::Enter);
        t.modifier(s(scan::LEFT_CTRL), Modifier::Ctrl);
        t.letters(s(scan::A), "asdfghjkl");
        t.printable(s(scan::SEMICOLON), ';', '+');
        t.printable(s(scan::APOSTROPHE), ':', '*');
        t.mode_switch(s(scan::GRAVE), ModeSwitchSignal::Toggle);
        t.modifier(s(scan::LEFT_SHIFT), Modifier::Shift);
        t.printable(s(scan::BACKSLASH), ']', '}');
        t.letters(s(scan::Z), "zxcvbnm");
        t.printable(s(scan::COMMA), ',', '<');
        t.printable(s(scan::DOT), '.', '>');
        t.printable(s(scan::SLASH), '/', '?');
        t.modifier(s(scan::RIGHT_SHIFT), Modifier::Shift);
        t.modifier(s(scan::LEFT_ALT), Modifier::Alt);
        t.special(s(scan::SPACE), SpecialKey::Space);
        function_keys(
            &mut t,
            (s(scan::F1)..=s(scan::F10)).chain([s(scan::F11), s(scan::F12)]),
        );
        t.printable(s(scan::RO), '\\', '_');
        t.special(s(scan::HENKAN), SpecialKey::Henkan);
        t.mode_switch(s(scan::KATAKANAHIRAGANA), ModeSwitchSignal::Kana);
        t.special(s(scan::MUHENKAN), SpecialKey::Muhenkan);
        t.modifier(s(scan::RIGHT_CTRL), Modifier::Ctrl);
        t.modifier(s(scan::RIGHT_ALT), Modifier::Alt);
        t.special(s(scan::HOME), SpecialKey::Home);
        t.special(s(scan::UP), SpecialKey::Up);
        t.special(s(scan::PAGE_UP), SpecialKey::PageUp);
        t.special(s(scan::LEFT), SpecialKey::Left);
        t.special(s(scan::RIGHT), SpecialKey::Right);
        t.special(s(scan::END), SpecialKey::End);
        t.special(s(scan::DOWN), SpecialKey::Down);
        t.special(s(scan::PAGE_DOWN), SpecialKey::PageDown);
        t.special(s(scan::INSERT), SpecialKey::Insert);
        t.special(s(scan::DELETE), SpecialKey::Delete);
        t
    })
}

/// US keyboard, keyed by platform key code
pub fn default_layout() -> &'static KeyTable {
    static TABLE: OnceLock<KeyTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = KeyTable::new("default", TableKey::KeyCode);
        let k = |code: KeyCode| code.code();

        for (offset, shifted) in [')', '!', '@', '#', '$', '%', '^', '&', '*', '(']
            .into_iter()
            .enumerate()
        {
            let digit = char::from(b'0' + offset as u8);
            t.printable(k(keycode::NUM_0) + offset as u16, digit, shifted);
        }
        t.printable(k(keycode::STAR), '*', '*');
        t.printable(k(keycode::POUND), '#', '#');
        t.special(k(keycode::DPAD_UP), SpecialKey::Up);
        t.special(k(keycode::DPAD_DOWN), SpecialKey::Down);
        t.special(k(keycode::DPAD_LEFT), SpecialKey::Left);
        t.special(k(keycode::DPAD_RIGHT), SpecialKey::Right);
        t.letters(k(keycode::A), "abcdefghijklmnopqrstuvwxyz");
        t.printable(k(keycode::COMMA), ',', '<');
        t.printable(k(keycode::PERIOD), '.', '>');
        t.modifier(k(keycode::ALT_LEFT), Modifier::Alt);
        t.modifier(k(keycode::ALT_RIGHT), Modifier::Alt);
        t.modifier(k(keycode::SHIFT_LEFT), Modifier::Shift);
        t.modifier(k(keycode::SHIFT_RIGHT), Modifier::Shift);
        t.special(k(keycode::TAB), SpecialKey::Tab);
        t.special(k(keycode::SPACE), SpecialKey::Space);
        t.special(k(keycode::ENTER), SpecialKey::Enter);
        t.special(k(keycode::DEL), SpecialKey::Backspace);
        t.printable(k(keycode::GRAVE), '`', '~');
        t.printable(k(keycode::MINUS), '-', '_');
        t.printable(k(keycode::EQUALS), '=', '+');
        t.printable(k(keycode::LEFT_BRACKET), '[', '{');
        t.printable(k(keycode::RIGHT_BRACKET), ']', '}');
        t.printable(k(keycode::BACKSLASH), '\\', '|');
        t.printable(k(keycode::SEMICOLON), ';', ':');
        t.printable(k(keycode::APOSTROPHE), '\'', '"');
        t.printable(k(keycode::SLASH), '/', '?');
        t.printable(k(keycode::AT), '@', '@');
        t.printable(k(keycode::PLUS), '+', '+');
        t.special(k(keycode::PAGE_UP), SpecialKey::PageUp);
        t.special(k(keycode::PAGE_DOWN), SpecialKey::PageDown);
        t.special(k(keycode::ESCAPE), SpecialKey::Escape);
        t.special(k(keycode::FORWARD_DEL), SpecialKey::Delete);
        t.modifier(k(keycode::CTRL_LEFT), Modifier::Ctrl);
        t.modifier(k(keycode::CTRL_RIGHT), Modifier::Ctrl);
        t.special(k(keycode::MOVE_HOME), SpecialKey::Home);
        t.special(k(keycode::MOVE_END), SpecialKey::End);
        t.special(k(keycode::INSERT), SpecialKey::Insert);
        function_keys(&mut t, k(keycode::F1)..=k(keycode::F12));
        t.mode_switch(k(keycode::ZENKAKU_HANKAKU), ModeSwitchSignal::Toggle);
        t.mode_switch(k(keycode::EISU), ModeSwitchSignal::Eisu);
        t.special(k(keycode::MUHENKAN), SpecialKey::Muhenkan);
        t.special(k(keycode::HENKAN), SpecialKey::Henkan);
        t.mode_switch(k(keycode::KATAKANA_HIRAGANA), ModeSwitchSignal::Kana);
        t.printable(k(keycode::YEN), '¥', '|');
        t.printable(k(keycode::RO), '\\', '_');
        t.mode_switch(k(keycode::KANA), ModeSwitchSignal::Kana);
        t
    })
}

/// Phone-style numeric keypad, keyed by platform key code
pub fn twelve_key() -> &'static KeyTable {
    static TABLE: OnceLock<KeyTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = KeyTable::new("twelve_key", TableKey::KeyCode);
        let k = |code: KeyCode| code.code();

        for offset in 0..10u16 {
            let digit = char::from(b'0' + offset as u8);
            t.printable(k(keycode::NUM_0) + offset, digit, digit);
        }
        t.mode_switch(k(keycode::STAR), ModeSwitchSignal::Toggle);
        t.insert(
            k(keycode::POUND),
            KeyEntry::Virtual {
                key: SpecialKey::Enter,
                derived: keycode::ENTER,
            },
        );
        t.special(k(keycode::DPAD_UP), SpecialKey::Up);
        t.special(k(keycode::DPAD_DOWN), SpecialKey::Down);
        t.special(k(keycode::DPAD_LEFT), SpecialKey::Left);
        t.special(k(keycode::DPAD_RIGHT), SpecialKey::Right);
        t.special(k(keycode::DPAD_CENTER), SpecialKey::Enter);
        t.special(k(keycode::ENTER), SpecialKey::Enter);
        t.special(k(keycode::DEL), SpecialKey::Backspace);
        t
    })
}
