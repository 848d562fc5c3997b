// Kanaboard Key Codes
// Physical scan codes (Linux input-event-codes.h) and platform key codes

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

include!(concat!(env!("OUT_DIR"), "/key_codes.rs"));

/// Scan codes with a name, in code order.
const SCAN_CODE_NAMES: &[(u16, &str)] = &[
    (0, "RESERVED"),
    (1, "ESC"),
    (2, "KEY_1"),
    (3, "KEY_2"),
    (4, "KEY_3"),
    (5, "KEY_4"),
    (6, "KEY_5"),
    (7, "KEY_6"),
    (8, "KEY_7"),
    (9, "KEY_8"),
    (10, "KEY_9"),
    (11, "KEY_0"),
    (12, "MINUS"),
    (13, "EQUAL"),
    (14, "BACKSPACE"),
    (15, "TAB"),
    (16, "Q"),
    (17, "W"),
    (18, "E"),
    (19, "R"),
    (20, "T"),
    (21, "Y"),
    (22, "U"),
    (23, "I"),
    (24, "O"),
    (25, "P"),
    (26, "LEFT_BRACE"),
    (27, "RIGHT_BRACE"),
    (28, "ENTER"),
    (29, "LEFT_CTRL"),
    (30, "A"),
    (31, "S"),
    (32, "D"),
    (33, "F"),
    (34, "G"),
    (35, "H"),
    (36, "J"),
    (37, "K"),
    (38, "L"),
    (39, "SEMICOLON"),
    (40, "APOSTROPHE"),
    (41, "GRAVE"),
    (42, "LEFT_SHIFT"),
    (43, "BACKSLASH"),
    (44, "Z"),
    (45, "X"),
    (46, "C"),
    (47, "V"),
    (48, "B"),
    (49, "N"),
    (50, "M"),
    (51, "COMMA"),
    (52, "DOT"),
    (53, "SLASH"),
    (54, "RIGHT_SHIFT"),
    (56, "LEFT_ALT"),
    (57, "SPACE"),
    (58, "CAPSLOCK"),
    (59, "F1"),
    (60, "F2"),
    (61, "F3"),
    (62, "F4"),
    (63, "F5"),
    (64, "F6"),
    (65, "F7"),
    (66, "F8"),
    (67, "F9"),
    (68, "F10"),
    (85, "ZENKAKUHANKAKU"),
    (87, "F11"),
    (88, "F12"),
    (89, "RO"),
    (90, "KATAKANA"),
    (91, "HIRAGANA"),
    (92, "HENKAN"),
    (93, "KATAKANAHIRAGANA"),
    (94, "MUHENKAN"),
    (97, "RIGHT_CTRL"),
    (100, "RIGHT_ALT"),
    (102, "HOME"),
    (103, "UP"),
    (104, "PAGE_UP"),
    (105, "LEFT"),
    (106, "RIGHT"),
    (107, "END"),
    (108, "DOWN"),
    (109, "PAGE_DOWN"),
    (110, "INSERT"),
    (111, "DELETE"),
    (124, "YEN"),
    (125, "LEFT_META"),
    (126, "RIGHT_META"),
];

/// Platform key codes with a name, in code order.
const KEY_CODE_NAMES: &[(u16, &str)] = &[
    (0, "UNKNOWN"),
    (4, "BACK"),
    (7, "0"),
    (8, "1"),
    (9, "2"),
    (10, "3"),
    (11, "4"),
    (12, "5"),
    (13, "6"),
    (14, "7"),
    (15, "8"),
    (16, "9"),
    (17, "STAR"),
    (18, "POUND"),
    (19, "DPAD_UP"),
    (20, "DPAD_DOWN"),
    (21, "DPAD_LEFT"),
    (22, "DPAD_RIGHT"),
    (23, "DPAD_CENTER"),
    (29, "A"),
    (30, "B"),
    (31, "C"),
    (32, "D"),
    (33, "E"),
    (34, "F"),
    (35, "G"),
    (36, "H"),
    (37, "I"),
    (38, "J"),
    (39, "K"),
    (40, "L"),
    (41, "M"),
    (42, "N"),
    (43, "O"),
    (44, "P"),
    (45, "Q"),
    (46, "R"),
    (47, "S"),
    (48, "T"),
    (49, "U"),
    (50, "V"),
    (51, "W"),
    (52, "X"),
    (53, "Y"),
    (54, "Z"),
    (55, "COMMA"),
    (56, "PERIOD"),
    (57, "ALT_LEFT"),
    (58, "ALT_RIGHT"),
    (59, "SHIFT_LEFT"),
    (60, "SHIFT_RIGHT"),
    (61, "TAB"),
    (62, "SPACE"),
    (66, "ENTER"),
    (67, "DEL"),
    (68, "GRAVE"),
    (69, "MINUS"),
    (70, "EQUALS"),
    (71, "LEFT_BRACKET"),
    (72, "RIGHT_BRACKET"),
    (73, "BACKSLASH"),
    (74, "SEMICOLON"),
    (75, "APOSTROPHE"),
    (76, "SLASH"),
    (77, "AT"),
    (81, "PLUS"),
    (92, "PAGE_UP"),
    (93, "PAGE_DOWN"),
    (111, "ESCAPE"),
    (112, "FORWARD_DEL"),
    (113, "CTRL_LEFT"),
    (114, "CTRL_RIGHT"),
    (115, "CAPS_LOCK"),
    (122, "MOVE_HOME"),
    (123, "MOVE_END"),
    (124, "INSERT"),
    (131, "F1"),
    (132, "F2"),
    (133, "F3"),
    (134, "F4"),
    (135, "F5"),
    (136, "F6"),
    (137, "F7"),
    (138, "F8"),
    (139, "F9"),
    (140, "F10"),
    (141, "F11"),
    (142, "F12"),
    (204, "LANGUAGE_SWITCH"),
    (211, "ZENKAKU_HANKAKU"),
    (212, "EISU"),
    (213, "MUHENKAN"),
    (214, "HENKAN"),
    (215, "KATAKANA_HIRAGANA"),
    (216, "YEN"),
    (217, "RO"),
    (218, "KANA"),
];

/// Display name for a scan code
pub fn scan_code_name(code: u16) -> &'static str {
    static NAMES: OnceLock<Vec<&'static str>> = OnceLock::new();
    NAMES
        .get_or_init(|| {
            let mut names = vec!["UNKNOWN"; 0x100];
            for &(code, name) in SCAN_CODE_NAMES {
                names[code as usize] = name;
            }
            names
        })
        .get(code as usize)
        .copied()
        .unwrap_or("UNKNOWN")
}

/// Try to parse a scan code name.
///
/// Accepts the table names case-insensitively plus the bare digits
/// `0`-`9` and `ESCAPE` as aliases.
pub fn scan_code_from_name(name: &str) -> Option<ScanCode> {
    let name_upper = name.to_uppercase();
    let alias = match name_upper.as_str() {
        "ESCAPE" => "ESC".to_string(),
        d if d.len() == 1 && d.as_bytes()[0].is_ascii_digit() => format!("KEY_{}", d),
        _ => name_upper,
    };
    SCAN_CODE_NAMES
        .iter()
        .find(|(_, n)| *n == alias)
        .map(|(code, _)| ScanCode(*code))
}

/// Display name for a platform key code
pub fn key_code_name(code: u16) -> &'static str {
    KEY_CODE_NAMES
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|i| KEY_CODE_NAMES[i].1)
        .unwrap_or("UNKNOWN")
}

/// Try to parse a platform key code name (with or without `KEYCODE_`).
pub fn key_code_from_name(name: &str) -> Option<KeyCode> {
    let name_upper = name.to_uppercase();
    let bare = name_upper.strip_prefix("KEYCODE_").unwrap_or(&name_upper);
    KEY_CODE_NAMES
        .iter()
        .find(|(_, n)| *n == bare)
        .map(|(code, _)| KeyCode(*code))
}

/// Scan code names whose platform key code is spelled differently
const SCAN_TO_KEY_ALIASES: &[(&str, &str)] = &[
    ("ESC", "ESCAPE"),
    ("EQUAL", "EQUALS"),
    ("BACKSPACE", "DEL"),
    ("DELETE", "FORWARD_DEL"),
    ("LEFT_BRACE", "LEFT_BRACKET"),
    ("RIGHT_BRACE", "RIGHT_BRACKET"),
    ("DOT", "PERIOD"),
    ("CAPSLOCK", "CAPS_LOCK"),
    ("LEFT_CTRL", "CTRL_LEFT"),
    ("RIGHT_CTRL", "CTRL_RIGHT"),
    ("LEFT_SHIFT", "SHIFT_LEFT"),
    ("RIGHT_SHIFT", "SHIFT_RIGHT"),
    ("LEFT_ALT", "ALT_LEFT"),
    ("RIGHT_ALT", "ALT_RIGHT"),
    ("HOME", "MOVE_HOME"),
    ("END", "MOVE_END"),
    ("UP", "DPAD_UP"),
    ("DOWN", "DPAD_DOWN"),
    ("LEFT", "DPAD_LEFT"),
    ("RIGHT", "DPAD_RIGHT"),
    ("ZENKAKUHANKAKU", "ZENKAKU_HANKAKU"),
    ("KATAKANAHIRAGANA", "KATAKANA_HIRAGANA"),
];

/// Platform key code a keyboard reports for a physical key.
///
/// Used when events arrive straight from a device, which only carries the
/// scan code. Keys without a platform counterpart map to
/// [`keycode::UNKNOWN`].
pub fn key_code_for_scan_code(scan: ScanCode) -> KeyCode {
    let name = scan_code_name(scan.code());
    if let Some(digit) = name.strip_prefix("KEY_") {
        return key_code_from_name(digit).unwrap_or(keycode::UNKNOWN);
    }
    let name = SCAN_TO_KEY_ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to);
    key_code_from_name(name).unwrap_or(keycode::UNKNOWN)
}

/// Parse a code given either as a name or as a decimal / `0x` hex number.
pub fn parse_code<T: FromStr + From<u16>>(text: &str) -> Option<T> {
    let text = text.trim();
    let numeric = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if text.chars().all(|c| c.is_ascii_digit()) && text.len() > 1 {
        text.parse::<u16>().ok()
    } else {
        None
    };
    match numeric {
        Some(code) => Some(T::from(code)),
        None => text.parse::<T>().ok(),
    }
}

/// Scan code constants used by the key tables.
pub mod scan {
    use super::ScanCode;

    pub const ESC: ScanCode = ScanCode(1);
    pub const KEY_1: ScanCode = ScanCode(2);
    pub const KEY_0: ScanCode = ScanCode(11);
    pub const MINUS: ScanCode = ScanCode(12);
    pub const EQUAL: ScanCode = ScanCode(13);
    pub const BACKSPACE: ScanCode = ScanCode(14);
    pub const TAB: ScanCode = ScanCode(15);
    pub const Q: ScanCode = ScanCode(16);
    pub const LEFT_BRACE: ScanCode = ScanCode(26);
    pub const RIGHT_BRACE: ScanCode = ScanCode(27);
    pub const ENTER: ScanCode = ScanCode(28);
    pub const LEFT_CTRL: ScanCode = ScanCode(29);
    pub const A: ScanCode = ScanCode(30);
    pub const SEMICOLON: ScanCode = ScanCode(39);
    pub const APOSTROPHE: ScanCode = ScanCode(40);
    /// 半角/全角 on JIS keyboards.
    pub const GRAVE: ScanCode = ScanCode(41);
    pub const LEFT_SHIFT: ScanCode = ScanCode(42);
    pub const BACKSLASH: ScanCode = ScanCode(43);
    pub const Z: ScanCode = ScanCode(44);
    pub const COMMA: ScanCode = ScanCode(51);
    pub const DOT: ScanCode = ScanCode(52);
    pub const SLASH: ScanCode = ScanCode(53);
    pub const RIGHT_SHIFT: ScanCode = ScanCode(54);
    pub const LEFT_ALT: ScanCode = ScanCode(56);
    pub const SPACE: ScanCode = ScanCode(57);
    pub const F1: ScanCode = ScanCode(59);
    pub const F10: ScanCode = ScanCode(68);
    pub const F11: ScanCode = ScanCode(87);
    pub const F12: ScanCode = ScanCode(88);
    pub const RO: ScanCode = ScanCode(89);
    pub const HENKAN: ScanCode = ScanCode(92);
    pub const KATAKANAHIRAGANA: ScanCode = ScanCode(93);
    pub const MUHENKAN: ScanCode = ScanCode(94);
    pub const RIGHT_CTRL: ScanCode = ScanCode(97);
    pub const RIGHT_ALT: ScanCode = ScanCode(100);
    pub const HOME: ScanCode = ScanCode(102);
    pub const UP: ScanCode = ScanCode(103);
    pub const PAGE_UP: ScanCode = ScanCode(104);
    pub const LEFT: ScanCode = ScanCode(105);
    pub const RIGHT: ScanCode = ScanCode(106);
    pub const END: ScanCode = ScanCode(107);
    pub const DOWN: ScanCode = ScanCode(108);
    pub const PAGE_DOWN: ScanCode = ScanCode(109);
    pub const INSERT: ScanCode = ScanCode(110);
    pub const DELETE: ScanCode = ScanCode(111);
    pub const YEN: ScanCode = ScanCode(124);
}

/// Platform key code constants used by the key tables.
pub mod keycode {
    use super::KeyCode;

    pub const UNKNOWN: KeyCode = KeyCode(0);
    pub const NUM_0: KeyCode = KeyCode(7);
    pub const NUM_9: KeyCode = KeyCode(16);
    pub const STAR: KeyCode = KeyCode(17);
    pub const POUND: KeyCode = KeyCode(18);
    pub const DPAD_UP: KeyCode = KeyCode(19);
    pub const DPAD_DOWN: KeyCode = KeyCode(20);
    pub const DPAD_LEFT: KeyCode = KeyCode(21);
    pub const DPAD_RIGHT: KeyCode = KeyCode(22);
    pub const DPAD_CENTER: KeyCode = KeyCode(23);
    pub const A: KeyCode = KeyCode(29);
    pub const Z: KeyCode = KeyCode(54);
    pub const COMMA: KeyCode = KeyCode(55);
    pub const PERIOD: KeyCode = KeyCode(56);
    pub const ALT_LEFT: KeyCode = KeyCode(57);
    pub const ALT_RIGHT: KeyCode = KeyCode(58);
    pub const SHIFT_LEFT: KeyCode = KeyCode(59);
    pub const SHIFT_RIGHT: KeyCode = KeyCode(60);
    pub const TAB: KeyCode = KeyCode(61);
    pub const SPACE: KeyCode = KeyCode(62);
    pub const ENTER: KeyCode = KeyCode(66);
    pub const DEL: KeyCode = KeyCode(67);
    pub const GRAVE: KeyCode = KeyCode(68);
    pub const MINUS: KeyCode = KeyCode(69);
    pub const EQUALS: KeyCode = KeyCode(70);
    pub const LEFT_BRACKET: KeyCode = KeyCode(71);
    pub const RIGHT_BRACKET: KeyCode = KeyCode(72);
    pub const BACKSLASH: KeyCode = KeyCode(73);
    pub const SEMICOLON: KeyCode = KeyCode(74);
    pub const APOSTROPHE: KeyCode = KeyCode(75);
    pub const SLASH: KeyCode = KeyCode(76);
    pub const AT: KeyCode = KeyCode(77);
    pub const PLUS: KeyCode = KeyCode(81);
    pub const PAGE_UP: KeyCode = KeyCode(92);
    pub const PAGE_DOWN: KeyCode = KeyCode(93);
    pub const ESCAPE: KeyCode = KeyCode(111);
    pub const FORWARD_DEL: KeyCode = KeyCode(112);
    pub const CTRL_LEFT: KeyCode = KeyCode(113);
    pub const CTRL_RIGHT: KeyCode = KeyCode(114);
    pub const MOVE_HOME: KeyCode = KeyCode(122);
    pub const MOVE_END: KeyCode = KeyCode(123);
    pub const INSERT: KeyCode = KeyCode(124);
    pub const F1: KeyCode = KeyCode(131);
    pub const F12: KeyCode = KeyCode(142);
    pub const ZENKAKU_HANKAKU: KeyCode = KeyCode(211);
    pub const EISU: KeyCode = KeyCode(212);
    pub const MUHENKAN: KeyCode = KeyCode(213);
    pub const HENKAN: KeyCode = KeyCode(214);
    pub const KATAKANA_HIRAGANA: KeyCode = KeyCode(215);
    pub const YEN: KeyCode = KeyCode(216);
    pub const RO: KeyCode = KeyCode(217);
    pub const KANA: KeyCode = KeyCode(218);
}
