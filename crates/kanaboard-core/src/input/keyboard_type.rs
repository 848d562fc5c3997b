// Kanaboard Input Layer - Device Configuration
// Physical keyboard class, orientation and the configuration snapshot

use crate::key::scan;
use crate::ScanCode;

/// Physical keyboard class reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardClass {
    /// The platform did not report a class
    #[default]
    Undefined,
    /// No physical keys at all
    NoKeys,
    /// Full alphanumeric keyboard
    Qwerty,
    /// Numeric keypad (phone-style 3x4)
    TwelveKey,
}

impl KeyboardClass {
    /// Convert from the platform's integer keyboard class
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => KeyboardClass::NoKeys,
            2 => KeyboardClass::Qwerty,
            3 => KeyboardClass::TwelveKey,
            _ => KeyboardClass::Undefined,
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            KeyboardClass::Undefined => 0,
            KeyboardClass::NoKeys => 1,
            KeyboardClass::Qwerty => 2,
            KeyboardClass::TwelveKey => 3,
        }
    }

    /// Convert string to KeyboardClass
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "undefined" | "unknown" => Some(KeyboardClass::Undefined),
            "nokeys" | "no_keys" | "none" => Some(KeyboardClass::NoKeys),
            "qwerty" | "full" => Some(KeyboardClass::Qwerty),
            "twelve_key" | "12key" | "numeric" => Some(KeyboardClass::TwelveKey),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyboardClass::Undefined => "undefined",
            KeyboardClass::NoKeys => "no_keys",
            KeyboardClass::Qwerty => "qwerty",
            KeyboardClass::TwelveKey => "twelve_key",
        }
    }

    /// Whether the class describes a keyboard that can type
    pub fn has_keys(&self) -> bool {
        matches!(self, KeyboardClass::Qwerty | KeyboardClass::TwelveKey)
    }

    /// Classify a physical keyboard from the scan codes it can report.
    ///
    /// A full letter block makes a QWERTY keyboard; a digit row without
    /// letters makes a twelve-key pad.
    pub fn from_supported_keys(keys: &[ScanCode]) -> Self {
        const LETTERS: &[ScanCode] = &[
            ScanCode(16), // Q
            ScanCode(17), // W
            ScanCode(18), // E
            scan::A,
            scan::Z,
            scan::SPACE,
        ];
        let has = |code: &ScanCode| keys.contains(code);
        if LETTERS.iter().all(has) {
            KeyboardClass::Qwerty
        } else if (scan::KEY_1.code()..=scan::KEY_0.code())
            .map(ScanCode)
            .all(|code| has(&code))
        {
            KeyboardClass::TwelveKey
        } else {
            KeyboardClass::NoKeys
        }
    }
}

impl std::fmt::Display for KeyboardClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the device configuration delivered on every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceConfiguration {
    /// Class of the attached physical keyboard
    pub keyboard: KeyboardClass,
    /// Whether a physical keyboard is currently exposed to the user
    pub hardware_keyboard: bool,
    pub orientation: Orientation,
}

impl DeviceConfiguration {
    /// Configuration with no physical keyboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with an attached keyboard of the given class
    pub fn with_keyboard(mut self, keyboard: KeyboardClass) -> Self {
        self.keyboard = keyboard;
        self.hardware_keyboard = keyboard.has_keys();
        self
    }

    /// Override whether the keyboard is exposed (e.g. a slide-out keyboard closed)
    pub fn with_hardware_keyboard(mut self, present: bool) -> Self {
        self.hardware_keyboard = present;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

impl std::fmt::Display for DeviceConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "keyboard={} present={} orientation={}",
            self.keyboard, self.hardware_keyboard, self.orientation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_class_from_i32() {
        assert_eq!(KeyboardClass::from_i32(0), KeyboardClass::Undefined);
        assert_eq!(KeyboardClass::from_i32(1), KeyboardClass::NoKeys);
        assert_eq!(KeyboardClass::from_i32(2), KeyboardClass::Qwerty);
        assert_eq!(KeyboardClass::from_i32(3), KeyboardClass::TwelveKey);
        assert_eq!(KeyboardClass::from_i32(42), KeyboardClass::Undefined);
        assert_eq!(KeyboardClass::from_i32(-1), KeyboardClass::Undefined);
    }

    #[test]
    fn test_keyboard_class_round_trip() {
        for class in [
            KeyboardClass::Undefined,
            KeyboardClass::NoKeys,
            KeyboardClass::Qwerty,
            KeyboardClass::TwelveKey,
        ] {
            assert_eq!(KeyboardClass::from_i32(class.to_i32()), class);
            assert_eq!(KeyboardClass::from_str(class.as_str()), Some(class));
        }
    }

    #[test]
    fn test_keyboard_class_from_str_aliases() {
        assert_eq!(KeyboardClass::from_str("QWERTY"), Some(KeyboardClass::Qwerty));
        assert_eq!(KeyboardClass::from_str("12key"), Some(KeyboardClass::TwelveKey));
        assert_eq!(KeyboardClass::from_str("none"), Some(KeyboardClass::NoKeys));
        assert_eq!(KeyboardClass::from_str("dvorak"), None);
    }

    #[test]
    fn test_keyboard_class_from_supported_keys() {
        let full: Vec<ScanCode> = (1..=126).map(ScanCode).collect();
        assert_eq!(KeyboardClass::from_supported_keys(&full), KeyboardClass::Qwerty);

        let pad: Vec<ScanCode> = (2..=11).map(ScanCode).chain([scan::ENTER]).collect();
        assert_eq!(KeyboardClass::from_supported_keys(&pad), KeyboardClass::TwelveKey);

        let media = [ScanCode(113), ScanCode(114), ScanCode(115)];
        assert_eq!(KeyboardClass::from_supported_keys(&media), KeyboardClass::NoKeys);
        assert_eq!(KeyboardClass::from_supported_keys(&[]), KeyboardClass::NoKeys);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!(Orientation::from_str("Landscape"), Some(Orientation::Landscape));
        assert_eq!(Orientation::from_str("sideways"), None);
        assert_eq!(Orientation::Portrait.to_string(), "portrait");
    }

    #[test]
    fn test_configuration_builder() {
        let config = DeviceConfiguration::new();
        assert!(!config.hardware_keyboard);
        assert_eq!(config.keyboard, KeyboardClass::Undefined);

        let config = DeviceConfiguration::new()
            .with_keyboard(KeyboardClass::Qwerty)
            .with_orientation(Orientation::Landscape);
        assert!(config.hardware_keyboard);
        assert_eq!(config.orientation, Orientation::Landscape);

        let hidden = config.with_hardware_keyboard(false);
        assert_eq!(hidden.keyboard, KeyboardClass::Qwerty);
        assert!(!hidden.hardware_keyboard);
    }

    #[test]
    fn test_configuration_display() {
        let config = DeviceConfiguration::new().with_keyboard(KeyboardClass::TwelveKey);
        assert_eq!(
            config.to_string(),
            "keyboard=twelve_key present=true orientation=portrait"
        );
    }
}
