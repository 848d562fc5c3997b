// Kanaboard Software Layouts
// Composition mode and the on-screen keyboard layout descriptors

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Whether typed input is composed as native script (kana) or Latin text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompositionMode {
    #[default]
    NativeScript,
    Latin,
}

impl CompositionMode {
    pub fn toggled(self) -> Self {
        match self {
            CompositionMode::NativeScript => CompositionMode::Latin,
            CompositionMode::Latin => CompositionMode::NativeScript,
        }
    }
}

/// A family of on-screen keyboards that come in a native and a Latin variant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LayoutFamily {
    /// Phone-style 3x4 keypad with flick input
    #[default]
    TwelveKey,
    Qwerty,
    /// Compact keyboard shown while a full hardware keyboard is in use
    HardwareQwerty,
    /// Compact keyboard shown while a numeric-pad hardware keyboard is in use
    HardwareTwelveKey,
}

/// Descriptor of the software keyboard layout the view should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SoftwareLayout {
    pub family: LayoutFamily,
    pub mode: CompositionMode,
}

impl SoftwareLayout {
    pub const fn new(family: LayoutFamily, mode: CompositionMode) -> Self {
        Self { family, mode }
    }

    /// The same family in the given composition mode
    pub fn with_mode(self, mode: CompositionMode) -> Self {
        Self {
            family: self.family,
            mode,
        }
    }

    /// The same family in the other composition mode
    pub fn toggled(self) -> Self {
        self.with_mode(self.mode.toggled())
    }
}

impl fmt::Display for SoftwareLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.mode)
    }
}
