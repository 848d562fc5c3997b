// Kanaboard Keyboard Mode State
// Session-wide composition mode, input source and layout selection

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::hardware::HardwareKeyboardSpecification;
use crate::layout::{CompositionMode, LayoutFamily, SoftwareLayout};

/// Which keyboard the user is typing on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActiveSource {
    #[default]
    Software,
    Hardware,
}

/// What drives the narrow display flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NarrowPolicy {
    /// Any hardware keystroke narrows the display
    Keystroke,
    /// Narrow exactly while a hardware keyboard is reported present
    #[default]
    Configuration,
}

/// User choice of hardware layout, read from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HardwarePreference {
    /// Pinned layout; overrides the one derived from the keyboard class
    pub pinned: Option<HardwareKeyboardSpecification>,
    /// Use the key-code driven layout when the class gives none
    pub force_default: bool,
}

impl HardwarePreference {
    pub fn pinned(spec: HardwareKeyboardSpecification) -> Self {
        Self {
            pinned: Some(spec),
            force_default: false,
        }
    }
}

/// State owned by the coordinator for one input session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardModeState {
    pub mode: CompositionMode,
    pub source: ActiveSource,
    pub hardware: Option<HardwareKeyboardSpecification>,
    pub software_layout: SoftwareLayout,
    pub narrow: bool,
}

impl KeyboardModeState {
    /// The specification used to translate hardware keys
    pub fn effective_hardware(&self) -> HardwareKeyboardSpecification {
        self.hardware
            .unwrap_or(HardwareKeyboardSpecification::Default)
    }
}

impl Default for KeyboardModeState {
    fn default() -> Self {
        Self {
            mode: CompositionMode::NativeScript,
            source: ActiveSource::Software,
            hardware: None,
            software_layout: SoftwareLayout::new(
                LayoutFamily::TwelveKey,
                CompositionMode::NativeScript,
            ),
            narrow: false,
        }
    }
}

impl fmt::Display for KeyboardModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hardware = self.hardware.map_or("none", |spec| spec.into());
        write!(
            f,
            "mode={} source={} hardware={} layout={} narrow={}",
            self.mode, self.source, hardware, self.software_layout, self.narrow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_initial_state() {
        let state = KeyboardModeState::default();
        assert_eq!(state.mode, CompositionMode::NativeScript);
        assert_eq!(state.source, ActiveSource::Software);
        assert_eq!(state.hardware, None);
        assert_eq!(state.software_layout.family, LayoutFamily::TwelveKey);
        assert!(!state.narrow);
        assert_eq!(state.effective_hardware(), HardwareKeyboardSpecification::Default);
    }

    #[test]
    fn test_display() {
        let state = KeyboardModeState {
            hardware: Some(HardwareKeyboardSpecification::Japanese109A),
            ..Default::default()
        };
        assert_eq!(
            state.to_string(),
            "mode=native_script source=software hardware=japanese109a layout=twelve_key/native_script narrow=false"
        );
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(NarrowPolicy::from_str("keystroke"), Ok(NarrowPolicy::Keystroke));
        assert_eq!(NarrowPolicy::from_str("Configuration"), Ok(NarrowPolicy::Configuration));
        assert!(NarrowPolicy::from_str("always").is_err());
        assert_eq!(NarrowPolicy::default(), NarrowPolicy::Configuration);
    }
}
