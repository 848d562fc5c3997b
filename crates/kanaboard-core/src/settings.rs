// Kanaboard Settings Module
// User preferences: pinned hardware layout, gesture tunables and display policy

#![cfg(feature = "settings")]

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::hardware::HardwareKeyboardSpecification;
use crate::mode::{HardwarePreference, NarrowPolicy};
use crate::touch::GestureConfig;

/// Settings read at session start and on configuration changes.
///
/// Loaded from a TOML file (default: ~/.config/kanaboard/settings.toml).
/// This core never writes the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    preference: HardwarePreference,
    gesture: GestureConfig,
    narrow_policy: NarrowPolicy,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    hardware: Option<HardwareSettings>,

    #[serde(default)]
    touch: Option<TouchSettings>,

    #[serde(default)]
    display: Option<DisplaySettings>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct HardwareSettings {
    #[serde(default)]
    layout: Option<String>,
    #[serde(default)]
    force_default: Option<toml::Value>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct TouchSettings {
    #[serde(default)]
    flick_threshold_ratio: Option<f64>,
    #[serde(default)]
    long_press_delay_ms: Option<u64>,
    #[serde(default)]
    repeat_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct DisplaySettings {
    #[serde(default)]
    narrow_policy: Option<String>,
}

impl Settings {
    /// Create settings with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(hardware) = toml_settings.hardware {
            if let Some(name) = hardware.layout {
                let spec = HardwareKeyboardSpecification::from_str(name.trim()).map_err(|_| {
                    SettingsError::InvalidValue(format!("Unknown hardware layout '{}'", name))
                })?;
                settings.preference.pinned = Some(spec);
            }
            if let Some(value) = hardware.force_default {
                settings.preference.force_default = parse_bool_value(&value)?;
            }
        }

        if let Some(touch) = toml_settings.touch {
            if let Some(ratio) = touch.flick_threshold_ratio {
                if !ratio.is_finite() || ratio <= 0.0 {
                    return Err(SettingsError::InvalidValue(format!(
                        "flick_threshold_ratio must be positive, got {}",
                        ratio
                    )));
                }
                settings.gesture.flick_threshold_ratio = ratio as f32;
            }
            if let Some(delay) = touch.long_press_delay_ms {
                settings.gesture.long_press_delay = Duration::from_millis(delay);
            }
            if let Some(interval) = touch.repeat_interval_ms {
                if interval == 0 {
                    return Err(SettingsError::InvalidValue(
                        "repeat_interval_ms must be positive".to_string(),
                    ));
                }
                settings.gesture.repeat_interval = Duration::from_millis(interval);
            }
        }

        if let Some(display) = toml_settings.display {
            if let Some(policy) = display.narrow_policy {
                settings.narrow_policy = NarrowPolicy::from_str(policy.trim()).map_err(|_| {
                    SettingsError::InvalidValue(format!("Unknown narrow policy '{}'", policy))
                })?;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kanaboard").join("settings.toml"))
    }

    /// Load from default location (~/.config/kanaboard/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }

    pub fn hardware_preference(&self) -> HardwarePreference {
        self.preference
    }

    pub fn gesture_config(&self) -> GestureConfig {
        self.gesture
    }

    pub fn narrow_policy(&self) -> NarrowPolicy {
        self.narrow_policy
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Pin a hardware layout, as a command-line override would
    pub fn set_pinned_layout(&mut self, spec: Option<HardwareKeyboardSpecification>) {
        self.preference.pinned = spec;
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pinned = self.preference.pinned.map_or("auto", |spec| spec.into());
        writeln!(f, "[hardware]")?;
        writeln!(f, "layout = {}", pinned)?;
        writeln!(f, "force_default = {}", self.preference.force_default)?;
        writeln!(f, "[touch]")?;
        writeln!(f, "flick_threshold_ratio = {}", self.gesture.flick_threshold_ratio)?;
        writeln!(
            f,
            "long_press_delay_ms = {}",
            self.gesture.long_press_delay.as_millis()
        )?;
        writeln!(
            f,
            "repeat_interval_ms = {}",
            self.gesture.repeat_interval.as_millis()
        )?;
        writeln!(f, "[display]")?;
        write!(f, "narrow_policy = {}", self.narrow_policy)
    }
}

/// Parse a TOML value as a boolean
fn parse_bool_value(value: &toml::Value) -> Result<bool, SettingsError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(SettingsError::InvalidValue(format!(
                "Cannot convert '{}' to boolean",
                s
            ))),
        },
        _ => Err(SettingsError::InvalidValue(format!(
            "Cannot convert {:?} to boolean",
            value
        ))),
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Kanaboard Settings
# Place this file at: ~/.config/kanaboard/settings.toml

[hardware]
# Pin the hardware keyboard layout instead of deriving it from the device.
# Valid values: "default", "japanese109a", "twelve_key"
# layout = "japanese109a"

# Use the key-code driven layout when the device reports no keyboard class
force_default = false

[touch]
# Fraction of a key's width/height a drag must exceed to count as a flick
flick_threshold_ratio = 0.5
long_press_delay_ms = 400
repeat_interval_ms = 50

[display]
# "configuration": narrow while a hardware keyboard is attached
# "keystroke": narrow after the first hardware keystroke
narrow_policy = "configuration"
"#
}
