// Kanaboard Replay Scripts
// TOML scripts of touch, hardware and configuration events driven through a session

#![cfg(feature = "settings")]

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::action::{KeyAction, TouchAction};
use crate::event::RawKeyEvent;
use crate::hardware::Outcome;
use crate::input::{DeviceConfiguration, KeyboardClass, Orientation};
use crate::key::{key_code_for_scan_code, parse_code};
use crate::mode::{ConversionEngine, ViewListener};
use crate::modifier::{MetaState, Modifier, ModifierSet};
use crate::session::InputSession;
use crate::touch::{code, FlickDirection, GestureEvent, Key, KeyGeometry, PointerId, TouchSample};
use crate::{KeyCode, ScanCode};

/// Errors that can occur when loading a replay script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Step {step}: unknown key '{name}'")]
    UnknownKey { step: usize, name: String },

    #[error("Invalid script value: {0}")]
    InvalidValue(String),
}

/// One scripted event
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Pointer down on a named key
    TouchDown { key: String, sample: TouchSample },
    /// Move, up or cancel for a pointer already down
    Touch(TouchSample),
    /// Fire timers due at this time
    Advance(u64),
    Hardware(RawKeyEvent),
    Configure(DeviceConfiguration),
    Reset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::TouchDown { key, sample } => write!(f, "touch {} on '{}'", sample, key),
            Step::Touch(sample) => write!(f, "touch {}", sample),
            Step::Advance(at) => write!(f, "advance @{}ms", at),
            Step::Hardware(raw) => write!(f, "key {}", raw),
            Step::Configure(config) => write!(f, "configure {}", config),
            Step::Reset => write!(f, "reset"),
        }
    }
}

/// What one step produced
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: Step,
    pub gestures: Vec<GestureEvent>,
    /// Set for hardware key steps
    pub outcome: Option<Outcome>,
}

/// A parsed replay script: named software keys plus ordered steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    keys: IndexMap<String, Key>,
    steps: Vec<Step>,
}

// ==================== TOML representation ====================

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ScriptToml {
    #[serde(default)]
    keys: IndexMap<String, KeyToml>,
    #[serde(default)]
    steps: Vec<StepToml>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct KeyToml {
    code: toml::Value,
    #[serde(default)]
    flick: IndexMap<String, toml::Value>,
    #[serde(default)]
    long_press: Option<toml::Value>,
    #[serde(default)]
    repeatable: bool,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default = "default_key_size")]
    width: f32,
    #[serde(default = "default_key_size")]
    height: f32,
}

fn default_key_size() -> f32 {
    100.0
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StepToml {
    Touch {
        action: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        pointer: PointerId,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        at: u64,
    },
    Advance {
        at: u64,
    },
    Key {
        scan: toml::Value,
        #[serde(default)]
        key_code: Option<toml::Value>,
        #[serde(default)]
        action: Option<String>,
        #[serde(default)]
        meta: Vec<String>,
    },
    Configure {
        keyboard: String,
        #[serde(default)]
        present: Option<bool>,
        #[serde(default)]
        orientation: Option<String>,
    },
    Reset,
}

fn parse_soft_code(value: &toml::Value) -> Result<i32, ScriptError> {
    match value {
        toml::Value::Integer(n) => i32::try_from(*n)
            .map_err(|_| ScriptError::InvalidValue(format!("Code out of range: {}", n))),
        toml::Value::String(s) => code::from_name(s)
            .ok_or_else(|| ScriptError::InvalidValue(format!("Unknown key code '{}'", s))),
        other => Err(ScriptError::InvalidValue(format!(
            "Key code must be a string or integer, got {}",
            other
        ))),
    }
}

fn parse_code_value<T: std::str::FromStr + From<u16>>(
    value: &toml::Value,
) -> Result<T, ScriptError> {
    let parsed = match value {
        toml::Value::Integer(n) => u16::try_from(*n).ok().map(T::from),
        toml::Value::String(s) => parse_code::<T>(s),
        _ => None,
    };
    parsed.ok_or_else(|| ScriptError::InvalidValue(format!("Unknown code {}", value)))
}

fn parse_direction(name: &str) -> Result<FlickDirection, ScriptError> {
    match name.to_lowercase().as_str() {
        "up" => Ok(FlickDirection::Up),
        "down" => Ok(FlickDirection::Down),
        "left" => Ok(FlickDirection::Left),
        "right" => Ok(FlickDirection::Right),
        _ => Err(ScriptError::InvalidValue(format!(
            "Unknown flick direction '{}'",
            name
        ))),
    }
}

impl KeyToml {
    fn into_key(self) -> Result<Key, ScriptError> {
        let geometry = KeyGeometry::new(self.x, self.y, self.width, self.height);
        let mut key = Key::new(parse_soft_code(&self.code)?, geometry);
        for (direction, value) in &self.flick {
            key = key.with_flick(parse_direction(direction)?, parse_soft_code(value)?);
        }
        if let Some(value) = &self.long_press {
            key = key.with_long_press(parse_soft_code(value)?);
        }
        if self.repeatable {
            key = key.repeatable();
        }
        Ok(key)
    }
}

impl StepToml {
    fn into_step(self, index: usize, keys: &IndexMap<String, Key>) -> Result<Step, ScriptError> {
        match self {
            StepToml::Touch {
                action,
                key,
                pointer,
                x,
                y,
                at,
            } => {
                let action = parse_touch_action(&action)?;
                let sample = TouchSample::new(pointer, x, y, at, action);
                match (action, key) {
                    (TouchAction::Down, Some(name)) => {
                        if !keys.contains_key(&name) {
                            return Err(ScriptError::UnknownKey { step: index, name });
                        }
                        Ok(Step::TouchDown { key: name, sample })
                    }
                    (TouchAction::Down, None) => Err(ScriptError::InvalidValue(format!(
                        "Step {}: touch down needs a key",
                        index
                    ))),
                    (_, _) => Ok(Step::Touch(sample)),
                }
            }
            StepToml::Advance { at } => Ok(Step::Advance(at)),
            StepToml::Key {
                scan,
                key_code,
                action,
                meta,
            } => {
                let scan_code: ScanCode = parse_code_value(&scan)?;
                let key_code: KeyCode = match key_code {
                    Some(value) => parse_code_value(&value)?,
                    None => key_code_for_scan_code(scan_code),
                };
                let modifiers = meta
                    .iter()
                    .map(|name| Modifier::from_alias(name))
                    .collect::<Result<ModifierSet, _>>()
                    .map_err(|e| ScriptError::InvalidValue(e.to_string()))?;
                let action = match action.as_deref().map(str::to_lowercase).as_deref() {
                    None | Some("down") => KeyAction::Down,
                    Some("up") => KeyAction::Up,
                    Some("repeat") => KeyAction::Repeat,
                    Some(other) => {
                        return Err(ScriptError::InvalidValue(format!(
                            "Unknown key action '{}'",
                            other
                        )))
                    }
                };
                let raw = RawKeyEvent::new(key_code, scan_code, MetaState::from(modifiers));
                Ok(Step::Hardware(match action {
                    KeyAction::Repeat => raw.repeated(1),
                    action => raw.with_action(action),
                }))
            }
            StepToml::Configure {
                keyboard,
                present,
                orientation,
            } => {
                let class = KeyboardClass::from_str(&keyboard).ok_or_else(|| {
                    ScriptError::InvalidValue(format!("Unknown keyboard class '{}'", keyboard))
                })?;
                let mut config = DeviceConfiguration::new().with_keyboard(class);
                if let Some(present) = present {
                    config = config.with_hardware_keyboard(present);
                }
                if let Some(name) = orientation {
                    let orientation = Orientation::from_str(&name).ok_or_else(|| {
                        ScriptError::InvalidValue(format!("Unknown orientation '{}'", name))
                    })?;
                    config = config.with_orientation(orientation);
                }
                Ok(Step::Configure(config))
            }
            StepToml::Reset => Ok(Step::Reset),
        }
    }
}

fn parse_touch_action(name: &str) -> Result<TouchAction, ScriptError> {
    match name.to_lowercase().as_str() {
        "down" => Ok(TouchAction::Down),
        "move" => Ok(TouchAction::Move),
        "up" => Ok(TouchAction::Up),
        "cancel" => Ok(TouchAction::Cancel),
        _ => Err(ScriptError::InvalidValue(format!(
            "Unknown touch action '{}'",
            name
        ))),
    }
}

// ==================== Script ====================

impl Script {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        let parsed: ScriptToml =
            toml::from_str(content).map_err(|e| ScriptError::TomlParse(e.to_string()))?;

        let mut keys = IndexMap::new();
        for (name, key) in parsed.keys {
            keys.insert(name, key.into_key()?);
        }
        let steps = parsed
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| step.into_step(index, &keys))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded script: {} keys, {} steps", keys.len(), steps.len());
        Ok(Self { keys, steps })
    }

    pub fn keys(&self) -> &IndexMap<String, Key> {
        &self.keys
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Drive every step through `session`, in order
    pub fn run<E, V>(&self, session: &mut InputSession<E, V>) -> Vec<StepReport>
    where
        E: ConversionEngine,
        V: ViewListener,
    {
        self.steps
            .iter()
            .map(|step| {
                trace!("Replaying {}", step);
                let mut report = StepReport {
                    step: step.clone(),
                    gestures: Vec::new(),
                    outcome: None,
                };
                match step {
                    Step::TouchDown { key, sample } => {
                        // Names are checked when the script is parsed
                        if let Some(key) = self.keys.get(key) {
                            report.gestures = session.touch(key, sample).into_vec();
                        }
                    }
                    Step::Touch(sample) => {
                        report.gestures = session.touch_pointer(sample).into_vec()
                    }
                    Step::Advance(at) => report.gestures = session.advance(*at).into_vec(),
                    Step::Hardware(raw) => report.outcome = Some(session.hardware_key(raw)),
                    Step::Configure(config) => session.configuration_changed(*config),
                    Step::Reset => session.reset(),
                }
                report
            })
            .collect()
    }
}
