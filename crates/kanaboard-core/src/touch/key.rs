// Kanaboard Touch Keys
// Immutable on-screen key description: geometry, codes and flick states

use indexmap::IndexMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Direction of a flick gesture, in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FlickDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FlickDirection {
    pub fn horizontal(dx: f32) -> Self {
        if dx < 0.0 {
            FlickDirection::Left
        } else {
            FlickDirection::Right
        }
    }

    pub fn vertical(dy: f32) -> Self {
        if dy < 0.0 {
            FlickDirection::Up
        } else {
            FlickDirection::Down
        }
    }
}

/// The condition under which a key state applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCondition {
    Unmodified,
    Flick(FlickDirection),
    LongPress,
}

/// Position and size of a key in keyboard coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl KeyGeometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometry of a key at the origin
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Center in the key's local coordinate space
    pub fn local_center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether flick thresholds can be computed at all
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A software keyboard key.
///
/// Codes are software key codes: positive values are Unicode code points,
/// negative values are virtual keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    geometry: KeyGeometry,
    primary_code: i32,
    repeatable: bool,
    states: IndexMap<KeyCondition, i32>,
}

impl Key {
    pub fn new(primary_code: i32, geometry: KeyGeometry) -> Self {
        let mut states = IndexMap::new();
        states.insert(KeyCondition::Unmodified, primary_code);
        Self {
            geometry,
            primary_code,
            repeatable: false,
            states,
        }
    }

    /// A key whose primary code is a character
    pub fn char(c: char, geometry: KeyGeometry) -> Self {
        Self::new(c as i32, geometry)
    }

    /// Flick key with its center character and the Up/Down/Left/Right outputs
    pub fn flick(
        center: char,
        up: char,
        down: char,
        left: char,
        right: char,
        geometry: KeyGeometry,
    ) -> Self {
        Self::char(center, geometry)
            .with_flick(FlickDirection::Up, up as i32)
            .with_flick(FlickDirection::Down, down as i32)
            .with_flick(FlickDirection::Left, left as i32)
            .with_flick(FlickDirection::Right, right as i32)
    }

    pub fn with_state(mut self, condition: KeyCondition, code: i32) -> Self {
        self.states.insert(condition, code);
        self
    }

    pub fn with_flick(self, direction: FlickDirection, code: i32) -> Self {
        self.with_state(KeyCondition::Flick(direction), code)
    }

    pub fn with_long_press(self, code: i32) -> Self {
        self.with_state(KeyCondition::LongPress, code)
    }

    /// Mark the key as auto-repeating while held (e.g. backspace)
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn geometry(&self) -> &KeyGeometry {
        &self.geometry
    }

    pub fn primary_code(&self) -> i32 {
        self.primary_code
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Output code of the state for `condition`, if the key defines one
    pub fn code_for(&self, condition: KeyCondition) -> Option<i32> {
        self.states.get(&condition).copied()
    }

    /// Output of a plain tap
    pub fn tap_code(&self) -> i32 {
        self.code_for(KeyCondition::Unmodified).unwrap_or(self.primary_code)
    }

    /// Output of a flick, falling back to the primary code
    pub fn flick_code(&self, direction: FlickDirection) -> i32 {
        self.code_for(KeyCondition::Flick(direction)).unwrap_or(self.primary_code)
    }

    /// All states in definition order
    pub fn states(&self) -> impl Iterator<Item = (KeyCondition, i32)> + '_ {
        self.states.iter().map(|(condition, code)| (*condition, *code))
    }
}
