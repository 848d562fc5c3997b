// Kanaboard Modifier System
// Modifier tags (Shift, Alt, Ctrl), modifier sets and the platform meta-state bitmask

use std::fmt;
use std::ops::BitOr;

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::key::{keycode, scan};
use crate::{KeyCode, ScanCode};

/// A modifier tag carried by a normalized key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Modifier {
    Shift,
    Alt,
    Ctrl,
}

impl Modifier {
    const fn bit(self) -> u8 {
        match self {
            Modifier::Shift => 0b001,
            Modifier::Alt => 0b010,
            Modifier::Ctrl => 0b100,
        }
    }

    /// Look up a modifier by name or alias (case-insensitive)
    pub fn from_alias(alias: &str) -> Result<Self, ModifierError> {
        match alias.trim().to_lowercase().as_str() {
            "shift" | "s" => Ok(Modifier::Shift),
            "alt" | "a" | "opt" | "option" => Ok(Modifier::Alt),
            "ctrl" | "c" | "control" => Ok(Modifier::Ctrl),
            _ => Err(ModifierError::UnknownAlias(alias.to_string())),
        }
    }

    /// The modifier a physical key position represents, if any
    pub fn from_scan_code(code: ScanCode) -> Option<Self> {
        match code {
            scan::LEFT_SHIFT | scan::RIGHT_SHIFT => Some(Modifier::Shift),
            scan::LEFT_ALT | scan::RIGHT_ALT => Some(Modifier::Alt),
            scan::LEFT_CTRL | scan::RIGHT_CTRL => Some(Modifier::Ctrl),
            _ => None,
        }
    }

    /// The modifier a platform key code represents, if any
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            keycode::SHIFT_LEFT | keycode::SHIFT_RIGHT => Some(Modifier::Shift),
            keycode::ALT_LEFT | keycode::ALT_RIGHT => Some(Modifier::Alt),
            keycode::CTRL_LEFT | keycode::CTRL_RIGHT => Some(Modifier::Ctrl),
            _ => None,
        }
    }

    /// The meta-state bits the platform sets while this modifier is held
    pub fn meta_state(self) -> MetaState {
        match self {
            Modifier::Shift => MetaState::SHIFT_ON,
            Modifier::Alt => MetaState::ALT_ON,
            Modifier::Ctrl => MetaState::CTRL_ON,
        }
    }
}

/// Errors that can occur when resolving modifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModifierError {
    #[error("Unknown modifier alias: {0}")]
    UnknownAlias(String),
}

/// An unordered, duplicate-free set of modifiers
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const EMPTY: ModifierSet = ModifierSet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Modifiers in Shift, Alt, Ctrl order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        use strum::IntoEnumIterator;
        Modifier::iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = ModifierSet::EMPTY;
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl BitOr for ModifierSet {
    type Output = ModifierSet;

    fn bitor(self, rhs: ModifierSet) -> ModifierSet {
        ModifierSet(self.0 | rhs.0)
    }
}

impl From<Modifier> for ModifierSet {
    fn from(modifier: Modifier) -> Self {
        ModifierSet(modifier.bit())
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.iter().map(|m| m.into()).collect();
        write!(f, "{}", names.join("|"))
    }
}

/// The platform's modifier bitmask as attached to a physical key event.
///
/// Bit values follow the platform's `META_*` constants; the generic
/// `*_ON` bit is set whenever either side is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct MetaState(pub u32);

impl MetaState {
    pub const NONE: MetaState = MetaState(0);
    pub const SHIFT_ON: MetaState = MetaState(0x1);
    pub const ALT_ON: MetaState = MetaState(0x2);
    pub const ALT_LEFT_ON: MetaState = MetaState(0x10);
    pub const ALT_RIGHT_ON: MetaState = MetaState(0x20);
    pub const SHIFT_LEFT_ON: MetaState = MetaState(0x40);
    pub const SHIFT_RIGHT_ON: MetaState = MetaState(0x80);
    pub const CTRL_ON: MetaState = MetaState(0x1000);
    pub const CTRL_LEFT_ON: MetaState = MetaState(0x2000);
    pub const CTRL_RIGHT_ON: MetaState = MetaState(0x4000);

    const SHIFT_MASK: u32 = 0x1 | 0x40 | 0x80;
    const ALT_MASK: u32 = 0x2 | 0x10 | 0x20;
    const CTRL_MASK: u32 = 0x1000 | 0x2000 | 0x4000;

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn has_shift(self) -> bool {
        self.0 & Self::SHIFT_MASK != 0
    }

    pub fn has_alt(self) -> bool {
        self.0 & Self::ALT_MASK != 0
    }

    pub fn has_ctrl(self) -> bool {
        self.0 & Self::CTRL_MASK != 0
    }

    /// Every modifier whose bits are present in the mask
    pub fn modifiers(self) -> ModifierSet {
        let mut set = ModifierSet::EMPTY;
        if self.has_shift() {
            set.insert(Modifier::Shift);
        }
        if self.has_alt() {
            set.insert(Modifier::Alt);
        }
        if self.has_ctrl() {
            set.insert(Modifier::Ctrl);
        }
        set
    }
}

impl BitOr for MetaState {
    type Output = MetaState;

    fn bitor(self, rhs: MetaState) -> MetaState {
        MetaState(self.0 | rhs.0)
    }
}

impl From<u32> for MetaState {
    fn from(bits: u32) -> Self {
        MetaState(bits)
    }
}

impl From<ModifierSet> for MetaState {
    fn from(set: ModifierSet) -> Self {
        set.iter()
            .fold(MetaState::NONE, |acc, m| acc | m.meta_state())
    }
}
