use std::fmt;

/// The phase of a touch sample.
///
/// The integer values are the platform's motion-event actions:
///   0 == 'down'
///   1 == 'up'
///   2 == 'move'
///   3 == 'cancel'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TouchAction {
    Down = 0,
    Up = 1,
    Move = 2,
    Cancel = 3,
}

impl TouchAction {
    /// Returns true if this sample ends the gesture (UP or CANCEL)
    pub fn ends_gesture(self) -> bool {
        matches!(self, TouchAction::Up | TouchAction::Cancel)
    }

    /// Create TouchAction from the platform's integer action
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TouchAction::Down),
            1 => Some(TouchAction::Up),
            2 => Some(TouchAction::Move),
            3 => Some(TouchAction::Cancel),
            _ => None,
        }
    }

    /// Convert TouchAction to its i32 representation
    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for TouchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchAction::Down => write!(f, "down"),
            TouchAction::Up => write!(f, "up"),
            TouchAction::Move => write!(f, "move"),
            TouchAction::Cancel => write!(f, "cancel"),
        }
    }
}

/// Whether a physical key went down, auto-repeated while held, or went up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum KeyAction {
    #[default]
    Down = 0,
    Up = 1,
    Repeat = 2,
}

impl KeyAction {
    /// True while the key is held: the initial press and every repeat
    pub fn is_down(self) -> bool {
        matches!(self, KeyAction::Down | KeyAction::Repeat)
    }

    pub fn is_repeat(self) -> bool {
        matches!(self, KeyAction::Repeat)
    }

    /// Create KeyAction from an evdev value (0 = release, 1 = press, 2 = repeat)
    pub fn from_evdev_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyAction::Up),
            1 => Some(KeyAction::Down),
            2 => Some(KeyAction::Repeat),
            _ => None,
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Down => write!(f, "down"),
            KeyAction::Up => write!(f, "up"),
            KeyAction::Repeat => write!(f, "repeat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_action_from_i32() {
        assert_eq!(TouchAction::from_i32(0), Some(TouchAction::Down));
        assert_eq!(TouchAction::from_i32(1), Some(TouchAction::Up));
        assert_eq!(TouchAction::from_i32(2), Some(TouchAction::Move));
        assert_eq!(TouchAction::from_i32(3), Some(TouchAction::Cancel));
        assert_eq!(TouchAction::from_i32(4), None);
    }

    #[test]
    fn test_touch_action_to_i32() {
        assert_eq!(TouchAction::Down.to_i32(), 0);
        assert_eq!(TouchAction::Cancel.to_i32(), 3);
    }

    #[test]
    fn test_ends_gesture() {
        assert!(TouchAction::Up.ends_gesture());
        assert!(TouchAction::Cancel.ends_gesture());
        assert!(!TouchAction::Down.ends_gesture());
        assert!(!TouchAction::Move.ends_gesture());
    }

    #[test]
    fn test_key_action_from_evdev() {
        assert_eq!(KeyAction::from_evdev_value(0), Some(KeyAction::Up));
        assert_eq!(KeyAction::from_evdev_value(1), Some(KeyAction::Down));
        assert_eq!(KeyAction::from_evdev_value(2), Some(KeyAction::Repeat));
        assert_eq!(KeyAction::from_evdev_value(7), None);
    }

    #[test]
    fn test_repeat_is_still_down() {
        assert!(KeyAction::Repeat.is_down());
        assert!(KeyAction::Repeat.is_repeat());
        assert!(!KeyAction::Down.is_repeat());
        assert!(!KeyAction::Up.is_down());
    }
}
