// Kanaboard Event Handling
// Raw and normalized key events, meta-state tracking and the device reader

pub mod meta;
pub mod normalized;
pub mod raw;
#[cfg(feature = "device")]
pub mod reader;

pub use meta::MetaTracker;
pub use normalized::{KeyInput, NormalizedKeyEvent, SpecialKey};
pub use raw::RawKeyEvent;
#[cfg(feature = "device")]
pub use reader::{list_keyboards, DeviceError, DeviceResult, KeyboardReader};
