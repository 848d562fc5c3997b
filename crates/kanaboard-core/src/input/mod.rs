// Kanaboard Input Layer
// Device configuration reported by the platform

pub mod keyboard_type;

pub use keyboard_type::{DeviceConfiguration, KeyboardClass, Orientation};
