// Kanaboard Core Library
// Touch gestures, hardware key translation and keyboard mode coordination for a kana IME

pub mod action;
pub mod event;
pub mod hardware;
pub mod input;
pub mod key;
pub mod layout;
pub mod mode;
pub mod modifier;
pub mod session;
pub mod touch;

#[cfg(feature = "settings")]
pub mod replay;
#[cfg(feature = "settings")]
pub mod settings;

pub use action::{KeyAction, TouchAction};
pub use event::{KeyInput, MetaTracker, NormalizedKeyEvent, RawKeyEvent, SpecialKey};
pub use hardware::{
    HardwareKeyboardSpecification, KeyEntry, KeyTable, ModeSwitchSignal, Outcome, TranslatedKey,
};
pub use input::{DeviceConfiguration, KeyboardClass, Orientation};
pub use key::{KeyCode, ScanCode};
pub use layout::{CompositionMode, LayoutFamily, SoftwareLayout};
pub use mode::{
    ActiveSource, ConversionEngine, EngineRequest, HardwarePreference, KeyboardModeCoordinator,
    KeyboardModeState, NarrowPolicy, RecordingEngine, RecordingView, ViewListener,
    ViewNotification,
};
pub use modifier::{MetaState, Modifier, ModifierError, ModifierSet};
pub use session::InputSession;
pub use touch::{
    FlickDirection, GestureConfig, GestureEvent, GestureRecognizer, Key, KeyCondition,
    KeyGeometry, PointerId, SoftKey, TouchSample,
};

#[cfg(feature = "device")]
pub use event::{DeviceError, KeyboardReader};
#[cfg(feature = "settings")]
pub use replay::{Script, ScriptError, Step, StepReport};
#[cfg(feature = "settings")]
pub use settings::{Settings, SettingsError};
