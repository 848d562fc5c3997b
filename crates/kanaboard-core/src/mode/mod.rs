// Kanaboard Keyboard Mode
// Mode state, the coordinator and its collaborator contracts

pub mod collaborator;
pub mod coordinator;
pub mod state;

pub use collaborator::{
    ConversionEngine, EngineRequest, RecordingEngine, RecordingView, ViewListener,
    ViewNotification,
};
pub use coordinator::KeyboardModeCoordinator;
pub use state::{ActiveSource, HardwarePreference, KeyboardModeState, NarrowPolicy};
