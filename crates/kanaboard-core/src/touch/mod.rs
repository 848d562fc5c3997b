// Kanaboard Touch Input
// On-screen key model and the gesture recognizer

pub mod codes;
pub mod context;
pub mod gesture;
pub mod key;
pub mod sample;
pub mod timer;

pub use codes::{code, SoftKey};
pub use context::{KeyEventContext, SampleHistory};
pub use gesture::{GestureConfig, GestureEvent, GestureOutput, GestureRecognizer};
pub use key::{FlickDirection, Key, KeyCondition, KeyGeometry};
pub use sample::{PointerId, TouchSample};
pub use timer::{DueTimer, TimerHandle, TimerQueue};
