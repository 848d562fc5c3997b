// Kanaboard Hardware Key Translation
// Table-driven translation of physical key events

pub mod spec;
pub mod table;

pub use spec::{HardwareKeyboardSpecification, Outcome, TranslatedKey};
pub use table::{KeyEntry, KeyTable, ModeSwitchSignal, TableKey};
