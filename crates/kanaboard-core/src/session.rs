// Kanaboard Input Session
// Couples the gesture recognizer with the mode coordinator for one input session

use log::debug;

use crate::event::RawKeyEvent;
use crate::hardware::Outcome;
use crate::input::DeviceConfiguration;
use crate::mode::{
    ConversionEngine, HardwarePreference, KeyboardModeCoordinator, KeyboardModeState,
    NarrowPolicy, ViewListener,
};
use crate::touch::{GestureConfig, GestureOutput, GestureRecognizer, Key, TouchSample};

/// One input session: touch samples and hardware keys in, engine requests
/// and view notifications out.
///
/// Everything runs on the caller's thread. Timers are driven by
/// [`InputSession::advance`] or by the timestamps of later touch samples.
pub struct InputSession<E, V> {
    recognizer: GestureRecognizer,
    coordinator: KeyboardModeCoordinator<E, V>,
}

impl<E: ConversionEngine, V: ViewListener> InputSession<E, V> {
    pub fn new(engine: E, view: V) -> Self {
        Self {
            recognizer: GestureRecognizer::default(),
            coordinator: KeyboardModeCoordinator::new(engine, view),
        }
    }

    /// Build a session configured from user settings
    #[cfg(feature = "settings")]
    pub fn from_settings(engine: E, view: V, settings: &crate::settings::Settings) -> Self {
        Self::new(engine, view)
            .with_gesture_config(settings.gesture_config())
            .with_preference(settings.hardware_preference())
            .with_narrow_policy(settings.narrow_policy())
    }

    pub fn with_gesture_config(mut self, config: GestureConfig) -> Self {
        self.recognizer = GestureRecognizer::new(config);
        self
    }

    pub fn with_preference(mut self, preference: HardwarePreference) -> Self {
        self.coordinator = self.coordinator.with_preference(preference);
        self
    }

    pub fn with_narrow_policy(mut self, policy: NarrowPolicy) -> Self {
        self.coordinator = self.coordinator.with_narrow_policy(policy);
        self
    }

    pub fn state(&self) -> &KeyboardModeState {
        self.coordinator.state()
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn coordinator(&self) -> &KeyboardModeCoordinator<E, V> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut KeyboardModeCoordinator<E, V> {
        &mut self.coordinator
    }

    pub fn engine(&self) -> &E {
        self.coordinator.engine()
    }

    pub fn view(&self) -> &V {
        self.coordinator.view()
    }

    /// When the next long-press or repeat timer is due
    pub fn next_deadline(&self) -> Option<u64> {
        self.recognizer.next_deadline()
    }

    /// Feed one touch sample on `key`. The recognizer's outputs are routed
    /// to the coordinator and returned.
    pub fn touch(&mut self, key: &Key, sample: &TouchSample) -> GestureOutput {
        let out = self.recognizer.process(key, sample);
        self.dispatch(&out);
        out
    }

    /// Feed a move, up or cancel sample for a pointer already down
    pub fn touch_pointer(&mut self, sample: &TouchSample) -> GestureOutput {
        let out = self.recognizer.process_pointer(sample);
        self.dispatch(&out);
        out
    }

    /// Fire timers due at `now`
    pub fn advance(&mut self, now: u64) -> GestureOutput {
        let out = self.recognizer.advance(now);
        self.dispatch(&out);
        out
    }

    pub fn hardware_key(&mut self, raw: &RawKeyEvent) -> Outcome {
        self.coordinator.on_hardware_key(raw)
    }

    pub fn configuration_changed(&mut self, config: DeviceConfiguration) {
        self.coordinator.on_configuration_changed(config);
    }

    /// Drop in-flight gestures and return to the initial mode state
    pub fn reset(&mut self) {
        debug!("Resetting input session");
        self.recognizer.reset();
        self.coordinator.reset();
    }

    pub fn into_parts(self) -> (E, V) {
        self.coordinator.into_parts()
    }

    fn dispatch(&mut self, out: &GestureOutput) {
        for event in out {
            self.coordinator.on_gesture_event(event);
        }
    }
}
