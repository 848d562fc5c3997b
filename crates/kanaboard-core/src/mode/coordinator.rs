// Kanaboard Keyboard Mode Coordinator
// Reconciles composition mode, input source and layout across input sources

use log::debug;

use super::collaborator::{ConversionEngine, ViewListener};
use super::state::{ActiveSource, HardwarePreference, KeyboardModeState, NarrowPolicy};
use crate::event::RawKeyEvent;
use crate::hardware::{HardwareKeyboardSpecification, ModeSwitchSignal, Outcome};
use crate::input::DeviceConfiguration;
use crate::layout::{CompositionMode, LayoutFamily, SoftwareLayout};
use crate::touch::{GestureEvent, SoftKey, TouchSample};

/// Owner of [`KeyboardModeState`].
///
/// Every transition runs to completion on the caller's thread; requests to
/// the engine and view are issued inline and never awaited.
#[derive(Debug)]
pub struct KeyboardModeCoordinator<E, V> {
    state: KeyboardModeState,
    policy: NarrowPolicy,
    preference: HardwarePreference,
    config: DeviceConfiguration,
    engine: E,
    view: V,
}

impl<E: ConversionEngine, V: ViewListener> KeyboardModeCoordinator<E, V> {
    pub fn new(engine: E, view: V) -> Self {
        Self {
            state: KeyboardModeState::default(),
            policy: NarrowPolicy::default(),
            preference: HardwarePreference::default(),
            config: DeviceConfiguration::default(),
            engine,
            view,
        }
    }

    pub fn with_narrow_policy(mut self, policy: NarrowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_preference(mut self, preference: HardwarePreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn state(&self) -> &KeyboardModeState {
        &self.state
    }

    pub fn narrow_policy(&self) -> NarrowPolicy {
        self.policy
    }

    pub fn configuration(&self) -> &DeviceConfiguration {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Replace the hardware preference; takes effect at the next
    /// configuration change.
    pub fn set_preference(&mut self, preference: HardwarePreference) {
        self.preference = preference;
    }

    /// Restore the initial state at session teardown.
    pub fn reset(&mut self) {
        debug!("Resetting keyboard mode state");
        self.state = KeyboardModeState::default();
        self.config = DeviceConfiguration::default();
    }

    pub fn into_parts(self) -> (E, V) {
        (self.engine, self.view)
    }

    // ==================== Software keys ====================

    /// A committed software key code with the touches that produced it.
    pub fn on_software_key(&mut self, code: i32, touches: &[TouchSample]) {
        self.set_source(ActiveSource::Software);
        match SoftKey::from_code(code) {
            SoftKey::Input(event) => self.engine.send_key(&event, None, touches),
            SoftKey::SwitchLayout(layout) => self.switch_software_layout(layout),
            SoftKey::ToggleCharType => {
                self.switch_software_layout(self.state.software_layout.toggled())
            }
            SoftKey::Widen => {
                if self.state.narrow {
                    self.state.narrow = false;
                    debug!("Leaving narrow display");
                    self.notify_layout();
                }
            }
            SoftKey::Unknown(code) => debug!("Ignoring unknown software code {}", code),
        }
    }

    fn switch_software_layout(&mut self, layout: SoftwareLayout) {
        debug!("Software layout {} -> {}", self.state.software_layout, layout);
        self.state.software_layout = layout;
        self.state.mode = layout.mode;
        self.engine.update_request(layout, &self.config);
        self.engine.switch_input_mode(None, layout.mode);
        self.notify_layout();
    }

    /// Route one recognizer output.
    pub fn on_gesture_event(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::PressFeedback { code, .. } => self.view.on_press_feedback(*code),
            GestureEvent::ReleaseFeedback { code, .. } => self.view.on_release_feedback(*code),
            GestureEvent::Commit { code, samples, .. } => self.on_software_key(*code, samples),
            GestureEvent::LongPress {
                code,
                repeatable: true,
                ..
            } => self.on_software_key(*code, &[]),
            GestureEvent::LongPress { code, .. } => self.view.on_press_feedback(*code),
            // The candidate changed, so the pressed key shows the flick output
            GestureEvent::FlickLocked { code, .. } => self.view.on_press_feedback(*code),
        }
    }

    // ==================== Hardware keys ====================

    /// A physical key event. Returns the translation so the host can
    /// forward unconsumed events to the application.
    ///
    /// Auto-repeats of printable and special keys are typed again; repeats
    /// of mode-switch and modifier-only keys change nothing.
    pub fn on_hardware_key(&mut self, raw: &RawKeyEvent) -> Outcome {
        let spec = self.state.effective_hardware();
        let outcome = spec.translate_event(raw);
        if !raw.is_down() {
            return outcome;
        }

        match outcome {
            Outcome::Key(key) if key.event.is_modifier_only() => {
                if !raw.is_repeat() {
                    self.engine.send_key(&key.event, key.raw.as_ref(), &[]);
                }
            }
            Outcome::Key(key) => {
                if self.policy == NarrowPolicy::Keystroke && !self.state.narrow {
                    self.state.narrow = true;
                    debug!("Hardware keystroke narrows the display");
                    self.notify_layout();
                }
                if self.state.source == ActiveSource::Software {
                    // Software and hardware composition must not merge
                    self.engine.submit();
                }
                self.set_source(ActiveSource::Hardware);
                self.engine.send_key(&key.event, key.raw.as_ref(), &[]);
            }
            Outcome::ModeSwitch(signal) if raw.is_repeat() => {
                debug!("Ignoring auto-repeat #{} of {}", raw.repeat_count, signal);
            }
            Outcome::ModeSwitch(signal) => self.apply_mode_switch(spec, signal, raw),
            Outcome::NotConsumed => {}
        }
        outcome
    }

    fn apply_mode_switch(
        &mut self,
        spec: HardwareKeyboardSpecification,
        signal: ModeSwitchSignal,
        raw: &RawKeyEvent,
    ) {
        let mode = match signal {
            ModeSwitchSignal::Toggle => self.state.mode.toggled(),
            ModeSwitchSignal::Kana => CompositionMode::NativeScript,
            ModeSwitchSignal::Eisu => CompositionMode::Latin,
        };
        debug!("Mode switch {}: {} -> {}", signal, self.state.mode, mode);
        self.state.mode = mode;
        self.state.software_layout = match self.state.source {
            ActiveSource::Hardware => spec.layout_for(mode),
            ActiveSource::Software => self.state.software_layout.with_mode(mode),
        };
        self.engine.switch_input_mode(Some(raw), mode);
        self.notify_layout();
    }

    // ==================== Device configuration ====================

    /// The platform reported a new device configuration.
    pub fn on_configuration_changed(&mut self, config: DeviceConfiguration) {
        let before = self.state;
        self.config = config;

        self.state.hardware = match self.preference.pinned {
            Some(spec) => Some(spec),
            None => HardwareKeyboardSpecification::for_keyboard_class(
                config.keyboard,
                self.preference.force_default,
            ),
        };

        if self.policy == NarrowPolicy::Configuration {
            self.state.narrow = config.hardware_keyboard;
        }

        if !config.hardware_keyboard && self.state.source == ActiveSource::Hardware {
            self.set_source(ActiveSource::Software);
            if is_hardware_family(self.state.software_layout.family) {
                self.state.software_layout =
                    SoftwareLayout::new(LayoutFamily::TwelveKey, self.state.mode);
            }
        } else if self.state.source == ActiveSource::Hardware {
            if let Some(spec) = self.state.hardware {
                self.state.software_layout = spec.layout_for(self.state.mode);
            }
        }

        debug!("Configuration changed ({}): {}", config, self.state);
        self.engine
            .update_request(self.state.software_layout, &self.config);
        if before.software_layout != self.state.software_layout || before.narrow != self.state.narrow
        {
            self.notify_layout();
        }
    }

    fn set_source(&mut self, source: ActiveSource) {
        if self.state.source != source {
            debug!("Active source {} -> {}", self.state.source, source);
            self.state.source = source;
        }
    }

    fn notify_layout(&mut self) {
        self.view
            .on_layout_changed(self.state.software_layout, self.state.narrow);
    }
}

fn is_hardware_family(family: LayoutFamily) -> bool {
    matches!(
        family,
        LayoutFamily::HardwareQwerty | LayoutFamily::HardwareTwelveKey
    )
}
