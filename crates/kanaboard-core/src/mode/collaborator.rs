// Kanaboard Collaborators
// Conversion engine and view contracts, plus recording implementations

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{NormalizedKeyEvent, RawKeyEvent};
use crate::input::DeviceConfiguration;
use crate::layout::{CompositionMode, SoftwareLayout};
use crate::touch::TouchSample;

/// Requests the coordinator issues to the text-conversion engine.
///
/// Calls are fire-and-forget; the engine orders and executes them itself.
pub trait ConversionEngine {
    /// The active layout or device configuration changed
    fn update_request(&mut self, layout: SoftwareLayout, config: &DeviceConfiguration);

    /// Switch composition mode without committing the current composition
    fn switch_input_mode(&mut self, trigger: Option<&RawKeyEvent>, mode: CompositionMode);

    /// Process one key; `touches` is empty for hardware keys
    fn send_key(
        &mut self,
        event: &NormalizedKeyEvent,
        raw: Option<&RawKeyEvent>,
        touches: &[TouchSample],
    );

    /// Commit any pending composition
    fn submit(&mut self);
}

/// Notifications for the view layer
pub trait ViewListener {
    fn on_layout_changed(&mut self, layout: SoftwareLayout, narrow: bool);
    fn on_press_feedback(&mut self, code: i32);
    fn on_release_feedback(&mut self, code: i32);
}

/// A recorded [`ConversionEngine`] call
#[derive(Debug, Clone, PartialEq)]
pub enum EngineRequest {
    UpdateRequest {
        layout: SoftwareLayout,
        config: DeviceConfiguration,
    },
    SwitchInputMode {
        trigger: Option<RawKeyEvent>,
        mode: CompositionMode,
    },
    SendKey {
        event: NormalizedKeyEvent,
        raw: Option<RawKeyEvent>,
        touches: Vec<TouchSample>,
    },
    Submit,
}

impl fmt::Display for EngineRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineRequest::UpdateRequest { layout, config } => {
                write!(f, "update_request({}, {})", layout, config)
            }
            EngineRequest::SwitchInputMode { trigger, mode } => match trigger {
                Some(raw) => write!(f, "switch_input_mode({}, after {})", mode, raw),
                None => write!(f, "switch_input_mode({})", mode),
            },
            EngineRequest::SendKey {
                event,
                raw,
                touches,
            } => {
                write!(f, "send_key({}", event)?;
                if let Some(raw) = raw {
                    write!(f, ", {}", raw)?;
                }
                if !touches.is_empty() {
                    write!(f, ", {} touches", touches.len())?;
                }
                write!(f, ")")
            }
            EngineRequest::Submit => write!(f, "submit()"),
        }
    }
}

/// A recorded [`ViewListener`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewNotification {
    LayoutChanged { layout: SoftwareLayout, narrow: bool },
    PressFeedback(i32),
    ReleaseFeedback(i32),
}

impl fmt::Display for ViewNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewNotification::LayoutChanged { layout, narrow } => {
                write!(f, "layout_changed({}, narrow={})", layout, narrow)
            }
            ViewNotification::PressFeedback(code) => write!(f, "press({})", code),
            ViewNotification::ReleaseFeedback(code) => write!(f, "release({})", code),
        }
    }
}

/// Engine that records every request.
///
/// Clones share the same log, so a test can keep one handle and give
/// another to the coordinator.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    requests: Arc<Mutex<Vec<EngineRequest>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the requests so far
    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().clone()
    }

    /// Take the requests so far, leaving the log empty
    pub fn take(&self) -> Vec<EngineRequest> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Keys sent so far, in order
    pub fn sent_keys(&self) -> Vec<NormalizedKeyEvent> {
        self.requests
            .lock()
            .iter()
            .filter_map(|request| match request {
                EngineRequest::SendKey { event, .. } => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    fn push(&self, request: EngineRequest) {
        self.requests.lock().push(request);
    }
}

impl ConversionEngine for RecordingEngine {
    fn update_request(&mut self, layout: SoftwareLayout, config: &DeviceConfiguration) {
        self.push(EngineRequest::UpdateRequest {
            layout,
            config: *config,
        });
    }

    fn switch_input_mode(&mut self, trigger: Option<&RawKeyEvent>, mode: CompositionMode) {
        self.push(EngineRequest::SwitchInputMode {
            trigger: trigger.copied(),
            mode,
        });
    }

    fn send_key(
        &mut self,
        event: &NormalizedKeyEvent,
        raw: Option<&RawKeyEvent>,
        touches: &[TouchSample],
    ) {
        self.push(EngineRequest::SendKey {
            event: *event,
            raw: raw.copied(),
            touches: touches.to_vec(),
        });
    }

    fn submit(&mut self) {
        self.push(EngineRequest::Submit);
    }
}

/// View that records every notification; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    notifications: Arc<Mutex<Vec<ViewNotification>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<ViewNotification> {
        self.notifications.lock().clone()
    }

    pub fn take(&self) -> Vec<ViewNotification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    /// Most recent layout notification
    pub fn last_layout(&self) -> Option<(SoftwareLayout, bool)> {
        self.notifications
            .lock()
            .iter()
            .rev()
            .find_map(|notification| match notification {
                ViewNotification::LayoutChanged { layout, narrow } => Some((*layout, *narrow)),
                _ => None,
            })
    }

    fn push(&self, notification: ViewNotification) {
        self.notifications.lock().push(notification);
    }
}

impl ViewListener for RecordingView {
    fn on_layout_changed(&mut self, layout: SoftwareLayout, narrow: bool) {
        self.push(ViewNotification::LayoutChanged { layout, narrow });
    }

    fn on_press_feedback(&mut self, code: i32) {
        self.push(ViewNotification::PressFeedback(code));
    }

    fn on_release_feedback(&mut self, code: i32) {
        self.push(ViewNotification::ReleaseFeedback(code));
    }
}
