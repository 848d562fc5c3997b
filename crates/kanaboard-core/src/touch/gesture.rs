// Kanaboard Touch Gesture Recognizer
// Tap, flick and long-press/repeat disambiguation for on-screen keys

use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, trace};
use smallvec::SmallVec;

use super::context::KeyEventContext;
use super::key::{FlickDirection, Key};
use super::sample::{PointerId, TouchSample};
use super::timer::{DueTimer, TimerQueue};
use crate::action::TouchAction;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds and delays for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Fraction of the key's width/height a drag must exceed to lock a flick (default: 0.5)
    pub flick_threshold_ratio: f32,
    /// Hold time before the first long-press signal (default: 400ms)
    pub long_press_delay: Duration,
    /// Interval between repeat signals on repeatable keys (default: 50ms)
    pub repeat_interval: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            flick_threshold_ratio: 0.5,
            long_press_delay: Duration::from_millis(400),
            repeat_interval: Duration::from_millis(50),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Signals produced by the recognizer, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// A key went down; carries the primary code
    PressFeedback { pointer_id: PointerId, code: i32 },
    /// The gesture resolved to `code`
    Commit {
        pointer_id: PointerId,
        code: i32,
        samples: Vec<TouchSample>,
    },
    /// The key was held past the long-press delay (or a repeat interval)
    LongPress {
        pointer_id: PointerId,
        code: i32,
        count: u32,
        repeatable: bool,
    },
    /// A drag locked a flick direction; `code` is the new candidate
    FlickLocked {
        pointer_id: PointerId,
        direction: FlickDirection,
        code: i32,
    },
    /// The pointer left the key; carries the primary code
    ReleaseFeedback { pointer_id: PointerId, code: i32 },
}

impl GestureEvent {
    pub fn pointer_id(&self) -> PointerId {
        match self {
            GestureEvent::PressFeedback { pointer_id, .. }
            | GestureEvent::Commit { pointer_id, .. }
            | GestureEvent::LongPress { pointer_id, .. }
            | GestureEvent::FlickLocked { pointer_id, .. }
            | GestureEvent::ReleaseFeedback { pointer_id, .. } => *pointer_id,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            GestureEvent::PressFeedback { code, .. }
            | GestureEvent::Commit { code, .. }
            | GestureEvent::LongPress { code, .. }
            | GestureEvent::FlickLocked { code, .. }
            | GestureEvent::ReleaseFeedback { code, .. } => *code,
        }
    }
}

/// Events from one recognizer call; rarely more than four
pub type GestureOutput = SmallVec<[GestureEvent; 4]>;

// ---------------------------------------------------------------------------
// GestureRecognizer
// ---------------------------------------------------------------------------

/// Per-pointer gesture state machine.
///
/// Timers are not real-time: the host calls [`GestureRecognizer::advance`]
/// with its clock, or uses [`GestureRecognizer::process`] which advances to
/// each sample's timestamp before handling it.
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    contexts: IndexMap<PointerId, KeyEventContext>,
    timers: TimerQueue,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            contexts: IndexMap::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Context of an active pointer
    pub fn context(&self, pointer_id: PointerId) -> Option<&KeyEventContext> {
        self.contexts.get(&pointer_id)
    }

    /// Number of pointers currently down
    pub fn active_pointers(&self) -> usize {
        self.contexts.len()
    }

    /// Earliest pending timer deadline, for hosts that sleep until it
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Pointer went down on `key`.
    pub fn on_down(&mut self, key: Key, sample: &TouchSample) -> GestureOutput {
        let mut out = GestureOutput::new();
        let pointer_id = sample.pointer_id;

        if let Some(stale) = self.contexts.shift_remove(&pointer_id) {
            debug!("Discarding stale context for pointer {}", pointer_id);
            if let Some(timer) = stale.timer() {
                self.timers.cancel(timer);
            }
        }

        let code = key.primary_code();
        let mut context = KeyEventContext::new(key, sample);
        let deadline = sample
            .timestamp
            .saturating_add(millis(self.config.long_press_delay));
        context.set_timer(Some(self.timers.schedule(pointer_id, deadline)));
        self.contexts.insert(pointer_id, context);

        trace!("Down pointer={} code={} timer@{}", pointer_id, code, deadline);
        out.push(GestureEvent::PressFeedback { pointer_id, code });
        out
    }

    /// Pointer moved. Returns true when this move locked a flick direction,
    /// so the caller can re-fire press feedback for the new candidate code.
    pub fn on_move(&mut self, sample: &TouchSample) -> bool {
        let Some(context) = self.contexts.get_mut(&sample.pointer_id) else {
            return false;
        };
        context.record(sample);
        if !context.try_lock(sample, self.config.flick_threshold_ratio) {
            return false;
        }
        if let Some(timer) = context.take_timer() {
            self.timers.cancel(timer);
        }
        debug!(
            "Pointer {} locked flick {:?} -> {}",
            sample.pointer_id,
            context.flick(),
            context.candidate_code()
        );
        true
    }

    /// Pointer released: commit the resolved code and release the key.
    pub fn on_up(&mut self, sample: &TouchSample) -> GestureOutput {
        let mut out = GestureOutput::new();
        let pointer_id = sample.pointer_id;
        let Some(mut context) = self.contexts.shift_remove(&pointer_id) else {
            return out;
        };
        if let Some(timer) = context.take_timer() {
            self.timers.cancel(timer);
        }
        context.record(sample);

        let primary = context.key().primary_code();
        let committed = context.committed_code();
        match committed {
            Some(code) => {
                debug!("Pointer {} committed {}", pointer_id, code);
                out.push(GestureEvent::Commit {
                    pointer_id,
                    code,
                    samples: context.into_samples(),
                });
            }
            None => debug!("Pointer {} released after repeats", pointer_id),
        }
        out.push(GestureEvent::ReleaseFeedback {
            pointer_id,
            code: primary,
        });
        out
    }

    /// Gesture aborted by the platform: nothing is committed.
    pub fn on_cancel(&mut self, pointer_id: PointerId) -> GestureOutput {
        let mut out = GestureOutput::new();
        let Some(mut context) = self.contexts.shift_remove(&pointer_id) else {
            return out;
        };
        if let Some(timer) = context.take_timer() {
            self.timers.cancel(timer);
        }
        debug!("Pointer {} cancelled", pointer_id);
        out.push(GestureEvent::ReleaseFeedback {
            pointer_id,
            code: context.key().primary_code(),
        });
        out
    }

    /// Fire every timer due at `now`, in deadline order.
    pub fn advance(&mut self, now: u64) -> GestureOutput {
        let mut out = GestureOutput::new();
        while let Some(due) = self.timers.pop_due(now) {
            self.fire(due, &mut out);
        }
        out
    }

    fn fire(&mut self, due: DueTimer, out: &mut GestureOutput) {
        let Some(context) = self.contexts.get_mut(&due.pointer_id) else {
            return;
        };
        if context.timer() != Some(due.handle) {
            return;
        }
        context.set_timer(None);
        if context.flick().is_some() {
            return;
        }

        let count = context.record_long_press();
        let repeatable = context.key().is_repeatable();
        if repeatable {
            // Zero intervals would fire forever within one advance
            let interval = millis(self.config.repeat_interval).max(1);
            let next = due.deadline.saturating_add(interval);
            context.set_timer(Some(self.timers.schedule(due.pointer_id, next)));
        }

        trace!("Long press pointer={} count={}", due.pointer_id, count);
        out.push(GestureEvent::LongPress {
            pointer_id: due.pointer_id,
            code: context.key().primary_code(),
            count,
            repeatable,
        });
    }

    /// Dispatch a sample by its action. Timers due by the sample's
    /// timestamp fire first. `key` is only used for DOWN.
    pub fn process(&mut self, key: &Key, sample: &TouchSample) -> GestureOutput {
        if sample.action != TouchAction::Down {
            return self.process_pointer(sample);
        }
        let mut out = self.advance(sample.timestamp);
        out.extend(self.on_down(key.clone(), sample));
        out
    }

    /// Dispatch a MOVE, UP or CANCEL sample for a pointer that is already
    /// down. A DOWN sample only fires due timers, since it carries no key.
    pub fn process_pointer(&mut self, sample: &TouchSample) -> GestureOutput {
        let mut out = self.advance(sample.timestamp);
        match sample.action {
            TouchAction::Down => debug!("Pointer {} down without a key", sample.pointer_id),
            TouchAction::Move => {
                if self.on_move(sample) {
                    out.extend(self.flick_locked(sample.pointer_id));
                }
            }
            TouchAction::Up => out.extend(self.on_up(sample)),
            TouchAction::Cancel => out.extend(self.on_cancel(sample.pointer_id)),
        }
        out
    }

    fn flick_locked(&self, pointer_id: PointerId) -> Option<GestureEvent> {
        let context = self.contexts.get(&pointer_id)?;
        Some(GestureEvent::FlickLocked {
            pointer_id,
            direction: context.flick()?,
            code: context.candidate_code(),
        })
    }

    /// Drop every context and pending timer.
    pub fn reset(&mut self) {
        self.contexts.clear();
        self.timers.clear();
    }
}
