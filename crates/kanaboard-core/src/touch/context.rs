// Kanaboard Key Event Context
// Per-pointer gesture state between DOWN and UP

use smallvec::SmallVec;

use super::key::{FlickDirection, Key, KeyCondition};
use super::sample::{PointerId, TouchSample};
use super::timer::TimerHandle;

/// Sample history of one gesture; most gestures fit inline
pub type SampleHistory = SmallVec<[TouchSample; 8]>;

/// Mutable state of one active pointer
#[derive(Debug, Clone)]
pub struct KeyEventContext {
    key: Key,
    pointer_id: PointerId,
    origin: (f32, f32),
    flick: Option<FlickDirection>,
    timer: Option<TimerHandle>,
    samples: SampleHistory,
    long_press_count: u32,
}

impl KeyEventContext {
    pub fn new(key: Key, down: &TouchSample) -> Self {
        let mut samples = SampleHistory::new();
        samples.push(*down);
        Self {
            key,
            pointer_id: down.pointer_id,
            origin: (down.x, down.y),
            flick: None,
            timer: None,
            samples,
            long_press_count: 0,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn pointer_id(&self) -> PointerId {
        self.pointer_id
    }

    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    pub fn flick(&self) -> Option<FlickDirection> {
        self.flick
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn samples(&self) -> &[TouchSample] {
        &self.samples
    }

    pub fn long_press_count(&self) -> u32 {
        self.long_press_count
    }

    pub(crate) fn set_timer(&mut self, timer: Option<TimerHandle>) {
        self.timer = timer;
    }

    pub(crate) fn take_timer(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }

    pub(crate) fn record(&mut self, sample: &TouchSample) {
        self.samples.push(*sample);
    }

    pub(crate) fn record_long_press(&mut self) -> u32 {
        self.long_press_count += 1;
        self.long_press_count
    }

    pub(crate) fn into_samples(self) -> Vec<TouchSample> {
        self.samples.into_vec()
    }

    /// Lock a flick direction for `sample` if none is locked yet.
    ///
    /// Returns true only when this call set the lock.
    pub(crate) fn try_lock(&mut self, sample: &TouchSample, threshold_ratio: f32) -> bool {
        if self.flick.is_some() {
            return false;
        }
        self.flick = self.detect_flick(sample, threshold_ratio);
        self.flick.is_some()
    }

    /// Direction the displacement to `sample` qualifies for, if any.
    ///
    /// An axis qualifies when its displacement strictly exceeds the key's
    /// extent on that axis times `threshold_ratio`. When both qualify, the
    /// larger displacement wins and an exact tie goes to the horizontal axis.
    pub fn detect_flick(
        &self,
        sample: &TouchSample,
        threshold_ratio: f32,
    ) -> Option<FlickDirection> {
        let geometry = self.key.geometry();
        if !geometry.is_usable() || !threshold_ratio.is_finite() || threshold_ratio < 0.0 {
            return None;
        }
        let dx = sample.x - self.origin.0;
        let dy = sample.y - self.origin.1;
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }

        let horizontal = dx.abs() > geometry.width * threshold_ratio;
        let vertical = dy.abs() > geometry.height * threshold_ratio;
        match (horizontal, vertical) {
            (false, false) => None,
            (true, false) => Some(FlickDirection::horizontal(dx)),
            (false, true) => Some(FlickDirection::vertical(dy)),
            (true, true) if dy.abs() > dx.abs() => Some(FlickDirection::vertical(dy)),
            (true, true) => Some(FlickDirection::horizontal(dx)),
        }
    }

    /// Code the gesture would show as pressed right now
    pub fn candidate_code(&self) -> i32 {
        match self.flick {
            Some(direction) => self.key.flick_code(direction),
            None => self.key.tap_code(),
        }
    }

    /// Code committed on release, or `None` when repeats already delivered it
    pub fn committed_code(&self) -> Option<i32> {
        if let Some(direction) = self.flick {
            return Some(self.key.flick_code(direction));
        }
        if self.long_press_count > 0 {
            if let Some(code) = self.key.code_for(KeyCondition::LongPress) {
                return Some(code);
            }
            if self.key.is_repeatable() {
                return None;
            }
        }
        Some(self.key.tap_code())
    }
}
