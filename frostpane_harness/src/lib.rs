// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic clocks and pipeline doubles for tests and demo harnesses.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use frostpane_core::sched::FrameClock;
use frostpane_core::time::{Duration, HostTime};
use frostpane_core::trace::{
    CycleFailedEvent, CycleQueuedEvent, CycleSampledEvent, CycleStage, LoopStartedEvent,
    LoopStoppedEvent, SkipReason, StopReason, TickSkippedEvent, TraceSink,
};
use frostpane_raster::{BlurError, BlurStage, PixelBuffer};

/// A hand-cranked [`FrameClock`].
///
/// `post_delayed` records a single due time; [`advance`](Self::advance)
/// moves the clock forward and reports whether the pending callback came
/// due (the caller then delivers the tick by hand). Registration and
/// cancellation counts are kept for assertions about duplicate callbacks.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: u64,
    due: Option<u64>,
    posts: u64,
    cancels: u64,
}

impl ManualClock {
    /// Creates a clock at time zero with nothing armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The due time of the armed callback, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<HostTime> {
        match self.due {
            Some(due) => Some(HostTime(due)),
            None => None,
        }
    }

    /// How many times a callback has been armed.
    #[must_use]
    pub const fn post_count(&self) -> u64 {
        self.posts
    }

    /// How many times the pending callback has been cancelled.
    #[must_use]
    pub const fn cancel_count(&self) -> u64 {
        self.cancels
    }

    /// Advances the clock and consumes the pending callback if it came
    /// due. Returns whether a tick should now be delivered.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.now += delta.millis();
        match self.due {
            Some(due) if due <= self.now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> HostTime {
        HostTime(self.now)
    }

    fn post_delayed(&mut self, delay: Duration) {
        self.due = Some(self.now + delay.millis());
        self.posts += 1;
    }

    fn cancel(&mut self) {
        if self.due.take().is_some() {
            self.cancels += 1;
        }
    }
}

/// A [`BlurStage`] double: counts invocations and passes pixels through
/// unchanged, standing in for a real kernel.
///
/// Construct with [`uninitialized`](Self::uninitialized) to exercise the
/// [`BlurError::Uninitialized`] failure path.
#[derive(Debug)]
pub struct CountingBlur {
    initialized: bool,
    calls: u64,
    last_radius: Option<u32>,
}

impl Default for CountingBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingBlur {
    /// A ready-to-use passthrough stage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: true,
            calls: 0,
            last_radius: None,
        }
    }

    /// A stage that fails every call with [`BlurError::Uninitialized`].
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self {
            initialized: false,
            calls: 0,
            last_radius: None,
        }
    }

    /// Number of successful blur calls.
    #[must_use]
    pub const fn calls(&self) -> u64 {
        self.calls
    }

    /// Radius of the most recent successful call.
    #[must_use]
    pub const fn last_radius(&self) -> Option<u32> {
        self.last_radius
    }
}

impl BlurStage for CountingBlur {
    fn blur(&mut self, src: &PixelBuffer, radius: u32) -> Result<PixelBuffer, BlurError> {
        if !self.initialized {
            return Err(BlurError::Uninitialized);
        }
        self.calls += 1;
        self.last_radius = Some(radius);
        Ok(src.clone())
    }
}

/// A [`TraceSink`] that records every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    /// Rates from loop-started events, in order.
    pub started: Vec<u32>,
    /// Reasons from loop-stopped events, in order.
    pub stopped: Vec<StopReason>,
    /// Reasons from tick-skipped events, in order.
    pub skipped: Vec<SkipReason>,
    /// Output dimensions from cycle-sampled events, in order.
    pub sampled: Vec<(u32, u32)>,
    /// Cycle counters from cycle-queued events, in order.
    pub queued: Vec<u64>,
    /// Stages from cycle-failed events, in order.
    pub failed: Vec<CycleStage>,
}

impl RecordingTrace {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceSink for RecordingTrace {
    fn on_loop_started(&mut self, e: &LoopStartedEvent) {
        self.started.push(e.fps);
    }

    fn on_loop_stopped(&mut self, e: &LoopStoppedEvent) {
        self.stopped.push(e.reason);
    }

    fn on_tick_skipped(&mut self, e: &TickSkippedEvent) {
        self.skipped.push(e.reason);
    }

    fn on_cycle_sampled(&mut self, e: &CycleSampledEvent) {
        self.sampled.push((e.width, e.height));
    }

    fn on_cycle_queued(&mut self, e: &CycleQueuedEvent) {
        self.queued.push(e.cycle_index);
    }

    fn on_cycle_failed(&mut self, e: &CycleFailedEvent) {
        self.failed.push(e.stage);
    }
}

/// Rolling frame-interval statistics with fixed-size history.
///
/// Feed the delta between consecutive ticks to [`observe`](Self::observe);
/// the report summarizes the last `N` intervals for pacing assertions and
/// demo HUDs.
#[derive(Debug)]
pub struct IntervalTracker<const N: usize> {
    deltas_ms: [u64; N],
    cursor: usize,
    observed: u64,
}

/// Summary returned by [`IntervalTracker::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalReport {
    /// Mean interval over the retained window, in ms.
    pub mean_ms: u64,
    /// Largest interval in the retained window, in ms.
    pub max_ms: u64,
    /// Total intervals observed since creation.
    pub observed: u64,
}

impl<const N: usize> Default for IntervalTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> IntervalTracker<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deltas_ms: [0; N],
            cursor: 0,
            observed: 0,
        }
    }

    /// Records one interval and returns updated statistics.
    pub fn observe(&mut self, delta: Duration) -> IntervalReport {
        self.deltas_ms[self.cursor % N] = delta.millis();
        self.cursor = (self.cursor + 1) % N;
        self.observed += 1;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "window length is a small compile-time constant"
        )]
        let window = if self.observed < N as u64 {
            self.observed as usize
        } else {
            N
        };
        let slice = &self.deltas_ms[..window];
        let sum: u64 = slice.iter().sum();
        let max = slice.iter().copied().max().unwrap_or(0);

        IntervalReport {
            mean_ms: sum / slice.len() as u64,
            max_ms: max,
            observed: self.observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_fires_once_due() {
        let mut clock = ManualClock::new();
        clock.post_delayed(Duration(16));

        assert!(!clock.advance(Duration(10)), "not due yet");
        assert!(clock.advance(Duration(10)), "due after 20ms");
        assert!(!clock.advance(Duration(100)), "consumed on firing");
        assert_eq!(clock.post_count(), 1);
    }

    #[test]
    fn manual_clock_cancel_disarms() {
        let mut clock = ManualClock::new();
        clock.post_delayed(Duration(16));
        clock.cancel();
        assert!(!clock.advance(Duration(100)));
        assert_eq!(clock.cancel_count(), 1);

        // Cancelling with nothing armed is not counted.
        clock.cancel();
        assert_eq!(clock.cancel_count(), 1);
    }

    #[test]
    fn counting_blur_passes_pixels_through() {
        let mut blur = CountingBlur::new();
        let mut src = PixelBuffer::new(2, 2);
        src.fill(frostpane_core::color::Argb::new(255, 5, 6, 7));

        let out = blur.blur(&src, 9).unwrap();
        assert_eq!(out, src);
        assert_eq!(blur.calls(), 1);
        assert_eq!(blur.last_radius(), Some(9));
    }

    #[test]
    fn uninitialized_blur_fails() {
        let mut blur = CountingBlur::uninitialized();
        let src = PixelBuffer::new(1, 1);
        assert_eq!(blur.blur(&src, 3), Err(BlurError::Uninitialized));
        assert_eq!(blur.calls(), 0);
    }

    #[test]
    fn interval_tracker_windows_statistics() {
        let mut tracker = IntervalTracker::<4>::new();
        let _ = tracker.observe(Duration(16));
        let _ = tracker.observe(Duration(16));
        let report = tracker.observe(Duration(34));
        assert_eq!(report.mean_ms, 22);
        assert_eq!(report.max_ms, 34);
        assert_eq!(report.observed, 3);

        // Fill past the window; the retained ring is [16, 16, 34, 16].
        let _ = tracker.observe(Duration(16));
        let _ = tracker.observe(Duration(16));
        let report = tracker.observe(Duration(16));
        assert_eq!(report.max_ms, 34, "34 is still inside the 4-wide window");
        assert_eq!(report.mean_ms, 20);
        assert_eq!(report.observed, 6);
    }
}
