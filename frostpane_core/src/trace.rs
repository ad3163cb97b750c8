// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the blur loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the effect's frame loop calls at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.

use crate::time::HostTime;

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// An explicit pause request.
    Paused,
    /// The enabled flag was toggled off (or found off at a tick).
    Disabled,
    /// The surface was detached from its window.
    Detached,
}

/// Why a delivered tick did not produce a presented frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The tick arrived after cancellation.
    Stale,
    /// The effect surface is not visible.
    Invisible,
    /// The effect surface has no area yet (layout has not run).
    ZeroSize,
}

/// Which pipeline stage a cycle failed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleStage {
    /// Sampling / compositing the source region.
    Sample,
    /// The external blur transform.
    Blur,
}

/// Emitted when the loop starts.
#[derive(Clone, Copy, Debug)]
pub struct LoopStartedEvent {
    /// Target tick rate.
    pub fps: u32,
}

/// Emitted when the loop stops.
#[derive(Clone, Copy, Debug)]
pub struct LoopStoppedEvent {
    /// Why it stopped.
    pub reason: StopReason,
}

/// Emitted when a tick is skipped without sampling.
#[derive(Clone, Copy, Debug)]
pub struct TickSkippedEvent {
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Emitted after a cycle's raw buffer has been sampled and blurred.
#[derive(Clone, Copy, Debug)]
pub struct CycleSampledEvent {
    /// Scaled output width in pixels.
    pub width: u32,
    /// Scaled output height in pixels.
    pub height: u32,
    /// Host time when the cycle began.
    pub started_at: HostTime,
}

/// Emitted when a blurred buffer is queued for presentation.
#[derive(Clone, Copy, Debug)]
pub struct CycleQueuedEvent {
    /// Monotonic cycle counter.
    pub cycle_index: u64,
}

/// Emitted when a cycle fails.
#[derive(Clone, Copy, Debug)]
pub struct CycleFailedEvent {
    /// The stage that failed.
    pub stage: CycleStage,
}

/// Receives trace events from the blur loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the loop starts.
    fn on_loop_started(&mut self, e: &LoopStartedEvent) {
        _ = e;
    }

    /// Called when the loop stops.
    fn on_loop_stopped(&mut self, e: &LoopStoppedEvent) {
        _ = e;
    }

    /// Called when a tick is skipped.
    fn on_tick_skipped(&mut self, e: &TickSkippedEvent) {
        _ = e;
    }

    /// Called after sampling and blurring succeed.
    fn on_cycle_sampled(&mut self, e: &CycleSampledEvent) {
        _ = e;
    }

    /// Called when a blurred buffer is queued on the sink.
    fn on_cycle_queued(&mut self, e: &CycleQueuedEvent) {
        _ = e;
    }

    /// Called when a cycle fails.
    fn on_cycle_failed(&mut self, e: &CycleFailedEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LoopStartedEvent`].
    #[inline]
    pub fn loop_started(&mut self, e: &LoopStartedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_loop_started(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LoopStoppedEvent`].
    #[inline]
    pub fn loop_stopped(&mut self, e: &LoopStoppedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_loop_stopped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickSkippedEvent`].
    #[inline]
    pub fn tick_skipped(&mut self, e: &TickSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleSampledEvent`].
    #[inline]
    pub fn cycle_sampled(&mut self, e: &CycleSampledEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_sampled(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleQueuedEvent`].
    #[inline]
    pub fn cycle_queued(&mut self, e: &CycleQueuedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_queued(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleFailedEvent`].
    #[inline]
    pub fn cycle_failed(&mut self, e: &CycleFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        started: Vec<u32>,
        stopped: Vec<StopReason>,
    }

    impl TraceSink for Recorder {
        fn on_loop_started(&mut self, e: &LoopStartedEvent) {
            self.started.push(e.fps);
        }

        fn on_loop_stopped(&mut self, e: &LoopStoppedEvent) {
            self.stopped.push(e.reason);
        }
    }

    #[test]
    fn tracer_dispatches_to_sink() {
        let mut recorder = Recorder::default();
        let mut tracer = Tracer::new(&mut recorder);
        tracer.loop_started(&LoopStartedEvent { fps: 60 });
        tracer.loop_stopped(&LoopStoppedEvent {
            reason: StopReason::Detached,
        });
        drop(tracer);

        assert_eq!(recorder.started, [60]);
        assert_eq!(recorder.stopped, [StopReason::Detached]);
    }

    #[test]
    fn none_tracer_discards() {
        let mut tracer = Tracer::none();
        tracer.loop_started(&LoopStartedEvent { fps: 60 });
    }
}
