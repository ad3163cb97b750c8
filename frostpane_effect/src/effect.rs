// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The backdrop-blur effect surface.
//!
//! [`BackdropBlur`] ties the pieces together: it owns the configuration,
//! the frame scheduler, the sampler, the presentation sink, and a weak
//! reference to the target surface. The host wires its lifecycle callbacks
//! (attach, detach, size change, enabled change) to the corresponding
//! methods and delivers frame-clock ticks to [`on_tick`](BackdropBlur::on_tick).
//!
//! Each rendered cycle flows: resolve target → compute sample rectangle →
//! sample/composite → blur → queue on the sink. The queued buffer becomes
//! visible when the host commits the sink at its next update point, so
//! presentation is deferred but still strictly ordered.
//!
//! # Failure behavior
//!
//! Sampling and blur errors propagate out of the tick — they indicate
//! configuration or timing bugs the integrator must see. The scheduler has
//! already re-armed by then, so a failed cycle never stops the loop. Target
//! loss, zero size, and invisibility are expected transient states and
//! skip the cycle softly instead.

use core::fmt;

use kurbo::{Size, Vec2};

use frostpane_core::color::Argb;
use frostpane_core::config::EffectConfig;
use frostpane_core::region;
use frostpane_core::sched::{FrameClock, FrameScheduler, Tick};
use frostpane_core::surface::{SurfaceId, SurfaceStore};
use frostpane_core::trace::{
    CycleFailedEvent, CycleQueuedEvent, CycleSampledEvent, CycleStage, LoopStartedEvent,
    LoopStoppedEvent, SkipReason, StopReason, TickSkippedEvent, Tracer,
};
use frostpane_raster::{BlurError, BlurStage, SampleError, Sampler};

use crate::sink::PresentationSink;

/// Error from one render cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleError {
    /// The sampling step failed.
    Sample(SampleError),
    /// The external blur stage failed.
    Blur(BlurError),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample(e) => write!(f, "sampling failed: {e}"),
            Self::Blur(e) => write!(f, "blur stage failed: {e}"),
        }
    }
}

impl core::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Sample(e) => Some(e),
            Self::Blur(e) => Some(e),
        }
    }
}

impl From<SampleError> for CycleError {
    fn from(e: SampleError) -> Self {
        Self::Sample(e)
    }
}

impl From<BlurError> for CycleError {
    fn from(e: BlurError) -> Self {
        Self::Blur(e)
    }
}

/// What a delivered tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A blurred buffer was queued on the sink.
    Queued,
    /// The tick was absorbed without sampling (stale, disabled, invisible,
    /// or zero-sized).
    Skipped,
}

/// A container that renders a blurred copy of the content behind it.
#[derive(Debug)]
pub struct BackdropBlur {
    surface: SurfaceId,
    config: EffectConfig,
    scheduler: FrameScheduler,
    sampler: Sampler,
    sink: PresentationSink,
    /// Weak reference: liveness-checked before every use, root fallback
    /// when stale or unset.
    target: Option<SurfaceId>,
    manual_offset: Vec2,
    enabled: bool,
    visible: bool,
    attached: bool,
    cycle_index: u64,
}

impl BackdropBlur {
    /// Creates the effect for the given surface.
    ///
    /// The target identifier from the configuration is resolved
    /// immediately (negative means "no explicit target"); the sink takes
    /// the configured corner radius and the surface's current size.
    #[must_use]
    pub fn new(store: &SurfaceStore, surface: SurfaceId, config: EffectConfig) -> Self {
        let mut sink = PresentationSink::new(config.corner_radius);
        sink.set_bounds(store.size(surface));
        let target = region::find_target_by_tag(store, surface, config.target_tag);
        Self {
            surface,
            scheduler: FrameScheduler::new(config.fps),
            sampler: Sampler::new(),
            sink,
            target,
            manual_offset: Vec2::ZERO,
            enabled: true,
            visible: true,
            attached: false,
            cycle_index: 0,
            config,
        }
    }

    /// The effect's own surface handle.
    #[must_use]
    pub const fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// The presentation sink (the host draws from here after committing).
    #[must_use]
    pub const fn sink(&self) -> &PresentationSink {
        &self.sink
    }

    /// Promotes the most recently queued buffer to the displayed frame.
    /// The host calls this at its next update point after a tick.
    pub fn commit_presentation(&mut self) -> bool {
        self.sink.commit()
    }

    /// Whether the invalidation loop is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    // -- Public operations --

    /// Starts continuous invalidation.
    ///
    /// The loop only runs while the effect is enabled, visible, attached,
    /// and configured with a positive frame rate; otherwise this is a
    /// no-op. Starting an already-running loop is a no-op.
    pub fn start_blur(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>) {
        if !(self.enabled && self.visible && self.attached) {
            return;
        }
        if self.scheduler.is_running() {
            return;
        }
        self.scheduler.start(clock);
        if self.scheduler.is_running() {
            tracer.loop_started(&LoopStartedEvent {
                fps: self.config.fps,
            });
        }
    }

    /// Pauses continuous invalidation. No-op while stopped.
    pub fn pause_blur(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>) {
        self.stop(clock, tracer, StopReason::Paused);
    }

    /// Toggles the enabled flag. Disabling always pauses; enabling always
    /// (re-)starts, subject to the running invariant.
    pub fn set_enabled(
        &mut self,
        clock: &mut dyn FrameClock,
        tracer: &mut Tracer<'_>,
        enabled: bool,
    ) {
        self.enabled = enabled;
        if enabled {
            self.start_blur(clock, tracer);
        } else {
            self.stop(clock, tracer, StopReason::Disabled);
        }
    }

    /// Whether the effect is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the output clip radius. Reconfigurable at any time; never
    /// triggers a re-sample.
    pub fn set_corner_radius(&mut self, corner_radius: f64) {
        self.config.corner_radius = corner_radius;
        self.sink.set_corner_radius(corner_radius);
    }

    /// Sets the front tint, composited over the sampled content as a
    /// translucent veil.
    pub fn set_front_color(&mut self, color: Argb) {
        self.config.front_color = color;
    }

    /// Sets the back tint the sample buffer is filled with before content
    /// is drawn. Despite the name this is a tint overlay, not an actual
    /// background.
    pub fn set_background_color(&mut self, color: Argb) {
        self.config.back_color = color;
    }

    /// Sets the manual displacement applied to the sample rectangle.
    pub fn offset(&mut self, x: f64, y: f64) {
        self.manual_offset = Vec2::new(x, y);
    }

    /// Sets (or clears) the explicit target surface. The reference is
    /// non-owning; if the surface dies, sampling falls back to the root.
    pub fn set_target_view(&mut self, target: Option<SurfaceId>) {
        self.target = target;
    }

    /// Resolves the target by identifier, searching upward through
    /// ancestors. Negative identifiers and failed lookups leave the
    /// current target untouched.
    pub fn set_target_view_id(&mut self, store: &SurfaceStore, id: i32) {
        if let Some(found) = region::find_target_by_tag(store, self.surface, id) {
            self.target = Some(found);
        }
    }

    /// Sets the rasterization scale for subsequent cycles.
    pub fn set_downscale_factor(&mut self, factor: f64) {
        self.config.downscale_factor = factor;
    }

    /// Sets the radius passed to the blur stage on subsequent cycles.
    pub fn set_blur_radius(&mut self, radius: u32) {
        self.config.blur_radius = radius;
    }

    /// Changes the tick rate. Zero pauses the loop.
    pub fn set_fps(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>, fps: u32) {
        self.config.fps = fps;
        let was_running = self.scheduler.is_running();
        self.scheduler.set_fps(clock, fps);
        if was_running && !self.scheduler.is_running() {
            tracer.loop_stopped(&LoopStoppedEvent {
                reason: StopReason::Paused,
            });
        }
    }

    // -- Host lifecycle callbacks --

    /// The surface was attached to a window. Auto-starts the loop.
    pub fn on_attached(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>) {
        self.attached = true;
        self.start_blur(clock, tracer);
    }

    /// The surface was detached from its window. Unconditionally stops the
    /// loop, guaranteeing no callback fires against a torn-down surface.
    pub fn on_detached(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>) {
        self.attached = false;
        self.stop(clock, tracer, StopReason::Detached);
    }

    /// The surface was resized. The sink re-layouts immediately; the
    /// sample buffer follows on the next cycle.
    pub fn on_size_changed(&mut self, _old: Size, new: Size) {
        self.sink.set_bounds(new);
    }

    /// Visibility changed. Hiding pauses the loop; showing restarts it,
    /// subject to the running invariant.
    pub fn set_visible(
        &mut self,
        clock: &mut dyn FrameClock,
        tracer: &mut Tracer<'_>,
        visible: bool,
    ) {
        self.visible = visible;
        if visible {
            self.start_blur(clock, tracer);
        } else {
            self.stop(clock, tracer, StopReason::Paused);
        }
    }

    // -- The frame loop --

    /// Handles a delivered frame-clock tick.
    ///
    /// The scheduler re-checks the enabled flag and re-arms the next tick
    /// first; only then does the render cycle run. A cycle error therefore
    /// propagates to the caller while the loop keeps ticking.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] when sampling or the blur stage fails.
    pub fn on_tick(
        &mut self,
        store: &SurfaceStore,
        clock: &mut dyn FrameClock,
        blur: &mut dyn BlurStage,
        tracer: &mut Tracer<'_>,
    ) -> Result<CycleOutcome, CycleError> {
        match self.scheduler.on_tick(clock, self.enabled) {
            Tick::Stale => {
                tracer.tick_skipped(&TickSkippedEvent {
                    reason: SkipReason::Stale,
                });
                Ok(CycleOutcome::Skipped)
            }
            Tick::Disabled => {
                tracer.loop_stopped(&LoopStoppedEvent {
                    reason: StopReason::Disabled,
                });
                Ok(CycleOutcome::Skipped)
            }
            Tick::Render => self.render_cycle(store, clock, blur, tracer),
        }
    }

    /// Runs one cycle of the pipeline: region → sample → blur → queue.
    ///
    /// Zero-sized and invisible surfaces skip softly — those are expected
    /// during layout. Degenerate sampling inputs and an uninitialized blur
    /// stage are real errors and propagate.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] when sampling or the blur stage fails.
    pub fn render_cycle(
        &mut self,
        store: &SurfaceStore,
        clock: &mut dyn FrameClock,
        blur: &mut dyn BlurStage,
        tracer: &mut Tracer<'_>,
    ) -> Result<CycleOutcome, CycleError> {
        let size = store.size(self.surface);
        if size.width <= 0.0 || size.height <= 0.0 {
            tracer.tick_skipped(&TickSkippedEvent {
                reason: SkipReason::ZeroSize,
            });
            return Ok(CycleOutcome::Skipped);
        }
        if !self.visible || !store.visible(self.surface) {
            tracer.tick_skipped(&TickSkippedEvent {
                reason: SkipReason::Invisible,
            });
            return Ok(CycleOutcome::Skipped);
        }

        let started_at = clock.now();
        let target = self.resolve_target(store);
        let rect = region::sample_rect(store, self.surface, Some(target), self.manual_offset);

        let raw = self
            .sampler
            .sample(
                store,
                target,
                rect,
                self.config.downscale_factor,
                self.config.back_color,
                self.config.front_color,
            )
            .map_err(|e| {
                tracer.cycle_failed(&CycleFailedEvent {
                    stage: CycleStage::Sample,
                });
                CycleError::Sample(e)
            })?;
        tracer.cycle_sampled(&CycleSampledEvent {
            width: raw.width(),
            height: raw.height(),
            started_at,
        });

        let blurred = blur.blur(raw, self.config.blur_radius).map_err(|e| {
            tracer.cycle_failed(&CycleFailedEvent {
                stage: CycleStage::Blur,
            });
            CycleError::Blur(e)
        })?;

        self.sink.queue(blurred);
        self.cycle_index += 1;
        tracer.cycle_queued(&CycleQueuedEvent {
            cycle_index: self.cycle_index,
        });
        Ok(CycleOutcome::Queued)
    }

    /// The surface to sample from: the explicit target while it is alive,
    /// else the root of the effect surface's own tree.
    fn resolve_target(&self, store: &SurfaceStore) -> SurfaceId {
        match self.target {
            Some(target) if store.is_alive(target) => target,
            _ => region::root_of(store, self.surface),
        }
    }

    fn stop(&mut self, clock: &mut dyn FrameClock, tracer: &mut Tracer<'_>, reason: StopReason) {
        if !self.scheduler.is_running() {
            return;
        }
        self.scheduler.pause(clock);
        tracer.loop_stopped(&LoopStoppedEvent { reason });
    }
}
