// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Real-time backdrop blur for a UI container.
//!
//! [`BackdropBlur`] continuously samples the pixels behind a designated
//! target surface, downsamples and tints them, hands the raster to an
//! external blur stage, and queues the result for presentation — a
//! frosted-glass backdrop that tracks scrolling and layout changes.
//!
//! The host integrates by:
//!
//! 1. Registering its view hierarchy in a
//!    [`SurfaceStore`](frostpane_core::surface::SurfaceStore) and keeping
//!    offsets/sizes/scroll in sync.
//! 2. Providing a [`FrameClock`](frostpane_core::sched::FrameClock) and an
//!    implementation of [`BlurStage`](frostpane_raster::BlurStage).
//! 3. Forwarding lifecycle callbacks (attach, detach, size, enabled) and
//!    delivering armed ticks to [`BackdropBlur::on_tick`].
//! 4. Calling [`BackdropBlur::commit_presentation`] at its next update
//!    point and drawing the sink's
//!    [`frame`](sink::PresentationSink::frame).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod effect;
pub mod sink;

pub use effect::{BackdropBlur, CycleError, CycleOutcome};
