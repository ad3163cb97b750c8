// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for backdrop-blur region tracking and frame scheduling.
//!
//! `frostpane_core` provides the data model and pure logic underneath a
//! real-time frosted-glass effect: a registry of host surfaces, the region
//! math that locates the effect surface relative to a sampling target, and
//! the frame-clock scheduling that re-triggers the pipeline. It is
//! `no_std` compatible (with `alloc`); everything platform-specific is an
//! injected capability.
//!
//! # Architecture
//!
//! Each cycle of the effect flows through the pieces defined here and in
//! the companion crates:
//!
//! ```text
//!   FrameClock tick ──► FrameScheduler::on_tick ──► Tick::Render
//!                                                      │
//!                 ┌────────────────────────────────────┘
//!                 ▼
//!   region::sample_rect ──► Sampler::sample ──► BlurStage::blur
//!                                                      │
//!                 ┌────────────────────────────────────┘
//!                 ▼
//!   PresentationSink::queue ──► (next UI turn) ──► commit
//! ```
//!
//! **[`surface`]** — Struct-of-arrays surface registry with generational
//! handles. Models the host view hierarchy: offsets, sizes, scroll
//! offsets, lookup tags, visibility, flat fill colors.
//!
//! **[`region`]** — Ancestor-walk position accumulation, target resolution
//! by tag, and per-cycle sample-rectangle derivation. Iterative with a
//! depth bound; soft-fails on broken ancestry.
//!
//! **[`sched`]** — The [`FrameClock`](sched::FrameClock) capability and the
//! two-state [`FrameScheduler`](sched::FrameScheduler) that re-arms itself
//! each tick.
//!
//! **[`config`]** — The effect's named-option configuration.
//!
//! **[`color`]** — Packed ARGB with source-over compositing for tints.
//!
//! **[`time`]** — Millisecond [`HostTime`](time::HostTime) and
//! [`Duration`](time::Duration).
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod color;
pub mod config;
pub mod region;
pub mod sched;
pub mod surface;
pub mod time;
pub mod trace;
