// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Downscaling sampler, tint compositing, and the blur-stage contract.
//!
//! This crate owns the pixel currency of the pipeline:
//!
//! - [`PixelBuffer`] — a reusable packed-ARGB raster.
//! - [`Sampler`] — rasterizes a source-space rectangle of a target
//!   surface's subtree into the buffer through a downscale transform,
//!   with back- and front-tint overlay passes.
//! - [`BlurStage`] — the contract for the external blur transform, which
//!   this crate deliberately does not implement.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod blur;
mod buffer;
mod sampler;

pub use blur::{BlurError, BlurStage};
pub use buffer::PixelBuffer;
pub use sampler::{SampleError, Sampler};
