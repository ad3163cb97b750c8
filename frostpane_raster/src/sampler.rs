// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sampling and compositing of the source region.
//!
//! [`Sampler::sample`] rasterizes one source-space rectangle of a target
//! surface's visual subtree into a downscaled pixel buffer. The pass order
//! is deliberately asymmetric: the back tint *fills* the buffer before the
//! content is drawn (a base coat), while the front tint is *composited
//! source-over* across the finished buffer (a translucent veil). The
//! output buffer and the downscale transform are owned by the sampler and
//! reused across cycles; the buffer is resized in place only when the
//! scaled output size changes.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use frostpane_core::color::Argb;
use frostpane_core::surface::{SurfaceId, SurfaceStore};

use crate::buffer::PixelBuffer;

/// Error from a sampling attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleError {
    /// The target or the scaled output has no renderable area. This is a
    /// configuration or timing bug (e.g. sampling before layout has run)
    /// and must reach the caller rather than being swallowed.
    NoRenderableSurface {
        /// Offending width, after truncation.
        width: i64,
        /// Offending height, after truncation.
        height: i64,
    },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRenderableSurface { width, height } => {
                write!(f, "no renderable surface ({width}x{height})")
            }
        }
    }
}

impl core::error::Error for SampleError {}

/// Rasterizes source regions into a reusable downscaled buffer.
#[derive(Debug, Default)]
pub struct Sampler {
    raw: PixelBuffer,
    transform: Affine,
}

impl Sampler {
    /// Creates a sampler with an empty buffer; storage is allocated on the
    /// first successful sample.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: PixelBuffer::default(),
            transform: Affine::IDENTITY,
        }
    }

    /// Rasterizes `source_rect` (in `target`'s coordinate space) into the
    /// owned buffer at `downscale_factor` resolution.
    ///
    /// The buffer is filled with `back`, the target's visual subtree is
    /// drawn through the downscale transform, and `front` is composited
    /// over the whole result.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::NoRenderableSurface`] when the target
    /// reports a non-positive width or height, or when the truncated
    /// scaled output dimensions are not both strictly positive.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "output dimensions are range-checked before the narrowing casts"
    )]
    pub fn sample(
        &mut self,
        store: &SurfaceStore,
        target: SurfaceId,
        source_rect: Rect,
        downscale_factor: f64,
        back: Argb,
        front: Argb,
    ) -> Result<&PixelBuffer, SampleError> {
        let target_size = store.size(target);
        if target_size.width <= 0.0 || target_size.height <= 0.0 {
            return Err(SampleError::NoRenderableSurface {
                width: target_size.width as i64,
                height: target_size.height as i64,
            });
        }

        let out_width = (source_rect.width() * downscale_factor) as i64;
        let out_height = (source_rect.height() * downscale_factor) as i64;
        if out_width <= 0 || out_height <= 0 {
            return Err(SampleError::NoRenderableSurface {
                width: out_width,
                height: out_height,
            });
        }
        let (out_width, out_height) = (out_width as u32, out_height as u32);

        if self.raw.width() != out_width || self.raw.height() != out_height {
            self.raw.resize(out_width, out_height);
        }

        // Scale into the output resolution, then shift the requested
        // rectangle's top-left to the buffer origin.
        self.transform = Affine::scale(downscale_factor).then_translate(Vec2::new(
            -source_rect.x0 * downscale_factor,
            -source_rect.y0 * downscale_factor,
        ));

        self.raw.fill(back);
        self.rasterize_subtree(store, target);
        self.raw.fill_over(front);

        Ok(&self.raw)
    }

    /// Draws the target's subtree in depth-first pre-order (painter's
    /// order: each surface under its descendants, earlier siblings under
    /// later ones). Invisible surfaces prune their whole subtree.
    fn rasterize_subtree(&mut self, store: &SurfaceStore, target: SurfaceId) {
        let mut stack: Vec<(SurfaceId, Point)> = alloc::vec![(target, Point::ZERO)];
        while let Some((id, origin)) = stack.pop() {
            if !store.is_alive(id) || !store.visible(id) {
                continue;
            }

            let fill = store.fill(id);
            if !fill.is_transparent() {
                let local = Rect::from_origin_size(origin, store.size(id));
                let device = self.transform.transform_rect_bbox(local);
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "device coordinates are clamped to buffer bounds by the fill"
                )]
                self.raw.fill_rect_over(
                    device.x0.floor() as i64,
                    device.y0.floor() as i64,
                    device.x1.ceil() as i64,
                    device.y1.ceil() as i64,
                    fill,
                );
            }

            // Push children in reverse sibling order so the first child is
            // drawn next (and thus underneath its later siblings).
            let children: Vec<_> = store.children(id).collect();
            for child in children.into_iter().rev() {
                stack.push((child, origin + store.offset(child)));
            }
        }
    }
}
