// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation of the finished blur.
//!
//! The sink is the effect surface's sole renderable child. Buffers arrive
//! asynchronously relative to the cycle that produced them: a cycle
//! [`queue`](PresentationSink::queue)s its blurred buffer, and the host
//! [`commit`](PresentationSink::commit)s at its next update point. At most
//! one frame is pending — a newer queue replaces an uncommitted older one,
//! so the committed frame always jumps to the freshest content.
//!
//! Rounded-corner clipping is a property of the sink alone: changing the
//! corner radius reconfigures the clip of whatever frame is committed and
//! never triggers a re-sample.

use kurbo::{Point, Rect, RoundedRect, Size};

use frostpane_raster::PixelBuffer;

/// One presentable frame: the committed buffer plus where and how to show
/// it.
#[derive(Debug)]
pub struct PresentedFrame<'a> {
    /// The blurred pixels.
    pub buffer: &'a PixelBuffer,
    /// Destination in the effect surface's local space. The buffer is
    /// scaled to exactly fill this rectangle.
    pub dest: Rect,
    /// Rounded-corner clip applied to the sink, if any.
    pub clip: Option<RoundedRect>,
}

/// The effect surface's renderable child.
#[derive(Debug, Default)]
pub struct PresentationSink {
    bounds: Size,
    corner_radius: f64,
    pending: Option<PixelBuffer>,
    committed: Option<PixelBuffer>,
}

impl PresentationSink {
    /// Creates an empty sink with the given clip radius.
    #[must_use]
    pub fn new(corner_radius: f64) -> Self {
        Self {
            bounds: Size::ZERO,
            corner_radius,
            pending: None,
            committed: None,
        }
    }

    /// The destination bounds (the effect surface's size).
    #[must_use]
    pub const fn bounds(&self) -> Size {
        self.bounds
    }

    /// Follows the effect surface's size. Takes effect on the next
    /// [`frame`](Self::frame) read; the committed buffer is simply
    /// stretched to the new bounds until replaced.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    /// The current corner radius.
    #[must_use]
    pub const fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    /// Reconfigures the rounded-corner clip. Independent of the sampling
    /// pipeline: the change shows on the next presented frame without an
    /// extra sample cycle.
    pub fn set_corner_radius(&mut self, corner_radius: f64) {
        self.corner_radius = corner_radius;
    }

    /// Queues a blurred buffer for the next commit, replacing any frame
    /// still waiting.
    pub fn queue(&mut self, buffer: PixelBuffer) {
        self.pending = Some(buffer);
    }

    /// Whether a queued frame is waiting for commit.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Promotes the pending frame to the committed one, at the host's next
    /// update point. Returns whether the displayed content changed.
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(buffer) => {
                self.committed = Some(buffer);
                true
            }
            None => false,
        }
    }

    /// The committed frame, ready to draw.
    #[must_use]
    pub fn frame(&self) -> Option<PresentedFrame<'_>> {
        let buffer = self.committed.as_ref()?;
        let dest = Rect::from_origin_size(Point::ZERO, self.bounds);
        let clip = (self.corner_radius > 0.0)
            .then(|| RoundedRect::from_rect(dest, self.corner_radius));
        Some(PresentedFrame { buffer, dest, clip })
    }

    /// Drops both the pending and the committed frame.
    pub fn clear(&mut self) {
        self.pending = None;
        self.committed = None;
    }
}

#[cfg(test)]
mod tests {
    use frostpane_core::color::Argb;

    use super::*;

    fn buffer_of(color: Argb) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.fill(color);
        buffer
    }

    #[test]
    fn commit_promotes_pending() {
        let mut sink = PresentationSink::new(0.0);
        assert!(sink.frame().is_none());

        sink.queue(buffer_of(Argb::new(255, 1, 1, 1)));
        assert!(sink.has_pending());
        assert!(sink.frame().is_none(), "queue alone does not present");

        assert!(sink.commit());
        assert!(!sink.has_pending());
        assert!(sink.frame().is_some());
    }

    #[test]
    fn commit_without_pending_is_noop() {
        let mut sink = PresentationSink::new(0.0);
        assert!(!sink.commit());

        sink.queue(buffer_of(Argb::new(255, 1, 1, 1)));
        sink.commit();
        assert!(!sink.commit(), "nothing new to promote");
    }

    #[test]
    fn newer_queue_replaces_uncommitted_frame() {
        let mut sink = PresentationSink::new(0.0);
        sink.queue(buffer_of(Argb::new(255, 1, 1, 1)));
        sink.queue(buffer_of(Argb::new(255, 2, 2, 2)));
        sink.commit();

        let frame = sink.frame().unwrap();
        assert_eq!(frame.buffer.get(0, 0), Argb::new(255, 2, 2, 2));
    }

    #[test]
    fn frame_fills_bounds() {
        let mut sink = PresentationSink::new(0.0);
        sink.set_bounds(Size::new(120.0, 80.0));
        sink.queue(buffer_of(Argb::new(255, 1, 1, 1)));
        sink.commit();

        let frame = sink.frame().unwrap();
        assert_eq!(frame.dest, Rect::new(0.0, 0.0, 120.0, 80.0));
        assert!(frame.clip.is_none(), "zero radius means no clip");
    }

    #[test]
    fn corner_radius_updates_clip_without_new_frame() {
        let mut sink = PresentationSink::new(0.0);
        sink.set_bounds(Size::new(100.0, 100.0));
        sink.queue(buffer_of(Argb::new(255, 1, 1, 1)));
        sink.commit();

        sink.set_corner_radius(8.0);
        let frame = sink.frame().unwrap();
        let clip = frame.clip.expect("radius produces a clip");
        assert_eq!(clip.radii().top_left, 8.0);
    }
}
