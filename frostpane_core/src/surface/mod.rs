// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface registry.
//!
//! A *surface* is one node of the host view hierarchy as the blur pipeline
//! sees it. Each surface has:
//!
//! - An identity ([`SurfaceId`]) — a generational handle that becomes stale
//!   when the surface is destroyed, so the effect's weak target reference
//!   can be liveness-checked before every use.
//! - Topology — parent, first-child, and sibling links forming an ordered
//!   tree.
//! - Properties: local offset within the parent, device-pixel size, scroll
//!   offset, optional lookup tag, visibility, and a flat fill color
//!   (transparent for pure containers).
//!
//! Surfaces are stored in struct-of-arrays layout with index-based handles.
//! There is no evaluation pass: the region tracker recomputes positions
//! from scratch every cycle, so properties are plain reads and writes.

mod id;
mod store;
mod traverse;

pub use id::{INVALID, SurfaceId};
pub use store::SurfaceStore;
pub use traverse::{Children, Subtree};
