// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-space region tracking.
//!
//! Positions are accumulated by walking the ancestor chain and summing each
//! surface's local offset. The walk is iterative with a hard depth bound,
//! so it terminates even when the ancestry is malformed or cyclic, and it
//! soft-fails on broken links: a missing, dead, or stale parent terminates
//! the walk with the offsets accumulated so far, contributing (0, 0) for
//! the unreachable remainder. That tolerance matters during layout and
//! teardown races, where an ancestor can disappear between cycles.
//!
//! [`find_target_by_tag`] resolves the target-by-identifier lookup: it
//! walks upward from the effect surface, searching each ancestor's subtree
//! depth-first pre-order, so the closest ancestor containing a match wins
//! and the search order is deterministic.

use kurbo::{Point, Rect, Vec2};

use crate::surface::{SurfaceId, SurfaceStore};

/// Upper bound on ancestor-chain walks.
///
/// Bounds every walk independently of graph well-formedness; real
/// hierarchies are nowhere near this deep.
pub const MAX_ANCESTOR_DEPTH: usize = 256;

/// Returns the position of a surface's top-left corner in root space.
///
/// Sums the local offset of `id` and every ancestor that itself has a live
/// parent; the chain's topmost surface contributes nothing. A surface with
/// no parent therefore yields the zero point.
#[must_use]
pub fn position_in_root(store: &SurfaceStore, id: SurfaceId) -> Point {
    let mut acc = Vec2::ZERO;
    let mut current = id;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if !store.is_alive(current) {
            break;
        }
        let Some(parent) = store.parent(current) else {
            break;
        };
        acc += store.offset(current);
        current = parent;
    }
    acc.to_point()
}

/// Returns the topmost reachable ancestor of a surface.
///
/// This is the "root surface of the window" the target reference falls back
/// to when unset or stale. The walk stops at the first broken link, so in a
/// teardown race it returns the highest ancestor still reachable.
#[must_use]
pub fn root_of(store: &SurfaceStore, id: SurfaceId) -> SurfaceId {
    let mut current = id;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        match store.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

/// Returns the position of `effect` relative to `target`.
///
/// With a target, this is `position_in_root(effect) -
/// position_in_root(target)`. Without one, the effect's own root-space
/// position is returned (self-relative: the region directly in front of
/// the surface).
#[must_use]
pub fn relative_position(
    store: &SurfaceStore,
    effect: SurfaceId,
    target: Option<SurfaceId>,
) -> Point {
    let own = position_in_root(store, effect);
    match target {
        Some(target) => {
            let anchor = position_in_root(store, target);
            Point::new(own.x - anchor.x, own.y - anchor.y)
        }
        None => own,
    }
}

/// Searches for a surface with the given tag, preferring the closest
/// ancestor's subtree.
///
/// Walks from `from` upward; at each level the ancestor's subtree
/// (including the ancestor itself) is searched depth-first pre-order. The
/// first match wins. Negative tags never match (the configuration uses -1
/// for "no explicit target"). Returns `None` when no ancestor level
/// contains a match.
#[must_use]
pub fn find_target_by_tag(store: &SurfaceStore, from: SurfaceId, tag: i32) -> Option<SurfaceId> {
    if tag < 0 {
        return None;
    }
    let mut level = Some(from);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let ancestor = level?;
        if let Some(hit) = store
            .subtree(ancestor)
            .find(|&s| store.tag(s) == Some(tag))
        {
            return Some(hit);
        }
        level = store.parent(ancestor);
    }
    None
}

/// Computes the sample rectangle for one cycle, in target space.
///
/// The origin is the effect surface's position relative to `target`,
/// displaced by the manual offset and the target's scroll offset; the size
/// is the effect surface's own device-pixel size.
#[must_use]
pub fn sample_rect(
    store: &SurfaceStore,
    effect: SurfaceId,
    target: Option<SurfaceId>,
    manual_offset: Vec2,
) -> Rect {
    let mut origin = relative_position(store, effect, target);
    origin += manual_offset;
    if let Some(target) = target
        && store.is_alive(target)
    {
        origin += store.scroll(target);
    }
    Rect::from_origin_size(origin, store.size(effect))
}
