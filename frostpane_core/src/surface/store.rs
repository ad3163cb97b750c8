// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays surface storage with allocation and topology management.

use alloc::vec::Vec;

use kurbo::{Size, Vec2};

use crate::color::Argb;

use super::id::{INVALID, SurfaceId};
use super::traverse::{Children, Subtree};

/// Struct-of-arrays storage for all surfaces.
///
/// Surfaces are addressed by [`SurfaceId`] handles. Internally, each
/// surface occupies a slot in parallel arrays. Destroyed surfaces are
/// recycled via a free list, and generation counters prevent stale handle
/// access.
///
/// A surface models one node of the host view hierarchy as the blur
/// pipeline sees it: a local offset within its parent, a device-pixel
/// size, a scroll offset for its own content, an optional lookup tag, a
/// visibility flag, and a flat fill color (transparent for pure
/// containers).
#[derive(Debug)]
pub struct SurfaceStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties --
    offset: Vec<Vec2>,
    size: Vec<Size>,
    scroll: Vec<Vec2>,
    tag: Vec<Option<i32>>,
    visible: Vec<bool>,
    fill: Vec<Argb>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
}

impl Default for SurfaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceStore {
    /// Creates an empty surface store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            offset: Vec::new(),
            size: Vec::new(),
            scroll: Vec::new(),
            tag: Vec::new(),
            visible: Vec::new(),
            fill: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a new surface and returns its handle.
    ///
    /// The surface starts at offset (0, 0) with zero size, no scroll, no
    /// tag, visible, transparent fill, and no parent.
    pub fn create_surface(&mut self) -> SurfaceId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.parent[idx as usize] = INVALID;
            self.first_child[idx as usize] = INVALID;
            self.next_sibling[idx as usize] = INVALID;
            self.prev_sibling[idx as usize] = INVALID;
            self.offset[idx as usize] = Vec2::ZERO;
            self.size[idx as usize] = Size::ZERO;
            self.scroll[idx as usize] = Vec2::ZERO;
            self.tag[idx as usize] = None;
            self.visible[idx as usize] = true;
            self.fill[idx as usize] = Argb::TRANSPARENT;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.offset.push(Vec2::ZERO);
            self.size.push(Size::ZERO);
            self.scroll.push(Vec2::ZERO);
            self.tag.push(None);
            self.visible.push(true);
            self.fill.push(Argb::TRANSPARENT);
            self.generation.push(0);
            idx
        };

        SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a surface, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the surface has children (remove them first) or if the
    /// handle is stale.
    pub fn destroy_surface(&mut self, id: SurfaceId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy surface with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live surface.
    #[must_use]
    pub fn is_alive(&self, id: SurfaceId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: SurfaceId, child: SurfaceId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the surface has no parent.
    pub fn remove_from_parent(&mut self, child: SurfaceId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "surface has no parent");
        self.unlink_from_parent(c);
    }

    /// Returns the parent of a surface, if any.
    ///
    /// Unlike the mutators, this soft-fails: a stale handle or a parent
    /// slot that has since been freed yields `None`, so walk-time reads
    /// tolerate teardown races instead of panicking.
    #[must_use]
    pub fn parent(&self, id: SurfaceId) -> Option<SurfaceId> {
        if !self.is_alive(id) {
            return None;
        }
        let p = self.parent[id.idx as usize];
        if p == INVALID || self.free_list.contains(&p) {
            None
        } else {
            Some(SurfaceId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a surface.
    #[must_use]
    pub fn children(&self, id: SurfaceId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns a depth-first pre-order iterator over the subtree rooted at
    /// `id`, including `id` itself.
    #[must_use]
    pub fn subtree(&self, id: SurfaceId) -> Subtree<'_> {
        self.validate(id);
        Subtree::new(self, id.idx)
    }

    // -- Property getters --

    /// Returns the local offset of a surface within its parent.
    #[must_use]
    pub fn offset(&self, id: SurfaceId) -> Vec2 {
        self.validate(id);
        self.offset[id.idx as usize]
    }

    /// Returns the device-pixel size of a surface.
    #[must_use]
    pub fn size(&self, id: SurfaceId) -> Size {
        self.validate(id);
        self.size[id.idx as usize]
    }

    /// Returns the scroll offset of a surface's own content.
    #[must_use]
    pub fn scroll(&self, id: SurfaceId) -> Vec2 {
        self.validate(id);
        self.scroll[id.idx as usize]
    }

    /// Returns the lookup tag of a surface, if any.
    #[must_use]
    pub fn tag(&self, id: SurfaceId) -> Option<i32> {
        self.validate(id);
        self.tag[id.idx as usize]
    }

    /// Returns whether a surface is visible.
    #[must_use]
    pub fn visible(&self, id: SurfaceId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the flat fill color of a surface.
    #[must_use]
    pub fn fill(&self, id: SurfaceId) -> Argb {
        self.validate(id);
        self.fill[id.idx as usize]
    }

    // -- Property setters --

    /// Sets the local offset of a surface within its parent.
    pub fn set_offset(&mut self, id: SurfaceId, offset: Vec2) {
        self.validate(id);
        self.offset[id.idx as usize] = offset;
    }

    /// Sets the device-pixel size of a surface.
    pub fn set_size(&mut self, id: SurfaceId, size: Size) {
        self.validate(id);
        self.size[id.idx as usize] = size;
    }

    /// Sets the scroll offset of a surface's own content.
    pub fn set_scroll(&mut self, id: SurfaceId, scroll: Vec2) {
        self.validate(id);
        self.scroll[id.idx as usize] = scroll;
    }

    /// Sets the lookup tag of a surface.
    pub fn set_tag(&mut self, id: SurfaceId, tag: Option<i32>) {
        self.validate(id);
        self.tag[id.idx as usize] = tag;
    }

    /// Sets the visibility of a surface.
    pub fn set_visible(&mut self, id: SurfaceId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
    }

    /// Sets the flat fill color of a surface.
    pub fn set_fill(&mut self, id: SurfaceId, fill: Argb) {
        self.validate(id);
        self.fill[id.idx as usize] = fill;
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: SurfaceId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale SurfaceId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = SurfaceStore::new();
        let id = store.create_surface();
        assert!(store.is_alive(id));
        store.destroy_surface(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = SurfaceStore::new();
        let id1 = store.create_surface();
        store.destroy_surface(id1);
        let id2 = store.create_surface();
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn add_child_and_query() {
        let mut store = SurfaceStore::new();
        let parent = store.create_surface();
        let child1 = store.create_surface();
        let child2 = store.create_surface();

        store.add_child(parent, child1);
        store.add_child(parent, child2);

        assert_eq!(store.parent(child1), Some(parent));
        assert_eq!(store.parent(child2), Some(parent));

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0], child1);
        assert_eq!(kids[1], child2);
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = SurfaceStore::new();
        let parent = store.create_surface();
        let child = store.create_surface();

        store.add_child(parent, child);
        assert_eq!(store.parent(child), Some(parent));

        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn parent_of_stale_handle_is_none() {
        let mut store = SurfaceStore::new();
        let parent = store.create_surface();
        let child = store.create_surface();
        store.add_child(parent, child);

        store.remove_from_parent(child);
        store.destroy_surface(child);

        assert_eq!(store.parent(child), None, "stale handle soft-fails");
    }

    #[test]
    fn subtree_is_depth_first_preorder() {
        let mut store = SurfaceStore::new();
        let a = store.create_surface();
        let b = store.create_surface();
        let c = store.create_surface();
        let d = store.create_surface();

        // Tree: a -> [b -> [d], c]
        store.add_child(a, b);
        store.add_child(a, c);
        store.add_child(b, d);

        let order: Vec<_> = store.subtree(a).collect();
        assert_eq!(order, alloc::vec![a, b, d, c]);
    }

    #[test]
    fn properties_round_trip() {
        let mut store = SurfaceStore::new();
        let id = store.create_surface();

        store.set_offset(id, Vec2::new(3.0, 4.0));
        store.set_size(id, Size::new(200.0, 100.0));
        store.set_scroll(id, Vec2::new(0.0, 42.0));
        store.set_tag(id, Some(7));
        store.set_visible(id, false);
        store.set_fill(id, Argb::new(255, 1, 2, 3));

        assert_eq!(store.offset(id), Vec2::new(3.0, 4.0));
        assert_eq!(store.size(id), Size::new(200.0, 100.0));
        assert_eq!(store.scroll(id), Vec2::new(0.0, 42.0));
        assert_eq!(store.tag(id), Some(7));
        assert!(!store.visible(id));
        assert_eq!(store.fill(id), Argb::new(255, 1, 2, 3));
    }

    #[test]
    #[should_panic(expected = "cannot destroy surface with children")]
    fn destroy_with_children_panics() {
        let mut store = SurfaceStore::new();
        let parent = store.create_surface();
        let child = store.create_surface();
        store.add_child(parent, child);
        store.destroy_surface(parent);
    }

    #[test]
    #[should_panic(expected = "stale SurfaceId")]
    fn destroyed_handle_panics_on_set_offset() {
        let mut store = SurfaceStore::new();
        let id = store.create_surface();
        store.destroy_surface(id);
        store.set_offset(id, Vec2::ZERO);
    }

    #[test]
    #[should_panic(expected = "stale SurfaceId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut store = SurfaceStore::new();
        let root = store.create_surface();
        let id = store.create_surface();
        store.destroy_surface(id);
        store.add_child(root, id);
    }
}
