// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree construction, mutation, and the split/merge machinery.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::mem;

use hashbrown::{HashMap, HashSet};

use crate::node::{Node, NodeId};
use crate::types::{MAX_DEPTH, MAX_SIDE, ObjectEntry, Rect};

/// Decides whether a rectangle should stop splitting.
///
/// Receives the rectangle's width, height, and the number of objects inside
/// it; returning `true` keeps the rectangle a leaf. A single-cell rectangle
/// never splits regardless of the predicate.
///
/// The tree re-evaluates the predicate on every mutation and will split or
/// merge to match it. A predicate that is not monotone in `n` can flip a
/// region back and forth across repeated mutations; the structure stays
/// valid, but it will not settle.
///
/// Examples:
///
/// - keep rectangles at least 10x10: `|w, h, _| w <= 10 && h <= 10`
/// - at most 8 objects per leaf: `|_, _, n| n <= 8`
pub type SplitStopper = Box<dyn Fn(i32, i32, usize) -> bool>;

/// Callback observing a leaf coming into or going out of existence.
pub type LeafCallback<P> = Box<dyn FnMut(&Node<P>)>;

/// Adaptive quadtree over a `w` by `h` grid of cells.
///
/// Cells are addressed `(x, y)` with `x` in `0..h` (rows) and `y` in `0..w`
/// (columns). Objects are `(x, y, tag)` triples stored in the leaf whose
/// rectangle contains the cell; inserting or removing one may split the leaf
/// or merge it with its siblings so that every leaf satisfies the split
/// predicate and every internal node does not.
///
/// Callbacks, the split predicate, and query visitors run while the tree is
/// borrowed; they must not call back into it.
pub struct Tree<P: Copy + Eq + Hash + Debug> {
    pub(crate) w: i32,
    pub(crate) h: i32,
    // Node arena. Slots are recycled through the free list; node identity
    // lives in the packed id, not the slot index.
    pub(crate) nodes: Vec<Option<Node<P>>>,
    free_list: Vec<usize>,
    // Every live node, leaf and internal, keyed by packed id. Parent lookup
    // is a directory query at pack(d - 1, x1, y1) rather than a back-pointer.
    pub(crate) directory: HashMap<NodeId, usize>,
    pub(crate) root: Option<usize>,
    pub(crate) max_depth: u8,
    depth_counts: [u32; MAX_DEPTH as usize + 1],
    leaf_count: usize,
    object_count: usize,
    stopper: Option<SplitStopper>,
    leaf_created: Option<LeafCallback<P>>,
    leaf_removed: Option<LeafCallback<P>>,
}

impl<P: Copy + Eq + Hash + Debug> Debug for Tree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("w", &self.w)
            .field("h", &self.h)
            .field("nodes", &self.directory.len())
            .field("leaves", &self.leaf_count)
            .field("objects", &self.object_count)
            .field("depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl<P: Copy + Eq + Hash + Debug> Tree<P> {
    /// Create an empty tree over a `w` by `h` region with no split predicate:
    /// regions split all the way down to single cells.
    ///
    /// Both sides must be in `1..=MAX_SIDE`.
    pub fn new(w: i32, h: i32) -> Self {
        assert!(
            w > 0 && h > 0 && w <= MAX_SIDE && h <= MAX_SIDE,
            "region sides must be in 1..=MAX_SIDE"
        );
        Self {
            w,
            h,
            nodes: Vec::new(),
            free_list: Vec::new(),
            directory: HashMap::new(),
            root: None,
            max_depth: 0,
            depth_counts: [0; MAX_DEPTH as usize + 1],
            leaf_count: 0,
            object_count: 0,
            stopper: None,
            leaf_created: None,
            leaf_removed: None,
        }
    }

    /// Create an empty tree with a split-stop predicate.
    pub fn with_split_stopper(
        w: i32,
        h: i32,
        stop: impl Fn(i32, i32, usize) -> bool + 'static,
    ) -> Self {
        let mut tree = Self::new(w, h);
        tree.stopper = Some(Box::new(stop));
        tree
    }

    /// Install or replace the callback fired after a leaf comes into
    /// existence. Pass `None` to remove it.
    pub fn set_leaf_created_callback(&mut self, cb: Option<LeafCallback<P>>) {
        self.leaf_created = cb;
    }

    /// Install or replace the callback fired after a leaf ceases to exist.
    /// Pass `None` to remove it.
    pub fn set_leaf_removed_callback(&mut self, cb: Option<LeafCallback<P>>) {
        self.leaf_removed = cb;
    }

    /// Columns in the managed region.
    pub fn width(&self) -> i32 {
        self.w
    }

    /// Rows in the managed region.
    pub fn height(&self) -> i32 {
        self.h
    }

    /// Current maximum depth of any live node.
    pub fn depth(&self) -> u8 {
        self.max_depth
    }

    /// Total number of live nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.directory.len()
    }

    /// Number of live leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Build the initial partitioning. Must be called exactly once, before
    /// any mutation; every operation on an unbuilt tree is a no-op.
    pub fn build(&mut self) {
        debug_assert!(self.root.is_none(), "build called on a non-empty tree");
        let rect = Rect::new(0, 0, self.h - 1, self.w - 1);
        let slot = self.create_node(true, 0, rect);
        self.root = Some(slot);
        if self.splittable(rect, 0) {
            let mut created = Vec::new();
            self.split_down(slot, &mut created);
            // The root was never announced, so only the fresh leaves are.
            for leaf in created {
                self.emit_created(leaf);
            }
        } else {
            self.emit_created(slot);
        }
    }

    /// Add an object with `tag` at cell `(x, y)`, then re-partition the
    /// affected leaf if the predicate now calls for it.
    ///
    /// A position outside the region or an entry already present is a no-op.
    pub fn add(&mut self, x: i32, y: i32, tag: P) {
        if !self.contains_cell(x, y) {
            return;
        }
        let Some(slot) = self.find_slot(x, y) else {
            return;
        };
        if !self.node_mut(slot).objects.insert(ObjectEntry { x, y, tag }) {
            return;
        }
        self.object_count += 1;
        // The predicate is opaque: one insertion can push the leaf across
        // the split threshold in either direction. At most one of these
        // actually runs.
        if !self.try_split_down(slot) {
            self.try_merge_up(slot);
        }
    }

    /// Remove the object with `tag` at cell `(x, y)`, then re-partition the
    /// affected leaf if the predicate now calls for it.
    ///
    /// A position outside the region or a missing entry is a no-op.
    pub fn remove(&mut self, x: i32, y: i32, tag: P) {
        if !self.contains_cell(x, y) {
            return;
        }
        let Some(slot) = self.find_slot(x, y) else {
            return;
        };
        if !self.node_mut(slot).objects.remove(&ObjectEntry { x, y, tag }) {
            return;
        }
        self.object_count -= 1;
        if !self.try_merge_up(slot) {
            self.try_split_down(slot);
        }
    }

    // ~~~~~~~~~~~ internals ~~~~~~~~~~~~

    pub(crate) fn contains_cell(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.h && y >= 0 && y < self.w
    }

    pub(crate) fn pack_at(&self, d: u8, x: i32, y: i32) -> NodeId {
        NodeId::pack(d, x, y, self.w, self.h)
    }

    pub(crate) fn node(&self, slot: usize) -> &Node<P> {
        self.nodes[slot].as_ref().expect("dangling slot")
    }

    pub(crate) fn node_mut(&mut self, slot: usize) -> &mut Node<P> {
        self.nodes[slot].as_mut().expect("dangling slot")
    }

    /// Whether a rectangle holding `n` objects must be an internal node.
    ///
    /// False means it must be a leaf: either it is a single cell, or the
    /// caller's predicate stopped it.
    fn splittable(&self, rect: Rect, n: usize) -> bool {
        if rect.is_single_cell() {
            return false;
        }
        match &self.stopper {
            Some(stop) => !stop(rect.width(), rect.height(), n),
            None => true,
        }
    }

    /// Allocate a node, register it in the directory, and maintain the depth
    /// table and leaf counter.
    fn create_node(&mut self, is_leaf: bool, d: u8, rect: Rect) -> usize {
        let id = self.pack_at(d, rect.x1, rect.y1);
        let node = Node::new(id, is_leaf, d, rect);
        let slot = if let Some(slot) = self.free_list.pop() {
            self.nodes[slot] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        };
        self.directory.insert(id, slot);
        self.depth_counts[d as usize] += 1;
        self.max_depth = self.max_depth.max(d);
        if is_leaf {
            self.leaf_count += 1;
        }
        slot
    }

    /// Unregister a leaf from the directory and counters. The slot itself
    /// stays allocated until [`Self::release_slot`] so that callbacks can
    /// still observe the node.
    fn detach_leaf(&mut self, slot: usize) {
        let (id, d) = {
            let node = self.node(slot);
            (node.id(), node.depth())
        };
        self.directory.remove(&id);
        self.depth_counts[d as usize] -= 1;
        if d == self.max_depth {
            while self.max_depth > 0 && self.depth_counts[self.max_depth as usize] == 0 {
                self.max_depth -= 1;
            }
        }
        self.leaf_count -= 1;
    }

    fn release_slot(&mut self, slot: usize) {
        self.nodes[slot] = None;
        self.free_list.push(slot);
    }

    /// Split the leaf at `slot` if the predicate calls for it, firing
    /// callbacks once the subtree is complete. Returns whether a split ran.
    fn try_split_down(&mut self, slot: usize) -> bool {
        let (is_leaf, rect, n) = {
            let node = self.node(slot);
            (node.is_leaf, node.rect(), node.objects.len())
        };
        if !is_leaf || !self.splittable(rect, n) {
            return false;
        }
        let mut created = Vec::new();
        self.split_down(slot, &mut created);
        self.emit_removed(slot);
        for leaf in created {
            self.emit_created(leaf);
        }
        true
    }

    /// Materialise the subtree below `slot`, distributing its objects among
    /// freshly created children, and demote it to an internal node. Fresh
    /// leaf slots are pushed onto `created`; no callbacks fire here.
    fn split_down(&mut self, slot: usize, created: &mut Vec<usize>) {
        let (d, rect, mut upstream) = {
            let node = self.node_mut(slot);
            (node.depth(), node.rect(), mem::take(&mut node.objects))
        };
        let mut children = [None; 4];
        for (i, quadrant) in rect.quadrants().into_iter().enumerate() {
            if let Some(quadrant) = quadrant {
                children[i] = Some(self.spawn_child(d + 1, quadrant, &mut upstream, created));
            }
        }
        debug_assert!(upstream.is_empty(), "object outside every quadrant");
        let node = self.node_mut(slot);
        node.children = children;
        if node.is_leaf {
            node.is_leaf = false;
            self.leaf_count -= 1;
        }
    }

    /// Create the node for one quadrant, stealing the objects inside it from
    /// `upstream`, and keep splitting while the predicate allows.
    fn spawn_child(
        &mut self,
        d: u8,
        rect: Rect,
        upstream: &mut HashSet<ObjectEntry<P>>,
        created: &mut Vec<usize>,
    ) -> usize {
        // Collect-then-erase; never erase from a set while iterating it.
        let mut inside = HashSet::new();
        upstream.retain(|entry| {
            if rect.contains(entry.x, entry.y) {
                inside.insert(*entry);
                false
            } else {
                true
            }
        });
        if self.splittable(rect, inside.len()) {
            let slot = self.create_node(false, d, rect);
            self.node_mut(slot).objects = inside;
            self.split_down(slot, created);
            slot
        } else {
            let slot = self.create_node(true, d, rect);
            self.node_mut(slot).objects = inside;
            created.push(slot);
            slot
        }
    }

    /// Collapse the leaf at `slot` into its parent, and keep ascending while
    /// the parent would otherwise violate the rule that internal nodes stay
    /// splittable. Returns whether at least one level collapsed.
    ///
    /// Callbacks fire once the whole chain has settled: removal for every
    /// leaf that existed when the chain began, creation for the final
    /// ancestor leaf. Parents promoted and re-collapsed mid-chain were never
    /// announced and stay silent.
    fn try_merge_up(&mut self, slot: usize) -> bool {
        let mut current = slot;
        let mut promoted: Option<usize> = None;
        let mut announced: Vec<usize> = Vec::new();
        let mut silent: Vec<usize> = Vec::new();
        loop {
            let (d, rect, is_leaf) = {
                let node = self.node(current);
                (node.depth(), node.rect(), node.is_leaf)
            };
            if d == 0 || !is_leaf {
                break;
            }
            let parent_id = self.pack_at(d - 1, rect.x1, rect.y1);
            let parent_slot = self.directory[&parent_id];
            let children = self.node(parent_slot).children;

            // Merge only when every present sibling is currently a leaf.
            let mut total = 0;
            let mut all_leaves = true;
            for child in children.into_iter().flatten() {
                let child = self.node(child);
                if !child.is_leaf {
                    all_leaves = false;
                    break;
                }
                total += child.objects.len();
            }
            if !all_leaves {
                break;
            }
            let parent_rect = self.node(parent_slot).rect();
            if self.splittable(parent_rect, total) {
                break;
            }

            // Transplant every child's objects into the parent before any
            // child slot is released.
            for (i, child) in children.into_iter().enumerate() {
                let Some(child) = child else {
                    continue;
                };
                let objects = mem::take(&mut self.node_mut(child).objects);
                self.node_mut(parent_slot).objects.extend(objects);
                self.detach_leaf(child);
                if promoted == Some(child) {
                    silent.push(child);
                } else {
                    announced.push(child);
                }
                self.node_mut(parent_slot).children[i] = None;
            }
            let parent = self.node_mut(parent_slot);
            parent.is_leaf = true;
            self.leaf_count += 1;
            promoted = Some(parent_slot);
            current = parent_slot;
        }

        let Some(top) = promoted else {
            return false;
        };
        for &gone in &announced {
            self.emit_removed(gone);
        }
        for gone in announced.into_iter().chain(silent) {
            self.release_slot(gone);
        }
        self.emit_created(top);
        true
    }

    fn emit_created(&mut self, slot: usize) {
        if let Some(cb) = self.leaf_created.as_mut()
            && let Some(node) = self.nodes[slot].as_ref()
        {
            cb(node);
        }
    }

    fn emit_removed(&mut self, slot: usize) {
        if let Some(cb) = self.leaf_removed.as_mut()
            && let Some(node) = self.nodes[slot].as_ref()
        {
            cb(node);
        }
    }
}
