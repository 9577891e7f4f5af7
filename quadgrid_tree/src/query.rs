// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point, range, and neighbour queries over a built tree.

use core::fmt::Debug;
use core::hash::Hash;

use crate::node::{Node, NodeId};
use crate::tree::Tree;
use crate::types::{Direction, Rect};

impl<P: Copy + Eq + Hash + Debug> Tree<P> {
    /// The leaf whose rectangle contains cell `(x, y)`, or `None` outside
    /// the region.
    ///
    /// Runs a binary search on depth: at a candidate depth the packed id of
    /// `(x, y)` either misses the directory (too deep), resolves to an
    /// internal node (too shallow), or resolves to the answer. O(log depth).
    pub fn find(&self, x: i32, y: i32) -> Option<&Node<P>> {
        self.find_slot(x, y).map(|slot| self.node(slot))
    }

    pub(crate) fn find_slot(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains_cell(x, y) {
            return None;
        }
        let (mut lo, mut hi) = (0i32, i32::from(self.max_depth));
        while lo <= hi {
            let d = ((lo + hi) / 2) as u8;
            match self.directory.get(&self.pack_at(d, x, y)) {
                None => hi = i32::from(d) - 1,
                Some(&slot) => {
                    if self.node(slot).is_leaf() {
                        return Some(slot);
                    }
                    lo = i32::from(d) + 1;
                }
            }
        }
        None
    }

    /// The deepest node whose rectangle covers both corners, or `None` if
    /// either corner is outside the region.
    ///
    /// Corner order does not matter. On a built tree with both corners
    /// inside, the search always succeeds at worst at the root.
    pub fn find_smallest_node_covering_range(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Option<&Node<P>> {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        if !self.contains_cell(x1, y1) || !self.contains_cell(x2, y2) {
            return None;
        }
        self.covering_slot(x1, y1, x2, y2, self.depth())
            .map(|slot| self.node(slot))
    }

    /// Binary search for the largest depth, at most `depth_cap`, where both
    /// corners pack to the same id and that id is live.
    fn covering_slot(&self, x1: i32, y1: i32, x2: i32, y2: i32, depth_cap: u8) -> Option<usize> {
        let mut best = None;
        let (mut lo, mut hi) = (0i32, i32::from(depth_cap));
        while lo <= hi {
            let d = ((lo + hi) / 2) as u8;
            let id = self.pack_at(d, x1, y1);
            if id == self.pack_at(d, x2, y2)
                && let Some(&slot) = self.directory.get(&id)
            {
                best = Some(slot);
                lo = i32::from(d) + 1;
            } else {
                hi = i32::from(d) - 1;
            }
        }
        best
    }

    /// Emit every stored `(x, y, tag)` inside the query rectangle.
    ///
    /// Requires `x1 <= x2` and `y1 <= y2`; an inverted rectangle is a no-op.
    /// A rectangle partly outside the region is clipped by the descent
    /// itself. Emission order is unspecified.
    pub fn query_range(&self, x1: i32, y1: i32, x2: i32, y2: i32, mut emit: impl FnMut(i32, i32, P)) {
        if x1 > x2 || y1 > y2 {
            return;
        }
        // Start from the smallest node covering the whole query; fall back
        // to the root when a corner is outside the region.
        let start = if self.contains_cell(x1, y1) && self.contains_cell(x2, y2) {
            self.covering_slot(x1, y1, x2, y2, self.depth())
        } else {
            None
        };
        let Some(start) = start.or(self.root) else {
            return;
        };
        self.collect_range(start, Rect::new(x1, y1, x2, y2), &mut emit);
    }

    fn collect_range(&self, slot: usize, query: Rect, emit: &mut impl FnMut(i32, i32, P)) {
        let node = self.node(slot);
        if !node.rect().overlaps(query) {
            return;
        }
        if node.is_leaf() {
            for entry in node.objects() {
                if query.contains(entry.x, entry.y) {
                    emit(entry.x, entry.y, entry.tag);
                }
            }
            return;
        }
        for child in node.children.into_iter().flatten() {
            self.collect_range(child, query, emit);
        }
    }

    /// Emit every object stored at or beneath the node with the given id.
    ///
    /// A leaf emits its own entries; an internal node recurses into all of
    /// its children. Unknown ids are a no-op.
    pub fn query_node(&self, id: NodeId, mut emit: impl FnMut(i32, i32, P)) {
        let Some(&slot) = self.directory.get(&id) else {
            return;
        };
        self.collect_subtree(slot, &mut emit);
    }

    fn collect_subtree(&self, slot: usize, emit: &mut impl FnMut(i32, i32, P)) {
        let node = self.node(slot);
        if node.is_leaf() {
            for entry in node.objects() {
                emit(entry.x, entry.y, entry.tag);
            }
            return;
        }
        for child in node.children.into_iter().flatten() {
            self.collect_subtree(child, emit);
        }
    }

    /// Visit every live node, leaves and internal nodes alike. Order is
    /// unspecified.
    pub fn for_each_node(&self, mut visit: impl FnMut(&Node<P>)) {
        for &slot in self.directory.values() {
            visit(self.node(slot));
        }
    }

    /// Visit every current leaf. Order is unspecified.
    pub fn for_each_leaf_node(&self, mut visit: impl FnMut(&Node<P>)) {
        for &slot in self.directory.values() {
            let node = self.node(slot);
            if node.is_leaf() {
                visit(node);
            }
        }
    }

    /// Visit the leaves planar-adjacent to `node` in the given direction.
    ///
    /// A diagonal direction looks up the single cell just outside the
    /// matching corner. A cardinal direction finds the smallest node covering
    /// the two cells past the matching edge, then walks down its side facing
    /// `node`; that covering node can never sit deeper than `node` itself,
    /// because a deeper one could not span both edge cells. Visit order is
    /// unspecified; nothing is visited when the neighbourhood leaves the
    /// region.
    pub fn find_neighbour_leaf_nodes(
        &self,
        node: &Node<P>,
        direction: Direction,
        mut visit: impl FnMut(&Node<P>),
    ) {
        let r = node.rect();
        let d = node.depth();
        match direction {
            Direction::North => {
                self.visit_edge((r.x1 - 1, r.y1), (r.x1 - 1, r.y2), d, Direction::South, &mut visit);
            }
            Direction::East => {
                self.visit_edge((r.x1, r.y2 + 1), (r.x2, r.y2 + 1), d, Direction::West, &mut visit);
            }
            Direction::South => {
                self.visit_edge((r.x2 + 1, r.y1), (r.x2 + 1, r.y2), d, Direction::North, &mut visit);
            }
            Direction::West => {
                self.visit_edge((r.x1, r.y1 - 1), (r.x2, r.y1 - 1), d, Direction::East, &mut visit);
            }
            Direction::NorthWest => self.visit_corner(r.x1 - 1, r.y1 - 1, &mut visit),
            Direction::NorthEast => self.visit_corner(r.x1 - 1, r.y2 + 1, &mut visit),
            Direction::SouthEast => self.visit_corner(r.x2 + 1, r.y2 + 1, &mut visit),
            Direction::SouthWest => self.visit_corner(r.x2 + 1, r.y1 - 1, &mut visit),
        }
    }

    fn visit_corner(&self, x: i32, y: i32, visit: &mut impl FnMut(&Node<P>)) {
        if let Some(slot) = self.find_slot(x, y) {
            visit(self.node(slot));
        }
    }

    fn visit_edge(
        &self,
        a: (i32, i32),
        b: (i32, i32),
        depth_cap: u8,
        toward: Direction,
        visit: &mut impl FnMut(&Node<P>),
    ) {
        if !self.contains_cell(a.0, a.1) || !self.contains_cell(b.0, b.1) {
            return;
        }
        let Some(slot) = self.covering_slot(a.0, a.1, b.0, b.1, depth_cap) else {
            return;
        };
        self.collect_side_leaves(slot, toward, visit);
    }

    /// Walk down to every leaf on the `toward` side of the subtree at `slot`.
    fn collect_side_leaves(&self, slot: usize, toward: Direction, visit: &mut impl FnMut(&Node<P>)) {
        let node = self.node(slot);
        if node.is_leaf() {
            visit(node);
            return;
        }
        let c = node.children;
        let mask =
            u8::from(c[0].is_some()) | u8::from(c[1].is_some()) << 1 | u8::from(c[2].is_some()) << 2;
        let picks: &[usize] = match (mask, toward) {
            // Single child: it spans the whole rectangle's border.
            (0b001, _) => &[0],
            // Columns split only (single row of children).
            (0b011, Direction::North | Direction::South) => &[0, 1],
            (0b011, Direction::East) => &[1],
            (0b011, Direction::West) => &[0],
            // Rows split only (single column of children).
            (0b101, Direction::North) => &[0],
            (0b101, Direction::South) => &[2],
            (0b101, Direction::East | Direction::West) => &[0, 2],
            // Full four-way split.
            (0b111, Direction::North) => &[0, 1],
            (0b111, Direction::East) => &[1, 3],
            (0b111, Direction::South) => &[2, 3],
            (0b111, Direction::West) => &[0, 2],
            // The quadrant rule admits no other mask; cover every child.
            _ => &[0, 1, 2, 3],
        };
        for &i in picks {
            if let Some(child) = c[i] {
                self.collect_side_leaves(child, toward, visit);
            }
        }
    }
}
