// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadgrid Tree: an adaptive quadtree over integer grid rectangles.
//!
//! Quadgrid Tree is a reusable building block for pathfinding grids,
//! collision broadphases, tile-based simulations, and interactive editors.
//!
//! - Stores tagged point objects on a `w` by `h` grid of cells.
//! - Re-partitions on every insert and remove: a region splits into four
//!   quadrants only where a caller-supplied predicate justifies it, and
//!   sub-partitions collapse back when they become unnecessary.
//! - Answers point lookups, rectangle range queries, smallest-enclosing-node
//!   queries, and eight-direction leaf-neighbour enumeration.
//! - Reports every leaf coming into or going out of existence through
//!   optional callbacks, so renderers and caches can track the partitioning
//!   incrementally.
//!
//! Every node has a 64-bit identifier packed from its depth and upper-left
//! corner, and a directory maps ids to live nodes. Point lookup binary
//! searches that directory on depth, so it costs O(log depth) rather than a
//! walk from the root.
//!
//! # Example
//!
//! ```rust
//! use quadgrid_tree::Tree;
//!
//! // Keep splitting while a region is bigger than 2x2 and holds more than
//! // one object.
//! let mut tree: Tree<u32> =
//!     Tree::with_split_stopper(8, 8, |w, h, n| (w <= 2 && h <= 2) || n <= 1);
//! tree.build();
//!
//! tree.add(2, 3, 7);
//! tree.add(3, 4, 7);
//! assert_eq!(tree.leaf_count(), 4);
//!
//! // The leaf covering a cell, found by depth binary search.
//! let leaf = tree.find(2, 3).unwrap();
//! assert!(leaf.is_leaf());
//! assert!(leaf.rect().contains(2, 3));
//!
//! // Everything inside a window.
//! let mut hits = Vec::new();
//! tree.query_range(1, 2, 4, 4, |x, y, tag| hits.push((x, y, tag)));
//! hits.sort();
//! assert_eq!(hits, vec![(2, 3, 7), (3, 4, 7)]);
//!
//! // Removing the objects collapses the partitioning again.
//! tree.remove(2, 3, 7);
//! tree.remove(3, 4, 7);
//! assert_eq!(tree.leaf_count(), 1);
//! ```
//!
//! # Watching the partitioning change
//!
//! ```rust
//! use quadgrid_tree::Tree;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let live = Rc::new(Cell::new(0i64));
//!
//! let mut tree: Tree<&'static str> =
//!     Tree::with_split_stopper(64, 64, |_, _, n| n <= 4);
//! let counter = live.clone();
//! tree.set_leaf_created_callback(Some(Box::new(move |_| {
//!     counter.set(counter.get() + 1);
//! })));
//! let counter = live.clone();
//! tree.set_leaf_removed_callback(Some(Box::new(move |_| {
//!     counter.set(counter.get() - 1);
//! })));
//!
//! tree.build();
//! for i in 0..20 {
//!     tree.add(i, i, "marker");
//! }
//! assert_eq!(live.get(), tree.leaf_count() as i64);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod node;
mod query;
pub mod tree;
pub mod types;

pub use node::{Node, NodeId};
pub use tree::{LeafCallback, SplitStopper, Tree};
pub use types::{Direction, MAX_DEPTH, MAX_SIDE, ObjectEntry, Rect};
