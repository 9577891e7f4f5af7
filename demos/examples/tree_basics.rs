// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree basics.
//!
//! Build a tree over a 100x60 grid, scatter a few objects, and run the
//! query surface: point lookup, range collection, smallest covering node.
//!
//! Run:
//! - `cargo run -p quadgrid_demos --example tree_basics`

use quadgrid_tree::Tree;

fn main() {
    // Leaves stay at least 10x10 and hold at most 4 objects.
    let mut tree: Tree<char> =
        Tree::with_split_stopper(100, 60, |w, h, n| (w <= 10 && h <= 10) || n <= 4);
    tree.build();
    println!("after build: {tree:?}");

    for (i, &(x, y)) in [(5, 5), (7, 9), (8, 4), (9, 8), (11, 7), (50, 80)]
        .iter()
        .enumerate()
    {
        tree.add(x, y, char::from(b'a' + i as u8));
    }
    println!("after adds:  {tree:?}");

    let leaf = tree.find(7, 9).expect("in-region cell has a leaf");
    println!(
        "leaf covering (7,9): depth {} rect {:?} holding {} objects",
        leaf.depth(),
        leaf.rect(),
        leaf.object_count()
    );

    let mut hits = Vec::new();
    tree.query_range(0, 0, 20, 20, |x, y, tag| hits.push((x, y, tag)));
    hits.sort_unstable();
    println!("objects in (0,0)-(20,20): {hits:?}");

    let cover = tree
        .find_smallest_node_covering_range(5, 5, 9, 8)
        .expect("corners are inside the region");
    println!(
        "smallest node covering (5,5)-(9,8): depth {} rect {:?}",
        cover.depth(),
        cover.rect()
    );

    // Removals collapse the partitioning back.
    for (i, &(x, y)) in [(5, 5), (7, 9), (8, 4), (9, 8), (11, 7), (50, 80)]
        .iter()
        .enumerate()
    {
        tree.remove(x, y, char::from(b'a' + i as u8));
    }
    println!("after removes: {tree:?}");
}
