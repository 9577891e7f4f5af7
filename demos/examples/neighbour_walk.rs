// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Neighbour walk.
//!
//! Watch leaves appear and disappear through the lifecycle callbacks, then
//! enumerate the planar neighbours of one leaf in all eight directions.
//!
//! Run:
//! - `cargo run -p quadgrid_demos --example neighbour_walk`

use quadgrid_tree::{Direction, Tree};

fn main() {
    let mut tree: Tree<u32> = Tree::with_split_stopper(32, 32, |_, _, n| n <= 1);
    tree.set_leaf_created_callback(Some(Box::new(|node| {
        println!("+ leaf d{} {:?}", node.depth(), node.rect());
    })));
    tree.set_leaf_removed_callback(Some(Box::new(|node| {
        println!("- leaf d{} {:?}", node.depth(), node.rect());
    })));

    tree.build();
    println!("-- adding two objects near the centre --");
    tree.add(14, 14, 1);
    tree.add(17, 17, 2);

    let leaf = tree.find(14, 14).expect("in-region cell has a leaf");
    println!(
        "\nneighbours of the leaf at {:?} (depth {}):",
        leaf.rect(),
        leaf.depth()
    );
    for direction in [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ] {
        let mut rects = Vec::new();
        tree.find_neighbour_leaf_nodes(leaf, direction, |n| rects.push(n.rect()));
        println!("  {direction:?}: {rects:?}");
    }

    println!("\n-- removing them again --");
    tree.remove(14, 14, 1);
    tree.remove(17, 17, 2);
    println!("final: {tree:?}");
}
