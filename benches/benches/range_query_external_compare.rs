// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range-query comparison against an external R-tree (`rstar`).
//!
//! The two structures answer different shapes of question (the quadtree also
//! maintains a cell partition and leaf lifecycle), so this is a sanity
//! baseline for the shared case: "which points fall in this window?".

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadgrid_tree::Tree;
use rstar::{AABB, RTree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_in(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

const SIDE: i32 = 1024;
const COUNT: usize = 20_000;
const WINDOW: i32 = 64;

fn gen_points() -> Vec<(i32, i32)> {
    let mut rng = Rng::new(0xBADC_0FFE_E0DD_F00D);
    (0..COUNT)
        .map(|_| (rng.next_in(SIDE), rng.next_in(SIDE)))
        .collect()
}

fn bench_window_queries(c: &mut Criterion) {
    let points = gen_points();

    let mut tree: Tree<u32> = Tree::with_split_stopper(SIDE, SIDE, |_, _, n| n <= 16);
    tree.build();
    for (i, &(x, y)) in points.iter().enumerate() {
        tree.add(x, y, i as u32);
    }

    let rtree: RTree<[f64; 2]> = RTree::bulk_load(
        points
            .iter()
            .map(|&(x, y)| [f64::from(x), f64::from(y)])
            .collect(),
    );

    let mut group = c.benchmark_group("window_query");
    group.throughput(Throughput::Elements(1));

    group.bench_function("quadgrid", |b| {
        let mut rng = Rng::new(3);
        b.iter(|| {
            let x = rng.next_in(SIDE - WINDOW);
            let y = rng.next_in(SIDE - WINDOW);
            let mut hits = 0usize;
            tree.query_range(x, y, x + WINDOW - 1, y + WINDOW - 1, |_, _, _| hits += 1);
            black_box(hits)
        });
    });

    group.bench_function("rstar", |b| {
        let mut rng = Rng::new(3);
        b.iter(|| {
            let x = rng.next_in(SIDE - WINDOW);
            let y = rng.next_in(SIDE - WINDOW);
            let envelope = AABB::from_corners(
                [f64::from(x), f64::from(y)],
                [f64::from(x + WINDOW - 1), f64::from(y + WINDOW - 1)],
            );
            black_box(rtree.locate_in_envelope(&envelope).count())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_window_queries);
criterion_main!(benches);
