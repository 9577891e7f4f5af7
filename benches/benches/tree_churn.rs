// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadgrid_tree::Tree;

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

fn gen_points(count: usize, side: i32, seed: u64) -> Vec<(i32, i32, u32)> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push((rng.next_in(side), rng.next_in(side), i as u32));
    }
    out
}

fn populated_tree(points: &[(i32, i32, u32)], side: i32) -> Tree<u32> {
    let mut tree = Tree::with_split_stopper(side, side, |_, _, n| n <= 8);
    tree.build();
    for &(x, y, tag) in points {
        tree.add(x, y, tag);
    }
    tree
}

fn bench_build_and_fill(c: &mut Criterion) {
    const SIDE: i32 = 512;
    let mut group = c.benchmark_group("build_and_fill");
    for &count in &[1_000usize, 10_000] {
        let points = gen_points(count, SIDE, 0x9E37_79B9_7F4A_7C15);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("n{count}"), |b| {
            b.iter(|| {
                let tree = populated_tree(black_box(&points), SIDE);
                black_box(tree.node_count())
            });
        });
    }
    group.finish();
}

fn bench_add_remove_churn(c: &mut Criterion) {
    const SIDE: i32 = 512;
    let points = gen_points(10_000, SIDE, 0xCAFE_F00D_DEAD_BEEF);
    let churn = gen_points(1_000, SIDE, 0x1234_5678_9ABC_DEF1);

    let mut group = c.benchmark_group("churn");
    group.throughput(Throughput::Elements(churn.len() as u64 * 2));
    group.bench_function("add_remove_1k", |b| {
        b.iter_batched(
            || populated_tree(&points, SIDE),
            |mut tree| {
                for &(x, y, tag) in &churn {
                    tree.add(x, y, tag + 100_000);
                }
                for &(x, y, tag) in &churn {
                    tree.remove(x, y, tag + 100_000);
                }
                black_box(tree.object_count())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_point_lookup(c: &mut Criterion) {
    const SIDE: i32 = 512;
    let points = gen_points(10_000, SIDE, 0x0DDB_1A5E_5BAD_5EED);
    let tree = populated_tree(&points, SIDE);
    let mut rng = Rng::new(7);
    let probes: Vec<(i32, i32)> = (0..1_000)
        .map(|_| (rng.next_in(SIDE), rng.next_in(SIDE)))
        .collect();

    let mut group = c.benchmark_group("find");
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("probe_1k", |b| {
        b.iter(|| {
            let mut leaves = 0usize;
            for &(x, y) in &probes {
                if tree.find(x, y).is_some() {
                    leaves += 1;
                }
            }
            black_box(leaves)
        });
    });
    group.finish();
}

fn bench_query_range(c: &mut Criterion) {
    const SIDE: i32 = 512;
    let points = gen_points(10_000, SIDE, 0xFEED_FACE_CAFE_BEEF);
    let tree = populated_tree(&points, SIDE);

    let mut group = c.benchmark_group("query_range");
    for &window in &[16i32, 64, 256] {
        group.bench_function(format!("window_{window}"), |b| {
            let mut rng = Rng::new(99);
            b.iter(|| {
                let x = rng.next_in(SIDE - window);
                let y = rng.next_in(SIDE - window);
                let mut hits = 0usize;
                tree.query_range(x, y, x + window - 1, y + window - 1, |_, _, _| hits += 1);
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_and_fill,
    bench_add_remove_churn,
    bench_point_lookup,
    bench_query_range
);
criterion_main!(benches);
