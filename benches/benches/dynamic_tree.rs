// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_aabb_tree::{Aabb2D, AabbTree, ProxyId};

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
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, rect_w: f64, rect_h: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - rect_w).max(1.0);
        let y0 = rng.next_f64() * (extent - rect_h).max(1.0);
        out.push(Aabb2D::<f64>::from_xywh(x0, y0, rect_w, rect_h));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build_tree(rects: &[Aabb2D<f64>]) -> AabbTree<f64, u32> {
    let mut tree = AabbTree::new(rects.len() * 2, 0.1);
    for (i, r) in rects.iter().copied().enumerate() {
        let _ = tree.insert(r, i as u32);
    }
    tree
}

fn build_tree_with_proxies(rects: &[Aabb2D<f64>]) -> (AabbTree<f64, u32>, Vec<ProxyId>) {
    let mut tree = AabbTree::new(rects.len() * 2, 0.1);
    let mut proxies = Vec::with_capacity(rects.len());
    for (i, r) in rects.iter().copied().enumerate() {
        proxies.push(tree.insert(r, i as u32).expect("bench rects are valid"));
    }
    (tree, proxies)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 4_000, 16_000] {
        let rects = gen_random_rects(n, 4000.0, 10.0, 10.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| black_box(build_tree(&rects)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(10_000, 4000.0, 10.0, 10.0);
    let tree = build_tree(&rects);
    let regions = gen_random_rects(256, 4000.0, 200.0, 200.0);

    group.bench_function("rect_10k", |b| {
        let mut cursor = 0usize;
        b.iter(|| {
            let region = regions[cursor % regions.len()];
            cursor += 1;
            let hits: usize = tree
                .query_rect(region, true)
                .expect("bench region is valid")
                .count();
            black_box(hits);
        })
    });

    group.bench_function("rect_10k_linear_scan_baseline", |b| {
        let mut cursor = 0usize;
        b.iter(|| {
            let region = regions[cursor % regions.len()];
            cursor += 1;
            let hits: usize = rects.iter().filter(|r| r.overlaps(&region, true)).count();
            black_box(hits);
        })
    });

    let clustered = gen_clustered_rects(64, 156, 200.0);
    let clustered_tree = build_tree(&clustered);
    group.bench_function("rect_clustered_10k", |b| {
        let mut cursor = 0usize;
        b.iter(|| {
            let region = regions[cursor % regions.len()];
            cursor += 1;
            let hits: usize = clustered_tree
                .query_rect(region, true)
                .expect("bench region is valid")
                .count();
            black_box(hits);
        })
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let rects = gen_random_rects(10_000, 4000.0, 10.0, 10.0);

    // Jitter within the fat margin: updates that never restructure.
    group.bench_function("update_absorbed_10k", |b| {
        b.iter_batched(
            || build_tree_with_proxies(&rects),
            |(mut tree, proxies)| {
                for (proxy, r) in proxies.iter().zip(rects.iter()) {
                    let jittered =
                        Aabb2D::new(r.min_x + 0.01, r.min_y + 0.01, r.max_x + 0.01, r.max_y + 0.01);
                    let _ = tree.update(*proxy, jittered);
                }
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        )
    });

    // Teleporting moves: every update re-indexes.
    group.bench_function("update_reinsert_10k", |b| {
        b.iter_batched(
            || build_tree_with_proxies(&rects),
            |(mut tree, proxies)| {
                let mut rng = Rng::new(0xBADC_F00D_1234_5678);
                for proxy in &proxies {
                    let x0 = rng.next_f64() * 3990.0;
                    let y0 = rng.next_f64() * 3990.0;
                    let _ = tree.update(*proxy, Aabb2D::<f64>::from_xywh(x0, y0, 10.0, 10.0));
                }
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_churn);
criterion_main!(benches);
