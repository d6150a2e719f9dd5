use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use std::hint::black_box;
use trigger_graph_editor::{ConnectionSide, CurveGeometry, EdgeData, GraphData, NodeData};

fn build_synthetic_graph(node_count: usize) -> GraphData {
    let nodes = (0..node_count).map(|index| {
        let id = (index as u64) + 1;
        let column = (index % 100) as f32;
        let row = (index / 100) as f32;
        NodeData::new(id, "bench.action", Vec2::new(column * 200.0, row * 120.0))
    });
    let edges = (0..node_count.saturating_sub(1)).map(|index| {
        let id = (index as u64) + 1;
        let start = Vec2::new((index % 100) as f32 * 200.0 + 60.0, (index / 100) as f32 * 120.0);
        EdgeData::dangling(id, start, start + Vec2::new(80.0, 0.0))
            .with_trigger("bench.trigger")
            .with_source(id, ConnectionSide::Right)
            .with_destination(id + 1, ConnectionSide::Left)
    });
    GraphData::from_parts(nodes, edges)
}

fn build_query_points(count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let x = (i % 100) as f32 * 197.0 + 0.37;
            let y = ((i * 7) % 100) as f32 * 119.0 + 0.63;
            Vec2::new(x, y)
        })
        .collect()
}

fn bench_curve_geometry(c: &mut Criterion) {
    c.bench_function("curve_from_endpoints", |b| {
        b.iter(|| {
            let curve = CurveGeometry::from_endpoints(
                black_box(Vec2::new(0.0, 0.0)),
                ConnectionSide::Right,
                black_box(Vec2::new(300.0, 140.0)),
                ConnectionSide::Left,
            );
            black_box(curve.center_point())
        })
    });

    let a = CurveGeometry::from_endpoints(
        Vec2::new(0.0, 100.0),
        ConnectionSide::Right,
        Vec2::new(400.0, 100.0),
        ConnectionSide::Left,
    );
    let b_curve = CurveGeometry::from_endpoints(
        Vec2::new(200.0, 0.0),
        ConnectionSide::Bottom,
        Vec2::new(200.0, 300.0),
        ConnectionSide::Top,
    );
    c.bench_function("curve_intersects", |b| {
        b.iter(|| black_box(black_box(&a).intersects(black_box(&b_curve))))
    });
}

fn bench_graph_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_queries");

    for &node_count in &[1_000usize, 10_000usize] {
        let graph = build_synthetic_graph(node_count);
        let query_points = build_query_points(1024);

        group.bench_with_input(
            BenchmarkId::new("nodes_within_radius", node_count),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for point in &query_points {
                        hits += graph.nodes_within_radius(black_box(*point), 80.0).len();
                    }
                    black_box(hits)
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("edges_within_radius", node_count),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for point in &query_points {
                        hits += graph.edges_within_radius(black_box(*point), 30.0).len();
                    }
                    black_box(hits)
                })
            },
        );

        let mut moved = graph.clone();
        for id in (1..=node_count as u64).step_by(10) {
            moved.update_node_position(id, Vec2::new(-50.0, -50.0));
        }
        group.bench_with_input(BenchmarkId::new("diff", node_count), &moved, |b, moved| {
            b.iter(|| black_box(moved.diff(black_box(&graph)).len()))
        });
    }

    group.finish();
}

criterion_group!(core_benches, bench_curve_geometry, bench_graph_queries);
criterion_main!(core_benches);
