use criterion::{Criterion, black_box, criterion_group, criterion_main};

use quizdeck::chart::{ChartGeometry, ChartPalette, PixelSurface, RadialChart, SurfaceSize};
use quizdeck::engine::ChartEntry;

fn make_entries(count: usize) -> Vec<ChartEntry> {
    (0..count)
        .map(|i| {
            let total = 3 + (i % 5) as u32;
            let correct = (i % 4) as u32;
            ChartEntry {
                label: format!("topic {i}"),
                correct: correct.min(total),
                total,
                value: correct.min(total) as f64,
            }
        })
        .collect()
}

/// Pointer positions sweeping the ring, inside and outside the band.
fn make_pointer_path(steps: usize) -> Vec<(f64, f64)> {
    (0..steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let angle = t * std::f64::consts::TAU * 3.0;
            let radius = 20.0 + 80.0 * ((t * 17.0).sin() * 0.5 + 0.5);
            (160.0 + radius * angle.cos(), 120.0 + radius * angle.sin())
        })
        .collect()
}

fn bench_geometry(c: &mut Criterion) {
    let entries = make_entries(24);

    c.bench_function("chart geometry compute (24 topics)", |b| {
        b.iter(|| ChartGeometry::compute(black_box(&entries), 320.0, 240.0))
    });
}

fn bench_hit_test(c: &mut Criterion) {
    let entries = make_entries(24);
    let geometry = ChartGeometry::compute(&entries, 320.0, 240.0);
    let path = make_pointer_path(500);

    c.bench_function("hit_test (500 pointer moves)", |b| {
        b.iter(|| {
            path.iter()
                .filter_map(|&(x, y)| geometry.hit_test(black_box(x), black_box(y)))
                .count()
        })
    });
}

fn bench_pointer_move(c: &mut Criterion) {
    let entries = make_entries(12);
    let path = make_pointer_path(200);
    let mut chart = RadialChart::attach(
        Some(PixelSurface::default()),
        entries,
        ChartPalette::default(),
        SurfaceSize::new(320.0, 240.0, 1.0),
    )
    .expect("pixel surface supports 2d");

    c.bench_function("pointer_move with redraw (200 moves)", |b| {
        b.iter(|| {
            for &(x, y) in &path {
                black_box(chart.pointer_move(x, y));
            }
        })
    });
}

criterion_group!(benches, bench_geometry, bench_hit_test, bench_pointer_move);
criterion_main!(benches);
