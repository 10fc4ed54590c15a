// benches/transforms.rs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imagelab::filters::edge::{detect_edges, EdgeOperator};
use imagelab::filters::noise::median_filter;
use imagelab::frequency::dft;
use imagelab::histogram::{adaptive_equalize, equalize, AdaptiveEqualization};
use ndarray::Array3;

const SIZES: [(usize, usize); 3] = [(64, 64), (128, 128), (256, 256)];

fn test_image(width: usize, height: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
        ((x * 3 + y * 7 + c * 40) % 256) as u8
    })
}

fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("Edges");
    for &(width, height) in SIZES.iter() {
        let img = test_image(width, height);
        let size_str = format!("{}x{}", width, height);

        for op in [EdgeOperator::Sobel, EdgeOperator::Kirsch] {
            group.bench_with_input(BenchmarkId::new(op.name(), &size_str), &size_str, |b, _| {
                b.iter(|| detect_edges(black_box(img.view()), op, None))
            });
        }
    }
    group.finish();
}

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("Median");
    for &(width, height) in SIZES.iter() {
        let img = test_image(width, height);
        let size_str = format!("{}x{}", width, height);

        group.bench_with_input(BenchmarkId::new("3x3", &size_str), &size_str, |b, _| {
            b.iter(|| median_filter(black_box(img.view()), 3))
        });
    }
    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("Histogram");
    let params = AdaptiveEqualization::default();
    for &(width, height) in SIZES.iter() {
        let img = test_image(width, height);
        let size_str = format!("{}x{}", width, height);

        group.bench_with_input(BenchmarkId::new("equalize", &size_str), &size_str, |b, _| {
            b.iter(|| equalize(black_box(img.view())))
        });
        group.bench_with_input(BenchmarkId::new("adaptive", &size_str), &size_str, |b, _| {
            b.iter(|| adaptive_equalize(black_box(img.view()), &params))
        });
    }
    group.finish();
}

fn bench_dft(c: &mut Criterion) {
    let mut group = c.benchmark_group("DFT");
    for n in [16usize, 32, 64] {
        let plane = ndarray::Array2::from_shape_fn((n, n), |(y, x)| ((x * y) % 17) as f64);
        group.bench_with_input(BenchmarkId::new("dense", n), &n, |b, _| {
            b.iter(|| dft(black_box(plane.view())))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_edges,
    bench_median,
    bench_histogram,
    bench_dft
);
criterion_main!(benches);
