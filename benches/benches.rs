use criterion::{
    AxisScale, BenchmarkId, Criterion, PlotConfiguration, criterion_group, criterion_main,
};
use std::hint::black_box;
use top_abundance::{Config, Selector, Strategy};

/// Generate random data with seeded RNG for reproducibility
fn generate_random_data(size: usize, seed: u64) -> Vec<f64> {
    let mut data = Vec::with_capacity(size);
    let mut rng = seed;
    for _ in 0..size {
        // Simple LCG (Linear Congruential Generator)
        rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
        let value = ((rng >> 16) % 1_000_000_000) as f64 / 1000.0;
        data.push(value);
    }
    data
}

/// Generate worst-case data for the histogram: everything in one bucket
fn generate_crowded_data(size: usize) -> Vec<f64> {
    (0..size).map(|i| 7.0 + (i % 1000) as f64 / 1000.0).collect()
}

fn run(data: &[f64], strategy: Strategy) -> usize {
    let keep = data.len() / 5;
    let config = Config::default()
        .with_max_count_to_keep(keep)
        .with_strategy(strategy);
    let mut selector = Selector::with_config(config);
    selector.extend(data.iter().enumerate().map(|(i, &v)| (black_box(v), i as i64)));
    selector.filter().unwrap().retained
}

fn benchmark(c: &mut Criterion, name: &str, generate: impl Fn(usize) -> Vec<f64>) {
    let plot_config = PlotConfiguration::default().summary_scale(AxisScale::Logarithmic);

    let mut group = c.benchmark_group(name);
    group.sample_size(10);
    group.plot_config(plot_config);

    for size in [10_000, 100_000, 1_000_000].iter() {
        let data = black_box(generate(*size));

        group.bench_with_input(BenchmarkId::new("adaptive", size), size, |b, _| {
            b.iter(|| run(&data, Strategy::Adaptive));
        });

        group.bench_with_input(BenchmarkId::new("full_sort", size), size, |b, _| {
            b.iter(|| run(&data, Strategy::FullSort));
        });
    }

    group.finish();
}

fn benchmark_random_data(c: &mut Criterion) {
    benchmark(c, "random_data", |size| generate_random_data(size, 42));
}

fn benchmark_crowded(c: &mut Criterion) {
    benchmark(c, "crowded", generate_crowded_data);
}

criterion_group!(benches, benchmark_random_data, benchmark_crowded);
criterion_main!(benches);
