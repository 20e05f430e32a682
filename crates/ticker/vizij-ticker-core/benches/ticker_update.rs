use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_ticker_core::{
    plan_delimiters, Counter, MonospaceMetrics, RollingWheelFactory, TickerConfig,
};

fn grouped() -> TickerConfig {
    TickerConfig {
        prefix: Some("$".into()),
        delimiter: Some(",".into()),
        group_size: 3,
        decimal_places: 2,
        ..Default::default()
    }
}

fn bench_set_value(c: &mut Criterion) {
    let mut counter =
        Counter::new(grouped(), RollingWheelFactory, MonospaceMetrics::default(), "0").unwrap();
    let values = ["1234567.89", "-98.5", "1000000", "0.01", "42"];
    let mut i = 0usize;
    c.bench_function("set_value_animated", |b| {
        b.iter(|| {
            counter.set_value(black_box(values[i % values.len()]), true, None);
            i += 1;
        })
    });
}

fn bench_frame_loop(c: &mut Criterion) {
    c.bench_function("set_value_then_30_frames", |b| {
        let mut counter =
            Counter::new(grouped(), RollingWheelFactory, MonospaceMetrics::default(), "0")
                .unwrap();
        let mut n = 0u64;
        b.iter(|| {
            n = n.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            counter.set_number((n % 10_000_000) as f64 / 100.0, true, None);
            for _ in 0..30 {
                black_box(counter.update(1.0 / 60.0));
            }
        })
    });
}

fn bench_plan_delimiters(c: &mut Criterion) {
    c.bench_function("plan_delimiters_w64_g3", |b| {
        b.iter(|| plan_delimiters(black_box(64), black_box(3)))
    });
}

criterion_group!(benches, bench_set_value, bench_frame_loop, bench_plan_delimiters);
criterion_main!(benches);
