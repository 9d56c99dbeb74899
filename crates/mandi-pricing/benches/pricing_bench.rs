use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mandi_core::CropCatalog;

fn bench_daily_board(c: &mut Criterion) {
    let catalog = CropCatalog::builtin();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    let sim = mandi_pricing::PriceSimulator::default();
    c.bench_function("daily board 15 crops + forecast", |b| {
        b.iter(|| {
            for crop in catalog.iter() {
                let _ = black_box(sim.daily_sample(crop, date));
                let _ = black_box(sim.forecast_next(crop, date));
            }
        })
    });
}

fn bench_year(c: &mut Criterion) {
    let start = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    c.bench_function("one crop x 365 days", |b| {
        b.iter(|| {
            for d in start.iter_days().take(365) {
                let _ = black_box(mandi_pricing::compute_daily_price(40, "Okra", d));
            }
        })
    });
}

criterion_group!(benches, bench_daily_board, bench_year);
criterion_main!(benches);
