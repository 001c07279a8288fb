//! Planning hot-path benchmarks for vtxplan-core.
//!
//! Measures:
//! - Exhaustive enumeration over the analog table (23 candidates, 4 channels)
//! - Enhanced vs legacy rating of a single 4-channel combination
//! - A full planning run (enumerate + rate + rank + deep report)
//!
//! Run with: cargo bench --package vtxplan-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vtxplan_core::candidates::{filter_candidates, OverlapFilter};
use vtxplan_core::catalog::Catalog;
use vtxplan_core::config::{PlannerConfig, SearchConfig};
use vtxplan_core::enumerate::enumerate_combinations;
use vtxplan_core::planner::Planner;
use vtxplan_core::scoring::{EnhancedScorer, LegacyScorer, RatingStrategy};

fn bench_enumerate(c: &mut Criterion) {
    let cfg = SearchConfig::default();
    let candidates = filter_candidates(Catalog::analog().unique_frequencies(), &cfg);
    let filter = OverlapFilter::from(&cfg);

    c.bench_function("enumerate_analog_4ch", |b| {
        b.iter(|| enumerate_combinations(black_box(&candidates), 4, &filter))
    });
}

fn bench_rating(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_4ch");
    let combo = [5658, 5695, 5732, 5769];
    let enhanced = EnhancedScorer::default();
    let legacy = LegacyScorer::default();

    group.bench_function("enhanced", |b| b.iter(|| enhanced.rate(black_box(&combo))));
    group.bench_function("legacy", |b| b.iter(|| legacy.rate(black_box(&combo))));
    group.bench_function("breakdown", |b| {
        b.iter(|| enhanced.breakdown(black_box(&combo)))
    });
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let planner = Planner::new(PlannerConfig::default()).unwrap();
    let catalog = Catalog::analog();

    c.bench_function("plan_analog_default", |b| {
        b.iter(|| planner.run(black_box(&catalog)))
    });
}

criterion_group!(benches, bench_enumerate, bench_rating, bench_full_run);
criterion_main!(benches);
