//! Criterion benchmarks for the per-transaction scoring hot path.
//!
//! Streams are synthetic and deterministic so results stay comparable
//! across runs; no batch files are read.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ft_common::Transaction;
use ft_config::RiskPolicy;
use ft_core::RiskEngine;
use ft_math::GeoPoint;

fn bench_evaluate_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    // A card used once every two hours from a fixed location. No signal
    // ever arms, so this measures pure bookkeeping cost.
    group.bench_function(BenchmarkId::new("stream", "quiet"), |b| {
        let engine = RiskEngine::new(RiskPolicy::default());
        let spot = GeoPoint::new(40.7, -74.0);
        let mut ts = 0i64;
        let mut i = 0u64;
        b.iter(|| {
            ts += 7200;
            i = i.wrapping_add(1);
            let txn = Transaction::new("bench-quiet", 40.0 + (i % 97) as f64, ts, spot);
            black_box(engine.evaluate(black_box(&txn)));
        });
    });

    // A card bouncing between two continents every minute. Frequency,
    // velocity, and cluster windows are all full on every call.
    group.bench_function(BenchmarkId::new("stream", "risky"), |b| {
        let engine = RiskEngine::new(RiskPolicy::default());
        let here = GeoPoint::new(0.0, 0.0);
        let there = GeoPoint::new(50.0, 50.0);
        let mut ts = 0i64;
        let mut i = 0u64;
        b.iter(|| {
            ts += 60;
            i = i.wrapping_add(1);
            let point = if i % 2 == 0 { here } else { there };
            let txn = Transaction::new("bench-risky", 40.0 + (i % 97) as f64, ts, point);
            black_box(engine.evaluate(black_box(&txn)));
        });
    });

    group.finish();
}

fn bench_evaluate_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_batch");

    // 10k transactions across 100 cards with mixed shapes: mostly
    // routine purchases, periodic far-away charges, varied amounts.
    let mut txns = Vec::with_capacity(10_000);
    for i in 0..10_000u32 {
        let entity = format!("card-{}", i % 100);
        let magnitude = 5.0 + (i % 211) as f64;
        let ts = (i as i64) * 30;
        let point = if i % 17 == 0 {
            GeoPoint::new(50.0, 50.0)
        } else {
            GeoPoint::new(40.7, -74.0)
        };
        txns.push(Transaction::new(entity, magnitude, ts, point));
    }

    group.bench_function("evaluate_10k_mixed", |b| {
        b.iter(|| {
            let engine = RiskEngine::new(RiskPolicy::default());
            let mut total_risk = 0u64;
            for txn in &txns {
                total_risk += u64::from(engine.evaluate(txn).risk_score);
            }
            black_box(total_risk);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate_stream, bench_evaluate_batch);
criterion_main!(benches);
