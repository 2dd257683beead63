//! Fuzz target for the scoring engine.
//!
//! Drives an arbitrary transaction stream, including out-of-order
//! timestamps and non-finite values, through `evaluate`. The engine is
//! infallible and must never panic; scores stay within policy bounds.

#![no_main]

use arbitrary::Arbitrary;
use ft_common::Transaction;
use ft_config::RiskPolicy;
use ft_core::RiskEngine;
use ft_math::GeoPoint;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Step {
    entity: u8,
    magnitude: f64,
    timestamp: i64,
    lat: f64,
    lon: f64,
}

fuzz_target!(|steps: Vec<Step>| {
    let engine = RiskEngine::new(RiskPolicy::default());
    let policy = engine.policy().clone();
    let max_risk = policy.frequency.points
        + policy.outlier.points
        + policy.velocity.points
        + policy.cluster.points;

    for step in steps {
        let txn = Transaction::new(
            format!("e{}", step.entity % 8),
            step.magnitude,
            step.timestamp,
            GeoPoint::new(step.lat, step.lon),
        );
        let decision = engine.evaluate(&txn);
        assert!(decision.risk_score <= max_risk);
        assert!(decision.reasons.len() <= 4);
        assert_eq!(decision.flagged, decision.risk_score >= policy.thresholds.flag_risk);
    }
});
