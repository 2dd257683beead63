//! Risk scoring engine.
//!
//! The engine owns all per-entity state behind sharded locks so that
//! transactions for different entities can be scored in parallel while
//! each entity's history is read and updated under a single lock hold.
//! Scoring itself is infallible: degenerate inputs (first transaction,
//! zero elapsed time, flat magnitude history) leave signals quiet rather
//! than erroring.

pub mod signals;
pub mod state;

use crate::engine::signals::SignalHit;
use crate::engine::state::EntityState;
use ft_common::{Decision, EntityId, Transaction};
use ft_config::RiskPolicy;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{PoisonError, RwLock};

/// Number of entity-state shards.
const SHARD_COUNT: usize = 16;

type Shard = RwLock<HashMap<EntityId, EntityState>>;

/// Online risk scorer with per-entity sliding-window state.
pub struct RiskEngine {
    policy: RiskPolicy,
    shards: Vec<Shard>,
}

impl RiskEngine {
    /// Create an engine scoring against the given policy.
    pub fn new(policy: RiskPolicy) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        RiskEngine { policy, shards }
    }

    /// The policy this engine scores against.
    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    fn shard_for(&self, entity: &EntityId) -> &Shard {
        let mut hasher = DefaultHasher::new();
        entity.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    /// Score one transaction and fold it into the entity's history.
    ///
    /// Signals run in a fixed order and their reasons appear in the
    /// decision in that same order. Calls for the same entity serialize
    /// on the entity's shard; calls for entities on different shards run
    /// concurrently.
    pub fn evaluate(&self, txn: &Transaction) -> Decision {
        let shard = self.shard_for(&txn.entity);
        // Entity state stays consistent even if a previous lock holder
        // panicked, so a poisoned shard is simply taken over.
        let mut entities = shard.write().unwrap_or_else(PoisonError::into_inner);
        let state = entities
            .entry(txn.entity.clone())
            .or_insert_with(|| EntityState::new(&self.policy));

        // Window trims treat the incoming timestamp as "now" either way.
        if let Some(prev) = state.last_observation {
            if txn.timestamp < prev.timestamp {
                tracing::debug!(
                    entity = %txn.entity,
                    timestamp = txn.timestamp,
                    previous = prev.timestamp,
                    "timestamp arrived out of order"
                );
            }
        }
        state.last_seen = state.last_seen.max(txn.timestamp);

        let mut hits: Vec<SignalHit> = Vec::new();

        if let Some(hit) = signals::check_frequency(
            &mut state.timestamps,
            &self.policy.frequency,
            txn.timestamp,
        ) {
            hits.push(hit);
        }

        if let Some(hit) =
            signals::check_outlier(&mut state.magnitudes, &self.policy.outlier, txn.magnitude)
        {
            hits.push(hit);
        }

        if let Some(hit) = signals::check_velocity(
            &mut state.last_observation,
            &self.policy.velocity,
            txn.location,
            txn.timestamp,
        ) {
            hits.push(hit);
        }

        // The cluster signal gates on risk accrued by the signals above.
        let risk_before_cluster: u32 = hits.iter().map(|h| h.points).sum();
        if let Some(hit) = signals::check_cluster(
            &mut state.risky_events,
            &self.policy.cluster,
            self.policy.thresholds.risky_event_min,
            risk_before_cluster,
            txn.timestamp,
        ) {
            hits.push(hit);
        }

        let risk_score: u32 = hits.iter().map(|h| h.points).sum();
        let flagged = risk_score >= self.policy.thresholds.flag_risk;

        for hit in &hits {
            tracing::debug!(
                entity = %txn.entity,
                signal = %hit.kind,
                points = hit.points,
                "signal fired"
            );
        }
        if risk_score > 0 {
            tracing::debug!(
                entity = %txn.entity,
                risk_score,
                flagged,
                "transaction scored"
            );
        }

        Decision {
            entity: txn.entity.clone(),
            amount: txn.magnitude,
            flagged,
            risk_score,
            reasons: hits.into_iter().map(|h| h.reason).collect(),
        }
    }

    /// Evict entities whose last transaction is older than the policy
    /// TTL. Returns the number evicted.
    ///
    /// With no TTL configured this is a no-op; state then grows with the
    /// number of distinct entities seen.
    pub fn prune_idle(&self, now: i64) -> usize {
        let Some(ttl) = self.policy.entity_ttl_seconds else {
            return 0;
        };

        let cutoff = now.saturating_sub(ttl as i64);
        let mut evicted = 0;
        for shard in &self.shards {
            let mut entities = shard.write().unwrap_or_else(PoisonError::into_inner);
            let before = entities.len();
            entities.retain(|_, state| state.last_seen >= cutoff);
            evicted += before - entities.len();
        }

        if evicted > 0 {
            tracing::debug!(evicted, "pruned idle entities");
        }
        evicted
    }

    /// Number of entities currently tracked.
    pub fn entity_count(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        RiskEngine::new(RiskPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_math::GeoPoint;
    use std::sync::Arc;

    fn txn(entity: &str, magnitude: f64, timestamp: i64, lat: f64, lon: f64) -> Transaction {
        Transaction::new(entity, magnitude, timestamp, GeoPoint::new(lat, lon))
    }

    #[test]
    fn test_first_transaction_scores_zero() {
        let engine = RiskEngine::default();
        let decision = engine.evaluate(&txn("u1", 100.0, 1000, 40.7, -74.0));

        assert_eq!(decision.risk_score, 0);
        assert!(!decision.flagged);
        assert!(decision.reasons.is_empty());
        assert_eq!(decision.entity.0, "u1");
        assert_eq!(decision.amount, 100.0);
    }

    fn teleport_decision(velocity_points: u32) -> Decision {
        let mut policy = RiskPolicy::default();
        policy.velocity.points = velocity_points;
        let engine = RiskEngine::new(policy);
        engine.evaluate(&txn("u1", 50.0, 0, 0.0, 0.0));
        engine.evaluate(&txn("u1", 50.0, 60, 50.0, 50.0))
    }

    #[test]
    fn test_flag_threshold_is_inclusive() {
        let decision = teleport_decision(19);
        assert_eq!(decision.risk_score, 19);
        assert!(!decision.flagged);

        let decision = teleport_decision(20);
        assert_eq!(decision.risk_score, 20);
        assert!(decision.flagged);
    }

    #[test]
    fn test_entities_do_not_share_state() {
        let engine = RiskEngine::default();

        for i in 0..5 {
            engine.evaluate(&txn("busy", 10.0, i * 10, 0.0, 0.0));
        }

        // A different entity's first transaction sees none of that.
        let decision = engine.evaluate(&txn("quiet", 10.0, 50, 0.0, 0.0));
        assert_eq!(decision.risk_score, 0);

        // The busy entity's sixth transaction trips frequency.
        let decision = engine.evaluate(&txn("busy", 10.0, 60, 0.0, 0.0));
        assert_eq!(decision.risk_score, 15);
    }

    #[test]
    fn test_out_of_order_timestamps_are_tolerated() {
        let engine = RiskEngine::default();
        engine.evaluate(&txn("u1", 10.0, 1000, 0.0, 0.0));

        // Arrives late with a far-away location; negative elapsed time
        // means no velocity judgment.
        let decision = engine.evaluate(&txn("u1", 10.0, 500, 80.0, 120.0));
        assert_eq!(decision.risk_score, 0);
    }

    #[test]
    fn test_prune_idle_respects_ttl() {
        let mut policy = RiskPolicy::default();
        policy.entity_ttl_seconds = Some(3600);
        let engine = RiskEngine::new(policy);

        engine.evaluate(&txn("old", 10.0, 0, 0.0, 0.0));
        engine.evaluate(&txn("new", 10.0, 5000, 0.0, 0.0));
        assert_eq!(engine.entity_count(), 2);

        let evicted = engine.prune_idle(5000);
        assert_eq!(evicted, 1);
        assert_eq!(engine.entity_count(), 1);
    }

    #[test]
    fn test_prune_idle_without_ttl_is_noop() {
        let engine = RiskEngine::default();
        engine.evaluate(&txn("u1", 10.0, 0, 0.0, 0.0));

        assert_eq!(engine.prune_idle(i64::MAX), 0);
        assert_eq!(engine.entity_count(), 1);
    }

    #[test]
    fn test_last_seen_does_not_move_backwards() {
        let mut policy = RiskPolicy::default();
        policy.entity_ttl_seconds = Some(3600);
        let engine = RiskEngine::new(policy);

        engine.evaluate(&txn("u1", 10.0, 1000, 0.0, 0.0));
        // A late-arriving older transaction must not age the entity.
        engine.evaluate(&txn("u1", 10.0, 500, 0.0, 0.0));

        assert_eq!(engine.prune_idle(4600), 0);
        assert_eq!(engine.prune_idle(4601), 1);
    }

    #[test]
    fn test_parallel_evaluation_across_entities() {
        let engine = Arc::new(RiskEngine::default());
        let mut handles = Vec::new();

        for t in 0..4 {
            let engine = Arc::clone(&engine);
            handles.push(std::thread::spawn(move || {
                let entity = format!("user-{}", t);
                for i in 0..100 {
                    engine.evaluate(&txn(&entity, 25.0, i * 7200, 0.0, 0.0));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.entity_count(), 4);
    }
}
