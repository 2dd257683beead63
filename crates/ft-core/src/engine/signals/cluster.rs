//! Risky transaction cluster signal.

use super::{SignalHit, SignalKind};
use crate::engine::state::RiskyEventWindow;
use ft_config::ClusterPolicy;

/// Record the transaction as a risky event and check for a cluster.
///
/// Only transactions whose score from the earlier signals reached
/// `risky_event_min` are recorded at all; quieter transactions leave the
/// window untouched. The reported count is taken after pruning, so it is
/// the number of risky events currently inside the horizon including
/// this one.
pub fn check_cluster(
    window: &mut RiskyEventWindow,
    policy: &ClusterPolicy,
    risky_event_min: u32,
    risk_so_far: u32,
    now: i64,
) -> Option<SignalHit> {
    if risk_so_far < risky_event_min {
        return None;
    }

    window.record(now, risk_so_far);
    window.prune_old(now);

    let count = window.len();
    if count >= policy.min_events {
        return Some(SignalHit {
            kind: SignalKind::Cluster,
            points: policy.points,
            reason: format!("Cluster of {} risky txns in 1 hour", count),
        });
    }

    None
}
