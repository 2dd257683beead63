//! Transaction frequency signal.

use super::{SignalHit, SignalKind};
use crate::engine::state::TimestampWindow;
use ft_config::FrequencyPolicy;

/// Fold the transaction into the timestamp window and check frequency.
///
/// The count includes the transaction being scored, so with the default
/// limit of 5 the signal first fires on the sixth transaction inside the
/// window.
pub fn check_frequency(
    window: &mut TimestampWindow,
    policy: &FrequencyPolicy,
    now: i64,
) -> Option<SignalHit> {
    window.record(now);
    window.prune_old(now);

    if window.len() > policy.max_txns {
        return Some(SignalHit {
            kind: SignalKind::Frequency,
            points: policy.points,
            reason: "High txn frequency in last hour".to_string(),
        });
    }

    None
}
