//! Decision records produced by the risk engine.

use crate::id::EntityId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one transaction against its entity's history.
///
/// `reasons` is ordered by detector run order, not by severity, and is
/// always present: an empty list means no signal fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    /// Entity the decision applies to.
    #[serde(rename = "user_id")]
    pub entity: EntityId,

    /// Normalized (absolute) transaction amount that was scored.
    pub amount: f64,

    /// True when the risk score met the flag threshold.
    pub flagged: bool,

    /// Sum of the points contributed by every signal that fired.
    pub risk_score: u32,

    /// Human-readable reason for each contributing signal.
    pub reasons: Vec<String>,
}
