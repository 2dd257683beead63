//! Transaction input records.

use crate::id::EntityId;
use ft_math::GeoPoint;
use serde::{Deserialize, Serialize};

/// A sign-normalized debit transaction as fed to the risk engine.
///
/// The ingestion layer guarantees `magnitude` is a finite absolute amount
/// and that coordinates are finite. The engine trusts those invariants and
/// does not re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Entity the transaction belongs to.
    pub entity: EntityId,

    /// Absolute transaction amount.
    pub magnitude: f64,

    /// Event time as Unix seconds. Not required to be monotonic.
    pub timestamp: i64,

    /// Where the transaction happened.
    pub location: GeoPoint,
}

impl Transaction {
    pub fn new(
        entity: impl Into<EntityId>,
        magnitude: f64,
        timestamp: i64,
        location: GeoPoint,
    ) -> Self {
        Transaction {
            entity: entity.into(),
            magnitude,
            timestamp,
            location,
        }
    }
}
