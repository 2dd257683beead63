//! Risk signal detectors.
//!
//! Detectors run in a fixed order for every transaction: frequency,
//! outlier, velocity, cluster. Each one folds the transaction into its
//! slice of entity state and may award points. The cluster detector is
//! the exception to independence: it only sees transactions that already
//! accrued enough risk from the earlier three.

mod cluster;
mod frequency;
mod outlier;
mod velocity;

pub use cluster::check_cluster;
pub use frequency::check_frequency;
pub use outlier::check_outlier;
pub use velocity::check_velocity;

/// Which detector produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Frequency,
    Outlier,
    Velocity,
    Cluster,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Frequency => write!(f, "frequency"),
            SignalKind::Outlier => write!(f, "outlier"),
            SignalKind::Velocity => write!(f, "velocity"),
            SignalKind::Cluster => write!(f, "cluster"),
        }
    }
}

/// A detector firing: points awarded plus the reason reported to users.
#[derive(Debug, Clone)]
pub struct SignalHit {
    pub kind: SignalKind,
    pub points: u32,
    pub reason: String,
}
