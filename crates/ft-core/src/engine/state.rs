//! Per-entity sliding-window state.
//!
//! Each tracked entity carries a timestamp log for frequency checks, a
//! bounded magnitude window for outlier statistics, the last observed
//! location for velocity checks, and a log of recent risky events for
//! cluster detection. Windows use the sliding log approach: append on
//! arrival, evict from the front once entries age out.

use ft_config::RiskPolicy;
use ft_math::{GeoPoint, RollingMoments};
use std::collections::VecDeque;

/// Sliding log of transaction timestamps within a fixed horizon.
#[derive(Debug, Clone)]
pub struct TimestampWindow {
    timestamps: VecDeque<i64>,
    horizon_seconds: u64,
}

impl TimestampWindow {
    pub fn new(horizon_seconds: u64) -> Self {
        TimestampWindow {
            timestamps: VecDeque::new(),
            horizon_seconds,
        }
    }

    /// Record a transaction timestamp.
    pub fn record(&mut self, timestamp: i64) {
        self.timestamps.push_back(timestamp);
    }

    /// Prune timestamps that have aged out of the horizon.
    ///
    /// An entry exactly `horizon_seconds` old is kept; eviction requires
    /// strictly greater age.
    pub fn prune_old(&mut self, now: i64) {
        let cutoff = now.saturating_sub(self.horizon_seconds as i64);
        while let Some(&ts) = self.timestamps.front() {
            if ts < cutoff {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Number of timestamps currently inside the window.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// A transaction that crossed the risky bar, with the score it carried.
#[derive(Debug, Clone, Copy)]
pub struct RiskyEvent {
    pub timestamp: i64,
    pub risk: u32,
}

/// Sliding log of risky events within a fixed horizon.
#[derive(Debug, Clone)]
pub struct RiskyEventWindow {
    events: VecDeque<RiskyEvent>,
    horizon_seconds: u64,
}

impl RiskyEventWindow {
    pub fn new(horizon_seconds: u64) -> Self {
        RiskyEventWindow {
            events: VecDeque::new(),
            horizon_seconds,
        }
    }

    /// Record a risky event.
    pub fn record(&mut self, timestamp: i64, risk: u32) {
        self.events.push_back(RiskyEvent { timestamp, risk });
    }

    /// Prune events that have aged out of the horizon.
    ///
    /// Same tie rule as [`TimestampWindow::prune_old`]: an event exactly
    /// `horizon_seconds` old is kept.
    pub fn prune_old(&mut self, now: i64) {
        let cutoff = now.saturating_sub(self.horizon_seconds as i64);
        while let Some(event) = self.events.front() {
            if event.timestamp < cutoff {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Number of risky events currently inside the window.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Where and when an entity last transacted.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub point: GeoPoint,
    pub timestamp: i64,
}

/// All state tracked for one entity.
#[derive(Debug, Clone)]
pub struct EntityState {
    /// Timestamps inside the frequency horizon.
    pub timestamps: TimestampWindow,
    /// Rolling magnitude moments for outlier statistics.
    pub magnitudes: RollingMoments,
    /// Last accepted transaction's position and time.
    pub last_observation: Option<Observation>,
    /// Risky transactions inside the cluster horizon.
    pub risky_events: RiskyEventWindow,
    /// Most recent transaction timestamp seen (drives idle eviction).
    pub last_seen: i64,
}

impl EntityState {
    pub fn new(policy: &RiskPolicy) -> Self {
        EntityState {
            timestamps: TimestampWindow::new(policy.frequency.window_seconds),
            magnitudes: RollingMoments::new(policy.outlier.sample_capacity),
            last_observation: None,
            risky_events: RiskyEventWindow::new(policy.cluster.window_seconds),
            last_seen: 0,
        }
    }
}
