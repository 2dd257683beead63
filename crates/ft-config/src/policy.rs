//! Risk policy configuration types.
//!
//! The built-in defaults reproduce the scoring behavior analysts already
//! rely on; a policy file only needs to name the knobs it overrides, every
//! other field falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a policy file.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse policy file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Complete risk policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPolicy {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub frequency: FrequencyPolicy,

    #[serde(default)]
    pub outlier: OutlierPolicy,

    #[serde(default)]
    pub velocity: VelocityPolicy,

    #[serde(default)]
    pub cluster: ClusterPolicy,

    /// Evict entities idle for longer than this many seconds.
    ///
    /// `None` disables eviction: state grows with the number of distinct
    /// entities ever seen, which is the right trade for bounded batch runs.
    #[serde(default)]
    pub entity_ttl_seconds: Option<u64>,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            description: None,
            thresholds: Thresholds::default(),
            frequency: FrequencyPolicy::default(),
            outlier: OutlierPolicy::default(),
            velocity: VelocityPolicy::default(),
            cluster: ClusterPolicy::default(),
            entity_ttl_seconds: None,
        }
    }
}

impl RiskPolicy {
    /// Load a policy from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PolicyError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

fn default_schema_version() -> String {
    crate::POLICY_SCHEMA_VERSION.to_string()
}

/// Score thresholds shared by the decision assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Total score at or above which a transaction is flagged.
    #[serde(default = "default_flag_risk")]
    pub flag_risk: u32,

    /// Per-transaction score at or above which it counts as individually
    /// risky for the cluster detector.
    #[serde(default = "default_risky_event_min")]
    pub risky_event_min: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            flag_risk: default_flag_risk(),
            risky_event_min: default_risky_event_min(),
        }
    }
}

fn default_flag_risk() -> u32 {
    20
}

fn default_risky_event_min() -> u32 {
    10
}

/// Transaction-frequency detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPolicy {
    /// Trailing window length in seconds.
    #[serde(default = "default_frequency_window_seconds")]
    pub window_seconds: u64,

    /// The detector fires when the window holds strictly more than this
    /// many transactions, including the one being evaluated.
    #[serde(default = "default_max_txns")]
    pub max_txns: usize,

    /// Points contributed when the detector fires.
    #[serde(default = "default_frequency_points")]
    pub points: u32,
}

impl Default for FrequencyPolicy {
    fn default() -> Self {
        Self {
            window_seconds: default_frequency_window_seconds(),
            max_txns: default_max_txns(),
            points: default_frequency_points(),
        }
    }
}

fn default_frequency_window_seconds() -> u64 {
    3600
}

fn default_max_txns() -> usize {
    5
}

fn default_frequency_points() -> u32 {
    15
}

/// Amount-outlier detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierPolicy {
    /// Maximum number of magnitude samples retained per entity.
    #[serde(default = "default_sample_capacity")]
    pub sample_capacity: usize,

    /// Minimum samples (including the current amount) before the detector
    /// produces a judgment.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Number of standard deviations above the mean that marks an outlier.
    #[serde(default = "default_zscore_limit")]
    pub zscore_limit: f64,

    /// Points contributed when the detector fires.
    #[serde(default = "default_outlier_points")]
    pub points: u32,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        Self {
            sample_capacity: default_sample_capacity(),
            min_samples: default_min_samples(),
            zscore_limit: default_zscore_limit(),
            points: default_outlier_points(),
        }
    }
}

fn default_sample_capacity() -> usize {
    20
}

fn default_min_samples() -> usize {
    5
}

fn default_zscore_limit() -> f64 {
    3.0
}

fn default_outlier_points() -> u32 {
    10
}

/// Geo-velocity detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPolicy {
    /// Implied travel speed in km/h above which a jump is implausible.
    #[serde(default = "default_max_speed_kmh")]
    pub max_speed_kmh: f64,

    /// Points contributed when the detector fires.
    #[serde(default = "default_velocity_points")]
    pub points: u32,
}

impl Default for VelocityPolicy {
    fn default() -> Self {
        Self {
            max_speed_kmh: default_max_speed_kmh(),
            points: default_velocity_points(),
        }
    }
}

fn default_max_speed_kmh() -> f64 {
    1000.0
}

fn default_velocity_points() -> u32 {
    10
}

/// Risky-cluster detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPolicy {
    /// Trailing window length in seconds for risky events.
    #[serde(default = "default_cluster_window_seconds")]
    pub window_seconds: u64,

    /// The detector fires when at least this many risky events remain in
    /// the window, including the current transaction.
    #[serde(default = "default_min_events")]
    pub min_events: usize,

    /// Points contributed when the detector fires.
    #[serde(default = "default_cluster_points")]
    pub points: u32,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self {
            window_seconds: default_cluster_window_seconds(),
            min_events: default_min_events(),
            points: default_cluster_points(),
        }
    }
}

fn default_cluster_window_seconds() -> u64 {
    3600
}

fn default_min_events() -> usize {
    3
}

fn default_cluster_points() -> u32 {
    10
}
