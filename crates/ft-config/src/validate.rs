//! Policy validation errors and semantic validation.

use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Policy validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a risk policy semantically.
///
/// Fails fast: the first problem found is returned.
pub fn validate_policy(policy: &crate::policy::RiskPolicy) -> ValidationResult<()> {
    // Check schema version
    if policy.schema_version != crate::POLICY_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::POLICY_SCHEMA_VERSION.to_string(),
            actual: policy.schema_version.clone(),
        });
    }

    validate_thresholds(&policy.thresholds)?;
    validate_frequency(&policy.frequency)?;
    validate_outlier(&policy.outlier)?;
    validate_velocity(&policy.velocity)?;
    validate_cluster(&policy.cluster)?;

    // The flag threshold must be attainable when every signal fires.
    let max_score = policy.frequency.points
        + policy.outlier.points
        + policy.velocity.points
        + policy.cluster.points;
    if policy.thresholds.flag_risk > max_score {
        return Err(ValidationError::SemanticError(format!(
            "thresholds.flag_risk ({}) exceeds the maximum attainable score ({}); no transaction could ever be flagged",
            policy.thresholds.flag_risk, max_score,
        )));
    }

    // The cluster gate only sees risk accrued by the earlier signals.
    let pre_cluster_max = policy.frequency.points + policy.outlier.points + policy.velocity.points;
    if policy.thresholds.risky_event_min > pre_cluster_max {
        return Err(ValidationError::SemanticError(format!(
            "thresholds.risky_event_min ({}) exceeds the maximum pre-cluster score ({}); the cluster signal could never arm",
            policy.thresholds.risky_event_min, pre_cluster_max,
        )));
    }

    if policy.entity_ttl_seconds == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "entity_ttl_seconds".to_string(),
            message: "Must be > 0; omit the field to disable idle eviction".to_string(),
        });
    }

    Ok(())
}

fn validate_thresholds(thresholds: &crate::policy::Thresholds) -> ValidationResult<()> {
    if thresholds.flag_risk == 0 {
        return Err(ValidationError::InvalidValue {
            field: "thresholds.flag_risk".to_string(),
            message: "Must be > 0".to_string(),
        });
    }

    Ok(())
}

fn validate_frequency(frequency: &crate::policy::FrequencyPolicy) -> ValidationResult<()> {
    if frequency.window_seconds == 0 {
        return Err(ValidationError::InvalidValue {
            field: "frequency.window_seconds".to_string(),
            message: "Must be > 0".to_string(),
        });
    }

    Ok(())
}

fn validate_outlier(outlier: &crate::policy::OutlierPolicy) -> ValidationResult<()> {
    if outlier.sample_capacity == 0 {
        return Err(ValidationError::InvalidValue {
            field: "outlier.sample_capacity".to_string(),
            message: "Must be > 0".to_string(),
        });
    }

    if outlier.min_samples < 2 {
        return Err(ValidationError::InvalidValue {
            field: "outlier.min_samples".to_string(),
            message: format!(
                "Must be at least 2 for a meaningful variance, got {}",
                outlier.min_samples
            ),
        });
    }

    if outlier.min_samples > outlier.sample_capacity {
        return Err(ValidationError::InvalidValue {
            field: "outlier.min_samples".to_string(),
            message: format!(
                "Cannot exceed outlier.sample_capacity ({}); the signal would never arm",
                outlier.sample_capacity
            ),
        });
    }

    if !outlier.zscore_limit.is_finite() || outlier.zscore_limit <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "outlier.zscore_limit".to_string(),
            message: format!("Must be positive and finite, got {}", outlier.zscore_limit),
        });
    }

    Ok(())
}

fn validate_velocity(velocity: &crate::policy::VelocityPolicy) -> ValidationResult<()> {
    if !velocity.max_speed_kmh.is_finite() || velocity.max_speed_kmh <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "velocity.max_speed_kmh".to_string(),
            message: format!("Must be positive and finite, got {}", velocity.max_speed_kmh),
        });
    }

    Ok(())
}

fn validate_cluster(cluster: &crate::policy::ClusterPolicy) -> ValidationResult<()> {
    if cluster.window_seconds == 0 {
        return Err(ValidationError::InvalidValue {
            field: "cluster.window_seconds".to_string(),
            message: "Must be > 0".to_string(),
        });
    }

    if cluster.min_events == 0 {
        return Err(ValidationError::InvalidValue {
            field: "cluster.min_events".to_string(),
            message: "Must be > 0".to_string(),
        });
    }

    Ok(())
}
