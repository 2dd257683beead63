//! Magnitude outlier signal.

use super::{SignalHit, SignalKind};
use ft_config::OutlierPolicy;
use ft_math::RollingMoments;

/// Fold the magnitude into the rolling window and check for an outlier.
///
/// The statistics include the magnitude being scored. The signal stays
/// quiet until the window holds `min_samples` values and the variance is
/// strictly positive; firing requires the magnitude to strictly exceed
/// the mean plus `zscore_limit` standard deviations.
pub fn check_outlier(
    moments: &mut RollingMoments,
    policy: &OutlierPolicy,
    magnitude: f64,
) -> Option<SignalHit> {
    moments.observe(magnitude);

    if moments.len() < policy.min_samples {
        return None;
    }

    let (Some(mean), Some(variance)) = (moments.mean(), moments.population_variance()) else {
        return None;
    };

    if variance > 0.0 {
        let threshold = mean + policy.zscore_limit * variance.sqrt();
        if magnitude > threshold {
            return Some(SignalHit {
                kind: SignalKind::Outlier,
                points: policy.points,
                reason: "Outlier amount".to_string(),
            });
        }
    }

    None
}
