//! Location velocity signal.

use super::{SignalHit, SignalKind};
use crate::engine::state::Observation;
use ft_config::VelocityPolicy;
use ft_math::{haversine_km, GeoPoint};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Check implied travel speed against the previous observation.
///
/// Zero or negative elapsed time skips the check entirely. The previous
/// observation is overwritten either way, so the next transaction is
/// always judged against this one.
pub fn check_velocity(
    last: &mut Option<Observation>,
    policy: &VelocityPolicy,
    point: GeoPoint,
    now: i64,
) -> Option<SignalHit> {
    let mut hit = None;

    if let Some(prev) = last {
        let elapsed = now - prev.timestamp;
        if elapsed > 0 {
            let distance_km = haversine_km(prev.point, point);
            let speed_kmh = distance_km / (elapsed as f64 / SECONDS_PER_HOUR);
            if speed_kmh > policy.max_speed_kmh {
                hit = Some(SignalHit {
                    kind: SignalKind::Velocity,
                    points: policy.points,
                    reason: "Impossible location jump".to_string(),
                });
            }
        }
    }

    *last = Some(Observation {
        point,
        timestamp: now,
    });

    hit
}
