use crate::interface::{FeatureMap, Track};
use crate::math::kinematics;
use crate::prelude::{FeatureCategory, FeatureStage};

/// Duration, sample count, altitude change, distance and sampling rate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsStage;

impl FeatureStage for StatisticsStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::Statistical
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        if track.timestamps.is_empty() {
            return None;
        }
        let duration = track.duration();
        let samples = track.len();
        let mut features = FeatureMap::new();
        features.insert_scalar("duration", duration);
        features.insert_scalar("num_samples", samples as f64);

        if let (Some(first), Some(last)) = (track.positions.first(), track.positions.last()) {
            features.insert_scalar("altitude_change", last[2] - first[2]);
            features.insert_scalar("distance_traveled", kinematics::path_length(&track.positions));
        }

        let sampling_rate = match track.metadata.sampling_rate {
            Some(rate) if rate.is_finite() => rate,
            _ if duration > 0.0 => (samples - 1) as f64 / duration,
            _ => 0.0,
        };
        features.insert_scalar("sampling_rate", sampling_rate);

        if let Some(prf) = track.metadata.prf.filter(|v| v.is_finite()) {
            features.insert_scalar("prf", prf);
        }
        if let Some(carrier) = track.metadata.carrier_frequency.filter(|v| v.is_finite()) {
            features.insert_scalar("center_frequency", carrier);
        }
        Some(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferred_sampling_rate() {
        let track = Track::new(
            vec![[0.0, 0.0, 100.0], [3.0, 4.0, 110.0], [6.0, 8.0, 130.0]],
            vec![[0.0; 3]; 3],
            vec![10.0, 10.5, 11.0],
        );
        let features = StatisticsStage.extract(&track).unwrap();
        assert_eq!(features.scalar("duration"), Some(1.0));
        assert_eq!(features.scalar("num_samples"), Some(3.0));
        assert_eq!(features.scalar("altitude_change"), Some(30.0));
        assert_eq!(features.scalar("sampling_rate"), Some(2.0));
        assert!(features.scalar("prf").is_none());
    }

    #[test]
    fn metadata_rate_wins() {
        let mut track = Track::new(vec![[0.0; 3]; 2], vec![[0.0; 3]; 2], vec![0.0, 1.0]);
        track.metadata.sampling_rate = Some(1000.0);
        track.metadata.carrier_frequency = Some(10e9);
        let features = StatisticsStage.extract(&track).unwrap();
        assert_eq!(features.scalar("sampling_rate"), Some(1000.0));
        assert_eq!(features.scalar("center_frequency"), Some(10e9));
    }
}
