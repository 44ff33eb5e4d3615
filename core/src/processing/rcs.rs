use crate::interface::{FeatureMap, Track};
use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureCategory, FeatureStage};

const POWER_DB_FLOOR: f64 = 1e-30;

/// Return-power statistics of the raw IQ samples, used as an RCS proxy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalPowerStage;

impl FeatureStage for SignalPowerStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::SignalPower
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        if track.raw_samples.is_empty() {
            return None;
        }
        let power: Vec<f64> = track.raw_samples.iter().map(|s| s.norm_sqr()).collect();
        let mean = StatsHelper::mean(&power);
        let std = StatsHelper::std(&power);
        let power_db: Vec<f64> = power
            .iter()
            .map(|p| 10.0 * p.max(POWER_DB_FLOOR).log10())
            .collect();

        let mut features = FeatureMap::new();
        features.insert_scalar("rcs_power_mean", mean);
        features.insert_scalar("rcs_power_std", std);
        features.insert_scalar("rcs_power_max", StatsHelper::max(&power));
        features.insert_scalar("rcs_power_min", StatsHelper::min(&power));
        features.insert_scalar(
            "rcs_fluctuation",
            StatsHelper::guarded_ratio(std, mean, f64::MIN_POSITIVE),
        );
        features.insert_scalar("rcs_mean_db", StatsHelper::mean(&power_db));
        Some(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn track_with(samples: Vec<Complex64>) -> Track {
        let mut track = Track::new(vec![[0.0; 3]; 2], vec![[0.0; 3]; 2], vec![0.0, 1.0]);
        track.raw_samples = samples;
        track
    }

    #[test]
    fn power_statistics() {
        let track = track_with(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 3.0)]);
        let features = SignalPowerStage.extract(&track).unwrap();
        assert_eq!(features.scalar("rcs_power_mean"), Some(5.0));
        assert_eq!(features.scalar("rcs_power_std"), Some(4.0));
        assert_eq!(features.scalar("rcs_power_max"), Some(9.0));
        assert_eq!(features.scalar("rcs_power_min"), Some(1.0));
        assert_relative_eq!(features.scalar("rcs_fluctuation").unwrap(), 0.8);
        assert_relative_eq!(
            features.scalar("rcs_mean_db").unwrap(),
            10.0 * 9f64.log10() / 2.0
        );
    }

    #[test]
    fn silent_samples_stay_finite() {
        let track = track_with(vec![Complex64::new(0.0, 0.0); 4]);
        let features = SignalPowerStage.extract(&track).unwrap();
        assert!(features.all_finite());
        assert_eq!(features.scalar("rcs_fluctuation"), Some(0.0));
        assert_eq!(features.scalar("rcs_mean_db"), Some(-300.0));
    }
}
