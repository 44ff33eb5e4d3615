use crate::interface::{FeatureMap, Track};
use crate::math::kinematics;
use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureCategory, FeatureStage};

/// Speed statistics, percentiles, per-axis means and the speed trend.
#[derive(Debug, Default, Clone, Copy)]
pub struct VelocityStage;

impl FeatureStage for VelocityStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::Velocity
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        if track.velocities.is_empty() {
            return None;
        }
        let speed = kinematics::speed(&track.velocities);
        let mut features = FeatureMap::new();

        let max = StatsHelper::max(&speed);
        let min = StatsHelper::min(&speed);
        features.insert_scalar("speed_mean", StatsHelper::mean(&speed));
        features.insert_scalar("speed_std", StatsHelper::std(&speed));
        features.insert_scalar("speed_variance", StatsHelper::variance(&speed));
        features.insert_scalar("speed_max", max);
        features.insert_scalar("speed_min", min);
        features.insert_scalar("speed_range", max - min);

        for pct in [25, 50, 75, 90] {
            features.insert_scalar(
                &format!("speed_p{}", pct),
                StatsHelper::percentile(&speed, pct as f64),
            );
        }

        for (axis, name) in ["vx_mean", "vy_mean", "vz_mean"].iter().enumerate() {
            let component: Vec<f64> = track.velocities.iter().map(|v| v[axis]).collect();
            features.insert_scalar(name, StatsHelper::mean(&component));
        }

        // m/s^2, least squares over the sample times
        features.insert_scalar(
            "speed_trend",
            StatsHelper::linear_slope(&track.timestamps, &speed),
        );
        features.insert_array("speed", speed);
        Some(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_velocity_statistics() {
        let n = 5;
        let track = Track::new(
            (0..n).map(|i| [3.0 * i as f64, 4.0 * i as f64, 0.0]).collect(),
            vec![[3.0, 4.0, 0.0]; n],
            (0..n).map(|i| i as f64).collect(),
        );
        let features = VelocityStage.extract(&track).unwrap();
        assert_relative_eq!(features.scalar("speed_mean").unwrap(), 5.0);
        assert_eq!(features.scalar("speed_std"), Some(0.0));
        assert_eq!(features.scalar("speed_range"), Some(0.0));
        assert_relative_eq!(features.scalar("speed_p90").unwrap(), 5.0);
        assert_eq!(features.scalar("vy_mean"), Some(4.0));
        assert_relative_eq!(features.scalar("speed_trend").unwrap(), 0.0);
        assert_eq!(features.array("speed").unwrap().len(), n);
    }

    #[test]
    fn speed_trend_tracks_acceleration() {
        let track = Track::new(
            vec![[0.0; 3]; 4],
            (0..4).map(|i| [10.0 + 2.0 * i as f64, 0.0, 0.0]).collect(),
            vec![0.0, 0.5, 1.0, 1.5],
        );
        let features = VelocityStage.extract(&track).unwrap();
        assert_relative_eq!(features.scalar("speed_trend").unwrap(), 4.0, epsilon = 1e-9);
    }
}
