use crate::interface::{FeatureMap, Track};
use crate::math::kinematics::{self, norm};
use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureCategory, FeatureStage};

pub const STANDARD_GRAVITY: f64 = 9.81;

/// G-force, high-g event count and jerk derived from velocity differences.
#[derive(Debug, Clone, Copy)]
pub struct AccelerationStage {
    pub high_g: f64,
    pub time_epsilon: f64,
}

impl Default for AccelerationStage {
    fn default() -> Self {
        Self {
            high_g: 5.0,
            time_epsilon: 1e-9,
        }
    }
}

impl FeatureStage for AccelerationStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::Acceleration
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        if track.velocities.len() < 2 {
            return None;
        }
        let accel =
            kinematics::acceleration(&track.velocities, &track.timestamps, self.time_epsilon);
        let defined = kinematics::defined(&accel);
        let g_force: Vec<f64> = defined
            .iter()
            .map(|&a| norm(a) / STANDARD_GRAVITY)
            .collect();

        let mut features = FeatureMap::new();
        features.insert_scalar("g_force_mean", StatsHelper::mean(&g_force));
        features.insert_scalar("g_force_max", StatsHelper::max(&g_force));
        features.insert_scalar("g_force_min", StatsHelper::min(&g_force));
        features.insert_scalar("g_force_std", StatsHelper::std(&g_force));
        let high_g_events = g_force.iter().filter(|&&g| g > self.high_g).count();
        features.insert_scalar("high_g_events", high_g_events as f64);

        for (axis, name) in ["ax_mean", "ay_mean", "az_mean"].iter().enumerate() {
            let component: Vec<f64> = defined.iter().map(|a| a[axis]).collect();
            features.insert_scalar(name, StatsHelper::mean(&component));
        }

        let jerk = self.jerk_magnitudes(&accel, &track.timestamps);
        features.insert_scalar("jerk_mean", StatsHelper::mean(&jerk));
        features.insert_scalar("jerk_max", StatsHelper::max(&jerk));
        features.insert_array("g_force", g_force);
        Some(features)
    }
}

impl AccelerationStage {
    /// |d|a|/dt| between consecutive defined acceleration samples. Sample `i`
    /// of the acceleration sequence sits halfway between `t[i]` and `t[i+1]`.
    fn jerk_magnitudes(&self, accel: &[Option<[f64; 3]>], timestamps: &[f64]) -> Vec<f64> {
        accel
            .windows(2)
            .zip(timestamps.windows(3))
            .filter_map(|(a, t)| {
                let (a0, a1) = (a[0]?, a[1]?);
                let dt = (t[2] - t[0]) / 2.0;
                (dt > self.time_epsilon).then(|| ((norm(a1) - norm(a0)) / dt).abs())
            })
            .collect()
    }
}
