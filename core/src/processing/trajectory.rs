use crate::interface::{FeatureMap, Track};
use crate::math::kinematics;
use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureCategory, FeatureStage};

/// Path geometry: length, straightness, turn angles, curvature, altitude.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryStage {
    /// Turn angle in degrees above which a sample counts as a direction change.
    pub direction_change_angle: f64,
    pub length_epsilon: f64,
    pub time_epsilon: f64,
    pub speed_epsilon: f64,
}

impl Default for TrajectoryStage {
    fn default() -> Self {
        Self {
            direction_change_angle: 45.0,
            length_epsilon: 1e-9,
            time_epsilon: 1e-9,
            speed_epsilon: 1e-6,
        }
    }
}

impl FeatureStage for TrajectoryStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::Trajectory
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        let positions = &track.positions;
        if positions.is_empty() {
            return None;
        }
        let mut features = FeatureMap::new();

        let segments = kinematics::segment_lengths(positions);
        features.insert_scalar("total_path_length", segments.iter().sum());
        features.insert_scalar("mean_segment_length", StatsHelper::mean(&segments));
        features.insert_scalar(
            "path_straightness",
            kinematics::straightness(positions, self.length_epsilon),
        );

        let turns = kinematics::defined(&kinematics::turn_angles(positions, self.length_epsilon));
        let mean_turn = StatsHelper::mean(&turns);
        let turn_std = StatsHelper::std(&turns);
        features.insert_scalar("mean_turn_angle", mean_turn);
        features.insert_scalar("max_turn_angle", StatsHelper::max(&turns));
        features.insert_scalar("turn_angle_std", turn_std);
        features.insert_scalar(
            "smoothness",
            StatsHelper::guarded_ratio(turn_std, mean_turn, 1e-9),
        );
        let changes = turns
            .iter()
            .filter(|&&angle| angle > self.direction_change_angle)
            .count();
        features.insert_scalar("direction_changes", changes as f64);
        features.insert_array("turn_angles", turns);

        let curvature = kinematics::defined(&kinematics::curvature(
            positions,
            &track.timestamps,
            self.time_epsilon,
            self.speed_epsilon,
        ));
        features.insert_scalar("curvature_mean", StatsHelper::mean(&curvature));
        features.insert_scalar("curvature_max", StatsHelper::max(&curvature));

        let altitude: Vec<f64> = positions.iter().map(|p| p[2]).collect();
        features.insert_scalar("altitude_mean", StatsHelper::mean(&altitude));
        features.insert_scalar("altitude_std", StatsHelper::std(&altitude));
        features.insert_scalar("altitude_min", StatsHelper::min(&altitude));
        features.insert_scalar("altitude_max", StatsHelper::max(&altitude));
        Some(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn track_from(positions: Vec<[f64; 3]>) -> Track {
        let n = positions.len();
        Track::new(positions, vec![[0.0; 3]; n], (0..n).map(|i| i as f64).collect())
    }

    #[test]
    fn zigzag_counts_direction_changes() {
        let track = track_from(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, 2.0, 0.0],
        ]);
        let features = TrajectoryStage::default().extract(&track).unwrap();
        assert_relative_eq!(features.scalar("mean_turn_angle").unwrap(), 90.0, epsilon = 1e-9);
        assert_eq!(features.scalar("direction_changes"), Some(3.0));
        assert_relative_eq!(features.scalar("turn_angle_std").unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(features.scalar("smoothness").unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            features.scalar("path_straightness").unwrap(),
            8f64.sqrt() / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn stationary_track_has_zero_turn_statistics() {
        let track = track_from(vec![[5.0, 5.0, 100.0]; 4]);
        let features = TrajectoryStage::default().extract(&track).unwrap();
        assert_eq!(features.scalar("mean_turn_angle"), Some(0.0));
        assert_eq!(features.scalar("smoothness"), Some(0.0));
        assert_eq!(features.scalar("curvature_max"), Some(0.0));
        assert_eq!(features.scalar("path_straightness"), Some(1.0));
        assert_eq!(features.scalar("altitude_mean"), Some(100.0));
        assert!(features.all_finite());
    }

    #[test]
    fn two_samples_have_no_turns() {
        let track = track_from(vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        let features = TrajectoryStage::default().extract(&track).unwrap();
        assert_eq!(features.array("turn_angles").unwrap().len(), 0);
        assert_eq!(features.scalar("total_path_length"), Some(10.0));
    }
}
