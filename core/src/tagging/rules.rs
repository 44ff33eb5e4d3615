//! Rule groups of the tagging engine. Each group is a pure function of the
//! feature map; a feature a rule needs but cannot find makes that rule false.

use super::config::ClassificationConfig;
use super::tag::{Tag, TagSet};
use crate::interface::FeatureMap;

fn above(features: &FeatureMap, name: &str, threshold: f64) -> bool {
    features.scalar(name).map_or(false, |v| v > threshold)
}

fn below(features: &FeatureMap, name: &str, threshold: f64) -> bool {
    features.scalar(name).map_or(false, |v| v < threshold)
}

/// Speed ladder: first match wins, so at most one tag.
pub fn speed_ladder(features: &FeatureMap, config: &ClassificationConfig) -> Option<Tag> {
    let speed = features.scalar("speed_mean")?;
    if speed > config.high_speed {
        Some(Tag::HighSpeed)
    } else if speed > config.medium_speed {
        Some(Tag::MediumSpeed)
    } else if speed > config.low_speed {
        Some(Tag::LowSpeed)
    } else if speed < config.hovering {
        Some(Tag::Hovering)
    } else {
        None
    }
}

/// Maneuver group. Heading-shape rules are skipped for a hovering target,
/// whose heading is undefined.
pub fn maneuver_group(
    features: &FeatureMap,
    config: &ClassificationConfig,
    speed: Option<Tag>,
) -> TagSet {
    let mut tags = TagSet::new();
    if above(features, "g_force_max", config.high_g) {
        tags.insert(Tag::GTurn);
    }
    if speed == Some(Tag::Hovering) {
        return tags;
    }
    if above(features, "mean_turn_angle", config.sharp_turn) {
        tags.insert(Tag::SharpTrajectory);
    }
    if below(features, "mean_turn_angle", config.smooth_turn) {
        tags.insert(Tag::SmoothTrajectory);
    }
    if above(features, "path_straightness", config.straight_line_straightness) {
        tags.insert(Tag::StraightLine);
    }
    tags
}

/// Altitude rate over the whole track, `None` without a positive duration.
pub fn altitude_rate(features: &FeatureMap) -> Option<f64> {
    let change = features.scalar("altitude_change")?;
    let duration = features.scalar("duration").filter(|d| *d > 0.0)?;
    Some(change / duration)
}

pub fn profile_group(features: &FeatureMap, config: &ClassificationConfig) -> TagSet {
    let mut tags = TagSet::new();
    if let Some(rate) = altitude_rate(features) {
        if rate > config.ascend_rate {
            tags.insert(Tag::Ascending);
        } else if rate < -config.descend_rate {
            tags.insert(Tag::Descending);
        }
    }
    if let Some(trend) = features.scalar("speed_trend") {
        if trend > config.speed_trend {
            tags.insert(Tag::Accelerating);
        } else if trend < -config.speed_trend {
            tags.insert(Tag::Decelerating);
        }
    }
    tags
}

/// Rules that read the tags already assigned by the other groups.
pub fn compound_rules(
    features: &FeatureMap,
    config: &ClassificationConfig,
    assigned: &TagSet,
) -> TagSet {
    let mut tags = TagSet::new();

    let fast = assigned.contains(&Tag::HighSpeed) || above(features, "speed_mean", config.evasive_speed);
    if fast
        && above(features, "g_force_max", config.evasive_g)
        && above(features, "mean_turn_angle", config.evasive_turn)
    {
        tags.insert(Tag::EvasiveManeuver);
    }

    let orbiting = !assigned.contains(&Tag::Hovering)
        && below(features, "path_straightness", config.orbit_max_straightness)
        && below(features, "turn_angle_std", config.orbit_max_turn_std);
    if orbiting {
        if assigned.contains(&Tag::LowSpeed) {
            tags.insert(Tag::Loitering);
        } else {
            tags.insert(Tag::Spiral);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClassificationConfig {
        ClassificationConfig::default()
    }

    #[test]
    fn ladder_boundaries_are_strict() {
        let at = |speed: f64| speed_ladder(&FeatureMap::new().with("speed_mean", speed), &config());
        assert_eq!(at(300.0), Some(Tag::MediumSpeed));
        assert_eq!(at(300.1), Some(Tag::HighSpeed));
        assert_eq!(at(150.0), Some(Tag::LowSpeed));
        assert_eq!(at(50.0), None);
        assert_eq!(at(5.0), None);
        assert_eq!(at(4.9), Some(Tag::Hovering));
    }

    #[test]
    fn missing_speed_yields_no_ladder_tag() {
        assert_eq!(speed_ladder(&FeatureMap::new(), &config()), None);
    }

    #[test]
    fn mid_range_turns_are_neither_sharp_nor_smooth() {
        let features = FeatureMap::new().with("mean_turn_angle", 30.0);
        let tags = maneuver_group(&features, &config(), Some(Tag::MediumSpeed));
        assert!(tags.is_empty());
    }

    #[test]
    fn hovering_suppresses_heading_rules_but_not_g_turn() {
        let features = FeatureMap::new()
            .with("g_force_max", 7.0)
            .with("mean_turn_angle", 0.0)
            .with("path_straightness", 1.0);
        let tags = maneuver_group(&features, &config(), Some(Tag::Hovering));
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![Tag::GTurn]);
    }

    #[test]
    fn altitude_rate_needs_positive_duration() {
        let features = FeatureMap::new()
            .with("altitude_change", 900.0)
            .with("duration", 0.0);
        assert_eq!(altitude_rate(&features), None);
        assert!(profile_group(&features, &config()).is_empty());
    }

    #[test]
    fn climb_and_trend_are_tagged() {
        let features = FeatureMap::new()
            .with("altitude_change", -1200.0)
            .with("duration", 60.0)
            .with("speed_trend", 3.5);
        let tags = profile_group(&features, &config());
        assert!(tags.contains(&Tag::Descending));
        assert!(tags.contains(&Tag::Accelerating));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn evasive_fires_below_primary_thresholds() {
        let features = FeatureMap::new()
            .with("speed_mean", 260.0)
            .with("g_force_max", 4.5)
            .with("mean_turn_angle", 42.0);
        let assigned: TagSet = [Tag::MediumSpeed].into_iter().collect();
        let tags = compound_rules(&features, &config(), &assigned);
        assert!(tags.contains(&Tag::EvasiveManeuver));
    }

    #[test]
    fn orbit_splits_on_low_speed() {
        let features = FeatureMap::new()
            .with("path_straightness", 0.1)
            .with("turn_angle_std", 1.0);
        let slow: TagSet = [Tag::LowSpeed].into_iter().collect();
        let fast: TagSet = [Tag::MediumSpeed].into_iter().collect();
        let hover: TagSet = [Tag::Hovering].into_iter().collect();
        assert!(compound_rules(&features, &config(), &slow).contains(&Tag::Loitering));
        assert!(compound_rules(&features, &config(), &fast).contains(&Tag::Spiral));
        assert!(compound_rules(&features, &config(), &hover).is_empty());
    }
}
