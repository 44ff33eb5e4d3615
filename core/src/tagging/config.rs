use crate::prelude::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Named thresholds for the tagging rules. Speeds in m/s, angles in
/// degrees, accelerations in g, rates in m/s and trends in m/s^2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub high_speed: f64,
    pub medium_speed: f64,
    pub low_speed: f64,
    pub hovering: f64,
    pub high_g: f64,
    pub sharp_turn: f64,
    pub smooth_turn: f64,
    pub straight_line_straightness: f64,
    pub ascend_rate: f64,
    pub descend_rate: f64,
    pub speed_trend: f64,
    /// Compound evasive rule; looser than `high_g` and `sharp_turn` on purpose.
    pub evasive_speed: f64,
    pub evasive_g: f64,
    pub evasive_turn: f64,
    /// Spiral / loitering: near-circular, consistently curving paths.
    pub orbit_max_straightness: f64,
    pub orbit_max_turn_std: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            high_speed: 300.0,
            medium_speed: 150.0,
            low_speed: 50.0,
            hovering: 5.0,
            high_g: 5.0,
            sharp_turn: 45.0,
            smooth_turn: 15.0,
            straight_line_straightness: 0.9,
            ascend_rate: 10.0,
            descend_rate: 10.0,
            speed_trend: 2.0,
            evasive_speed: 250.0,
            evasive_g: 4.0,
            evasive_turn: 40.0,
            orbit_max_straightness: 0.6,
            orbit_max_turn_std: 10.0,
        }
    }
}

impl ClassificationConfig {
    /// Rejects non-finite or non-positive thresholds and ladders that are
    /// not strictly decreasing.
    pub fn validate(&self) -> ConfigResult<()> {
        let named = [
            ("high_speed", self.high_speed),
            ("medium_speed", self.medium_speed),
            ("low_speed", self.low_speed),
            ("hovering", self.hovering),
            ("high_g", self.high_g),
            ("sharp_turn", self.sharp_turn),
            ("smooth_turn", self.smooth_turn),
            ("straight_line_straightness", self.straight_line_straightness),
            ("ascend_rate", self.ascend_rate),
            ("descend_rate", self.descend_rate),
            ("speed_trend", self.speed_trend),
            ("evasive_speed", self.evasive_speed),
            ("evasive_g", self.evasive_g),
            ("evasive_turn", self.evasive_turn),
            ("orbit_max_straightness", self.orbit_max_straightness),
            ("orbit_max_turn_std", self.orbit_max_turn_std),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        let ladders = [
            ("high_speed", self.high_speed, "medium_speed", self.medium_speed),
            ("medium_speed", self.medium_speed, "low_speed", self.low_speed),
            ("low_speed", self.low_speed, "hovering", self.hovering),
            ("sharp_turn", self.sharp_turn, "smooth_turn", self.smooth_turn),
        ];
        for (upper, upper_value, lower, lower_value) in ladders {
            if upper_value <= lower_value {
                return Err(ConfigError::LadderOrder {
                    upper,
                    upper_value,
                    lower,
                    lower_value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ClassificationConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_speed_ladder_is_rejected() {
        let config = ClassificationConfig {
            medium_speed: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LadderOrder {
                upper: "high_speed",
                lower: "medium_speed",
                ..
            })
        ));
    }

    #[test]
    fn equal_turn_thresholds_are_rejected() {
        let config = ClassificationConfig {
            smooth_turn: 45.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let config = ClassificationConfig {
            high_g: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { name: "high_g", .. })
        ));
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config: ClassificationConfig = serde_json::from_str(r#"{"high_speed": 320.0}"#).unwrap();
        assert_eq!(config.high_speed, 320.0);
        assert_eq!(config.low_speed, 50.0);
    }
}
