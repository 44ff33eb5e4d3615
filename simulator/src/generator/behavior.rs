use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use trackcore::Tag;

/// Behaviors the generator can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    HighSpeed,
    MediumSpeed,
    GTurn,
    SharpTrajectory,
    Hovering,
    EvasiveManeuver,
    Spiral,
}

impl Behavior {
    pub const ALL: [Behavior; 7] = [
        Behavior::HighSpeed,
        Behavior::MediumSpeed,
        Behavior::GTurn,
        Behavior::SharpTrajectory,
        Behavior::Hovering,
        Behavior::EvasiveManeuver,
        Behavior::Spiral,
    ];

    /// The tag a correct analysis of the generated track must contain.
    pub fn ground_truth(self) -> Tag {
        match self {
            Behavior::HighSpeed => Tag::HighSpeed,
            Behavior::MediumSpeed => Tag::MediumSpeed,
            Behavior::GTurn => Tag::GTurn,
            Behavior::SharpTrajectory => Tag::SharpTrajectory,
            Behavior::Hovering => Tag::Hovering,
            Behavior::EvasiveManeuver => Tag::EvasiveManeuver,
            Behavior::Spiral => Tag::Spiral,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.ground_truth().as_str()
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Behavior {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Behavior::ALL
            .iter()
            .copied()
            .find(|behavior| behavior.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Behavior::ALL.iter().map(|b| b.as_str()).collect();
                anyhow::anyhow!("unknown behavior '{}' (expected one of {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_ground_truth_tags() {
        for behavior in Behavior::ALL {
            assert_eq!(behavior.as_str().parse::<Behavior>().unwrap(), behavior);
            assert_eq!(behavior.to_string(), behavior.ground_truth().to_string());
        }
    }

    #[test]
    fn unknown_behavior_is_rejected() {
        let err = "barrel_roll".parse::<Behavior>().unwrap_err();
        assert!(err.to_string().contains("g_turn"));
    }
}
