use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Behavior labels. Declaration order is the report and set order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    HighSpeed,
    MediumSpeed,
    LowSpeed,
    Hovering,
    GTurn,
    SharpTrajectory,
    SmoothTrajectory,
    EvasiveManeuver,
    StraightLine,
    Ascending,
    Descending,
    Spiral,
    Loitering,
    Accelerating,
    Decelerating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFamily {
    Speed,
    Maneuver,
    Profile,
}

pub type TagSet = BTreeSet<Tag>;

impl Tag {
    pub const ALL: [Tag; 15] = [
        Tag::HighSpeed,
        Tag::MediumSpeed,
        Tag::LowSpeed,
        Tag::Hovering,
        Tag::GTurn,
        Tag::SharpTrajectory,
        Tag::SmoothTrajectory,
        Tag::EvasiveManeuver,
        Tag::StraightLine,
        Tag::Ascending,
        Tag::Descending,
        Tag::Spiral,
        Tag::Loitering,
        Tag::Accelerating,
        Tag::Decelerating,
    ];

    /// The mutually exclusive speed ladder, fastest first.
    pub const SPEED_LADDER: [Tag; 4] = [Tag::HighSpeed, Tag::MediumSpeed, Tag::LowSpeed, Tag::Hovering];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::HighSpeed => "high_speed",
            Tag::MediumSpeed => "medium_speed",
            Tag::LowSpeed => "low_speed",
            Tag::Hovering => "hovering",
            Tag::GTurn => "g_turn",
            Tag::SharpTrajectory => "sharp_trajectory",
            Tag::SmoothTrajectory => "smooth_trajectory",
            Tag::EvasiveManeuver => "evasive_maneuver",
            Tag::StraightLine => "straight_line",
            Tag::Ascending => "ascending",
            Tag::Descending => "descending",
            Tag::Spiral => "spiral",
            Tag::Loitering => "loitering",
            Tag::Accelerating => "accelerating",
            Tag::Decelerating => "decelerating",
        }
    }

    pub fn family(self) -> TagFamily {
        match self {
            Tag::HighSpeed | Tag::MediumSpeed | Tag::LowSpeed | Tag::Hovering => TagFamily::Speed,
            Tag::GTurn
            | Tag::SharpTrajectory
            | Tag::SmoothTrajectory
            | Tag::EvasiveManeuver
            | Tag::StraightLine => TagFamily::Maneuver,
            Tag::Ascending
            | Tag::Descending
            | Tag::Spiral
            | Tag::Loitering
            | Tag::Accelerating
            | Tag::Decelerating => TagFamily::Profile,
        }
    }

    /// Title-cased label, e.g. "Evasive Maneuver".
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown behavior tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl TagFamily {
    pub fn title(self) -> &'static str {
        match self {
            TagFamily::Speed => "Speed",
            TagFamily::Maneuver => "Maneuver",
            TagFamily::Profile => "Profile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(tag.as_str().parse::<Tag>(), Ok(tag));
            assert_eq!(
                serde_json::to_string(&tag).unwrap(),
                format!("\"{}\"", tag.as_str())
            );
        }
        assert!("barrel_roll".parse::<Tag>().is_err());
    }

    #[test]
    fn families_partition_vocabulary() {
        let count = |family| Tag::ALL.iter().filter(|t| t.family() == family).count();
        assert_eq!(count(TagFamily::Speed), 4);
        assert_eq!(count(TagFamily::Maneuver), 5);
        assert_eq!(count(TagFamily::Profile), 6);
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(Tag::GTurn.label(), "G Turn");
        assert_eq!(Tag::EvasiveManeuver.label(), "Evasive Maneuver");
    }
}
