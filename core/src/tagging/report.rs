use super::tag::{Tag, TagFamily, TagSet};
use crate::interface::FeatureMap;
use std::fmt::Write;

const RULE: &str = "============================================================";

fn metric(features: &FeatureMap, name: &str, precision: usize, unit: &str) -> String {
    match features.scalar(name) {
        Some(value) => format!("{value:.precision$}{unit}"),
        None => "n/a".to_string(),
    }
}

fn signed_metric(features: &FeatureMap, name: &str, precision: usize, unit: &str) -> String {
    match features.scalar(name) {
        Some(value) => format!("{value:+.precision$}{unit}"),
        None => "n/a".to_string(),
    }
}

fn family_line(tags: &TagSet, family: TagFamily) -> String {
    let labels: Vec<String> = tags
        .iter()
        .filter(|tag| tag.family() == family)
        .map(|tag| tag.label())
        .collect();
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        labels.join(", ")
    }
}

/// Renders the analysis report. Output depends only on the inputs.
pub fn render(features: &FeatureMap, tags: &TagSet) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TARGET BEHAVIOR ANALYSIS REPORT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "BEHAVIOR TAGS ({}):", tags.len());
    for family in [TagFamily::Speed, TagFamily::Maneuver, TagFamily::Profile] {
        let title = format!("{}:", family.title());
        let _ = writeln!(out, "  {title:<10}{}", family_line(tags, family));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "KEY METRICS:");
    let _ = writeln!(
        out,
        "  Speed:       {} (avg), {} (max)",
        metric(features, "speed_mean", 1, " m/s"),
        metric(features, "speed_max", 1, " m/s")
    );
    let _ = writeln!(
        out,
        "  G-Force:     {} (avg), {} (max)",
        metric(features, "g_force_mean", 2, " g"),
        metric(features, "g_force_max", 2, " g")
    );
    let _ = writeln!(
        out,
        "  Turn Angle:  {} (avg), {} (max)",
        metric(features, "mean_turn_angle", 1, " deg"),
        metric(features, "max_turn_angle", 1, " deg")
    );
    let _ = writeln!(
        out,
        "  Altitude:    {} (avg), {} (change)",
        metric(features, "altitude_mean", 1, " m"),
        signed_metric(features, "altitude_change", 1, " m")
    );
    let _ = writeln!(
        out,
        "  Path:        {} over {}",
        metric(features, "total_path_length", 1, " m"),
        metric(features, "duration", 1, " s")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    out
}

/// One-line summary used in log output, e.g. `high_speed, g_turn`.
pub fn summary(tags: &TagSet) -> String {
    if tags.is_empty() {
        return "(no tags)".to_string();
    }
    tags.iter().map(|t| Tag::as_str(*t)).collect::<Vec<_>>().join(", ")
}
