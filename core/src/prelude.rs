use crate::interface::{FeatureMap, Track};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the six feature families a stage populates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Velocity,
    Trajectory,
    Acceleration,
    Doppler,
    SignalPower,
    Statistical,
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureCategory::Velocity => "velocity",
            FeatureCategory::Trajectory => "trajectory",
            FeatureCategory::Acceleration => "acceleration",
            FeatureCategory::Doppler => "doppler",
            FeatureCategory::SignalPower => "signal_power",
            FeatureCategory::Statistical => "statistical",
        };
        f.write_str(name)
    }
}

/// Violations of the track invariants, detected once at extractor entry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("malformed track: {field} has {actual} samples, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("malformed track: {0} samples, at least 2 required")]
    TooFewSamples(usize),
    #[error("malformed track: timestamps not strictly increasing at index {0}")]
    NonMonotonicTimestamps(usize),
    #[error("malformed track: non-finite value in {field} at index {index}")]
    NonFinite { field: &'static str, index: usize },
    #[error("malformed track: {field} at index {index} exceeds magnitude {limit:e}")]
    OutOfRange {
        field: &'static str,
        index: usize,
        limit: f64,
    },
}

pub type TrackResult<T> = Result<T, TrackError>;

/// Rejected classification thresholds.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid threshold {name}: {value} (must be finite and positive)")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("threshold ladder out of order: {upper} ({upper_value}) must exceed {lower} ({lower_value})")]
    LadderOrder {
        upper: &'static str,
        upper_value: f64,
        lower: &'static str,
        lower_value: f64,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure of a signal-processing backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("input of {len} samples exceeds backend capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// One independent feature family computed from a validated track.
///
/// A stage returns `None` when the inputs it needs are absent; it never
/// returns a partially populated map.
pub trait FeatureStage {
    fn category(&self) -> FeatureCategory;
    fn extract(&self, track: &Track) -> Option<FeatureMap>;
}
