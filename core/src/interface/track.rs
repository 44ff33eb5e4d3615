use crate::prelude::{TrackError, TrackResult};
use crate::tagging::Tag;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Cartesian 3-vector in meters or meters per second.
pub type Vec3 = [f64; 3];

/// Largest absolute value accepted in any track array or metadata rate.
pub const MAX_MAGNITUDE: f64 = 1e15;

/// Auxiliary scalars that accompany a track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMetadata {
    /// Track update rate in Hz: how often positions and velocities are
    /// reported.
    pub sampling_rate: Option<f64>,
    /// Sample rate of `raw_samples` and `doppler` in Hz. Falls back to
    /// `sampling_rate` when absent.
    pub signal_rate: Option<f64>,
    pub carrier_frequency: Option<f64>,
    pub prf: Option<f64>,
    pub target_id: Option<u64>,
    pub source: Option<String>,
    /// Behavior the track was synthesized for, when known.
    pub ground_truth: Option<Tag>,
}

/// Kinematic and signal record for one target over its observed duration.
///
/// `positions`, `velocities` and `timestamps` are sample-aligned. An empty
/// `raw_samples` or `doppler` means that input is not available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub timestamps: Vec<f64>,
    #[serde(default)]
    pub raw_samples: Vec<Complex64>,
    #[serde(default)]
    pub doppler: Vec<f64>,
    #[serde(default)]
    pub metadata: TrackMetadata,
}

impl Track {
    pub fn new(positions: Vec<Vec3>, velocities: Vec<Vec3>, timestamps: Vec<f64>) -> Self {
        Self {
            positions,
            velocities,
            timestamps,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn duration(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Checks the sample-alignment, ordering and finiteness invariants.
    pub fn validate(&self) -> TrackResult<()> {
        let n = self.timestamps.len();
        if n < 2 {
            return Err(TrackError::TooFewSamples(n));
        }
        if self.positions.len() != n {
            return Err(TrackError::LengthMismatch {
                field: "positions",
                expected: n,
                actual: self.positions.len(),
            });
        }
        if self.velocities.len() != n {
            return Err(TrackError::LengthMismatch {
                field: "velocities",
                expected: n,
                actual: self.velocities.len(),
            });
        }

        check_values("timestamps", self.timestamps.iter().map(|&t| [t]))?;
        check_values("positions", self.positions.iter().copied())?;
        check_values("velocities", self.velocities.iter().copied())?;
        check_values("raw_samples", self.raw_samples.iter().map(|s| [s.re, s.im]))?;
        check_values("doppler", self.doppler.iter().map(|&d| [d]))?;
        let metadata = &self.metadata;
        for (field, value) in [
            ("sampling_rate", metadata.sampling_rate),
            ("signal_rate", metadata.signal_rate),
            ("carrier_frequency", metadata.carrier_frequency),
            ("prf", metadata.prf),
        ] {
            if let Some(value) = value {
                check_values(field, [[value]])?;
            }
        }

        if let Some(index) = self
            .timestamps
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(TrackError::NonMonotonicTimestamps(index + 1));
        }
        Ok(())
    }
}

/// Rejects non-finite values and values whose magnitude would overflow
/// the squared and differenced quantities of the feature stages.
fn check_values<I, S>(field: &'static str, samples: I) -> TrackResult<()>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = f64>,
{
    for (index, sample) in samples.into_iter().enumerate() {
        for value in sample {
            if !value.is_finite() {
                return Err(TrackError::NonFinite { field, index });
            }
            if value.abs() > MAX_MAGNITUDE {
                return Err(TrackError::OutOfRange {
                    field,
                    index,
                    limit: MAX_MAGNITUDE,
                });
            }
        }
    }
    Ok(())
}
