use crate::interface::{FeatureMap, Track};
use crate::prelude::{FeatureCategory, FeatureStage, TrackResult};
use crate::processing::acceleration::AccelerationStage;
use crate::processing::backend::{FallbackSink, FftBackend, NullSink, SignalProcessor};
use crate::processing::doppler::DopplerStage;
use crate::processing::rcs::SignalPowerStage;
use crate::processing::statistics::StatisticsStage;
use crate::processing::trajectory::TrajectoryStage;
use crate::processing::velocity::VelocityStage;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings for the feature stages and the signal backend choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Degrees; turn samples above this count as direction changes.
    pub direction_change_angle: f64,
    /// g-force above which an acceleration sample is a high-g event.
    pub high_g: f64,
    pub time_epsilon: f64,
    pub length_epsilon: f64,
    pub speed_epsilon: f64,
    /// Fraction of peak Doppler power that bounds the bandwidth.
    pub doppler_power_floor: f64,
    /// Use the FFT backend, falling back to the reference DFT on failure.
    pub accelerated: bool,
    pub max_fft_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            direction_change_angle: 45.0,
            high_g: 5.0,
            time_epsilon: 1e-9,
            length_epsilon: 1e-9,
            speed_epsilon: 1e-6,
            doppler_power_floor: 0.5,
            accelerated: true,
            max_fft_len: 1 << 20,
        }
    }
}

type BoxedStage = Box<dyn FeatureStage + Send + Sync>;

/// Runs the six feature stages over a validated track.
pub struct FeatureExtractor {
    stages: Vec<BoxedStage>,
    logger: LogManager,
}

impl FeatureExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self::with_sink(config, Arc::new(NullSink))
    }

    /// Builds the extractor with `sink` observing signal-backend fallbacks.
    pub fn with_sink(config: &ExtractorConfig, sink: Arc<dyn FallbackSink>) -> Self {
        let processor = if config.accelerated {
            SignalProcessor::with_accelerated(Arc::new(FftBackend::new(config.max_fft_len)))
        } else {
            SignalProcessor::reference()
        }
        .with_sink(sink);

        let stages: Vec<BoxedStage> = vec![
            Box::new(VelocityStage),
            Box::new(TrajectoryStage {
                direction_change_angle: config.direction_change_angle,
                length_epsilon: config.length_epsilon,
                time_epsilon: config.time_epsilon,
                speed_epsilon: config.speed_epsilon,
            }),
            Box::new(AccelerationStage {
                high_g: config.high_g,
                time_epsilon: config.time_epsilon,
            }),
            Box::new(DopplerStage::new(processor, config.doppler_power_floor)),
            Box::new(SignalPowerStage),
            Box::new(StatisticsStage),
        ];
        Self {
            stages,
            logger: LogManager::new(),
        }
    }

    pub fn categories(&self) -> Vec<FeatureCategory> {
        self.stages.iter().map(|stage| stage.category()).collect()
    }

    /// Extracts every category whose inputs are present.
    ///
    /// Fails only when the track violates its invariants; nothing is
    /// computed in that case.
    pub fn extract(&self, track: &Track) -> TrackResult<FeatureMap> {
        track.validate()?;
        let mut features = FeatureMap::new();
        for stage in &self.stages {
            match stage.extract(track) {
                Some(partial) => features.extend(partial),
                None => self
                    .logger
                    .detail(&format!("{} features omitted: input absent", stage.category())),
            }
        }
        self.logger.detail(&format!(
            "extracted {} features from {} samples",
            features.len(),
            track.len()
        ));
        Ok(features)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}
