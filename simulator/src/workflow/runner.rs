use crate::generator::{Behavior, SyntheticGenerator};
use crate::workflow::config::WorkflowConfig;
use crate::workflow::store;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use trackcore::telemetry::{LogManager, Metrics, MetricsRecorder};
use trackcore::{FeatureExtractor, FeatureMap, Tag, TagSet, TaggingEngine, Track};

/// Outcome of analyzing one track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub target_id: Option<u64>,
    pub ground_truth: Option<Tag>,
    pub tags: TagSet,
    pub features: FeatureMap,
    #[serde(skip)]
    pub report: String,
}

impl Analysis {
    /// `None` when the track carries no ground truth.
    pub fn matches_ground_truth(&self) -> Option<bool> {
        self.ground_truth.map(|tag| self.tags.contains(&tag))
    }
}

/// Tracks of a batch that could not be analyzed, by input position.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<Analysis>,
    pub failures: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub behavior: Behavior,
    pub hits: usize,
    pub total: usize,
}

impl RoundTrip {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }
}

/// Chains feature extraction and tagging, counting outcomes.
pub struct Runner {
    extractor: FeatureExtractor,
    engine: TaggingEngine,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let metrics = Arc::new(MetricsRecorder::new());
        let extractor = FeatureExtractor::with_sink(&config.extractor, metrics.clone());
        let engine = TaggingEngine::new(config.classification.clone())
            .context("building tagging engine")?;
        Ok(Self {
            extractor,
            engine,
            metrics,
            logger: LogManager::new(),
        })
    }

    pub fn analyze(&self, track: &Track) -> anyhow::Result<Analysis> {
        let features = match self.extractor.extract(track) {
            Ok(features) => features,
            Err(err) => {
                self.metrics.record_rejected();
                return Err(err).context("extracting features");
            }
        };
        let tags = self.engine.tag(&features);
        let report = self.engine.report(&features, &tags);
        self.metrics.record_processed();
        self.logger.detail(&format!(
            "target {:?}: {} tags",
            track.metadata.target_id,
            tags.len()
        ));
        Ok(Analysis {
            target_id: track.metadata.target_id,
            ground_truth: track.metadata.ground_truth,
            tags,
            features,
            report,
        })
    }

    /// Analyzes every track independently; a malformed track is recorded
    /// as a failure and does not stop the batch.
    pub fn analyze_batch(&self, tracks: &[Track]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, track) in tracks.iter().enumerate() {
            match self.analyze(track) {
                Ok(analysis) => outcome.results.push(analysis),
                Err(err) => {
                    self.logger
                        .warn(&format!("track {} rejected: {:#}", index, err));
                    outcome.failures.push((index, format!("{:#}", err)));
                }
            }
        }
        self.logger.record(&format!(
            "batch complete: {} analyzed, {} rejected",
            outcome.results.len(),
            outcome.failures.len()
        ));
        outcome
    }

    /// Loads and analyzes every file. A file that cannot be read or parsed
    /// is a failure at its own index, like a malformed track.
    pub fn analyze_files(&self, files: &[PathBuf]) -> BatchOutcome {
        let mut tracks = Vec::with_capacity(files.len());
        let mut origins = Vec::with_capacity(files.len());
        let mut load_failures = Vec::new();
        for (index, file) in files.iter().enumerate() {
            match store::load_track(file) {
                Ok(track) => {
                    tracks.push(track);
                    origins.push(index);
                }
                Err(err) => {
                    self.metrics.record_rejected();
                    self.logger
                        .warn(&format!("{} not loaded: {:#}", file.display(), err));
                    load_failures.push((index, format!("{:#}", err)));
                }
            }
        }
        let mut outcome = self.analyze_batch(&tracks);
        for failure in &mut outcome.failures {
            failure.0 = origins[failure.0];
        }
        outcome.failures.extend(load_failures);
        outcome.failures.sort_by_key(|(index, _)| *index);
        outcome
    }

    /// Generates noise-free tracks for `behavior` over `seeds` and counts
    /// how many analyses recover the ground truth.
    pub fn round_trip(
        &self,
        generator: &SyntheticGenerator,
        behavior: Behavior,
        seeds: Range<u64>,
    ) -> anyhow::Result<RoundTrip> {
        let mut result = RoundTrip {
            behavior,
            hits: 0,
            total: 0,
        };
        for seed in seeds {
            let spec = generator.spec(behavior, seed).noiseless();
            let track = generator
                .generate(&spec)
                .with_context(|| format!("generating {} seed {}", behavior, seed))?;
            let analysis = self.analyze(&track)?;
            result.total += 1;
            if analysis.matches_ground_truth() == Some(true) {
                result.hits += 1;
            }
        }
        Ok(result)
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }
}
