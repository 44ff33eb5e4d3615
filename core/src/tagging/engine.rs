use super::config::ClassificationConfig;
use super::report;
use super::rules;
use super::tag::TagSet;
use crate::interface::FeatureMap;
use crate::prelude::ConfigResult;
use crate::telemetry::log::LogManager;

/// Rule-based tagger bound to one validated configuration.
pub struct TaggingEngine {
    config: ClassificationConfig,
    logger: LogManager,
}

impl TaggingEngine {
    /// Fails if the thresholds are not finite, positive and correctly ordered.
    pub fn new(config: ClassificationConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            logger: LogManager::new(),
        })
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Assigns behavior tags. Missing features only suppress the rules that
    /// need them.
    pub fn tag(&self, features: &FeatureMap) -> TagSet {
        let speed = rules::speed_ladder(features, &self.config);

        let mut tags: TagSet = speed.into_iter().collect();
        tags.extend(rules::maneuver_group(features, &self.config, speed));
        tags.extend(rules::profile_group(features, &self.config));
        let compound = rules::compound_rules(features, &self.config, &tags);
        tags.extend(compound);

        self.logger
            .detail(&format!("tagged: {}", report::summary(&tags)));
        tags
    }

    pub fn tag_batch(&self, batch: &[FeatureMap]) -> Vec<TagSet> {
        let tagged: Vec<TagSet> = batch.iter().map(|features| self.tag(features)).collect();
        self.logger
            .record(&format!("tagged batch of {} feature maps", tagged.len()));
        tagged
    }

    pub fn report(&self, features: &FeatureMap, tags: &TagSet) -> String {
        report::render(features, tags)
    }
}

impl Default for TaggingEngine {
    fn default() -> Self {
        Self {
            config: ClassificationConfig::default(),
            logger: LogManager::new(),
        }
    }
}
