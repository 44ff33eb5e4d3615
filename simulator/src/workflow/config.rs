use crate::generator::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trackcore::{ClassificationConfig, ExtractorConfig};

/// Everything one analysis or generation run is parameterized by.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub classification: ClassificationConfig,
    pub extractor: ExtractorConfig,
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating {}", path_ref.display()))?;
        Ok(config)
    }

    /// Checks each section, then the settings that span sections.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.classification.validate().context("validating thresholds")?;
        self.generator.validate().context("validating generator settings")?;
        // a hovering target must be slow enough to earn its own ground-truth tag
        anyhow::ensure!(
            self.generator.hover_max_speed < self.classification.hovering,
            "generator hover_max_speed ({}) must be below the hovering threshold ({})",
            self.generator.hover_max_speed,
            self.classification.hovering
        );
        Ok(())
    }

    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
