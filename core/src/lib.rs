//! Feature extraction and behavior tagging for airborne radar tracks.
//!
//! A [`Track`] is validated and reduced to a flat [`FeatureMap`] by the
//! [`FeatureExtractor`]; the [`TaggingEngine`] turns that map into an
//! ordered set of behavior [`Tag`]s and a text report.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod tagging;
pub mod telemetry;

pub use interface::{FeatureMap, FeatureValue, Track, TrackMetadata};
pub use prelude::{ConfigError, FeatureStage, TrackError};
pub use processing::{ExtractorConfig, FeatureExtractor};
pub use tagging::{ClassificationConfig, Tag, TagFamily, TagSet, TaggingEngine};
