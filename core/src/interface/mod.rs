pub mod features;
pub mod track;

pub use features::{FeatureMap, FeatureValue};
pub use track::{Track, TrackMetadata, Vec3};
