pub mod config;
pub mod engine;
pub mod report;
pub mod rules;
pub mod tag;

pub use config::ClassificationConfig;
pub use engine::TaggingEngine;
pub use tag::{Tag, TagFamily, TagSet, UnknownTag};
