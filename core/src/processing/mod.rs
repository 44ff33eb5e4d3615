pub mod acceleration;
pub mod backend;
pub mod doppler;
pub mod extractor;
pub mod rcs;
pub mod statistics;
pub mod trajectory;
pub mod velocity;

pub use acceleration::AccelerationStage;
pub use backend::{
    FallbackEvent, FallbackSink, FftBackend, NullSink, ReferenceBackend, SignalBackend,
    SignalOp, SignalProcessor,
};
pub use doppler::DopplerStage;
pub use extractor::{ExtractorConfig, FeatureExtractor};
pub use rcs::SignalPowerStage;
pub use statistics::StatisticsStage;
pub use trajectory::TrajectoryStage;
pub use velocity::VelocityStage;
