pub mod fft;
pub mod kinematics;
pub mod matrix;
pub mod stats;

pub use fft::FftHelper;
pub use matrix::{FeatureMatrix, MatrixHelper};
pub use stats::StatsHelper;
