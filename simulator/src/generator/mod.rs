pub mod behavior;
pub mod kinematics;
pub mod profile;
pub mod radar;
pub mod synthetic;

pub use behavior::Behavior;
pub use profile::GeneratorConfig;
pub use synthetic::SyntheticGenerator;
