use crate::generator::behavior::Behavior;
use anyhow::{bail, ensure};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    fn check(&self, name: &str) -> anyhow::Result<()> {
        ensure!(
            self.min.is_finite() && self.max.is_finite() && self.min <= self.max,
            "{} range [{}, {}] is invalid",
            name,
            self.min,
            self.max
        );
        Ok(())
    }
}

/// Fractions of the evasive track spent in each leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvasiveLegs {
    pub straight: f64,
    pub turn: f64,
    pub zigzag: f64,
}

impl Default for EvasiveLegs {
    fn default() -> Self {
        Self {
            straight: 0.1,
            turn: 0.2,
            zigzag: 0.7,
        }
    }
}

/// Configuration for generating synthetic tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seconds.
    pub duration: f64,
    /// Track update interval in seconds.
    pub dt: f64,
    /// Positional noise std as a fraction of the model's length scale.
    pub noise_level: f64,
    /// Receiver SNR in dB; `None` leaves the radar returns noise-free.
    pub snr_db: Option<f64>,
    pub carrier_frequency: f64,
    pub prf: f64,
    pub num_targets: usize,
    pub seed: u64,
    pub start_range: Span,
    pub start_altitude: Span,
    pub hover_range: Span,
    pub hover_altitude: Span,

    pub high_speed: Span,
    pub medium_speed: Span,
    /// Largest relative speed perturbation of the cruise models.
    pub speed_perturbation: f64,
    pub perturbation_period: Span,

    pub g_turn_speed: Span,
    pub g_turn_g: f64,

    pub zigzag_speed: Span,
    /// Degrees.
    pub zigzag_turn: Span,
    /// Samples between heading reversals. Counted in samples so the
    /// per-sample turn statistics do not depend on `dt`.
    pub reversal_every: usize,

    pub hover_drift: f64,
    pub hover_max_speed: f64,

    pub evasive_speed: Span,
    pub evasive_g: f64,
    pub evasive_legs: EvasiveLegs,

    pub spiral_speed: Span,
    pub spiral_g: f64,
    /// Meters climbed per full revolution.
    pub spiral_climb: f64,

    pub behavior_weights: BTreeMap<Behavior, f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duration: 60.0,
            dt: 1.0,
            noise_level: 0.01,
            snr_db: None,
            carrier_frequency: 10e9,
            prf: 1000.0,
            num_targets: 5,
            seed: 0,
            start_range: Span::new(20_000.0, 40_000.0),
            start_altitude: Span::new(3_000.0, 8_000.0),
            hover_range: Span::new(5_000.0, 15_000.0),
            hover_altitude: Span::new(300.0, 1_500.0),
            high_speed: Span::new(340.0, 420.0),
            medium_speed: Span::new(180.0, 270.0),
            speed_perturbation: 0.05,
            perturbation_period: Span::new(10.0, 20.0),
            g_turn_speed: Span::new(220.0, 280.0),
            g_turn_g: 6.0,
            zigzag_speed: Span::new(160.0, 240.0),
            zigzag_turn: Span::new(60.0, 120.0),
            reversal_every: 1,
            hover_drift: 0.3,
            hover_max_speed: 2.0,
            evasive_speed: Span::new(330.0, 400.0),
            evasive_g: 7.0,
            evasive_legs: EvasiveLegs::default(),
            spiral_speed: Span::new(170.0, 240.0),
            spiral_g: 2.0,
            spiral_climb: 300.0,
            behavior_weights: default_weights(),
        }
    }
}

fn default_weights() -> BTreeMap<Behavior, f64> {
    BTreeMap::from([
        (Behavior::HighSpeed, 0.25),
        (Behavior::MediumSpeed, 0.25),
        (Behavior::GTurn, 0.15),
        (Behavior::SharpTrajectory, 0.15),
        (Behavior::Hovering, 0.10),
        (Behavior::EvasiveManeuver, 0.10),
    ])
}

impl GeneratorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.dt > 0.0 && self.dt.is_finite(), "dt must be positive, got {}", self.dt);
        ensure!(
            self.duration >= self.dt && self.duration.is_finite(),
            "duration {} s must cover at least one step of {} s",
            self.duration,
            self.dt
        );
        ensure!(self.noise_level >= 0.0, "noise_level must be non-negative");
        ensure!(self.carrier_frequency > 0.0, "carrier_frequency must be positive");
        ensure!(
            self.speed_perturbation >= 0.0 && self.speed_perturbation < 1.0,
            "speed_perturbation must lie in [0, 1)"
        );
        ensure!(self.reversal_every >= 1, "reversal_every must be at least one sample");
        ensure!(
            self.g_turn_g > 0.0 && self.evasive_g > 0.0 && self.spiral_g > 0.0,
            "turn g targets must be positive"
        );
        ensure!(self.hover_max_speed > 0.0, "hover_max_speed must be positive");
        for (name, span) in [
            ("start_range", self.start_range),
            ("start_altitude", self.start_altitude),
            ("hover_range", self.hover_range),
            ("hover_altitude", self.hover_altitude),
            ("high_speed", self.high_speed),
            ("medium_speed", self.medium_speed),
            ("perturbation_period", self.perturbation_period),
            ("g_turn_speed", self.g_turn_speed),
            ("zigzag_speed", self.zigzag_speed),
            ("zigzag_turn", self.zigzag_turn),
            ("evasive_speed", self.evasive_speed),
            ("spiral_speed", self.spiral_speed),
        ] {
            span.check(name)?;
        }
        ensure!(self.perturbation_period.min > 0.0, "perturbation_period must be positive");
        let legs = self.evasive_legs;
        if legs.straight < 0.0 || legs.turn <= 0.0 || legs.zigzag <= 0.0 {
            bail!("evasive legs need a positive turn and zigzag fraction");
        }
        Ok(())
    }

    /// Number of samples covering `duration` at `dt`, endpoints included.
    pub fn sample_count(&self, duration: f64, dt: f64) -> usize {
        (duration / dt + 1e-9).floor() as usize + 1
    }

    /// A generation request for `behavior` using this config's defaults.
    pub fn spec(&self, behavior: Behavior, seed: u64) -> GenerationSpec {
        GenerationSpec {
            behavior,
            duration: self.duration,
            dt: self.dt,
            noise_level: self.noise_level,
            snr_db: self.snr_db,
            seed,
            target_id: seed,
        }
    }
}

/// One generation request. Equal specs produce identical tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub behavior: Behavior,
    pub duration: f64,
    pub dt: f64,
    pub noise_level: f64,
    pub snr_db: Option<f64>,
    pub seed: u64,
    pub target_id: u64,
}

impl GenerationSpec {
    /// Noise-free kinematics and radar returns.
    pub fn noiseless(mut self) -> Self {
        self.noise_level = 0.0;
        self.snr_db = None;
        self
    }

    pub fn with_target_id(mut self, target_id: u64) -> Self {
        self.target_id = target_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn default_config_is_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sample_count(config.duration, config.dt), 61);
    }

    #[test]
    fn default_weights_cover_six_behaviors() {
        let weights = GeneratorConfig::default().behavior_weights;
        assert_eq!(weights.len(), 6);
        assert!((weights.values().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(!weights.contains_key(&Behavior::Spiral));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = GeneratorConfig {
            duration: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_span_is_rejected() {
        let config = GeneratorConfig {
            high_speed: Span::new(400.0, 300.0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("high_speed"));
    }

    #[test]
    fn zero_reversal_cadence_is_rejected() {
        let config = GeneratorConfig {
            reversal_every: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("reversal_every"));
    }

    #[test]
    fn span_samples_stay_inside() {
        let span = Span::new(10.0, 20.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!((10.0..=20.0).contains(&span.sample(&mut rng)));
        }
        assert_eq!(Span::new(5.0, 5.0).sample(&mut rng), 5.0);
    }

    #[test]
    fn noiseless_clears_both_noise_sources() {
        let spec = GeneratorConfig {
            snr_db: Some(20.0),
            ..Default::default()
        }
        .spec(Behavior::GTurn, 3)
        .noiseless();
        assert_eq!(spec.noise_level, 0.0);
        assert_eq!(spec.snr_db, None);
        assert_eq!(spec.target_id, 3);
    }
}
