use crate::generator::behavior::Behavior;
use crate::generator::kinematics::{self, Leg, Motion, MotionState, Trajectory};
use crate::generator::profile::{GenerationSpec, GeneratorConfig};
use crate::generator::radar::{self, RadarModel};
use anyhow::{ensure, Context};
use rand::distributions::WeightedIndex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use trackcore::interface::{Track, TrackMetadata, Vec3};
use trackcore::processing::SignalProcessor;
use trackcore::telemetry::LogManager;

/// The fixed validation scenarios: target id and behavior.
pub const SCENARIOS: [(u64, Behavior, &str); 5] = [
    (1001, Behavior::HighSpeed, "high-speed intercept"),
    (1002, Behavior::EvasiveManeuver, "combat maneuvers"),
    (1003, Behavior::MediumSpeed, "surveillance pattern"),
    (1004, Behavior::Hovering, "helicopter hovering"),
    (1005, Behavior::SharpTrajectory, "sharp evasive action"),
];

/// A generated track plus the sample index where each motion leg begins.
#[derive(Debug, Clone)]
pub struct Generated {
    pub track: Track,
    pub leg_starts: Vec<usize>,
}

/// Forward model from a requested behavior to a labelled track.
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    processor: SignalProcessor,
    logger: LogManager,
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        config.validate().context("validating generator config")?;
        Ok(Self {
            config,
            processor: SignalProcessor::default(),
            logger: LogManager::new(),
        })
    }

    pub fn spec(&self, behavior: Behavior, seed: u64) -> GenerationSpec {
        self.config.spec(behavior, seed)
    }

    pub fn generate(&self, spec: &GenerationSpec) -> anyhow::Result<Track> {
        Ok(self.generate_detailed(spec)?.track)
    }

    pub fn generate_detailed(&self, spec: &GenerationSpec) -> anyhow::Result<Generated> {
        ensure!(spec.dt > 0.0 && spec.dt.is_finite(), "dt must be positive, got {}", spec.dt);
        ensure!(
            spec.duration >= spec.dt && spec.duration.is_finite(),
            "duration {} s is shorter than one step of {} s",
            spec.duration,
            spec.dt
        );
        ensure!(spec.noise_level >= 0.0, "noise_level must be non-negative");

        let samples = self.config.sample_count(spec.duration, spec.dt);
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let (mut trajectory, length_scale) = self.fly(spec.behavior, samples, spec.dt, &mut rng);
        radar::jitter_positions(&mut trajectory.positions, spec.noise_level * length_scale, &mut rng)
            .context("adding position noise")?;

        let timestamps: Vec<f64> = (0..samples).map(|i| i as f64 * spec.dt).collect();
        let model = RadarModel::new(self.config.carrier_frequency);
        let mut raw_samples = model.returns(&trajectory.positions, &trajectory.velocities, &timestamps);
        if let Some(snr_db) = spec.snr_db {
            radar::add_receiver_noise(&mut raw_samples, snr_db, &mut rng).context("adding receiver noise")?;
        }
        let doppler = self.processor.doppler_spectrum(&raw_samples);

        let track = Track {
            positions: trajectory.positions,
            velocities: trajectory.velocities,
            timestamps,
            raw_samples,
            doppler,
            metadata: TrackMetadata {
                sampling_rate: Some(1.0 / spec.dt),
                signal_rate: Some(1.0 / spec.dt),
                carrier_frequency: Some(self.config.carrier_frequency),
                prf: Some(self.config.prf),
                target_id: Some(spec.target_id),
                source: Some("synthetic".to_string()),
                ground_truth: Some(spec.behavior.ground_truth()),
            },
        };
        track
            .validate()
            .with_context(|| format!("generated {} track is malformed", spec.behavior))?;
        self.logger.detail(&format!(
            "generated target {} ({}) with {} samples",
            spec.target_id,
            spec.behavior,
            track.len()
        ));
        Ok(Generated {
            track,
            leg_starts: trajectory.leg_starts,
        })
    }

    /// Draws `count` targets with behaviors picked by `weights`.
    pub fn dataset(&self, count: usize, weights: &BTreeMap<Behavior, f64>, seed: u64) -> anyhow::Result<Vec<Track>> {
        let (behaviors, probabilities): (Vec<Behavior>, Vec<f64>) = weights.iter().map(|(b, w)| (*b, *w)).unzip();
        let index = WeightedIndex::new(&probabilities).context("building behavior distribution")?;
        let mut rng = StdRng::seed_from_u64(seed);
        self.logger
            .record(&format!("generating {} synthetic targets", count));

        (0..count)
            .map(|i| {
                let behavior = behaviors[rng.sample(&index)];
                let spec = self
                    .spec(behavior, seed.wrapping_add(i as u64))
                    .with_target_id(i as u64);
                self.generate(&spec)
            })
            .collect()
    }

    pub fn scenarios(&self) -> anyhow::Result<Vec<Track>> {
        let tracks = SCENARIOS
            .iter()
            .map(|&(id, behavior, name)| {
                self.generate(&self.spec(behavior, id))
                    .with_context(|| format!("generating scenario {} ({})", id, name))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        self.logger
            .record(&format!("generated {} test scenarios", tracks.len()));
        Ok(tracks)
    }

    /// Selects and flies the motion model. Also returns the length scale
    /// that positional noise is relative to.
    fn fly(&self, behavior: Behavior, samples: usize, dt: f64, rng: &mut StdRng) -> (Trajectory, f64) {
        let cfg = &self.config;
        let heading = rng.gen_range(0.0..TAU);
        match behavior {
            Behavior::HighSpeed | Behavior::MediumSpeed => {
                let span = if behavior == Behavior::HighSpeed {
                    cfg.high_speed
                } else {
                    cfg.medium_speed
                };
                let base = span.sample(rng);
                let motion = Motion::Cruise {
                    base,
                    amplitude: rng.gen_range(0.0..=cfg.speed_perturbation),
                    period: cfg.perturbation_period.sample(rng),
                    phase: rng.gen_range(0.0..TAU),
                };
                let start = MotionState::new(self.start_position(rng), heading, base);
                (single_leg(start, motion, samples, dt, rng), base * dt)
            }
            Behavior::GTurn => {
                let speed = cfg.g_turn_speed.sample(rng);
                let motion = Motion::Turn {
                    rate: kinematics::turn_rate(speed, cfg.g_turn_g),
                };
                let start = MotionState::new(self.start_position(rng), heading, speed);
                (
                    single_leg(start, motion, samples, dt, rng),
                    kinematics::turn_radius(speed, cfg.g_turn_g),
                )
            }
            Behavior::SharpTrajectory => {
                let speed = cfg.zigzag_speed.sample(rng);
                let start = MotionState::new(self.start_position(rng), heading, speed);
                (single_leg(start, self.zigzag(), samples, dt, rng), speed * dt)
            }
            Behavior::Hovering => {
                let start = MotionState::hovering(self.hover_position(rng));
                let motion = Motion::Drift {
                    sigma: cfg.hover_drift,
                    max_speed: cfg.hover_max_speed,
                };
                (single_leg(start, motion, samples, dt, rng), cfg.hover_max_speed * dt)
            }
            Behavior::EvasiveManeuver => {
                let speed = cfg.evasive_speed.sample(rng);
                let fractions = &cfg.evasive_legs;
                let counts = kinematics::split_samples(
                    samples,
                    &[fractions.straight, fractions.turn, fractions.zigzag],
                );
                let motions = [
                    Motion::Straight,
                    Motion::Turn {
                        rate: kinematics::turn_rate(speed, cfg.evasive_g),
                    },
                    self.zigzag(),
                ];
                let legs: Vec<Leg> = motions
                    .into_iter()
                    .zip(counts)
                    .map(|(motion, samples)| Leg { motion, samples })
                    .collect();
                let start = MotionState::new(self.start_position(rng), heading, speed);
                (kinematics::fly(start, &legs, dt, rng), speed * dt)
            }
            Behavior::Spiral => {
                let speed = cfg.spiral_speed.sample(rng);
                let rate = kinematics::turn_rate(speed, cfg.spiral_g);
                // climb rate = meters per revolution * revolutions per second
                let start = MotionState::new(self.start_position(rng), heading, speed)
                    .with_climb(cfg.spiral_climb * rate / TAU);
                (
                    single_leg(start, Motion::Turn { rate }, samples, dt, rng),
                    speed * dt,
                )
            }
        }
    }

    fn zigzag(&self) -> Motion {
        Motion::Zigzag {
            every: self.config.reversal_every,
            min: self.config.zigzag_turn.min,
            max: self.config.zigzag_turn.max,
        }
    }

    fn start_position(&self, rng: &mut StdRng) -> Vec3 {
        let range = self.config.start_range.sample(rng);
        let altitude = self.config.start_altitude.sample(rng);
        polar_position(range, altitude, rng)
    }

    fn hover_position(&self, rng: &mut StdRng) -> Vec3 {
        let range = self.config.hover_range.sample(rng);
        let altitude = self.config.hover_altitude.sample(rng);
        polar_position(range, altitude, rng)
    }
}

fn polar_position(ground_range: f64, altitude: f64, rng: &mut StdRng) -> Vec3 {
    let azimuth = rng.gen_range(0.0..TAU);
    [ground_range * azimuth.cos(), ground_range * azimuth.sin(), altitude]
}

fn single_leg(start: MotionState, motion: Motion, samples: usize, dt: f64, rng: &mut StdRng) -> Trajectory {
    kinematics::fly(start, &[Leg { motion, samples }], dt, rng)
}
