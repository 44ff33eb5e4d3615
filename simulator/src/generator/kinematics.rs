//! Forward-Euler motion models. Every model is a sequence of legs flown
//! from a single carried state, so position and velocity stay continuous
//! where one leg hands over to the next.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;
use trackcore::math::kinematics::{add, norm, scale};
use trackcore::processing::acceleration::STANDARD_GRAVITY;
use trackcore::interface::Vec3;

/// How the state evolves during one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Constant heading; speed `base * (1 + amplitude * sin(2*pi*t/period + phase))`.
    Cruise {
        base: f64,
        amplitude: f64,
        period: f64,
        phase: f64,
    },
    /// Constant heading and speed.
    Straight,
    /// Constant-rate horizontal turn, rad/s.
    Turn { rate: f64 },
    /// Alternating heading kicks every `every` samples, degrees drawn from `[min, max]`.
    Zigzag { every: usize, min: f64, max: f64 },
    /// Velocity random walk with per-axis step std `sigma`, capped at `max_speed`.
    Drift { sigma: f64, max_speed: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub motion: Motion,
    pub samples: usize,
}

/// Kinematic state carried across legs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: Vec3,
    /// Radians from +x in the horizontal plane.
    pub heading: f64,
    /// Horizontal speed, m/s.
    pub speed: f64,
    /// Vertical rate, m/s.
    pub climb: f64,
    /// Free velocity used instead of heading/speed while drifting.
    pub drift: Option<Vec3>,
    turn_sign: f64,
}

impl MotionState {
    pub fn new(position: Vec3, heading: f64, speed: f64) -> Self {
        Self {
            position,
            heading,
            speed,
            climb: 0.0,
            drift: None,
            turn_sign: 1.0,
        }
    }

    pub fn hovering(position: Vec3) -> Self {
        Self {
            drift: Some([0.0; 3]),
            ..Self::new(position, 0.0, 0.0)
        }
    }

    pub fn with_climb(mut self, climb: f64) -> Self {
        self.climb = climb;
        self
    }

    pub fn velocity(&self) -> Vec3 {
        match self.drift {
            Some(v) => v,
            None => [
                self.speed * self.heading.cos(),
                self.speed * self.heading.sin(),
                self.climb,
            ],
        }
    }

    /// Applies one sample of `motion`. `index` counts samples from the
    /// start of the track, `step` from the start of the leg.
    fn update<R: Rng>(&mut self, motion: Motion, index: usize, step: usize, dt: f64, rng: &mut R) {
        let t = index as f64 * dt;
        match motion {
            Motion::Cruise {
                base,
                amplitude,
                period,
                phase,
            } => {
                self.speed = base * (1.0 + amplitude * (TAU * t / period + phase).sin());
            }
            Motion::Straight => {}
            Motion::Turn { rate } => {
                if index > 0 {
                    self.heading += rate * dt;
                }
            }
            Motion::Zigzag { every, min, max } => {
                if index > 0 && step % every.max(1) == 0 {
                    let kick = if max > min { rng.gen_range(min..=max) } else { min };
                    self.heading += self.turn_sign * kick.to_radians();
                    self.turn_sign = -self.turn_sign;
                }
            }
            Motion::Drift { sigma, max_speed } => {
                let mut v = self.drift.unwrap_or([0.0; 3]);
                if let Ok(normal) = Normal::new(0.0, sigma) {
                    for component in v.iter_mut() {
                        *component += normal.sample(rng);
                    }
                }
                let speed = norm(v);
                if speed > max_speed {
                    v = scale(v, max_speed / speed);
                }
                self.drift = Some(v);
            }
        }
    }
}

/// Sampled motion plus the sample index at which each leg starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub leg_starts: Vec<usize>,
}

/// Flies `legs` in order from `state`, emitting one sample per step and
/// advancing `position += velocity * dt` between samples.
pub fn fly<R: Rng>(mut state: MotionState, legs: &[Leg], dt: f64, rng: &mut R) -> Trajectory {
    let total: usize = legs.iter().map(|leg| leg.samples).sum();
    let mut trajectory = Trajectory {
        positions: Vec::with_capacity(total),
        velocities: Vec::with_capacity(total),
        leg_starts: Vec::with_capacity(legs.len()),
    };
    for leg in legs {
        trajectory.leg_starts.push(trajectory.positions.len());
        for step in 0..leg.samples {
            let index = trajectory.positions.len();
            state.update(leg.motion, index, step, dt, rng);
            let velocity = state.velocity();
            trajectory.positions.push(state.position);
            trajectory.velocities.push(velocity);
            state.position = add(state.position, scale(velocity, dt));
        }
    }
    trajectory
}

/// Turn rate in rad/s that holds `g` at horizontal speed `speed`.
pub fn turn_rate(speed: f64, g: f64) -> f64 {
    g * STANDARD_GRAVITY / speed
}

/// Radius of a coordinated turn at `g`.
pub fn turn_radius(speed: f64, g: f64) -> f64 {
    speed * speed / (g * STANDARD_GRAVITY)
}

/// Splits `total` samples by `fractions`, giving the remainder to the last leg.
pub fn split_samples(total: usize, fractions: &[f64]) -> Vec<usize> {
    let sum: f64 = fractions.iter().sum();
    let mut counts: Vec<usize> = fractions
        .iter()
        .map(|f| ((f / sum) * total as f64).round() as usize)
        .collect();
    let assigned: usize = counts.iter().take(counts.len().saturating_sub(1)).sum();
    if let Some(last) = counts.last_mut() {
        *last = total.saturating_sub(assigned);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use trackcore::math::kinematics::sub;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn positions_follow_euler_integration() {
        let legs = [Leg {
            motion: Motion::Turn { rate: 0.1 },
            samples: 20,
        }];
        let t = fly(MotionState::new([1000.0, 0.0, 500.0], 0.3, 200.0), &legs, 0.5, &mut rng());
        for i in 1..t.positions.len() {
            let expected = add(t.positions[i - 1], scale(t.velocities[i - 1], 0.5));
            assert_relative_eq!(norm(sub(t.positions[i], expected)), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn constant_turn_holds_requested_g() {
        let speed = 250.0;
        let rate = turn_rate(speed, 6.0);
        let legs = [Leg {
            motion: Motion::Turn { rate },
            samples: 30,
        }];
        let t = fly(MotionState::new([0.0; 3], 0.0, speed), &legs, 0.01, &mut rng());
        let accel = norm(sub(t.velocities[2], t.velocities[1])) / 0.01;
        assert_relative_eq!(accel / STANDARD_GRAVITY, 6.0, max_relative = 1e-4);
        assert_relative_eq!(turn_radius(speed, 6.0), speed / rate, max_relative = 1e-12);
    }

    #[test]
    fn zigzag_alternates_heading() {
        let legs = [Leg {
            motion: Motion::Zigzag {
                every: 1,
                min: 90.0,
                max: 90.0,
            },
            samples: 4,
        }];
        let t = fly(MotionState::new([0.0; 3], 0.0, 100.0), &legs, 1.0, &mut rng());
        assert_relative_eq!(t.velocities[1][1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(t.velocities[2][0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(t.velocities[3][1], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn drift_never_exceeds_cap() {
        let legs = [Leg {
            motion: Motion::Drift {
                sigma: 5.0,
                max_speed: 2.0,
            },
            samples: 200,
        }];
        let t = fly(MotionState::hovering([0.0, 0.0, 100.0]), &legs, 1.0, &mut rng());
        assert!(t.velocities.iter().all(|&v| norm(v) <= 2.0 + 1e-9));
    }

    #[test]
    fn legs_record_their_start() {
        let legs = [
            Leg { motion: Motion::Straight, samples: 5 },
            Leg { motion: Motion::Turn { rate: 0.2 }, samples: 3 },
        ];
        let t = fly(MotionState::new([0.0; 3], 0.0, 10.0), &legs, 1.0, &mut rng());
        assert_eq!(t.leg_starts, vec![0, 5]);
        assert_eq!(t.positions.len(), 8);
    }

    #[test]
    fn split_assigns_every_sample() {
        assert_eq!(split_samples(61, &[0.1, 0.2, 0.7]), vec![6, 12, 43]);
        assert_eq!(split_samples(10, &[1.0]), vec![10]);
    }
}
