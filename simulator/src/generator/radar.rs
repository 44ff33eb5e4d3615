use anyhow::Context;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::{PI, TAU};
use trackcore::interface::Vec3;
use trackcore::math::kinematics::{dot, norm};

pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Monostatic radar at the origin observing a point target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarModel {
    pub carrier_frequency: f64,
}

impl RadarModel {
    pub fn new(carrier_frequency: f64) -> Self {
        Self { carrier_frequency }
    }

    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT / self.carrier_frequency
    }

    /// Range in meters, floored at 1 m so path loss stays finite.
    pub fn range(&self, position: Vec3) -> f64 {
        norm(position).max(1.0)
    }

    /// Two-way Doppler shift in Hz; positive while the target recedes.
    pub fn doppler_shift(&self, position: Vec3, velocity: Vec3) -> f64 {
        let radial = dot(velocity, position) / self.range(position);
        2.0 * radial / self.wavelength()
    }

    /// Complex baseband return per sample with `1/R^2` amplitude.
    pub fn returns(&self, positions: &[Vec3], velocities: &[Vec3], timestamps: &[f64]) -> Vec<Complex64> {
        let wavelength = self.wavelength();
        positions
            .iter()
            .zip(velocities)
            .zip(timestamps)
            .map(|((&p, &v), &t)| {
                let range = self.range(p);
                let phase = 4.0 * PI * range / wavelength + TAU * self.doppler_shift(p, v) * t;
                Complex64::from_polar(1.0 / (range * range), phase)
            })
            .collect()
    }
}

/// Adds circular complex Gaussian noise at `snr_db` relative to the mean
/// signal power.
pub fn add_receiver_noise<R: Rng>(samples: &mut [Complex64], snr_db: f64, rng: &mut R) -> anyhow::Result<()> {
    if samples.is_empty() {
        return Ok(());
    }
    let signal_power = samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64;
    let noise_power = signal_power / 10f64.powf(snr_db / 10.0);
    let normal = Normal::new(0.0, (noise_power / 2.0).sqrt())
        .with_context(|| format!("building receiver noise for SNR {} dB", snr_db))?;
    for sample in samples.iter_mut() {
        *sample += Complex64::new(normal.sample(rng), normal.sample(rng));
    }
    Ok(())
}

/// Adds isotropic Gaussian noise with standard deviation `sigma` to every position.
pub fn jitter_positions<R: Rng>(positions: &mut [Vec3], sigma: f64, rng: &mut R) -> anyhow::Result<()> {
    if sigma <= 0.0 {
        return Ok(());
    }
    let normal = Normal::new(0.0, sigma).with_context(|| format!("building position noise with std {}", sigma))?;
    for position in positions.iter_mut() {
        for axis in position.iter_mut() {
            *axis += normal.sample(rng);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn x_band_wavelength() {
        assert_relative_eq!(RadarModel::new(10e9).wavelength(), 0.029979, epsilon = 1e-6);
    }

    #[test]
    fn radial_motion_sets_doppler_sign() {
        let radar = RadarModel::new(10e9);
        let receding = radar.doppler_shift([1000.0, 0.0, 0.0], [30.0, 0.0, 0.0]);
        let crossing = radar.doppler_shift([1000.0, 0.0, 0.0], [0.0, 30.0, 0.0]);
        assert_relative_eq!(receding, 60.0 / radar.wavelength(), max_relative = 1e-12);
        assert_relative_eq!(crossing, 0.0);
        assert!(radar.doppler_shift([1000.0, 0.0, 0.0], [-30.0, 0.0, 0.0]) < 0.0);
    }

    #[test]
    fn amplitude_follows_path_loss() {
        let radar = RadarModel::new(10e9);
        let samples = radar.returns(&[[100.0, 0.0, 0.0], [0.0, 200.0, 0.0]], &[[0.0; 3]; 2], &[0.0, 1.0]);
        assert_relative_eq!(samples[0].norm(), 1e-4, max_relative = 1e-9);
        assert_relative_eq!(samples[1].norm(), 2.5e-5, max_relative = 1e-9);
    }

    #[test]
    fn noise_power_matches_snr() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut samples = vec![Complex64::new(1.0, 0.0); 20_000];
        add_receiver_noise(&mut samples, 10.0, &mut rng).unwrap();
        let noise_power = samples
            .iter()
            .map(|s| (s - Complex64::new(1.0, 0.0)).norm_sqr())
            .sum::<f64>()
            / samples.len() as f64;
        assert_relative_eq!(noise_power, 0.1, max_relative = 0.05);
    }

    #[test]
    fn zero_sigma_leaves_positions() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut positions = vec![[1.0, 2.0, 3.0]];
        jitter_positions(&mut positions, 0.0, &mut rng).unwrap();
        assert_eq!(positions, vec![[1.0, 2.0, 3.0]]);
    }
}
