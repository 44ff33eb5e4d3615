use crate::interface::{FeatureMap, Track};
use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureCategory, FeatureStage};
use crate::processing::backend::SignalProcessor;

/// Spectral statistics of the Doppler spectrum.
///
/// Uses the spectrum carried by the track when present, otherwise derives
/// one from the raw samples through the signal processor.
#[derive(Debug, Clone)]
pub struct DopplerStage {
    processor: SignalProcessor,
    /// Fraction of peak power a bin must reach to count toward bandwidth.
    power_floor: f64,
}

impl DopplerStage {
    pub fn new(processor: SignalProcessor, power_floor: f64) -> Self {
        Self {
            processor,
            power_floor,
        }
    }

    fn spectrum(&self, track: &Track) -> Option<Vec<f64>> {
        if !track.doppler.is_empty() {
            Some(track.doppler.clone())
        } else if !track.raw_samples.is_empty() {
            Some(self.processor.doppler_spectrum(&track.raw_samples))
        } else {
            None
        }
    }
}

impl Default for DopplerStage {
    fn default() -> Self {
        Self::new(SignalProcessor::default(), 0.5)
    }
}

/// Frequency of each bin of a centered spectrum; normalized (cycles per
/// sample) when the sampling rate is unknown.
fn bin_frequencies(len: usize, sampling_rate: f64) -> Vec<f64> {
    let center = (len / 2) as f64;
    (0..len)
        .map(|k| (k as f64 - center) * sampling_rate / len as f64)
        .collect()
}

impl FeatureStage for DopplerStage {
    fn category(&self) -> FeatureCategory {
        FeatureCategory::Doppler
    }

    fn extract(&self, track: &Track) -> Option<FeatureMap> {
        let spectrum = self.spectrum(track)?;
        let usable = |rate: &f64| rate.is_finite() && *rate > 0.0;
        let signal_rate = track
            .metadata
            .signal_rate
            .filter(usable)
            .or_else(|| track.metadata.sampling_rate.filter(usable))
            .unwrap_or(1.0);
        let frequencies = bin_frequencies(spectrum.len(), signal_rate);
        let power: Vec<f64> = spectrum.iter().map(|v| v.abs()).collect();

        let (peak_index, peak_power) = power
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        let floor = self.power_floor * peak_power;
        let above: Vec<usize> = power
            .iter()
            .enumerate()
            .filter(|(_, p)| peak_power > 0.0 && **p >= floor)
            .map(|(i, _)| i)
            .collect();
        let bandwidth = match (above.first(), above.last()) {
            (Some(&lo), Some(&hi)) => frequencies[hi] - frequencies[lo],
            _ => 0.0,
        };

        let mut features = FeatureMap::new();
        features.insert_scalar("doppler_mean", StatsHelper::mean(&spectrum));
        features.insert_scalar("doppler_std", StatsHelper::std(&spectrum));
        features.insert_scalar("doppler_bandwidth", bandwidth);
        features.insert_scalar(
            "doppler_peak_frequency",
            frequencies.get(peak_index).copied().unwrap_or(0.0),
        );
        features.insert_scalar("doppler_peak_power", peak_power);
        features.insert_scalar(
            "doppler_spread",
            StatsHelper::weighted_std(&frequencies, &power),
        );
        Some(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn bare_track() -> Track {
        Track::new(vec![[0.0; 3]; 2], vec![[0.0; 3]; 2], vec![0.0, 1.0])
    }

    #[test]
    fn single_peak_spectrum() {
        let mut track = bare_track();
        track.doppler = vec![0.0, 1.0, 4.0, 1.0];
        track.metadata.sampling_rate = Some(8.0);
        let features = DopplerStage::default().extract(&track).unwrap();
        // bins map to -4, -2, 0, 2 Hz
        assert_eq!(features.scalar("doppler_peak_frequency"), Some(0.0));
        assert_eq!(features.scalar("doppler_peak_power"), Some(4.0));
        assert_eq!(features.scalar("doppler_bandwidth"), Some(0.0));
        assert_relative_eq!(features.scalar("doppler_mean").unwrap(), 1.5);
        assert_relative_eq!(
            features.scalar("doppler_spread").unwrap(),
            (8.0f64 / 6.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn spectrum_is_derived_from_raw_samples() {
        let mut track = bare_track();
        track.raw_samples = (0..16)
            .map(|i| Complex64::from_polar(1.0, 2.0 * PI * 2.0 * i as f64 / 16.0))
            .collect();
        track.metadata.sampling_rate = Some(16.0);
        let features = DopplerStage::default().extract(&track).unwrap();
        assert_relative_eq!(features.scalar("doppler_peak_frequency").unwrap(), 2.0);
        assert_relative_eq!(features.scalar("doppler_peak_power").unwrap(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn signal_rate_takes_precedence_over_update_rate() {
        let mut track = bare_track();
        track.doppler = vec![0.0, 1.0, 1.0, 4.0];
        track.metadata.sampling_rate = Some(1.0);
        track.metadata.signal_rate = Some(400.0);
        let features = DopplerStage::default().extract(&track).unwrap();
        // bins map to -200, -100, 0, 100 Hz
        assert_relative_eq!(features.scalar("doppler_peak_frequency").unwrap(), 100.0);
    }

    #[test]
    fn missing_inputs_omit_category() {
        assert!(DopplerStage::default().extract(&bare_track()).is_none());
    }

    #[test]
    fn all_zero_spectrum_is_finite() {
        let mut track = bare_track();
        track.doppler = vec![0.0; 8];
        let features = DopplerStage::default().extract(&track).unwrap();
        assert!(features.all_finite());
        assert_eq!(features.scalar("doppler_spread"), Some(0.0));
    }
}
