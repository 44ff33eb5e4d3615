/// Aggregate helpers over sample slices. Every helper returns 0.0 for an
/// empty input so that callers never see NaN from an empty aggregate.
pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Population variance.
    pub fn variance(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mean = Self::mean(samples);
        samples.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / samples.len() as f64
    }

    pub fn std(samples: &[f64]) -> f64 {
        Self::variance(samples).sqrt()
    }

    pub fn max(samples: &[f64]) -> f64 {
        samples
            .iter()
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub fn min(samples: &[f64]) -> f64 {
        samples
            .iter()
            .copied()
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Percentile with linear interpolation between closest ranks, `pct` in [0, 100].
    pub fn percentile(samples: &[f64], pct: f64) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let frac = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * frac
    }

    /// `num / den`, or 0.0 when `|den| <= eps`.
    pub fn guarded_ratio(num: f64, den: f64, eps: f64) -> f64 {
        if den.abs() <= eps {
            0.0
        } else {
            num / den
        }
    }

    /// Least-squares slope of `y` against `x`; 0.0 when `x` has no spread.
    pub fn linear_slope(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len().min(y.len());
        if n < 2 {
            return 0.0;
        }
        let (x, y) = (&x[..n], &y[..n]);
        let mean_x = Self::mean(x);
        let mean_y = Self::mean(y);
        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            sxy += (xi - mean_x) * (yi - mean_y);
            sxx += (xi - mean_x) * (xi - mean_x);
        }
        Self::guarded_ratio(sxy, sxx, f64::EPSILON)
    }

    /// Standard deviation of `values` weighted by non-negative `weights`.
    pub fn weighted_std(values: &[f64], weights: &[f64]) -> f64 {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let mean = values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total;
        let var = values
            .iter()
            .zip(weights)
            .map(|(v, w)| w * (v - mean) * (v - mean))
            .sum::<f64>()
            / total;
        var.max(0.0).sqrt()
    }
}
