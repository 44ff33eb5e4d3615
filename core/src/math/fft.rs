use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    fft: std::sync::Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform, zero-padding or truncating the input to the plan size.
    pub fn forward(&self, input: &[Complex64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input.iter().take(self.size).copied().collect();
        buffer.resize(self.size, Complex64::zero());
        self.fft.process(&mut buffer);
        buffer
    }
}

/// Rotates a spectrum so the zero-frequency bin sits at index `len / 2`.
pub fn fft_shift<T: Clone>(spectrum: &[T]) -> Vec<T> {
    let mut shifted = spectrum.to_vec();
    let len = shifted.len();
    shifted.rotate_right(len / 2);
    shifted
}
