//! Signal-processing capability with an accelerated path and an
//! always-available reference path.
//!
//! Callers depend on [`SignalProcessor`]; it tries the accelerated backend
//! when one is configured and silently falls back to [`ReferenceBackend`]
//! on any error, reporting the event to a caller-supplied [`FallbackSink`].

use crate::math::fft::{fft_shift, FftHelper};
use crate::prelude::{BackendError, BackendResult};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Named operations offered by a signal backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalOp {
    /// Centered magnitude spectrum.
    DopplerAnalysis,
    /// Matched-filter autocorrelation, same length as the input.
    PulseCompression,
    /// Two-pulse MTI canceller, same length as the input.
    ClutterRejection,
}

impl fmt::Display for SignalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalOp::DopplerAnalysis => "doppler_analysis",
            SignalOp::PulseCompression => "pulse_compression",
            SignalOp::ClutterRejection => "clutter_rejection",
        };
        f.write_str(name)
    }
}

pub trait SignalBackend: Send + Sync {
    fn name(&self) -> &str;
    fn execute(&self, op: SignalOp, input: &[Complex64]) -> BackendResult<Vec<Complex64>>;
}

/// Record of an accelerated call that was answered by the reference path.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackEvent {
    pub backend: String,
    pub op: SignalOp,
    pub reason: String,
}

/// Observer for fallback events.
pub trait FallbackSink: Send + Sync {
    fn on_fallback(&self, event: &FallbackEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FallbackSink for NullSink {
    fn on_fallback(&self, _event: &FallbackEvent) {}
}

/// Portable O(n^2) implementations used when nothing faster is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceBackend;

impl ReferenceBackend {
    pub fn run(&self, op: SignalOp, input: &[Complex64]) -> Vec<Complex64> {
        match op {
            SignalOp::DopplerAnalysis => fft_shift(&dft(input)),
            SignalOp::PulseCompression => matched_filter(input),
            SignalOp::ClutterRejection => mti_canceller(input),
        }
    }
}

impl SignalBackend for ReferenceBackend {
    fn name(&self) -> &str {
        "reference"
    }

    fn execute(&self, op: SignalOp, input: &[Complex64]) -> BackendResult<Vec<Complex64>> {
        Ok(self.run(op, input))
    }
}

/// `rustfft`-backed implementation, bounded by a maximum transform length.
#[derive(Debug, Clone, Copy)]
pub struct FftBackend {
    max_len: usize,
}

impl FftBackend {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    fn check(&self, input: &[Complex64]) -> BackendResult<()> {
        if input.is_empty() {
            return Err(BackendError::Unsupported("empty input".into()));
        }
        if input.len() > self.max_len {
            return Err(BackendError::CapacityExceeded {
                len: input.len(),
                capacity: self.max_len,
            });
        }
        Ok(())
    }
}

impl Default for FftBackend {
    fn default() -> Self {
        Self::new(1 << 20)
    }
}

impl SignalBackend for FftBackend {
    fn name(&self) -> &str {
        "rustfft"
    }

    fn execute(&self, op: SignalOp, input: &[Complex64]) -> BackendResult<Vec<Complex64>> {
        self.check(input)?;
        match op {
            SignalOp::DopplerAnalysis => {
                let helper = FftHelper::new(input.len());
                Ok(fft_shift(&helper.forward(input)))
            }
            SignalOp::PulseCompression => Ok(fast_matched_filter(input)),
            SignalOp::ClutterRejection => Ok(mti_canceller(input)),
        }
    }
}

/// Entry point used by the feature stages.
#[derive(Clone)]
pub struct SignalProcessor {
    accelerated: Option<Arc<dyn SignalBackend>>,
    reference: ReferenceBackend,
    sink: Arc<dyn FallbackSink>,
}

impl SignalProcessor {
    /// Reference path only.
    pub fn reference() -> Self {
        Self {
            accelerated: None,
            reference: ReferenceBackend,
            sink: Arc::new(NullSink),
        }
    }

    pub fn with_accelerated(backend: Arc<dyn SignalBackend>) -> Self {
        Self {
            accelerated: Some(backend),
            ..Self::reference()
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn FallbackSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn accelerated_name(&self) -> Option<&str> {
        self.accelerated.as_deref().map(|backend| backend.name())
    }

    /// Runs `op`, never failing: accelerated errors fall back to the
    /// reference implementation and are reported to the sink.
    pub fn run(&self, op: SignalOp, input: &[Complex64]) -> Vec<Complex64> {
        if let Some(backend) = &self.accelerated {
            match backend.execute(op, input) {
                Ok(output) => return output,
                Err(err) => self.sink.on_fallback(&FallbackEvent {
                    backend: backend.name().to_string(),
                    op,
                    reason: err.to_string(),
                }),
            }
        }
        self.reference.run(op, input)
    }

    /// Centered magnitude spectrum of `samples`.
    pub fn doppler_spectrum(&self, samples: &[Complex64]) -> Vec<f64> {
        self.run(SignalOp::DopplerAnalysis, samples)
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::with_accelerated(Arc::new(FftBackend::default()))
    }
}

impl fmt::Debug for SignalProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalProcessor")
            .field("accelerated", &self.accelerated_name())
            .finish()
    }
}

fn dft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .fold(Complex64::zero(), |acc, (m, &x)| {
                    let angle = -2.0 * PI * (k * m % n) as f64 / n as f64;
                    acc + x * Complex64::from_polar(1.0, angle)
                })
        })
        .collect()
}

/// Correlation of the input with its own matched filter `conj(x[::-1])`,
/// centered to the input length.
fn matched_filter(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }
    // full autocorrelation r[lag], lag in -(n-1)..=(n-1), centered slice of length n
    let offset = (n - 1) / 2;
    (0..n)
        .map(|i| {
            let lag = i as isize - offset as isize;
            autocorrelation_at(input, lag)
        })
        .collect()
}

fn autocorrelation_at(input: &[Complex64], lag: isize) -> Complex64 {
    let n = input.len() as isize;
    (0..n)
        .filter_map(|m| {
            let k = m + lag;
            (0..n)
                .contains(&k)
                .then(|| input[k as usize] * input[m as usize].conj())
        })
        .sum()
}

/// Same result as [`matched_filter`] computed through zero-padded FFTs.
fn fast_matched_filter(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    let size = (2 * n - 1).next_power_of_two();
    let mut planner = rustfft::FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    let mut spectrum: Vec<Complex64> = input.to_vec();
    spectrum.resize(size, Complex64::zero());
    forward.process(&mut spectrum);
    for bin in spectrum.iter_mut() {
        *bin = Complex64::new(bin.norm_sqr(), 0.0);
    }
    inverse.process(&mut spectrum);

    let scale = 1.0 / size as f64;
    let offset = (n - 1) / 2;
    (0..n)
        .map(|i| {
            let lag = i as isize - offset as isize;
            let index = lag.rem_euclid(size as isize) as usize;
            spectrum[index] * scale
        })
        .collect()
}

fn mti_canceller(input: &[Complex64]) -> Vec<Complex64> {
    if input.len() < 2 {
        return input.to_vec();
    }
    let mut filtered: Vec<Complex64> = input.windows(2).map(|w| w[1] - w[0]).collect();
    if let Some(&last) = filtered.last() {
        filtered.push(last);
    }
    filtered
}
