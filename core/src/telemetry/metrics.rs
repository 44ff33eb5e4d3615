use crate::processing::backend::{FallbackEvent, FallbackSink};
use crate::telemetry::log::LogManager;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
    logger: LogManager,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub processed: usize,
    pub rejected: usize,
    pub fallbacks: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
            logger: LogManager::new(),
        }
    }

    pub fn record_processed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
        }
    }

    /// A track refused for violating its invariants.
    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackSink for MetricsRecorder {
    fn on_fallback(&self, event: &FallbackEvent) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fallbacks += 1;
        }
        self.logger.on_fallback(event);
    }
}
