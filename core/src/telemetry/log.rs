use crate::processing::backend::{FallbackEvent, FallbackSink};
use log::{debug, info, warn};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!("{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackSink for LogManager {
    fn on_fallback(&self, event: &FallbackEvent) {
        self.warn(&format!(
            "{} backend failed for {} ({}); using reference implementation",
            event.backend, event.op, event.reason
        ));
    }
}
