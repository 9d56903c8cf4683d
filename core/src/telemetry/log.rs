use crate::prelude::{DetectionError, SourceUnavailable};
use log::{debug, info, warn};

/// Thin wrapper that keeps the pipeline's log targets consistent.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new() -> Self {
        Self {
            target: "radarcore",
        }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn skipped(&self, error: &DetectionError) {
        debug!(target: self.target, "skipped {}", error);
    }

    pub fn source_failure(&self, error: &SourceUnavailable) {
        warn!(target: self.target, "frame fetch failed: {}", error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
