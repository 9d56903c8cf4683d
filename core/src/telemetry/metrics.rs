use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over the life of a processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames_processed: usize,
    pub points_skipped: usize,
    pub source_failures: usize,
    pub empty_views: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_frame(&self, skipped: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_processed += 1;
            metrics.points_skipped += skipped;
        }
    }

    pub fn record_source_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.source_failures += 1;
        }
    }

    pub fn record_empty_view(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.empty_views += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
