use serde::Serialize;
use std::sync::Mutex;

/// Counts commands the controller applied and user inputs the sidebar refused.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub applied: usize,
    pub rejected: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Metrics {
    applied: usize,
    rejected: usize,
    failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_applied(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.applied += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                applied: metrics.applied,
                rejected: metrics.rejected,
                failed: metrics.failed,
            }
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
