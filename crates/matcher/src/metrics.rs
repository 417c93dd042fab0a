// Metrics hooks for the `matcher` crate.
//
// Callers install a global `CheckMetrics` implementation via
// [`set_check_metrics`]; every `Matcher::check_document` call then reports its
// latency, scanned document count and resulting uniqueness. This keeps
// instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for check operations.
pub trait CheckMetrics: Send + Sync {
    /// Record a successful check.
    ///
    /// `documents_checked` is the post-filter candidate count and
    /// `uniqueness_percent` the reported uniqueness.
    fn record_check(&self, latency: Duration, documents_checked: usize, uniqueness_percent: u8);

    /// Record a check that failed; `kind` is a short error label.
    fn record_failure(&self, _kind: &'static str) {}
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn CheckMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn CheckMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn CheckMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global check metrics recorder.
pub fn set_check_metrics(recorder: Option<Arc<dyn CheckMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
