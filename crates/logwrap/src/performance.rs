use std::sync::Arc;
use std::time::{
    Duration,
    Instant,
};

use dashmap::DashMap;

use crate::backend::LoggerHandle;
use crate::level::Level;

pub const PERFORMANCE_LOGGER: &str = "Performance";

/// Pairs start/stop calls and reports the elapsed time.
#[cfg_attr(test, mockall::automock)]
pub trait PerformanceTracker: Send + Sync {
    /// A start without a matching stop stays pending until the key is
    /// stopped or started again.
    fn start_performance(&self, key: &str);

    fn stop_performance(&self, key: &str);

    /// `probe` is the time the facade spent identifying the caller.
    fn start_performance_at(&self, file: &str, method: &str, probe: Duration);

    fn stop_performance_at(&self, file: &str, method: &str, probe: Duration);
}

struct PendingTimer {
    started: Instant,
    probe: Duration,
}

/// Default tracker: writes each measured interval to a logger handle.
pub struct LogPerformanceTracker {
    handle: Arc<dyn LoggerHandle>,
    pending: DashMap<String, PendingTimer>,
}

impl LogPerformanceTracker {
    pub fn new(handle: Arc<dyn LoggerHandle>) -> Self {
        Self {
            handle,
            pending: DashMap::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn start(&self, key: String, probe: Duration) {
        let timer = PendingTimer {
            started: Instant::now(),
            probe,
        };

        if self.pending.insert(key.clone(), timer).is_some()
            && self.handle.is_enabled(Level::Warn)
        {
            let message = format!("Performance start restarted before stop: {key}");
            self.handle.write(Level::Warn, &message, None);
        }
    }

    fn stop(&self, key: &str, probe: Duration) {
        match self.pending.remove(key) {
            Some((_, timer)) => {
                if !self.handle.is_enabled(Level::Info) {
                    return;
                }
                let elapsed = timer.started.elapsed();
                let probe = timer.probe + probe;
                let message = if probe.is_zero() {
                    format!("{key} took {:.3} ms", as_millis(elapsed))
                } else {
                    format!(
                        "{key} took {:.3} ms (caller lookup {:.3} ms)",
                        as_millis(elapsed),
                        as_millis(probe)
                    )
                };
                self.handle.write(Level::Info, &message, None);
            }
            None => {
                if self.handle.is_enabled(Level::Warn) {
                    let message = format!("Performance stop without matching start: {key}");
                    self.handle.write(Level::Warn, &message, None);
                }
            }
        }
    }
}

fn site_key(file: &str, method: &str) -> String {
    format!("{file}::{method}")
}

fn as_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl PerformanceTracker for LogPerformanceTracker {
    fn start_performance(&self, key: &str) {
        self.start(key.to_string(), Duration::ZERO);
    }

    fn stop_performance(&self, key: &str) {
        self.stop(key, Duration::ZERO);
    }

    fn start_performance_at(&self, file: &str, method: &str, probe: Duration) {
        self.start(site_key(file, method), probe);
    }

    fn stop_performance_at(&self, file: &str, method: &str, probe: Duration) {
        self.stop(&site_key(file, method), probe);
    }
}
