//! Named scope timings for debugging slow ticks.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScopeStats {
    pub count: u64,
    pub total: Duration,
}

impl ScopeStats {
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total.div_f64(self.count as f64)
        }
    }
}

/// Accumulates the time spent inside labelled scopes
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    stats: Rc<RefCell<HashMap<String, ScopeStats>>>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts timing `label`; the time is recorded when the guard drops
    pub fn scope(&self, label: impl Into<String>) -> ProfileScope {
        ProfileScope {
            label: label.into(),
            start: Instant::now(),
            stats: Rc::clone(&self.stats),
        }
    }

    pub fn stats(&self, label: &str) -> Option<ScopeStats> {
        self.stats.borrow().get(label).copied()
    }

    /// Labels sorted by total time, largest first
    pub fn summary(&self) -> Vec<(String, ScopeStats)> {
        let mut rows: Vec<_> = self
            .stats
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        rows.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(&b.0)));
        rows
    }

    pub fn print(&self) {
        let rows = self.summary();
        info!(scopes = rows.len(), "profiler summary");
        for (label, stats) in rows {
            info!(
                label = %label,
                count = stats.count,
                total_ms = stats.total.as_secs_f64() * 1000.0,
                mean_ms = stats.mean().as_secs_f64() * 1000.0,
                "profile"
            );
        }
    }

    pub fn clear(&self) {
        self.stats.borrow_mut().clear();
    }
}

/// Guard returned by [`Profiler::scope`]
#[must_use = "the scope is timed until this guard drops"]
pub struct ProfileScope {
    label: String,
    start: Instant,
    stats: Rc<RefCell<HashMap<String, ScopeStats>>>,
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if let Ok(mut stats) = self.stats.try_borrow_mut() {
            let entry = stats.entry(std::mem::take(&mut self.label)).or_default();
            entry.count += 1;
            entry.total += elapsed;
        }
    }
}
