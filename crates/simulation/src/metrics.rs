//! MetricsHook - Built-in hook for aggregating simulation statistics.
//!
//! Collects per-tick figures across a run: how many ticks ran, how many of
//! them had an event active, and the peak adjusted stock.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::SimSnapshot;

use crate::hooks::SimulationHook;

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Total ticks observed.
    pub total_ticks: u64,
    /// Ticks with a market event active.
    pub ticks_under_event: u64,
    /// Highest adjusted stock seen at the end of a tick.
    pub peak_stock: u64,
    /// Lowest adjusted stock seen at the end of a tick.
    pub min_stock: u64,
    /// Sentiment aggregator steps observed.
    pub sentiment_updates: u64,
    /// Resets observed.
    pub resets: u64,
    /// Mean utilization across observed ticks.
    pub avg_utilization: f64,
}

/// Built-in hook for collecting simulation metrics.
///
/// Thread-safe via atomics and mutex for interior mutability.
pub struct MetricsHook {
    tick_count: AtomicU64,
    event_ticks: AtomicU64,
    sentiment_updates: AtomicU64,
    resets: AtomicU64,
    /// (peak, min) adjusted stock.
    stock_bounds: Mutex<Option<(u64, u64)>>,
    /// Running utilization sum for the mean.
    utilization_sum: Mutex<f64>,
}

impl MetricsHook {
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            event_ticks: AtomicU64::new(0),
            sentiment_updates: AtomicU64::new(0),
            resets: AtomicU64::new(0),
            stock_bounds: Mutex::new(None),
            utilization_sum: Mutex::new(0.0),
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_ticks = self.tick_count.load(Ordering::Relaxed);
        let bounds = *self.stock_bounds.lock();
        let (peak_stock, min_stock) = bounds.unwrap_or((0, 0));
        let avg_utilization = if total_ticks > 0 {
            *self.utilization_sum.lock() / total_ticks as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_ticks,
            ticks_under_event: self.event_ticks.load(Ordering::Relaxed),
            peak_stock,
            min_stock,
            sentiment_updates: self.sentiment_updates.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            avg_utilization,
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "MetricsHook"
    }

    fn on_tick_end(&self, snapshot: &SimSnapshot) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        if snapshot.active_event.is_some() {
            self.event_ticks.fetch_add(1, Ordering::Relaxed);
        }

        let stock = snapshot.metrics.current_stock;
        let mut bounds = self.stock_bounds.lock();
        *bounds = Some(match *bounds {
            Some((peak, min)) => (peak.max(stock), min.min(stock)),
            None => (stock, stock),
        });
        drop(bounds);

        *self.utilization_sum.lock() += snapshot.metrics.utilization;
    }

    fn on_sentiment(&self, _snapshot: &SimSnapshot) {
        self.sentiment_updates.fetch_add(1, Ordering::Relaxed);
    }

    fn on_reset(&self, _snapshot: &SimSnapshot) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Simulation;
    use std::sync::Arc;

    #[test]
    fn test_empty_snapshot() {
        let hook = MetricsHook::new();
        assert_eq!(hook.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_collects_over_run() {
        let hook = Arc::new(MetricsHook::new());
        let mut sim = Simulation::with_seed_data(42);
        sim.add_hook(hook.clone());

        sim.run(5);
        sim.toggle_event("drought").unwrap();
        sim.run(5);
        sim.step_sentiment();

        let m = hook.snapshot();
        assert_eq!(m.total_ticks, 10);
        assert_eq!(m.ticks_under_event, 5);
        assert_eq!(m.sentiment_updates, 1);
        assert!(m.peak_stock >= m.min_stock);
        assert!((0.0..=100.0).contains(&m.avg_utilization));
    }
}
