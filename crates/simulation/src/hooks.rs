//! Simulation hooks for observing state transitions.
//!
//! Hooks are **observers** that receive a consistent [`SimSnapshot`] after
//! each transition. They cannot modify simulation state.
//!
//! # Design Principles
//!
//! - **Declarative**: Hooks declare what transitions they care about via trait methods
//! - **Modular**: Each hook is independent; add/remove without affecting simulation
//! - **SoC**: Simulation owns state; hooks observe and report
//!
//! # Lifecycle
//!
//! ```text
//! step()            ──▶ on_tick_end(snapshot)
//! step_sentiment()  ──▶ on_sentiment(snapshot)
//! step_routes()     ──▶ on_routes(snapshot)
//! toggle_event()    ──▶ on_event_changed(snapshot)
//! set_running() / set_speed() / set_live_connected()
//!                   ──▶ on_control(snapshot)
//! reset()           ──▶ on_reset(snapshot)
//! ```
//!
//! Hooks run while the simulation lock is held, so they must be quick.
//! Forward to a channel for anything slow.

use std::sync::Arc;

use types::SimSnapshot;

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Use interior mutability (`Mutex`, atomics, channels) for hook-owned state.
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called after every tick, with aggregates already recomputed.
    #[allow(unused_variables)]
    fn on_tick_end(&self, snapshot: &SimSnapshot) {}

    /// Called after every sentiment aggregator step.
    #[allow(unused_variables)]
    fn on_sentiment(&self, snapshot: &SimSnapshot) {}

    /// Called after every route updater step.
    #[allow(unused_variables)]
    fn on_routes(&self, snapshot: &SimSnapshot) {}

    /// Called when the active market event is selected, replaced or cleared.
    #[allow(unused_variables)]
    fn on_event_changed(&self, snapshot: &SimSnapshot) {}

    /// Called when running state, speed or live-channel status changes.
    #[allow(unused_variables)]
    fn on_control(&self, snapshot: &SimSnapshot) {}

    /// Called after the simulation is restored to its seed state.
    #[allow(unused_variables)]
    fn on_reset(&self, snapshot: &SimSnapshot) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order.
#[derive(Default, Clone)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_tick_end(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_tick_end(snapshot);
        }
    }

    pub fn on_sentiment(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_sentiment(snapshot);
        }
    }

    pub fn on_routes(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_routes(snapshot);
        }
    }

    pub fn on_event_changed(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_event_changed(snapshot);
        }
    }

    pub fn on_control(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_control(snapshot);
        }
    }

    pub fn on_reset(&self, snapshot: &SimSnapshot) {
        for hook in &self.hooks {
            hook.on_reset(snapshot);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Simulation;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingHook {
        ticks: AtomicU64,
        sentiment: AtomicU64,
        resets: AtomicU64,
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_tick_end(&self, _snapshot: &SimSnapshot) {
            self.ticks.fetch_add(1, Ordering::Relaxed);
        }

        fn on_sentiment(&self, _snapshot: &SimSnapshot) {
            self.sentiment.fetch_add(1, Ordering::Relaxed);
        }

        fn on_reset(&self, _snapshot: &SimSnapshot) {
            self.resets.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::default());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        let snapshot = Simulation::with_seed_data(1).snapshot();
        runner.on_tick_end(&snapshot);
        runner.on_tick_end(&snapshot);
        runner.on_sentiment(&snapshot);

        assert_eq!(hook.ticks.load(Ordering::Relaxed), 2);
        assert_eq!(hook.sentiment.load(Ordering::Relaxed), 1);
        assert_eq!(hook.resets.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::default()));

        assert_eq!(runner.hook_names(), vec!["NoOp", "CountingHook"]);
        assert_eq!(runner.len(), 2);
    }

    #[test]
    fn test_simulation_notifies_hooks() {
        let hook = Arc::new(CountingHook::default());
        let mut sim = Simulation::with_seed_data(1);
        sim.add_hook(hook.clone());
        assert_eq!(sim.hook_count(), 1);

        sim.run(3);
        sim.step_sentiment();
        sim.reset();

        assert_eq!(hook.ticks.load(Ordering::Relaxed), 3);
        assert_eq!(hook.sentiment.load(Ordering::Relaxed), 1);
        assert_eq!(hook.resets.load(Ordering::Relaxed), 1);
    }
}
