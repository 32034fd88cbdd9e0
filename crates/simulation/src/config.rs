//! Simulation configuration options.

use std::time::Duration;

use types::{DEFAULT_CAPACITY, NetworkMetrics, SimulationSpeed};

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Network storage capacity used for utilization.
    pub capacity: u64,

    /// Metrics shown before the first tick.
    pub initial_metrics: NetworkMetrics,

    /// Initial tick speed.
    pub speed: SimulationSpeed,

    /// Sentiment aggregator cadence.
    pub sentiment_interval: Duration,

    /// Route updater cadence.
    pub route_interval: Duration,

    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            initial_metrics: NetworkMetrics::default(),
            speed: SimulationSpeed::default(),
            sentiment_interval: Duration::from_millis(2000),
            route_interval: Duration::from_millis(2000),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage capacity (values below 1 are raised to 1).
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_initial_metrics(mut self, metrics: NetworkMetrics) -> Self {
        self.initial_metrics = metrics;
        self
    }

    pub fn with_speed(mut self, speed: SimulationSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_sentiment_interval(mut self, interval: Duration) -> Self {
        self.sentiment_interval = interval;
        self
    }

    pub fn with_route_interval(mut self, interval: Duration) -> Self {
        self.route_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
