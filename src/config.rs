//! Central configuration for the supply-chain simulation binary.
//!
//! Defaults live here; `main` layers CLI flags and `SIM_*` environment
//! variables on top.

use std::time::Duration;

use feed::{DataFetchError, DataSource, HttpDataSource, HttpSourceConfig, LiveFeedConfig, SeedDataSource};
use server::ServerConfig;
use simulation::SimulationConfig;
use types::{DEFAULT_CAPACITY, SimulationSpeed};

/// Master configuration for a run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Simulation Control
    // ─────────────────────────────────────────────────────────────────────────
    /// Ticks to run in headless mode.
    pub total_ticks: u64,
    /// RNG seed (`None` = OS entropy).
    pub seed: Option<u64>,
    /// Initial tick speed.
    pub speed: SimulationSpeed,
    /// Network storage capacity for utilization.
    pub capacity: u64,
    /// Sentiment aggregator cadence in milliseconds.
    pub sentiment_interval_ms: u64,
    /// Route updater cadence in milliseconds.
    pub route_interval_ms: u64,
    /// Market event to select before the first tick.
    pub initial_event: Option<String>,
    /// Start running immediately instead of waiting for a Start command.
    pub autostart: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // External Collaborators
    // ─────────────────────────────────────────────────────────────────────────
    /// Base URL of the data API. `None` uses the built-in seed data.
    pub api_url: Option<String>,
    /// Per-request timeout for the data API.
    pub fetch_timeout_ms: u64,
    /// WebSocket URL of the live stock channel.
    pub live_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Server
    // ─────────────────────────────────────────────────────────────────────────
    pub server: ServerConfig,
    /// Broadcast buffer for WebSocket frames.
    pub frame_buffer: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks: 1000,
            seed: None,
            speed: SimulationSpeed::X1,
            capacity: DEFAULT_CAPACITY,
            sentiment_interval_ms: 2000,
            route_interval_ms: 2000,
            initial_event: None,
            autostart: false,
            api_url: None,
            fetch_timeout_ms: 10_000,
            live_url: None,
            server: ServerConfig::from_env(),
            frame_buffer: 256,
        }
    }
}

impl SimConfig {
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.total_ticks = ticks;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_speed(mut self, speed: SimulationSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_live_url(mut self, url: impl Into<String>) -> Self {
        self.live_url = Some(url.into());
        self
    }

    /// Engine configuration derived from this run's settings.
    pub fn simulation_config(&self) -> SimulationConfig {
        let config = SimulationConfig::new()
            .with_capacity(self.capacity)
            .with_speed(self.speed)
            .with_sentiment_interval(Duration::from_millis(self.sentiment_interval_ms))
            .with_route_interval(Duration::from_millis(self.route_interval_ms));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// The data source for startup loading.
    pub fn data_source(&self) -> Result<Box<dyn DataSource>, DataFetchError> {
        match &self.api_url {
            Some(url) => {
                let config = HttpSourceConfig::new(url.as_str())
                    .with_timeout(Duration::from_millis(self.fetch_timeout_ms));
                Ok(Box::new(HttpDataSource::new(config)?))
            }
            None => Ok(Box::new(SeedDataSource::new())),
        }
    }

    pub fn live_feed(&self) -> Option<LiveFeedConfig> {
        self.live_url.as_deref().map(LiveFeedConfig::new)
    }

    /// Ticks between aggregator steps when running without a clock.
    pub fn ticks_per_sentiment(&self) -> u64 {
        (self.sentiment_interval_ms / self.speed.interval_ms()).max(1)
    }

    /// Ticks between route steps when running without a clock.
    pub fn ticks_per_route_update(&self) -> u64 {
        (self.route_interval_ms / self.speed.interval_ms()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.total_ticks, 1000);
        assert_eq!(config.speed, SimulationSpeed::X1);
        assert!(config.api_url.is_none());
        assert!(config.live_feed().is_none());
    }

    #[test]
    fn test_simulation_config() {
        let config = SimConfig::default()
            .with_seed(9)
            .with_speed(SimulationSpeed::X2)
            .simulation_config();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.speed, SimulationSpeed::X2);
        assert_eq!(config.sentiment_interval, Duration::from_millis(2000));
    }

    #[test]
    fn test_headless_cadence() {
        let config = SimConfig::default();
        assert_eq!(config.ticks_per_sentiment(), 2);

        let fast = SimConfig::default().with_speed(SimulationSpeed::X8);
        assert_eq!(fast.ticks_per_sentiment(), 16);
        assert_eq!(fast.ticks_per_route_update(), 16);
    }

    #[test]
    fn test_data_source_selection() {
        let seed = SimConfig::default().data_source().unwrap();
        assert_eq!(seed.name(), "seed");

        let http = SimConfig::default()
            .with_api_url("http://localhost:8000")
            .data_source()
            .unwrap();
        assert_eq!(http.name(), "http://localhost:8000");
    }
}
