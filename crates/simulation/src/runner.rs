//! The simulation state machine.
//!
//! [`Simulation`] owns every piece of mutable state: warehouses, the active
//! event, sentiment, metrics, factors, risk and routes. Each public mutator is
//! one complete transition that ends with a hook notification, so observers
//! only ever see whole frames.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use events::{EventSelection, MarketEventCatalog, SelectionChange};
use types::{
    FactorWeights, LiveSnapshot, MarketEvent, MarketSentiment, NetworkMetrics, RiskMetric, Route,
    RouteSummary, SimSnapshot, SimulationSpeed, Tick, Warehouse, WarehouseId,
};

use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::hooks::{HookRunner, SimulationHook};
use crate::random::{RandomSource, SeededRandom};
use crate::subsystems::{WarehouseProfile, inventory, oscillator, routes, sentiment};

// =============================================================================
// SeedState
// =============================================================================

/// Everything reset restores, captured once at load.
#[derive(Debug, Clone)]
struct SeedState {
    warehouses: Vec<Warehouse>,
    sentiment: Vec<MarketSentiment>,
    metrics: NetworkMetrics,
    factors: FactorWeights,
    risk: Vec<RiskMetric>,
    routes: Vec<Route>,
}

// =============================================================================
// Simulation
// =============================================================================

/// The supply-chain market simulation.
///
/// # Tick
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │              Simulation.step()               │
/// │                                              │
/// │  1. Oscillator: step every item's condition  │
/// │  2. Drift stock and prices for every item    │
/// │  3. Recompute network aggregates             │
/// │  4. Advance tick counter                     │
/// │  5. Hook: on_tick_end                        │
/// └──────────────────────────────────────────────┘
/// ```
pub struct Simulation {
    config: SimulationConfig,
    rng: Box<dyn RandomSource>,
    catalog: MarketEventCatalog,
    profiles: HashMap<WarehouseId, WarehouseProfile>,
    seed: SeedState,

    tick: Tick,
    running: bool,
    speed: SimulationSpeed,
    live_connected: bool,
    /// Items whose stock the live channel currently owns, by warehouse.
    live_items: HashMap<WarehouseId, HashSet<String>>,

    warehouses: Vec<Warehouse>,
    selection: EventSelection,
    sentiment: Vec<MarketSentiment>,
    metrics: NetworkMetrics,
    factors: FactorWeights,
    risk: Vec<RiskMetric>,
    routes: Vec<Route>,

    hooks: HookRunner,
}

impl Simulation {
    /// Build a simulation from loaded data.
    ///
    /// Draws per-warehouse profiles, routes, initial factors and risk from
    /// `rng`, then captures the seed state used by [`Simulation::reset`].
    pub fn new(
        config: SimulationConfig,
        warehouses: Vec<Warehouse>,
        catalog: MarketEventCatalog,
        readings: Vec<MarketSentiment>,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let profiles: HashMap<_, _> = warehouses
            .iter()
            .map(|w| (w.id.clone(), WarehouseProfile::draw(rng.as_mut())))
            .collect();
        let network = routes::build_routes(&warehouses, rng.as_mut());
        let factors = sentiment::draw_factors(None, rng.as_mut());
        let risk = sentiment::initial_risk(None, rng.as_mut());
        let metrics =
            inventory::initial_metrics(&config.initial_metrics, &warehouses, config.capacity);

        let seed = SeedState {
            warehouses: warehouses.clone(),
            sentiment: readings.clone(),
            metrics: metrics.clone(),
            factors: factors.clone(),
            risk: risk.clone(),
            routes: network.clone(),
        };

        tracing::info!(
            warehouses = warehouses.len(),
            routes = network.len(),
            events = catalog.len(),
            "Simulation initialized"
        );

        Self {
            speed: config.speed,
            config,
            rng,
            catalog,
            profiles,
            seed,
            tick: 0,
            running: false,
            live_connected: false,
            live_items: HashMap::new(),
            warehouses,
            selection: EventSelection::new(),
            sentiment: readings,
            metrics,
            factors,
            risk,
            routes: network,
            hooks: HookRunner::new(),
        }
    }

    /// Build from fetched data, seeding the RNG from `config.seed`.
    pub fn from_initial_data(config: SimulationConfig, data: feed::InitialData) -> Self {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        let catalog = MarketEventCatalog::from_events(data.events);
        Self::new(config, data.warehouses, catalog, data.sentiment, rng)
    }

    /// Seed dataset and built-in catalog with a fixed RNG seed.
    pub fn with_seed_data(seed: u64) -> Self {
        Self::new(
            SimulationConfig::default().with_seed(seed),
            feed::seed::seed_warehouses(),
            MarketEventCatalog::builtin(),
            feed::seed::seed_sentiment(),
            Box::new(SeededRandom::new(seed)),
        )
    }

    /// Register an observer hook.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        tracing::debug!(hook = hook.name(), "Hook registered");
        self.hooks.add(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Override one warehouse's profile.
    pub fn set_profile(&mut self, warehouse_id: &str, profile: WarehouseProfile) {
        self.profiles.insert(warehouse_id.to_string(), profile);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> SimulationSpeed {
        self.speed
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MarketEventCatalog {
        &self.catalog
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn active_event(&self) -> Option<&MarketEvent> {
        self.selection.active()
    }

    pub fn sentiment(&self) -> &[MarketSentiment] {
        &self.sentiment
    }

    pub fn metrics(&self) -> &NetworkMetrics {
        &self.metrics
    }

    pub fn factors(&self) -> &FactorWeights {
        &self.factors
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn profile(&self, warehouse_id: &str) -> WarehouseProfile {
        self.profiles
            .get(warehouse_id)
            .copied()
            .unwrap_or_default()
    }

    /// Owned, consistent copy of the whole state.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            tick: self.tick,
            running: self.running,
            speed: self.speed,
            warehouses: self.warehouses.clone(),
            active_event: self.selection.active().cloned(),
            sentiment: self.sentiment.clone(),
            portfolio_sentiment: sentiment::portfolio_sentiment(&self.sentiment),
            metrics: self.metrics.clone(),
            factors: self.factors.clone(),
            risk: self.risk.clone(),
            routes: self.routes.clone(),
            route_summary: RouteSummary::from_routes(&self.routes),
            live_connected: self.live_connected,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Run one tick of the oscillator and tick engine.
    pub fn step(&mut self) -> Tick {
        let event = self.selection.active().cloned();
        let rng = self.rng.as_mut();

        // Phase 1: oscillator
        for warehouse in &mut self.warehouses {
            let profile = self
                .profiles
                .get(&warehouse.id)
                .copied()
                .unwrap_or_default();
            for item in &mut warehouse.inventory {
                item.market_condition =
                    oscillator::step_condition(item.market_condition, &profile, rng);
            }
        }

        // Phase 2: stock and price drift; live-fed stock is left alone
        for warehouse in &mut self.warehouses {
            let profile = self
                .profiles
                .get(&warehouse.id)
                .copied()
                .unwrap_or_default();
            let live = self.live_items.get(&warehouse.id);
            for item in &mut warehouse.inventory {
                if live.is_some_and(|items| items.contains(&item.item)) {
                    inventory::apply_price_tick(item, &profile, event.as_ref(), rng);
                } else {
                    inventory::apply_tick(item, &profile, event.as_ref(), rng);
                }
            }
        }

        // Phase 3: aggregates
        inventory::update_metrics(
            &mut self.metrics,
            &self.warehouses,
            event.as_ref(),
            self.config.capacity,
            rng,
        );

        self.tick += 1;
        tracing::debug!(
            tick = self.tick,
            stock = self.metrics.current_stock,
            utilization = self.metrics.utilization,
            "Tick applied"
        );

        if !self.hooks.is_empty() {
            self.hooks.on_tick_end(&self.snapshot());
        }
        self.tick
    }

    /// Run `ticks` steps back to back.
    pub fn run(&mut self, ticks: u64) -> Tick {
        for _ in 0..ticks {
            self.step();
        }
        self.tick
    }

    /// One sentiment aggregator step: items, factor weights and risk.
    pub fn step_sentiment(&mut self) {
        let event = self.selection.active().cloned();
        let rng = self.rng.as_mut();

        for reading in &mut self.sentiment {
            sentiment::step_item(reading, event.as_ref(), rng);
        }
        self.factors = sentiment::draw_factors(event.as_ref(), rng);
        sentiment::step_risk(&mut self.risk, event.as_ref(), rng);

        if !self.hooks.is_empty() {
            self.hooks.on_sentiment(&self.snapshot());
        }
    }

    /// One route updater step.
    pub fn step_routes(&mut self) {
        routes::step_routes(&mut self.routes, self.rng.as_mut());

        if !self.hooks.is_empty() {
            self.hooks.on_routes(&self.snapshot());
        }
    }

    /// Select an event by id, or deselect it if it is already active.
    ///
    /// Takes effect on the next tick.
    pub fn toggle_event(&mut self, event_id: &str) -> Result<SelectionChange> {
        let event = self
            .catalog
            .get(event_id)
            .cloned()
            .ok_or_else(|| SimError::UnknownEvent(event_id.to_string()))?;
        let change = self.selection.toggle(event);
        self.risk = sentiment::initial_risk(self.selection.active(), self.rng.as_mut());
        tracing::info!(event_id, ?change, "Market event selection changed");

        if !self.hooks.is_empty() {
            self.hooks.on_event_changed(&self.snapshot());
        }
        Ok(change)
    }

    /// Clear the active event. Returns the event that was active.
    pub fn clear_event(&mut self) -> Option<MarketEvent> {
        let previous = self.selection.clear();
        if let Some(event) = &previous {
            self.risk = sentiment::initial_risk(None, self.rng.as_mut());
            tracing::info!(event_id = %event.event_id, "Market event cleared");
            if !self.hooks.is_empty() {
                self.hooks.on_event_changed(&self.snapshot());
            }
        }
        previous
    }

    /// Set the running flag. Returns `true` if it changed.
    pub fn set_running(&mut self, running: bool) -> bool {
        if self.running == running {
            return false;
        }
        self.running = running;
        tracing::info!(running, tick = self.tick, "Simulation running state changed");
        if !self.hooks.is_empty() {
            self.hooks.on_control(&self.snapshot());
        }
        true
    }

    /// Flip the running flag. Returns the new value.
    pub fn toggle_running(&mut self) -> bool {
        self.set_running(!self.running);
        self.running
    }

    /// Change the tick speed. Returns `true` if it changed.
    pub fn set_speed(&mut self, speed: SimulationSpeed) -> bool {
        if self.speed == speed {
            return false;
        }
        self.speed = speed;
        tracing::info!(%speed, "Simulation speed changed");
        if !self.hooks.is_empty() {
            self.hooks.on_control(&self.snapshot());
        }
        true
    }

    /// Mark the live channel up or down. Going down hands every live-fed
    /// item back to the local tick.
    pub fn set_live_connected(&mut self, connected: bool) {
        if self.live_connected == connected {
            return;
        }
        self.live_connected = connected;
        if !connected {
            self.live_items.clear();
        }
        if !self.hooks.is_empty() {
            self.hooks.on_control(&self.snapshot());
        }
    }

    pub fn is_live_connected(&self) -> bool {
        self.live_connected
    }

    /// Overwrite stock values from a live frame and recompute aggregates.
    ///
    /// While the channel is connected the provided items stay live-fed: later
    /// ticks drift their prices but not their stock. Items the frame does not
    /// mention keep their simulated values. Returns how many items were
    /// updated.
    pub fn apply_live_snapshot(&mut self, live: &LiveSnapshot) -> Result<usize> {
        let warehouse = self
            .warehouses
            .iter_mut()
            .find(|w| w.id == live.warehouse_id)
            .ok_or_else(|| SimError::UnknownWarehouse(live.warehouse_id.clone()))?;

        let mut updated = 0;
        for (item_name, stock) in &live.inventory {
            if let Some(item) = warehouse.item_mut(item_name) {
                item.stock = *stock;
                updated += 1;
                if self.live_connected {
                    self.live_items
                        .entry(live.warehouse_id.clone())
                        .or_default()
                        .insert(item_name.clone());
                }
            }
        }

        inventory::recompute_stock_aggregates(
            &mut self.metrics,
            &self.warehouses,
            self.selection.active(),
            self.config.capacity,
        );
        tracing::debug!(warehouse_id = %live.warehouse_id, updated, "Live snapshot applied");

        if !self.hooks.is_empty() {
            self.hooks.on_tick_end(&self.snapshot());
        }
        Ok(updated)
    }

    /// Restore the seed state: warehouses, sentiment, metrics, factors, risk
    /// and routes. Clears the active event, stops the run and zeroes the tick.
    ///
    /// Warehouse profiles are kept.
    pub fn reset(&mut self) {
        let seed = self.seed.clone();
        self.warehouses = seed.warehouses;
        self.sentiment = seed.sentiment;
        self.metrics = seed.metrics;
        self.factors = seed.factors;
        self.risk = seed.risk;
        self.routes = seed.routes;
        self.selection.clear();
        self.live_items.clear();
        self.running = false;
        self.tick = 0;

        tracing::info!("Simulation reset to seed state");
        if !self.hooks.is_empty() {
            self.hooks.on_reset(&self.snapshot());
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("running", &self.running)
            .field("speed", &self.speed)
            .field("warehouses", &self.warehouses.len())
            .field("active_event", &self.selection.active().map(|e| &e.event_id))
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRandom;
    use types::{EventType, GeoPoint, InventoryItem, MarketCondition};

    fn single_item_sim(rng: Box<dyn RandomSource>) -> Simulation {
        let warehouses = vec![
            Warehouse::new("1", "Test", "X", GeoPoint::new(0.0, 0.0)).with_item(
                InventoryItem::new("Wheat", 100, 50.0, 55.0, 1, MarketCondition::Bullish),
            ),
        ];
        let mut sim = Simulation::new(
            SimulationConfig::default(),
            warehouses,
            MarketEventCatalog::builtin(),
            Vec::new(),
            rng,
        );
        sim.set_profile("1", WarehouseProfile::default());
        sim
    }

    #[test]
    fn test_step_advances_tick() {
        let mut sim = Simulation::with_seed_data(1);
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.step(), 1);
        assert_eq!(sim.run(9), 10);
    }

    #[test]
    fn test_neutral_resolved_after_first_tick() {
        let mut sim = Simulation::with_seed_data(2);
        sim.step();
        for w in sim.warehouses() {
            for item in &w.inventory {
                assert!(!item.market_condition.is_neutral());
            }
        }
    }

    #[test]
    fn test_single_item_scenario() {
        let mut sim = single_item_sim(Box::new(SeededRandom::new(99)));
        sim.step();
        let item = &sim.warehouses()[0].inventory[0];
        assert!(item.has_min_markup());
    }

    #[test]
    fn test_scripted_tick_is_exact() {
        // every draw 0.5: no flip (p = 0.1), stock +1, prices unchanged
        let mut sim = single_item_sim(Box::new(ScriptedRandom::constant(0.5)));
        sim.step();
        let item = &sim.warehouses()[0].inventory[0];
        assert_eq!(item.market_condition, MarketCondition::Bullish);
        assert_eq!(item.stock, 101);
        assert_eq!(item.buy_price, 50.0);
        assert_eq!(sim.metrics().current_stock, 101);
        assert_eq!(sim.metrics().previous_stock, 100);
    }

    #[test]
    fn test_toggle_unknown_event() {
        let mut sim = Simulation::with_seed_data(1);
        let err = sim.toggle_event("alien_invasion").unwrap_err();
        assert_eq!(err, SimError::UnknownEvent("alien_invasion".to_string()));
    }

    #[test]
    fn test_toggle_twice_clears() {
        let mut sim = Simulation::with_seed_data(1);
        assert_eq!(sim.toggle_event("drought").unwrap(), SelectionChange::Selected);
        assert_eq!(sim.toggle_event("drought").unwrap(), SelectionChange::Deselected);
        assert!(sim.active_event().is_none());
    }

    #[test]
    fn test_event_applies_on_next_tick() {
        let mut sim = Simulation::with_seed_data(1);
        sim.step();
        let before = sim.metrics().market_impact;
        sim.toggle_event("drought").unwrap();
        assert_eq!(sim.metrics().market_impact, before);
        sim.step();
        let drought = sim.active_event().unwrap();
        assert_eq!(drought.event_type, EventType::Negative);
        assert!((sim.metrics().market_impact + drought.price_impact).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut sim = Simulation::with_seed_data(7);
        let seed_snapshot = sim.snapshot();
        sim.set_running(true);
        sim.toggle_event("port_strike").unwrap();
        sim.run(25);
        sim.step_sentiment();
        sim.step_routes();

        sim.reset();

        let restored = sim.snapshot();
        assert_eq!(restored.warehouses, seed_snapshot.warehouses);
        assert_eq!(restored.sentiment, seed_snapshot.sentiment);
        assert_eq!(restored.routes, seed_snapshot.routes);
        assert_eq!(restored.metrics, seed_snapshot.metrics);
        assert_eq!(restored.factors, seed_snapshot.factors);
        assert_eq!(restored.risk, seed_snapshot.risk);
        assert!(restored.active_event.is_none());
        assert!(!restored.running);
        assert_eq!(restored.tick, 0);
    }

    #[test]
    fn test_profiles_survive_reset() {
        let mut sim = Simulation::with_seed_data(4);
        let before = sim.profile("3");
        assert!((0.85..1.15).contains(&before.volatility_factor));
        sim.run(10);
        sim.reset();
        assert_eq!(sim.profile("3"), before);
        assert_eq!(sim.profile("missing"), WarehouseProfile::default());
    }

    #[test]
    fn test_live_snapshot_overwrites_stock() {
        let mut sim = Simulation::with_seed_data(1);
        let live = LiveSnapshot {
            warehouse_id: "2".to_string(),
            inventory: [("Wheat".to_string(), 10), ("Unknown".to_string(), 5)]
                .into_iter()
                .collect(),
            timestamp: Default::default(),
        };
        assert_eq!(sim.apply_live_snapshot(&live).unwrap(), 1);
        let delhi = &sim.warehouses()[1];
        assert_eq!(delhi.inventory[0].stock, 10);
        let total: u64 = sim.warehouses().iter().map(Warehouse::total_stock).sum();
        assert_eq!(sim.metrics().current_stock, total);
    }

    fn wheat_frame(stock: u64) -> LiveSnapshot {
        LiveSnapshot {
            warehouse_id: "2".to_string(),
            inventory: [("Wheat".to_string(), stock)].into_iter().collect(),
            timestamp: Default::default(),
        }
    }

    #[test]
    fn test_live_stock_holds_across_local_ticks() {
        let mut sim = Simulation::with_seed_data(1);
        sim.set_live_connected(true);
        sim.apply_live_snapshot(&wheat_frame(10)).unwrap();
        let prices_before = sim.warehouses()[1].inventory[0].clone();

        for _ in 0..5 {
            sim.step();
            assert_eq!(sim.warehouses()[1].inventory[0].stock, 10);
        }

        // Prices keep drifting
        let wheat = &sim.warehouses()[1].inventory[0];
        assert!(wheat.has_min_markup());
        assert!(
            wheat.buy_price != prices_before.buy_price
                || wheat.sell_price != prices_before.sell_price
        );

        sim.apply_live_snapshot(&wheat_frame(42)).unwrap();
        sim.step();
        assert_eq!(sim.warehouses()[1].inventory[0].stock, 42);
    }

    #[test]
    fn test_disconnect_returns_stock_to_local_tick() {
        let mut sim = Simulation::with_seed_data(1);
        sim.set_live_connected(true);
        sim.apply_live_snapshot(&wheat_frame(10)).unwrap();
        sim.set_live_connected(false);

        let moved = (0..20).any(|_| {
            sim.step();
            sim.warehouses()[1].inventory[0].stock != 10
        });
        assert!(moved);
    }

    #[test]
    fn test_frame_while_disconnected_is_one_shot() {
        let mut sim = Simulation::with_seed_data(1);
        sim.apply_live_snapshot(&wheat_frame(10)).unwrap();
        let moved = (0..20).any(|_| {
            sim.step();
            sim.warehouses()[1].inventory[0].stock != 10
        });
        assert!(moved);
    }

    #[test]
    fn test_event_change_redraws_risk() {
        let mut sim = Simulation::with_seed_data(1);
        let seed_risk = sim.snapshot().risk;

        sim.toggle_event("drought").unwrap();
        let under_event = sim.snapshot().risk;
        assert_ne!(under_event, seed_risk);
        assert_eq!(under_event.len(), types::metrics::RISK_METRIC_NAMES.len());
        assert!(under_event.iter().all(|m| (0.0..=100.0).contains(&m.value)));

        sim.clear_event();
        assert_ne!(sim.snapshot().risk, under_event);

        // Clearing with nothing active leaves the radar alone
        let idle = sim.snapshot().risk;
        assert!(sim.clear_event().is_none());
        assert_eq!(sim.snapshot().risk, idle);
    }

    #[test]
    fn test_event_risk_uses_multiplier() {
        // Every draw 0.5: U(0,100) = 50, drought is Negative so 50 × (1 - impact)
        let mut sim = single_item_sim(Box::new(ScriptedRandom::constant(0.5)));
        sim.toggle_event("drought").unwrap();
        let impact = sim.active_event().unwrap().price_impact;
        for metric in &sim.snapshot().risk {
            assert!((metric.value - 50.0 * (1.0 - impact)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_live_snapshot_unknown_warehouse() {
        let mut sim = Simulation::with_seed_data(1);
        let live = LiveSnapshot {
            warehouse_id: "99".to_string(),
            inventory: Default::default(),
            timestamp: Default::default(),
        };
        assert!(matches!(
            sim.apply_live_snapshot(&live),
            Err(SimError::UnknownWarehouse(_))
        ));
    }

    #[test]
    fn test_running_and_speed_transitions() {
        let mut sim = Simulation::with_seed_data(1);
        assert!(sim.set_running(true));
        assert!(!sim.set_running(true));
        assert!(!sim.toggle_running());
        assert!(sim.set_speed(SimulationSpeed::X4));
        assert!(!sim.set_speed(SimulationSpeed::X4));
        assert_eq!(sim.snapshot().speed, SimulationSpeed::X4);
    }
}
