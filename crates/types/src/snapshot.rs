//! Observable simulation frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    FactorWeights, MarketEvent, MarketSentiment, NetworkMetrics, RiskMetric, Route, RouteSummary,
    SimulationSpeed, Tick, Warehouse, WarehouseId,
};

/// A consistent, owned copy of the simulation state.
///
/// Produced under the context lock after each transition, so warehouses and
/// aggregates in one snapshot always belong to the same tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSnapshot {
    pub tick: Tick,
    pub running: bool,
    pub speed: SimulationSpeed,
    pub warehouses: Vec<Warehouse>,
    pub active_event: Option<MarketEvent>,
    pub sentiment: Vec<MarketSentiment>,
    /// Mean of item sentiments (0 when none are tracked).
    pub portfolio_sentiment: f64,
    pub metrics: NetworkMetrics,
    pub factors: FactorWeights,
    pub risk: Vec<RiskMetric>,
    pub routes: Vec<Route>,
    pub route_summary: RouteSummary,
    /// Whether a live-update channel is currently feeding the simulation.
    pub live_connected: bool,
}

impl SimSnapshot {
    pub fn total_stock(&self) -> u64 {
        self.warehouses.iter().map(Warehouse::total_stock).sum()
    }

    pub fn warehouse(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }
}

/// A state frame pushed by the live-update channel.
///
/// Provided stock values overwrite local ones; items not listed keep their
/// simulated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub warehouse_id: WarehouseId,
    /// Item name -> authoritative stock.
    pub inventory: HashMap<String, u64>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}
