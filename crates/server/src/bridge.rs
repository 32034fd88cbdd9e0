//! Frame types for simulation → client streaming.
//!
//! # Architecture
//!
//! ```text
//! Simulation (under lock)               Server (async)
//!       │                                   │
//!       │──── TickData ────────────────────▶│ (broadcast to WS clients)
//!       │                                   │
//!       │◀─── SimCommand ───────────────────│ (start/pause/speed/event)
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Frame types are plain data, no behavior
//! - **Modular**: Bridge is independent of simulation/server internals
//! - **SoC**: Types here, senders/receivers in respective modules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{
    MarketCondition, NetworkMetrics, RouteSummary, SimSnapshot, SimulationSpeed, Tick, Warehouse,
};

pub use simulation::SimCommand;

/// Which transition produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Tick,
    Sentiment,
    Routes,
    Event,
    Control,
    Reset,
}

/// Per-warehouse summary for the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseData {
    pub id: String,
    pub name: String,
    /// Sum of item stock.
    pub total_stock: u64,
    /// Sum of `stock × sell_price`.
    pub total_value: f64,
    /// Items currently bullish.
    pub bullish_items: usize,
    /// Items currently bearish.
    pub bearish_items: usize,
}

impl WarehouseData {
    pub fn from_warehouse(warehouse: &Warehouse) -> Self {
        let count = |condition: MarketCondition| {
            warehouse
                .inventory
                .iter()
                .filter(|i| i.market_condition == condition)
                .count()
        };
        Self {
            id: warehouse.id.clone(),
            name: warehouse.name.clone(),
            total_stock: warehouse.total_stock(),
            total_value: warehouse.total_value(),
            bullish_items: count(MarketCondition::Bullish),
            bearish_items: count(MarketCondition::Bearish),
        }
    }
}

/// One frame for WebSocket broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickData {
    pub kind: FrameKind,
    pub tick: Tick,
    /// Wall-clock time the frame was built.
    pub timestamp: DateTime<Utc>,
    pub running: bool,
    pub speed: SimulationSpeed,
    pub warehouses: Vec<WarehouseData>,
    pub metrics: NetworkMetrics,
    /// Id of the active market event, if any.
    pub active_event: Option<String>,
    pub portfolio_sentiment: f64,
    pub route_summary: RouteSummary,
    pub live_connected: bool,
}

impl TickData {
    pub fn from_snapshot(kind: FrameKind, snapshot: &SimSnapshot) -> Self {
        Self {
            kind,
            tick: snapshot.tick,
            timestamp: Utc::now(),
            running: snapshot.running,
            speed: snapshot.speed,
            warehouses: snapshot
                .warehouses
                .iter()
                .map(WarehouseData::from_warehouse)
                .collect(),
            metrics: snapshot.metrics.clone(),
            active_event: snapshot.active_event.as_ref().map(|e| e.event_id.clone()),
            portfolio_sentiment: snapshot.portfolio_sentiment,
            route_summary: snapshot.route_summary,
            live_connected: snapshot.live_connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::Simulation;

    #[test]
    fn test_tick_data_from_snapshot() {
        let mut sim = Simulation::with_seed_data(1);
        sim.toggle_event("drought").unwrap();
        sim.step();
        let snapshot = sim.snapshot();

        let data = TickData::from_snapshot(FrameKind::Tick, &snapshot);
        assert_eq!(data.tick, 1);
        assert_eq!(data.warehouses.len(), snapshot.warehouses.len());
        assert_eq!(data.active_event.as_deref(), Some("drought"));
        let w = &data.warehouses[0];
        assert_eq!(w.bullish_items + w.bearish_items, snapshot.warehouses[0].inventory.len());
    }

    #[test]
    fn test_tick_data_serialization() {
        let snapshot = Simulation::with_seed_data(1).snapshot();
        let data = TickData::from_snapshot(FrameKind::Reset, &snapshot);

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"kind\":\"reset\""));
        assert!(json.contains("\"tick\":0"));
        assert!(json.contains("\"liveConnected\":false"));
    }

    #[test]
    fn test_sim_command_variants() {
        let cmds = [
            SimCommand::Start,
            SimCommand::Pause,
            SimCommand::Toggle,
            SimCommand::Step,
            SimCommand::Reset,
            SimCommand::SetSpeed(SimulationSpeed::X8),
            SimCommand::ToggleEvent("drought".into()),
            SimCommand::ClearEvent,
            SimCommand::Quit,
        ];

        for cmd in cmds {
            let json = serde_json::to_string(&cmd).unwrap();
            let back: SimCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cmd);
        }
    }
}
