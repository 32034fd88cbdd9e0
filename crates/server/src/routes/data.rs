//! Dashboard data endpoints.
//!
//! # Endpoints
//!
//! - `GET /api/warehouses` - All warehouses with inventory
//! - `GET /api/warehouses/{id}` - One warehouse
//! - `GET /api/events` - Market event catalog and the active event
//! - `GET /api/sentiment` - Item sentiment, factor weights, risk radar
//! - `GET /api/metrics` - Network metrics and run statistics
//! - `GET /api/routes` - Delivery routes and their summary
//!
//! Every handler reads through the simulation context, so a response always
//! reflects one whole frame.
//!
//! # Design Principles
//!
//! - **Declarative**: Pure handler functions returning typed responses
//! - **Modular**: Each dashboard panel has its own endpoint
//! - **SoC**: Handlers extract from state, return JSON

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use simulation::MetricsSnapshot;
use types::{
    FactorWeights, MarketEvent, MarketSentiment, NetworkMetrics, RiskMetric, Route, RouteSummary,
    Tick, Warehouse,
};

use crate::error::{AppError, AppResult};
use crate::state::ServerState;

// =============================================================================
// Warehouses
// =============================================================================

/// Response for `/api/warehouses`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehousesResponse {
    pub tick: Tick,
    pub warehouses: Vec<Warehouse>,
    /// Raw stock across all warehouses, before any event skew.
    pub total_stock: u64,
}

/// `GET /api/warehouses`
pub async fn get_warehouses(State(state): State<ServerState>) -> Json<WarehousesResponse> {
    let response = state.ctx.read(|sim| WarehousesResponse {
        tick: sim.tick(),
        warehouses: sim.warehouses().to_vec(),
        total_stock: sim.warehouses().iter().map(Warehouse::total_stock).sum(),
    });
    Json(response)
}

/// `GET /api/warehouses/{id}`
pub async fn get_warehouse(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Warehouse>> {
    state
        .ctx
        .read(|sim| sim.warehouses().iter().find(|w| w.id == id).cloned())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("warehouse {id}")))
}

// =============================================================================
// Events
// =============================================================================

/// Response for `/api/events`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub events: Vec<MarketEvent>,
    pub active_event: Option<String>,
}

/// `GET /api/events`
pub async fn get_events(State(state): State<ServerState>) -> Json<EventsResponse> {
    let response = state.ctx.read(|sim| EventsResponse {
        events: sim.catalog().list_events().to_vec(),
        active_event: sim.active_event().map(|e| e.event_id.clone()),
    });
    Json(response)
}

// =============================================================================
// Sentiment
// =============================================================================

/// Response for `/api/sentiment`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    pub items: Vec<MarketSentiment>,
    pub portfolio_sentiment: f64,
    pub factors: FactorWeights,
    pub risk: Vec<RiskMetric>,
}

/// `GET /api/sentiment`
pub async fn get_sentiment(State(state): State<ServerState>) -> Json<SentimentResponse> {
    let snapshot = state.ctx.snapshot();
    Json(SentimentResponse {
        items: snapshot.sentiment,
        portfolio_sentiment: snapshot.portfolio_sentiment,
        factors: snapshot.factors,
        risk: snapshot.risk,
    })
}

// =============================================================================
// Metrics
// =============================================================================

/// Run statistics collected since startup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total_ticks: u64,
    pub ticks_under_event: u64,
    pub peak_stock: u64,
    pub min_stock: u64,
    pub sentiment_updates: u64,
    pub resets: u64,
    pub avg_utilization: f64,
}

impl From<MetricsSnapshot> for RunStats {
    fn from(m: MetricsSnapshot) -> Self {
        Self {
            total_ticks: m.total_ticks,
            ticks_under_event: m.ticks_under_event,
            peak_stock: m.peak_stock,
            min_stock: m.min_stock,
            sentiment_updates: m.sentiment_updates,
            resets: m.resets,
            avg_utilization: m.avg_utilization,
        }
    }
}

/// Response for `/api/metrics`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub tick: Tick,
    pub network: NetworkMetrics,
    /// Percent change of adjusted stock over the last tick.
    pub stock_change_pct: f64,
    pub run: RunStats,
}

/// `GET /api/metrics`
pub async fn get_metrics(State(state): State<ServerState>) -> Json<MetricsResponse> {
    let (tick, network) = state.ctx.read(|sim| (sim.tick(), sim.metrics().clone()));
    Json(MetricsResponse {
        tick,
        stock_change_pct: network.stock_change_pct(),
        network,
        run: state.run_stats.snapshot().into(),
    })
}

// =============================================================================
// Routes
// =============================================================================

/// Response for `/api/routes`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
    pub routes: Vec<Route>,
    pub summary: RouteSummary,
}

/// `GET /api/routes`
pub async fn get_routes(State(state): State<ServerState>) -> Json<RoutesResponse> {
    let response = state.ctx.read(|sim| RoutesResponse {
        routes: sim.routes().to_vec(),
        summary: RouteSummary::from_routes(sim.routes()),
    });
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_from_snapshot() {
        let stats = RunStats::from(MetricsSnapshot {
            total_ticks: 10,
            ticks_under_event: 4,
            peak_stock: 900,
            min_stock: 850,
            sentiment_updates: 2,
            resets: 0,
            avg_utilization: 8.7,
        });

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"ticksUnderEvent\":4"));
        assert!(json.contains("\"peakStock\":900"));
    }
}
