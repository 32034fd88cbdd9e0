//! Liveness and readiness endpoints for the dashboard server.
//!
//! `GET /health` answers as long as the process serves requests.
//! `GET /health/ready` additionally requires a live scheduler task, and
//! describes what drives the warehouse numbers right now.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use types::SimulationSpeed;

use crate::state::ServerState;

/// Liveness payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub tick: u64,
    pub uptime_secs: u64,
    pub ws_connections: u64,
    pub frames_sent: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyResponse {
    pub ready: bool,
    /// Human-readable driver of the current state.
    pub reason: &'static str,
    pub sim_running: bool,
    pub live_connected: bool,
    pub speed: SimulationSpeed,
    pub warehouses: usize,
    pub active_event: Option<String>,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let metrics = &state.metrics;
    Json(HealthResponse {
        status: "healthy",
        tick: metrics.tick(),
        uptime_secs: state.uptime_secs(),
        ws_connections: metrics.ws_count(),
        frames_sent: metrics.frames(),
    })
}

/// Not ready once the scheduler has dropped its command receiver.
pub async fn ready(State(state): State<ServerState>) -> Json<ReadyResponse> {
    let running = state.metrics.is_running();
    let live = state.metrics.is_live();
    let (speed, warehouses, active_event) = state.ctx.read(|sim| {
        (
            sim.speed(),
            sim.warehouses().len(),
            sim.active_event().map(|event| event.event_id.clone()),
        )
    });

    let (ready, reason) = match (state.cmd_tx.is_closed(), running, live) {
        (true, _, _) => (false, "scheduler stopped"),
        (false, true, true) => (true, "simulation running with live data"),
        (false, true, false) => (true, "simulation running"),
        (false, false, _) => (true, "simulation paused"),
    };

    Json(ReadyResponse {
        ready,
        reason,
        sim_running: running,
        live_connected: live,
        speed,
        warehouses,
        active_event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::{Simulation, SimulationContext};
    use tokio::sync::{broadcast, mpsc};

    fn test_state() -> (ServerState, mpsc::Receiver<simulation::SimCommand>) {
        let (tick_tx, _) = broadcast::channel(4);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let ctx = SimulationContext::new(Simulation::with_seed_data(3));
        (ServerState::new(tick_tx, cmd_tx, ctx), cmd_rx)
    }

    #[tokio::test]
    async fn test_ready_reports_paused_simulation() {
        let (state, _cmd_rx) = test_state();
        let Json(body) = ready(State(state)).await;
        assert!(body.ready);
        assert_eq!(body.reason, "simulation paused");
        assert_eq!(body.warehouses, 5);
        assert_eq!(body.speed, SimulationSpeed::X1);
        assert!(body.active_event.is_none());
    }

    #[tokio::test]
    async fn test_not_ready_without_scheduler() {
        let (state, cmd_rx) = test_state();
        drop(cmd_rx);
        let Json(body) = ready(State(state)).await;
        assert!(!body.ready);
        assert_eq!(body.reason, "scheduler stopped");
    }

    #[test]
    fn test_health_payload_is_camel_case() {
        let response = HealthResponse {
            status: "healthy",
            tick: 100,
            uptime_secs: 60,
            ws_connections: 5,
            frames_sent: 300,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["uptimeSecs"], 60);
        assert_eq!(json["framesSent"], 300);
    }
}
