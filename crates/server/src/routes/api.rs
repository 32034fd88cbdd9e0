//! Simulation status and control endpoints.
//!
//! - `GET /api/status` - Current simulation state
//! - `POST /api/command` - Send command to the scheduler
//!
//! # Design Principles
//!
//! - **Declarative**: Each endpoint handler is a pure function
//! - **Modular**: Control separate from dashboard data
//! - **SoC**: Handlers extract state, return responses

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::{SimulationSpeed, Tick};

use crate::bridge::SimCommand;
use crate::error::{AppError, AppResult};
use crate::state::ServerState;

/// Simulation status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub tick: Tick,
    pub running: bool,
    pub speed: SimulationSpeed,
    /// Tick interval at the current speed.
    pub interval_ms: u64,
    pub active_event: Option<String>,
    pub live_connected: bool,
}

/// Get simulation status: `GET /api/status`
pub async fn get_status(State(state): State<ServerState>) -> Json<StatusResponse> {
    let response = state.ctx.read(|sim| StatusResponse {
        tick: sim.tick(),
        running: sim.is_running(),
        speed: sim.speed(),
        interval_ms: sim.speed().interval_ms(),
        active_event: sim.active_event().map(|e| e.event_id.clone()),
        live_connected: sim.is_live_connected(),
    });
    Json(response)
}

/// Command request body.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Command to send.
    pub command: SimCommand,
}

/// Command response.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Whether command was queued.
    pub ok: bool,
}

/// Check a client command before it reaches the scheduler.
///
/// Rejects scheduler-internal commands and event ids missing from the
/// catalog. Shared by the REST and WebSocket ingress.
pub fn validate_command(state: &ServerState, command: &SimCommand) -> AppResult<()> {
    if !command.is_client_command() {
        return Err(AppError::BadRequest(format!(
            "command not accepted from clients: {command:?}"
        )));
    }
    if let SimCommand::ToggleEvent(event_id) = command {
        let known = state.ctx.read(|sim| sim.catalog().get(event_id).is_some());
        if !known {
            return Err(AppError::BadRequest(format!(
                "unknown market event: {event_id}"
            )));
        }
    }
    Ok(())
}

/// Send command to the scheduler: `POST /api/command`
pub async fn post_command(
    State(state): State<ServerState>,
    Json(req): Json<CommandRequest>,
) -> AppResult<Json<CommandResponse>> {
    validate_command(&state, &req.command)?;

    debug!(command = ?req.command, "Command accepted");
    state
        .send_command(req.command)
        .await
        .map_err(|_| AppError::Unavailable("Scheduler not running".into()))?;

    Ok(Json(CommandResponse { ok: true }))
}
