//! WebSocket handler for the frame stream.
//!
//! # Endpoints
//!
//! - `GET /ws` - WebSocket upgrade for the frame stream
//!
//! # Protocol
//!
//! After connection the client receives a `TickData` frame for the current
//! state, then one per transition. The client can send `SimCommand` JSON to
//! control the simulation; commands that fail validation are logged and
//! dropped.
//!
//! # Design Principles
//!
//! - **Declarative**: Message types define protocol
//! - **Modular**: WebSocket logic isolated from HTTP routes
//! - **SoC**: Handler manages connection, state provides channels

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::bridge::{FrameKind, SimCommand, TickData};
use crate::routes::api::validate_command;
use crate::state::ServerState;

/// WebSocket upgrade handler: `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: ServerState) {
    state.metrics.ws_connect();
    debug!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before building the first frame so no transition is missed.
    let mut tick_rx = state.subscribe_ticks();
    let initial = TickData::from_snapshot(FrameKind::Control, &state.ctx.snapshot());

    // Spawn task to forward frames to client
    let mut send_task = tokio::spawn(async move {
        if let Ok(json) = serde_json::to_string(&initial)
            && sender.send(Message::Text(json.into())).await.is_err()
        {
            return;
        }

        loop {
            match tick_rx.recv().await {
                Ok(frame) => match serde_json::to_string(&frame) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    Err(e) => {
                        warn!("Failed to serialize frame: {}", e);
                    }
                },
                Err(RecvError::Lagged(n)) => {
                    debug!("WebSocket client lagged by {} frames", n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Handle incoming messages (commands from client)
    let cmd_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<SimCommand>(text.as_str()) {
                    Ok(cmd) => {
                        if let Err(e) = validate_command(&cmd_state, &cmd) {
                            warn!(error = %e, "Rejected command from WebSocket client");
                            continue;
                        }
                        if cmd_state.cmd_tx.send(cmd).await.is_err() {
                            break; // Scheduler gone
                        }
                    }
                    Err(_) => debug!("Invalid command from client: {}", text.as_str()),
                },
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {} // Ignore ping/pong/binary
            }
        }
    });

    // Wait for either task to complete, then stop the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.metrics.ws_disconnect();
    debug!("WebSocket client disconnected");
}
