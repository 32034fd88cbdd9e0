//! SimulationHook implementation for broadcasting frames.
//!
//! # Architecture
//!
//! ```text
//! Simulation (under lock)    BroadcastHook           Server (async)
//!       │                         │                       │
//!       │── on_tick_end() ───────▶│                       │
//!       │                         │── tick_tx.send() ────▶│
//!       │                         │                       │── ws broadcast
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Hook declares what transitions it forwards
//! - **Modular**: Hook is self-contained, no dependencies on route handlers
//! - **SoC**: Hook observes simulation, server distributes frames

use std::sync::Arc;

use simulation::SimulationHook;
use tokio::sync::broadcast;
use types::SimSnapshot;

use crate::bridge::{FrameKind, TickData};
use crate::state::ServerMetrics;

/// Hook that forwards every transition to WebSocket clients.
///
/// Sending on a broadcast channel never blocks, so it is safe to call under
/// the simulation lock.
pub struct BroadcastHook {
    tick_tx: broadcast::Sender<TickData>,
    metrics: Arc<ServerMetrics>,
}

impl BroadcastHook {
    pub fn new(tick_tx: broadcast::Sender<TickData>, metrics: Arc<ServerMetrics>) -> Self {
        Self { tick_tx, metrics }
    }

    /// Get sender for server state.
    pub fn sender(&self) -> broadcast::Sender<TickData> {
        self.tick_tx.clone()
    }

    fn publish(&self, kind: FrameKind, snapshot: &SimSnapshot) {
        self.metrics.update_from_snapshot(snapshot);
        // Fire-and-forget: with no receivers the frame is dropped.
        if self
            .tick_tx
            .send(TickData::from_snapshot(kind, snapshot))
            .is_ok()
        {
            self.metrics.frame_sent();
        }
    }
}

impl SimulationHook for BroadcastHook {
    fn name(&self) -> &str {
        "BroadcastHook"
    }

    fn on_tick_end(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Tick, snapshot);
    }

    fn on_sentiment(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Sentiment, snapshot);
    }

    fn on_routes(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Routes, snapshot);
    }

    fn on_event_changed(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Event, snapshot);
    }

    fn on_control(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Control, snapshot);
    }

    fn on_reset(&self, snapshot: &SimSnapshot) {
        self.publish(FrameKind::Reset, snapshot);
    }
}
