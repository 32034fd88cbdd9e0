//! Shared server state.
//!
//! # Design Principles
//!
//! - **Declarative**: State is data, handlers extract what they need
//! - **Modular**: State independent of route logic
//! - **SoC**: State holds handles, the scheduler owns time

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use simulation::{MetricsHook, SimulationContext};
use tokio::sync::{broadcast, mpsc};
use types::SimSnapshot;

use crate::bridge::{SimCommand, TickData};

// =============================================================================
// ServerState
// =============================================================================

/// Shared state for all route handlers.
///
/// Cloned into each handler via Axum's State extractor.
#[derive(Clone)]
pub struct ServerState {
    /// Broadcast channel for frames (simulation → clients).
    pub tick_tx: broadcast::Sender<TickData>,

    /// Command sender (server → scheduler).
    pub cmd_tx: mpsc::Sender<SimCommand>,

    /// Read access to the simulation.
    pub ctx: SimulationContext,

    /// Run statistics collected by a hook on the simulation.
    pub run_stats: Arc<MetricsHook>,

    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics.
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    pub fn new(
        tick_tx: broadcast::Sender<TickData>,
        cmd_tx: mpsc::Sender<SimCommand>,
        ctx: SimulationContext,
    ) -> Self {
        let metrics = Arc::new(ServerMetrics::new());
        metrics.update_from_snapshot(&ctx.snapshot());
        Self {
            tick_tx,
            cmd_tx,
            ctx,
            run_stats: Arc::new(MetricsHook::new()),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Use an already registered [`MetricsHook`] for run statistics.
    pub fn with_run_stats(mut self, run_stats: Arc<MetricsHook>) -> Self {
        self.run_stats = run_stats;
        self
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Subscribe to frames.
    pub fn subscribe_ticks(&self) -> broadcast::Receiver<TickData> {
        self.tick_tx.subscribe()
    }

    /// Send command to the scheduler.
    pub async fn send_command(
        &self,
        cmd: SimCommand,
    ) -> Result<(), mpsc::error::SendError<SimCommand>> {
        self.cmd_tx.send(cmd).await
    }
}

// =============================================================================
// ServerMetrics
// =============================================================================

/// Server-side metrics, readable without taking the simulation lock.
pub struct ServerMetrics {
    /// Current tick from simulation.
    pub current_tick: AtomicU64,
    /// Whether simulation is running.
    pub sim_running: AtomicBool,
    /// Whether the live channel is feeding the simulation.
    pub live_connected: AtomicBool,
    /// Frames broadcast so far.
    pub frames_sent: AtomicU64,
    /// Active WebSocket connections.
    pub ws_connections: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self {
            current_tick: AtomicU64::new(0),
            sim_running: AtomicBool::new(false),
            live_connected: AtomicBool::new(false),
            frames_sent: AtomicU64::new(0),
            ws_connections: AtomicU64::new(0),
        }
    }

    /// Update from a simulation snapshot.
    pub fn update_from_snapshot(&self, snapshot: &SimSnapshot) {
        self.current_tick.store(snapshot.tick, Ordering::Relaxed);
        self.sim_running.store(snapshot.running, Ordering::Relaxed);
        self.live_connected
            .store(snapshot.live_connected, Ordering::Relaxed);
    }

    pub fn frame_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment WebSocket connection count.
    pub fn ws_connect(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement WebSocket connection count.
    pub fn ws_disconnect(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.sim_running.load(Ordering::Relaxed)
    }

    pub fn is_live(&self) -> bool {
        self.live_connected.load(Ordering::Relaxed)
    }

    pub fn frames(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    /// Get WebSocket connection count.
    pub fn ws_count(&self) -> u64 {
        self.ws_connections.load(Ordering::Relaxed)
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
