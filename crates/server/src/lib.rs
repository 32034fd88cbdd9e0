//! Server crate: Axum dashboard API for the supply-chain simulation.
//!
//! Streams simulation frames to WebSocket clients and serves dashboard data
//! over REST. Control commands are forwarded to the scheduler.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐         ┌────────────────────────┐
//! │  Scheduler task         │         │  Axum handlers         │
//! │                         │         │                        │
//! │  ctx.step()             │────────>│ receive frame          │
//! │  hook.on_tick_end()     │broadcast│ forward to WS          │
//! │                         │<────────│ POST /api/command      │
//! │                         │  mpsc   │ GET /api/* via ctx     │
//! └─────────────────────────┘         └────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Routes and handlers declared via Axum's type-safe routing
//! - **Modular**: Each feature (health, WebSocket, API, data) in separate module
//! - **SoC**: Simulation owns state; server observes and broadcasts
//!
//! # Modules
//!
//! - [`app`]: Axum application builder and router setup
//! - [`state`]: Shared server state (channels, context, metrics)
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`routes`]: HTTP route handlers (health, ws, api, data)
//! - [`bridge`]: Frame types for simulation → client streaming
//! - [`hooks`]: SimulationHook implementation for broadcasting frames

pub mod app;
pub mod bridge;
pub mod error;
pub mod hooks;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use app::{ServerConfig, create_app, serve};
pub use bridge::{FrameKind, SimCommand, TickData, WarehouseData};
pub use error::{AppError, AppResult};
pub use hooks::BroadcastHook;
pub use state::{ServerMetrics, ServerState};
