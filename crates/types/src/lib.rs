//! Core types for the supply-chain market simulation.
//!
//! This crate provides the shared data model used across the workspace:
//! warehouses and their inventory, market events, sentiment readings,
//! simulation speed, derived network metrics, delivery routes, and the
//! observable [`SimSnapshot`] frame handed to views.
//!
//! All types are plain data with `serde` support so they can cross the HTTP,
//! WebSocket and live-feed boundaries unchanged.

pub mod event;
pub mod metrics;
pub mod route;
pub mod sentiment;
pub mod snapshot;
pub mod speed;
pub mod warehouse;

// =============================================================================
// Time Types
// =============================================================================

/// Simulation tick number (discrete time step).
pub type Tick = u64;

// =============================================================================
// Constants
// =============================================================================

/// Minimum sell/buy ratio enforced after every price change (10% markup).
pub const MIN_MARKUP: f64 = 1.10;

/// Lowest buy price an item may reach.
pub const MIN_BUY_PRICE: f64 = 1.0;

/// Network storage capacity used for utilization.
pub const DEFAULT_CAPACITY: u64 = 10_000;

// =============================================================================
// Re-exports
// =============================================================================

pub use event::{EventType, MarketEvent};
pub use metrics::{FactorWeights, NetworkMetrics, RiskMetric};
pub use route::{GeoPoint, Route, RouteStatus, RouteSummary, Traffic};
pub use sentiment::{MarketSentiment, Trend};
pub use snapshot::{LiveSnapshot, SimSnapshot};
pub use speed::SimulationSpeed;
pub use warehouse::{InventoryItem, MarketCondition, Warehouse, WarehouseId};
