//! Error types for simulation operations.
//!
//! Numeric invariant violations never surface here; the engine clamps them.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Caller mistakes against the simulation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    /// The requested event id is not in the catalog.
    #[error("unknown market event: {0}")]
    UnknownEvent(String),
    /// A live snapshot named a warehouse that does not exist.
    #[error("unknown warehouse: {0}")]
    UnknownWarehouse(String),
    /// The scheduler task has ended and no longer accepts commands.
    #[error("scheduler is not running")]
    SchedulerClosed,
}
