//! External collaborators of the supply-chain simulation.
//!
//! This crate provides:
//! - **[`DataSource`]**: async contract for the warehouse, event and sentiment
//!   fetches the core depends on at startup
//! - **[`SeedDataSource`]**: built-in dashboard seed data, no network
//! - **[`HttpDataSource`]**: JSON over HTTP via `reqwest`, one retry per request
//! - **[`LiveFeed`]**: optional WebSocket channel pushing authoritative stock
//!
//! # Failure Model
//!
//! Startup loading is all-or-nothing: [`load_all`] either returns the three
//! collections or a single [`DataFetchError`]. The live channel is best-effort:
//! [`StreamError`]s are reported as [`LiveMessage::Disconnected`] and the
//! caller keeps simulating locally.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod http;
pub mod live;
pub mod seed;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DataFetchError, StreamError};
pub use http::{HttpDataSource, HttpSourceConfig};
pub use live::{LiveFeed, LiveFeedConfig, LiveMessage};
pub use seed::SeedDataSource;
pub use source::{DataSource, InitialData, load_all};
