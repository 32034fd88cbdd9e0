//! Error types for data loading and the live channel.

use thiserror::Error;

/// Failure to load seed data or the event catalog.
///
/// Blocking: the simulation does not start with partial data.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("HTTP request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Failed to decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{0} returned no data")]
    Empty(String),
}

/// Live-channel failure. Logged; the simulation falls back to local ticks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Connection timed out")]
    Timeout,

    #[error("WebSocket protocol error: {0}")]
    Protocol(String),

    #[error("Stream closed by peer")]
    Closed,

    #[error("Failed to decode live frame: {0}")]
    Decode(String),
}
