//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: Health and readiness endpoints
//! - [`ws`]: WebSocket handler for the frame stream
//! - [`api`]: Simulation status and control
//! - [`data`]: Dashboard data (warehouses, events, sentiment, metrics, routes)

pub mod api;
pub mod data;
pub mod health;
pub mod ws;
