//! Subsystem implementations for simulation decomposition.
//!
//! Each subsystem encapsulates one area of responsibility as free functions
//! over plain data plus a [`RandomSource`](crate::RandomSource):
//! - `oscillator`: per-item market condition flips
//! - `inventory`: per-warehouse profiles, per-item stock/price drift, aggregates
//! - `sentiment`: item sentiment, factor weights, risk readings
//! - `routes`: pairwise delivery routes and their perturbation

pub mod inventory;
pub mod oscillator;
pub mod routes;
pub mod sentiment;

pub use inventory::WarehouseProfile;
