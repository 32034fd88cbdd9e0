//! Simulation crate: the tick engine for the supply-chain market simulation.
//!
//! This crate provides:
//! - The per-item market condition oscillator
//! - The tick engine (stock and price drift, network aggregates)
//! - The sentiment aggregator (item sentiment, factor weights, risk)
//! - The route updater
//! - A shared [`SimulationContext`] and the real-time [`Scheduler`]
//! - Hook-based observation
//!
//! # Architecture
//!
//! ```text
//!  DataSource ──▶ InitialData ──▶ Simulation ──▶ SimulationContext
//!                                     │                 │
//!                                 HookRunner        Scheduler ◀── SimCommand
//!                                     │                 │
//!                              on_tick_end ...     LiveFeed (optional)
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Subsystems are free functions over plain data
//! - **Modular**: All randomness flows through one [`RandomSource`]
//! - **SoC**: Simulation owns state; scheduler owns time; hooks observe
//!
//! # Example
//!
//! ```ignore
//! use simulation::{MetricsHook, Simulation};
//! use std::sync::Arc;
//!
//! let mut sim = Simulation::with_seed_data(42);
//! let metrics = Arc::new(MetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! sim.toggle_event("drought")?;
//! sim.run(100);
//! println!("Peak stock: {}", metrics.snapshot().peak_stock);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod random;
pub mod runner;
pub mod scheduler;
pub mod subsystems;

pub use config::SimulationConfig;
pub use context::SimulationContext;
pub use error::{Result, SimError};
pub use hooks::{HookRunner, NoOpHook, SimulationHook};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use runner::Simulation;
pub use scheduler::{Scheduler, SchedulerHandle, SimCommand};
pub use subsystems::WarehouseProfile;
