//! Market event catalog for the supply-chain simulation.
//!
//! This crate provides:
//! - **Catalog**: the immutable list of known [`MarketEvent`]s, loaded once
//! - **Selection**: single active-event toggle semantics
//! - **Builtin**: a default catalog used when no data API is configured
//!
//! # Selection Semantics
//!
//! ```text
//! active = None      + select(a) -> Some(a)
//! active = Some(a)   + select(a) -> None      (deselect)
//! active = Some(a)   + select(b) -> Some(b)   (single replace)
//! ```
//!
//! There is never more than one active event.
//!
//! [`MarketEvent`]: types::MarketEvent

// =============================================================================
// Module Declarations
// =============================================================================

pub mod builtin;
pub mod catalog;
pub mod selection;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::MarketEventCatalog;
pub use selection::{EventSelection, SelectionChange};
