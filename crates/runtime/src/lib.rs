//! The stage: one context object owning every piece of runtime state, passed
//! to call sites instead of process-wide singletons.
//!
//! # Invariants
//! - `frame` runs insertion, physics, sync and the light debug tick in that
//!   order, once per call.
//! - `cleanup` leaves the stage as freshly constructed, apart from the loaded
//!   type registry.

mod config;
mod stage;

pub use config::{ConfigError, RuntimeConfig};
pub use stage::{FrameStats, PopulateReport, Stage};

pub fn crate_info() -> &'static str {
    "stagehand-runtime v0.1.0"
}
