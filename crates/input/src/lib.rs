//! Direct manipulation: pointer actions mapped onto the bodies of registered
//! instances.
//!
//! # Invariants
//! - At most one grab session at a time; the grabbed body is kinematic until
//!   release.
//! - Nodes that resolve to no body are ignored, never an error.
//! - Time is passed in, so throws are reproducible.

pub mod action;
mod config;
mod controller;

pub use action::{Action, Outcome};
pub use config::ManipulationConfig;
pub use controller::{ManipulationController, ManipulationSession};

pub fn crate_info() -> &'static str {
    "stagehand-input v0.1.0"
}
