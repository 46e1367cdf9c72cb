//! Developer tooling: read-only views of the instance registry.
//!
//! # Invariants
//! - Inspection never mutates the registry, the scene or the physics world.

pub mod inspector;

pub use inspector::{InstanceInfo, RegistryInspector, RegistrySummary};

pub fn crate_info() -> &'static str {
    "stagehand-tools v0.1.0"
}
