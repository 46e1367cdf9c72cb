//! Shared types for the stagehand runtime: transforms, instance ids, rays and
//! debug flags.
//!
//! # Invariants
//! - Instance ids handed out by one `IdAllocator` never repeat until `reset`.

mod types;

pub use types::{DebugFlags, IdAllocator, InstanceId, Ray, Transform};

pub fn crate_info() -> &'static str {
    "stagehand-common v0.1.0"
}
