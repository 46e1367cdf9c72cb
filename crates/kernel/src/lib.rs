//! Registry kernel: the instance store, per-frame physics-to-visual sync, and
//! collider derivation.
//!
//! # Invariants
//! - An instance lives in exactly one partition; it is dynamic iff it has a
//!   rigid body.
//! - Every node of a registered subtree resolves to its owning instance.
//! - `synchronize` is the only place visual transforms follow body poses.

pub mod collider;
mod emission;
mod registry;

pub use collider::{
    ColliderShape, ColliderSpec, ColliderSurface, DEFAULT_FRICTION, ExtentOverride,
    MeshPlacement, default_collider, derive_collider,
};
pub use emission::EmissionState;
pub use registry::{AssetInstance, InstanceRegistry, NewInstance, Partition, SyncStats};

pub fn crate_info() -> &'static str {
    "stagehand-kernel v0.1.0"
}
