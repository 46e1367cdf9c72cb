//! Physics collaborator: a thin owner of the rapier3d sets and pipeline.
//!
//! The core never reaches into the solver. It builds bodies and colliders,
//! reads body poses, and toggles body type / sleep state through handles.
//!
//! # Invariants
//! - Colliders are always inserted with a parent body.
//! - Removing a body removes its attached colliders.

mod convert;
mod world;

pub use convert::{quat_from_rapier, quat_to_rapier, vec3_from_rapier, vec3_to_rapier};
pub use rapier3d;
pub use rapier3d::prelude::{
    Collider, ColliderBuilder, ColliderHandle, RigidBody, RigidBodyBuilder, RigidBodyHandle,
    RigidBodyType,
};
pub use world::{PhysicsConfig, PhysicsWorld};

pub fn crate_info() -> &'static str {
    "stagehand-physics v0.1.0"
}
