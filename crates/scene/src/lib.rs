//! Scene graph: the visual side of every instance.
//!
//! Nodes live in an arena keyed by `NodeId`. The arena owns node storage;
//! the instance registry only holds ids into it.
//!
//! # Invariants
//! - A node has at most one parent; `add_child` reparents.
//! - Detaching a node keeps it (and its subtree) alive until `remove_subtree`.
//! - Iteration order is deterministic (BTreeMap).

mod geometry;
mod graph;
mod light;
mod material;
mod renderer;

pub use geometry::{Aabb, Geometry, Primitive};
pub use graph::{Mesh, MeshRole, Node, NodeId, NodeKind, NodeTags, SceneGraph, ShapeHint, Skin};
pub use light::{Light, LightKind};
pub use material::{Material, MaterialMode};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "stagehand-scene v0.1.0"
}
