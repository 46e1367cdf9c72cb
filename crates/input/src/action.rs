use glam::Vec3;
use stagehand_common::Ray;
use stagehand_physics::RigidBodyHandle;
use stagehand_scene::NodeId;

/// A manipulation request produced by whatever input device is in use.
///
/// The controller consumes actions, never raw pointer events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Pick up the instance owning `node`, seen from `viewpoint`.
    Grab { node: NodeId, viewpoint: Vec3 },
    /// Move the held body along a pointer ray.
    Drag(Ray),
    /// Let go, throwing with the sampled velocity.
    Release,
    /// Push the instance owning `node` away from `source`.
    Shove { node: NodeId, source: Vec3 },
    ZoomIn,
    ZoomOut,
    /// Unbound input.
    Noop,
}

/// What an action did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Grabbed(RigidBodyHandle),
    /// New kinematic target.
    Moved(Vec3),
    /// Throw impulse applied on release.
    Released(Vec3),
    Shoved(Vec3),
    /// New grab distance.
    Zoomed(f32),
    Ignored,
}
