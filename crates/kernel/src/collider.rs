//! Collider derivation: infer a physics shape and its pose relative to the
//! owning body from a mesh's bounds and world transform.
//!
//! Everything here is a pure function of its inputs; attaching the result to
//! a body is a separate step.

use glam::{Quat, Vec3};
use stagehand_common::Transform;
use stagehand_physics::rapier3d::na::{Isometry3, Translation3};
use stagehand_physics::{
    Collider, ColliderBuilder, ColliderHandle, PhysicsWorld, RigidBodyHandle, quat_to_rapier,
};
use stagehand_scene::{Aabb, NodeId, SceneGraph, ShapeHint};

pub const DEFAULT_FRICTION: f32 = 0.5;

/// Below this distance a bounds center counts as sitting on the pivot.
const PIVOT_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    /// Y-aligned; `half_height` is half the straight section.
    Capsule { half_height: f32, radius: f32 },
    Cylinder { half_height: f32, radius: f32 },
}

/// A collider ready to attach: shape, pose relative to the body, surface
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderSpec {
    pub shape: ColliderShape,
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub mass: Option<f32>,
    pub restitution: Option<f32>,
    pub friction: f32,
}

impl ColliderSpec {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            mass: None,
            restitution: None,
            friction: DEFAULT_FRICTION,
        }
    }

    pub fn with_surface(mut self, surface: &ColliderSurface) -> Self {
        self.mass = surface.mass;
        self.restitution = surface.restitution;
        self.friction = surface.friction.unwrap_or(DEFAULT_FRICTION);
        self
    }

    pub fn to_collider(&self) -> Collider {
        let builder = match self.shape {
            ColliderShape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Capsule {
                half_height,
                radius,
            } => ColliderBuilder::capsule_y(half_height, radius),
            ColliderShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
        };
        let p = self.local_position;
        let mut builder = builder
            .position(Isometry3::from_parts(
                Translation3::new(p.x, p.y, p.z),
                quat_to_rapier(self.local_rotation),
            ))
            .friction(self.friction);
        if let Some(r) = self.restitution {
            builder = builder.restitution(r);
        }
        if let Some(m) = self.mass {
            builder = builder.mass(m);
        }
        builder.build()
    }

    pub fn attach(&self, physics: &mut PhysicsWorld, body: RigidBodyHandle) -> ColliderHandle {
        physics.add_collider(self.to_collider(), body)
    }
}

/// Mass, restitution and friction taken from the owning asset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColliderSurface {
    pub mass: Option<f32>,
    pub restitution: Option<f32>,
    pub friction: Option<f32>,
}

/// Explicit full dimensions that replace derived box extents per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtentOverride {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
}

/// Where a mesh sits in the world, as collider derivation needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPlacement {
    pub bounds: Aabb,
    pub bounding_radius: f32,
    pub world: Transform,
}

impl MeshPlacement {
    /// Read a mesh node's bounds and decomposed world transform.
    pub fn from_node(scene: &SceneGraph, node: NodeId) -> Option<Self> {
        let mesh = scene.get(node)?.mesh()?;
        Some(Self {
            bounds: mesh.geometry.bounds,
            bounding_radius: mesh.geometry.bounding_radius,
            world: scene.world_transform(node)?,
        })
    }

    /// Bounds size scaled component-wise by world scale.
    pub fn scaled_size(&self) -> Vec3 {
        self.bounds.size() * self.world.scale
    }
}

/// Offset of the mesh's geometric center from the body origin.
///
/// When the bounds center is off the pivot, the center is rotated by the
/// world rotation, scaled by world scale, and added in.
pub fn relative_offset(mesh: &MeshPlacement, body_world_position: Vec3) -> Vec3 {
    let mut offset = mesh.world.position - body_world_position;
    let center = mesh.bounds.center();
    if center.length() > PIVOT_EPSILON {
        offset += (mesh.world.rotation * center) * mesh.world.scale;
    }
    offset
}

/// Shape from hint and scaled bounds.
pub fn derive_shape(hint: ShapeHint, mesh: &MeshPlacement, extents: &ExtentOverride) -> ColliderShape {
    let size = mesh.scaled_size();
    match hint {
        ShapeHint::Ball => ColliderShape::Ball {
            radius: mesh.bounding_radius * mesh.world.scale.x,
        },
        ShapeHint::Capsule => ColliderShape::Capsule {
            half_height: size.y * 0.5,
            radius: size.x.max(size.z) * 0.5,
        },
        ShapeHint::Cuboid => ColliderShape::Cuboid {
            half_extents: Vec3::new(
                extents.width.unwrap_or(size.x) * 0.5,
                extents.height.unwrap_or(size.y) * 0.5,
                extents.depth.unwrap_or(size.z) * 0.5,
            ),
        },
    }
}

/// Derive the collider for one collision sub-mesh.
///
/// The local rotation is the mesh's world rotation, which holds because the
/// mesh and its body share orientation at spawn.
pub fn derive_collider(
    hint: ShapeHint,
    mesh: &MeshPlacement,
    body_world_position: Vec3,
    extents: &ExtentOverride,
    surface: &ColliderSurface,
) -> ColliderSpec {
    let mut spec = ColliderSpec::new(derive_shape(hint, mesh, extents)).with_surface(surface);
    spec.local_position = relative_offset(mesh, body_world_position);
    spec.local_rotation = mesh.world.rotation;
    spec
}

/// Collider for a model without collision sub-meshes, sized from its scale.
pub fn default_collider(hint: ShapeHint, scale: Vec3, surface: &ColliderSurface) -> ColliderSpec {
    let half = scale * 0.5;
    let shape = match hint {
        ShapeHint::Ball => ColliderShape::Ball {
            radius: half.max_element(),
        },
        ShapeHint::Capsule => ColliderShape::Capsule {
            half_height: half.y,
            radius: half.x.max(half.z),
        },
        ShapeHint::Cuboid => ColliderShape::Cuboid { half_extents: half },
    };
    ColliderSpec::new(shape).with_surface(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_physics::RigidBodyBuilder;

    fn placement(bounds: Aabb, radius: f32, world: Transform) -> MeshPlacement {
        MeshPlacement {
            bounds,
            bounding_radius: radius,
            world,
        }
    }

    #[test]
    fn corner_pivot_cube_is_recentered() {
        let mesh = placement(
            Aabb::new(Vec3::ZERO, Vec3::splat(2.0)),
            3f32.sqrt(),
            Transform::default(),
        );
        let spec = derive_collider(
            ShapeHint::Cuboid,
            &mesh,
            Vec3::ZERO,
            &ExtentOverride::default(),
            &ColliderSurface::default(),
        );
        assert_eq!(spec.local_position, Vec3::ONE);
        assert_eq!(
            spec.shape,
            ColliderShape::Cuboid {
                half_extents: Vec3::ONE
            }
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        let mesh = placement(
            Aabb::new(Vec3::ZERO, Vec3::splat(2.0)),
            1.0,
            Transform::from_position(Vec3::new(3.0, 0.0, 0.0)),
        );
        let args = (ExtentOverride::default(), ColliderSurface::default());
        let a = derive_collider(ShapeHint::Cuboid, &mesh, Vec3::ZERO, &args.0, &args.1);
        let b = derive_collider(ShapeHint::Cuboid, &mesh, Vec3::ZERO, &args.0, &args.1);
        assert_eq!(a, b);
    }

    #[test]
    fn centered_mesh_uses_plain_offset() {
        let mesh = placement(
            Aabb::from_half_extents(Vec3::splat(0.5)),
            0.5,
            Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
        );
        let offset = relative_offset(&mesh, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(offset, Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn pivot_offset_is_rotated_then_scaled() {
        let world = Transform {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            scale: Vec3::new(2.0, 3.0, 1.0),
        };
        let mesh = placement(Aabb::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)), 1.0, world);
        // center (1,0,0) rotated 90 deg about z -> (0,1,0), scaled -> (0,3,0)
        let offset = relative_offset(&mesh, Vec3::ZERO);
        assert!((offset - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn sphere_named_mesh_gives_scaled_ball() {
        let mesh = placement(
            Aabb::from_half_extents(Vec3::splat(0.5)),
            0.5,
            Transform::default().with_scale(Vec3::splat(2.0)),
        );
        let hint = ShapeHint::from_name("col_sphere_01");
        let spec = derive_collider(
            hint,
            &mesh,
            Vec3::ZERO,
            &ExtentOverride::default(),
            &ColliderSurface::default(),
        );
        assert_eq!(spec.shape, ColliderShape::Ball { radius: 1.0 });
        assert_eq!(
            ShapeHint::from_name("col_box_01"),
            ShapeHint::Cuboid
        );
    }

    #[test]
    fn capsule_uses_height_and_widest_horizontal_extent() {
        let mesh = placement(
            Aabb::from_half_extents(Vec3::new(0.25, 1.0, 0.5)),
            1.0,
            Transform::default(),
        );
        let shape = derive_shape(ShapeHint::Capsule, &mesh, &ExtentOverride::default());
        assert_eq!(
            shape,
            ColliderShape::Capsule {
                half_height: 1.0,
                radius: 0.5
            }
        );
    }

    #[test]
    fn box_axes_override_independently() {
        let mesh = placement(
            Aabb::from_half_extents(Vec3::splat(1.0)),
            1.0,
            Transform::default(),
        );
        let shape = derive_shape(
            ShapeHint::Cuboid,
            &mesh,
            &ExtentOverride {
                height: Some(6.0),
                ..ExtentOverride::default()
            },
        );
        assert_eq!(
            shape,
            ColliderShape::Cuboid {
                half_extents: Vec3::new(1.0, 3.0, 1.0)
            }
        );
    }

    #[test]
    fn surface_defaults_friction() {
        let spec = ColliderSpec::new(ColliderShape::Ball { radius: 1.0 }).with_surface(
            &ColliderSurface {
                mass: Some(3.0),
                restitution: Some(0.4),
                friction: None,
            },
        );
        assert_eq!(spec.friction, DEFAULT_FRICTION);
        assert_eq!(spec.mass, Some(3.0));
        assert_eq!(spec.restitution, Some(0.4));
    }

    #[test]
    fn default_collider_sized_from_scale() {
        let spec = default_collider(
            ShapeHint::Cuboid,
            Vec3::new(2.0, 4.0, 2.0),
            &ColliderSurface::default(),
        );
        assert_eq!(
            spec.shape,
            ColliderShape::Cuboid {
                half_extents: Vec3::new(1.0, 2.0, 1.0)
            }
        );
    }

    #[test]
    fn attached_collider_keeps_local_pose() {
        let mut physics = PhysicsWorld::default();
        let body = physics.add_body(RigidBodyBuilder::dynamic().build());
        let mut spec = ColliderSpec::new(ColliderShape::Cuboid {
            half_extents: Vec3::ONE,
        });
        spec.local_position = Vec3::new(1.0, 1.0, 1.0);
        let handle = spec.attach(&mut physics, body);

        let collider = physics.colliders.get(handle).unwrap();
        let local = collider.position_wrt_parent().unwrap();
        assert!((local.translation.vector.x - 1.0).abs() < 1e-6);
        let cuboid = collider.shape().as_cuboid().unwrap();
        assert!((cuboid.half_extents.y - 1.0).abs() < 1e-6);
        assert_eq!(physics.body_colliders(body), vec![handle]);
    }

    #[test]
    fn placement_reads_world_transform() {
        use stagehand_scene::{Geometry, Material, Mesh, NodeKind};
        let mut scene = SceneGraph::new();
        let parent = scene.create("model", NodeKind::Group);
        scene.get_mut(parent).unwrap().transform =
            Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        let child = scene.create(
            "col_box",
            NodeKind::Mesh(Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Material::default())),
        );
        scene.add_child(parent, child);
        let p = MeshPlacement::from_node(&scene, child).unwrap();
        assert!((p.world.position - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5);
        assert!(MeshPlacement::from_node(&scene, parent).is_none());
    }
}
