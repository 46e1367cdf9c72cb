//! Template-based "custom" assets.

use glam::Vec3;
use stagehand_assets::{AssetTypeDescriptor, ColliderOverride, ModelLibrary, TemplateLoader};
use stagehand_kernel::{
    AssetInstance, ColliderShape, ColliderSpec, ColliderSurface, ExtentOverride, MeshPlacement,
    NewInstance, default_collider, derive_collider,
};
use stagehand_physics::rapier3d::na::{Isometry3, Translation3};
use stagehand_physics::{RigidBodyBuilder, quat_to_rapier};
use stagehand_scene::{MeshRole, NodeId, ShapeHint};

use crate::{SpawnContext, SpawnError, SpawnRequest};

/// Instantiates cached template models.
pub struct ModelFactory {
    library: ModelLibrary,
}

impl ModelFactory {
    pub fn new(loader: Box<dyn TemplateLoader>) -> Self {
        Self {
            library: ModelLibrary::new(loader),
        }
    }

    pub fn library(&self) -> &ModelLibrary {
        &self.library
    }

    /// Drop every cached template.
    pub fn clear(&mut self) {
        self.library.clear();
    }

    /// Spawn one model by type key.
    ///
    /// Loading happens first; a load failure leaves the scene, the physics
    /// world and the registry untouched.
    pub fn spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        key: &str,
        request: &SpawnRequest,
    ) -> Result<AssetInstance, SpawnError> {
        let _span = tracing::debug_span!("spawn_model", %key).entered();
        let descriptor = ctx
            .types
            .descriptor(key)
            .cloned()
            .ok_or_else(|| SpawnError::MissingDescriptor(key.to_string()))?;
        let template = self
            .library
            .get_or_load(key, &descriptor.resource_path)
            .map_err(|source| SpawnError::TemplateLoad {
                key: key.to_string(),
                source,
            })?;

        let root = ctx
            .scene
            .clone_subtree_from(&template.graph, template.root)
            .ok_or_else(|| SpawnError::EmptyTemplate(key.to_string()))?;
        if template.skinned {
            tracing::debug!("skinned template cloned with its own skeleton");
        }

        let o = &request.options;
        let scale = o.scale.unwrap_or(Vec3::splat(descriptor.scale));
        if let Some(n) = ctx.scene.get_mut(root) {
            if let Some(name) = &o.name {
                n.name = name.clone();
            }
            n.transform.position = request.position;
            n.transform.rotation = request.rotation;
            n.transform.scale *= scale;
        }

        let collision = prepare_meshes(ctx, root, request);

        let body = if o.physics.unwrap_or(true) {
            let p = request.position;
            let body = ctx.physics.add_body(
                RigidBodyBuilder::dynamic()
                    .position(Isometry3::from_parts(
                        Translation3::new(p.x, p.y, p.z),
                        quat_to_rapier(request.rotation),
                    ))
                    .can_sleep(o.sleeping.unwrap_or(ctx.config.default_sleeping))
                    .build(),
            );
            for spec in colliders_for(ctx, root, &collision, &descriptor, request) {
                spec.attach(ctx.physics, body);
            }
            Some(body)
        } else {
            None
        };

        let instance = ctx.registry.register(
            ctx.scene,
            ctx.physics,
            NewInstance {
                asset_type: descriptor.key.clone(),
                id_prefix: o.id.clone(),
                ..NewInstance::new(root, body)
            },
        );
        ctx.queue.push(root);
        tracing::debug!(
            instance_id = %instance.instance_id,
            collision_meshes = collision.len(),
            "model spawned"
        );
        Ok(instance)
    }
}

/// Hide collision meshes and give display meshes their material.
/// Returns the collision meshes with their shape hints.
fn prepare_meshes(
    ctx: &mut SpawnContext<'_>,
    root: NodeId,
    request: &SpawnRequest,
) -> Vec<(NodeId, ShapeHint)> {
    let material = request.options.material.unwrap_or_default();
    let mode = material.mode.unwrap_or(ctx.config.default_material_mode);
    let mut collision = Vec::new();

    for node in ctx.scene.descendants(root) {
        let Some((role, base_color)) = ctx
            .scene
            .get(node)
            .and_then(|n| n.mesh())
            .map(|m| (m.role, m.material.color))
        else {
            continue;
        };
        match role {
            MeshRole::Collision(hint) => {
                if let Some(n) = ctx.scene.get_mut(node) {
                    n.visible = false;
                }
                collision.push((node, hint));
            }
            MeshRole::Display => {
                let color = material.color.or(request.options.color).unwrap_or(base_color);
                let display = ctx.registry.display_material(mode, color);
                if let Some(mesh) = ctx.scene.get_mut(node).and_then(|n| n.mesh_mut()) {
                    mesh.material = display;
                }
            }
        }
    }
    collision
}

/// One collider per collision mesh, or a single default collider sized from
/// the model's scale. Collider poses are expressed in the body frame.
fn colliders_for(
    ctx: &SpawnContext<'_>,
    root: NodeId,
    collision: &[(NodeId, ShapeHint)],
    descriptor: &AssetTypeDescriptor,
    request: &SpawnRequest,
) -> Vec<ColliderSpec> {
    let o = &request.options;
    let overrides = o.collider.unwrap_or_default();
    let extents = ExtentOverride {
        width: overrides.width,
        height: overrides.height,
        depth: overrides.depth,
    };
    let count = collision.len().max(1) as f32;
    let surface = ColliderSurface {
        mass: Some(o.mass.unwrap_or(descriptor.mass) / count),
        restitution: Some(o.restitution.unwrap_or(descriptor.restitution)),
        friction: Some(o.friction.unwrap_or(ctx.config.default_friction)),
    };

    if collision.is_empty() {
        let scale = ctx
            .scene
            .world_transform(root)
            .map(|t| t.scale)
            .unwrap_or(Vec3::ONE);
        let hint = overrides.shape.unwrap_or(ShapeHint::Cuboid);
        let spec = apply_override(default_collider(hint, scale, &surface), &overrides);
        return vec![spec];
    }

    let to_body = request.rotation.inverse();
    collision
        .iter()
        .filter_map(|(node, hint)| {
            let Some(placement) = MeshPlacement::from_node(&*ctx.scene, *node) else {
                tracing::warn!(?node, "collision mesh without geometry");
                return None;
            };
            let mut spec = derive_collider(*hint, &placement, request.position, &extents, &surface);
            spec.local_position = to_body * spec.local_position;
            spec.local_rotation = to_body * spec.local_rotation;
            if ctx.debug.geometry {
                tracing::debug!(?node, shape = ?spec.shape, offset = ?spec.local_position, "derived collider");
            }
            Some(spec)
        })
        .collect()
}

fn apply_override(mut spec: ColliderSpec, overrides: &ColliderOverride) -> ColliderSpec {
    spec.shape = match spec.shape {
        ColliderShape::Cuboid { half_extents } => ColliderShape::Cuboid {
            half_extents: Vec3::new(
                overrides.width.map_or(half_extents.x, |w| w * 0.5),
                overrides.height.map_or(half_extents.y, |h| h * 0.5),
                overrides.depth.map_or(half_extents.z, |d| d * 0.5),
            ),
        },
        ColliderShape::Ball { radius } => ColliderShape::Ball {
            radius: overrides.radius.unwrap_or(radius),
        },
        ColliderShape::Capsule {
            half_height,
            radius,
        } => ColliderShape::Capsule {
            half_height: overrides.height.map_or(half_height, |h| h * 0.5),
            radius: overrides.radius.unwrap_or(radius),
        },
        other => other,
    };
    spec
}
