//! Built-in "system" assets: primitive shapes and lights.
//!
//! Shapes are explicit, so colliders are built straight from the requested
//! dimensions with no derivation.

use glam::{Quat, Vec3};
use stagehand_common::DebugFlags;
use stagehand_kernel::{AssetInstance, ColliderShape, ColliderSpec, ColliderSurface, NewInstance};
use stagehand_physics::rapier3d::na::{Isometry3, Translation3};
use stagehand_physics::{RigidBodyBuilder, RigidBodyHandle, quat_to_rapier};
use stagehand_scene::{
    Geometry, Light, LightKind, Material, Mesh, NodeId, NodeKind, SceneGraph,
};

use crate::{SpawnContext, SpawnRequest};

const DEFAULT_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.8);
const HELPER_RADIUS: f32 = 0.1;
const CONE_OPACITY: f32 = 0.25;

/// Built-in asset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Box,
    Sphere,
    Capsule,
    Cylinder,
    PointLight,
    SpotLight,
    DirectionalLight,
}

impl SystemKind {
    pub const ALL: [SystemKind; 7] = [
        Self::Box,
        Self::Sphere,
        Self::Capsule,
        Self::Cylinder,
        Self::PointLight,
        Self::SpotLight,
        Self::DirectionalLight,
    ];

    /// Match a type id against the built-in set, case-insensitively.
    pub fn from_type(asset_type: &str) -> Option<Self> {
        let lower = asset_type.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "box" | "cube" => Self::Box,
            "sphere" | "ball" => Self::Sphere,
            "capsule" => Self::Capsule,
            "cylinder" => Self::Cylinder,
            "point_light" | "pointlight" | "light" => Self::PointLight,
            "spot_light" | "spotlight" => Self::SpotLight,
            "directional_light" | "directionallight" | "sun" => Self::DirectionalLight,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Capsule => "capsule",
            Self::Cylinder => "cylinder",
            Self::PointLight => "point_light",
            Self::SpotLight => "spot_light",
            Self::DirectionalLight => "directional_light",
        }
    }

    pub fn light_kind(&self) -> Option<LightKind> {
        match self {
            Self::PointLight => Some(LightKind::Point),
            Self::SpotLight => Some(LightKind::Spot),
            Self::DirectionalLight => Some(LightKind::Directional),
            _ => None,
        }
    }

    pub fn is_light(&self) -> bool {
        self.light_kind().is_some()
    }
}

/// Nodes belonging to one spawned light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightRig {
    pub light: NodeId,
    pub target: Option<NodeId>,
    pub cone: Option<NodeId>,
    pub helper: Option<NodeId>,
}

/// Factory for primitives and lights. Keeps the rigs of lights that carry a
/// debug visualization so their cones can follow angle and range edits.
#[derive(Debug, Default)]
pub struct PrimitiveFactory {
    rigs: Vec<LightRig>,
}

impl PrimitiveFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rigs(&self) -> &[LightRig] {
        &self.rigs
    }

    pub fn clear(&mut self) {
        self.rigs.clear();
    }

    pub fn spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        kind: SystemKind,
        request: &SpawnRequest,
    ) -> AssetInstance {
        match kind.light_kind() {
            Some(light) => self.spawn_light(ctx, kind, light, request),
            None => spawn_shape(ctx, kind, request),
        }
    }

    fn spawn_light(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        kind: SystemKind,
        light_kind: LightKind,
        request: &SpawnRequest,
    ) -> AssetInstance {
        let o = &request.options;
        let mut light = Light::new(light_kind);
        if let Some(c) = o.color {
            light.color = c;
        }
        if let Some(i) = o.intensity {
            light.intensity = i;
        }
        if let Some(r) = o.range {
            light.range = r.max(0.0);
        }
        if let Some(a) = o.angle {
            light.angle = a.to_radians();
        }
        if let Some(p) = o.penumbra {
            light.penumbra = p.clamp(0.0, 1.0);
        }
        let color = light.color;

        let name = o.name.clone().unwrap_or_else(|| kind.as_str().to_string());
        let node = ctx.scene.create(name.clone(), NodeKind::Light(light));
        if let Some(n) = ctx.scene.get_mut(node) {
            n.transform.position = request.position;
            n.transform.rotation = request.rotation;
        }

        let mut rig = LightRig {
            light: node,
            target: None,
            cone: None,
            helper: None,
        };

        if light_kind != LightKind::Point {
            let world_target = o
                .target
                .unwrap_or(request.position + request.rotation * Vec3::NEG_Y);
            let target = ctx
                .scene
                .create(format!("{name}_target"), NodeKind::Group);
            if let Some(t) = ctx.scene.get_mut(target) {
                t.transform.position =
                    request.rotation.inverse() * (world_target - request.position);
            }
            ctx.scene.add_child(node, target);
            if let Some(NodeKind::Light(l)) = ctx.scene.get_mut(node).map(|n| &mut n.kind) {
                l.target = Some(target);
            }
            rig.target = Some(target);
        }

        if o.debug_helper {
            let visible = ctx.debug.light_helpers;
            let helper_material = Material::colored(format!("{name}_helper"), color);
            let helper = ctx.scene.create(
                format!("{name}_helper"),
                NodeKind::Mesh(Mesh::new(Geometry::sphere(HELPER_RADIUS), helper_material)),
            );
            ctx.scene.add_child(node, helper);
            set_visible(ctx.scene, helper, visible);
            rig.helper = Some(helper);

            if light_kind == LightKind::Spot {
                let mut cone_material = Material::colored(format!("{name}_cone"), color);
                cone_material.opacity = CONE_OPACITY;
                cone_material.transparent = true;
                let cone = ctx.scene.create(
                    format!("{name}_cone"),
                    NodeKind::Mesh(Mesh::new(Geometry::cone(0.0, 0.0), cone_material)),
                );
                ctx.scene.add_child(node, cone);
                set_visible(ctx.scene, cone, visible);
                rig.cone = Some(cone);
            }
            refresh_rig(ctx.scene, &rig, ctx.debug);
            self.rigs.push(rig);
        }

        let instance = ctx.registry.register(
            ctx.scene,
            ctx.physics,
            NewInstance {
                asset_type: kind.as_str().to_string(),
                id_prefix: o.id.clone(),
                ..NewInstance::new(node, None)
            },
        );
        ctx.queue.push(node);
        tracing::debug!(instance_id = %instance.instance_id, kind = kind.as_str(), "light spawned");
        instance
    }

    /// Debug tick: bind helper visibility to the flag and rebuild every cone
    /// from its light's current angle and range. Rigs whose light is gone
    /// are dropped. Returns how many rigs were refreshed.
    pub fn update_light_debug(&mut self, scene: &mut SceneGraph, debug: DebugFlags) -> usize {
        self.rigs.retain(|rig| scene.contains(rig.light));
        for rig in &self.rigs {
            refresh_rig(scene, rig, debug);
        }
        self.rigs.len()
    }
}

fn set_visible(scene: &mut SceneGraph, node: NodeId, visible: bool) {
    if let Some(n) = scene.get_mut(node) {
        n.visible = visible;
    }
}

fn refresh_rig(scene: &mut SceneGraph, rig: &LightRig, debug: DebugFlags) {
    let Some(light) = scene.get(rig.light).and_then(|n| n.light()).cloned() else {
        return;
    };
    if let Some(helper) = rig.helper {
        set_visible(scene, helper, debug.light_helpers);
    }
    let Some(cone) = rig.cone else {
        return;
    };
    let aim = rig
        .target
        .and_then(|t| scene.get(t))
        .map(|t| t.transform.position)
        .filter(|p| p.length_squared() > f32::EPSILON)
        .map(Vec3::normalize)
        .unwrap_or(Vec3::NEG_Y);
    let geometry = Geometry::cone(light.cone_radius(), light.range);
    if let Some(n) = scene.get_mut(cone) {
        n.visible = debug.light_helpers;
        n.transform.rotation = Quat::from_rotation_arc(Vec3::NEG_Y, aim);
        if let Some(mesh) = n.mesh_mut() {
            mesh.geometry = geometry;
        }
    }
    if debug.geometry {
        tracing::trace!(cone = ?cone, radius = light.cone_radius(), range = light.range, "cone rebuilt");
    }
}

fn body_for(
    ctx: &mut SpawnContext<'_>,
    request: &SpawnRequest,
) -> Option<RigidBodyHandle> {
    let o = &request.options;
    if !o.physics.unwrap_or(true) {
        return None;
    }
    let dynamic = o.gravity.unwrap_or(true) && o.mass.is_none_or(|m| m > 0.0);
    let builder = if dynamic {
        RigidBodyBuilder::dynamic()
    } else {
        RigidBodyBuilder::fixed()
    };
    let p = request.position;
    let body = builder
        .position(Isometry3::from_parts(
            Translation3::new(p.x, p.y, p.z),
            quat_to_rapier(request.rotation),
        ))
        .can_sleep(o.sleeping.unwrap_or(ctx.config.default_sleeping))
        .build();
    Some(ctx.physics.add_body(body))
}

fn spawn_shape(
    ctx: &mut SpawnContext<'_>,
    kind: SystemKind,
    request: &SpawnRequest,
) -> AssetInstance {
    let o = &request.options;
    let scale = o.scale.unwrap_or(Vec3::ONE);
    let (geometry, shape) = match kind {
        SystemKind::Sphere => {
            let radius = o.radius.unwrap_or(0.5);
            (
                Geometry::sphere(radius),
                ColliderShape::Ball {
                    radius: radius * scale.max_element(),
                },
            )
        }
        SystemKind::Capsule => {
            let radius = o.radius.unwrap_or(0.25);
            let length = o.height.unwrap_or(1.0);
            (
                Geometry::capsule(radius, length),
                ColliderShape::Capsule {
                    half_height: length * 0.5 * scale.y,
                    radius: radius * scale.x.max(scale.z),
                },
            )
        }
        SystemKind::Cylinder => {
            let radius = o.radius.unwrap_or(0.5);
            let height = o.height.unwrap_or(1.0);
            (
                Geometry::cylinder(radius, height),
                ColliderShape::Cylinder {
                    half_height: height * 0.5 * scale.y,
                    radius: radius * scale.x.max(scale.z),
                },
            )
        }
        _ => {
            let size = Vec3::new(
                o.width.unwrap_or(1.0),
                o.height.unwrap_or(1.0),
                o.depth.unwrap_or(1.0),
            );
            (
                Geometry::cuboid(size.x, size.y, size.z),
                ColliderShape::Cuboid {
                    half_extents: size * scale * 0.5,
                },
            )
        }
    };
    if ctx.debug.geometry {
        tracing::debug!(kind = kind.as_str(), ?geometry, "primitive geometry");
    }

    let color = o
        .material
        .and_then(|m| m.color)
        .or(o.color)
        .unwrap_or(DEFAULT_COLOR);
    let material = match o.material.and_then(|m| m.mode) {
        Some(mode) => ctx.registry.display_material(mode, color),
        None => Material::colored(kind.as_str(), color),
    };

    let name = o.name.clone().unwrap_or_else(|| kind.as_str().to_string());
    let node = ctx
        .scene
        .create(name, NodeKind::Mesh(Mesh::new(geometry, material)));
    if let Some(n) = ctx.scene.get_mut(node) {
        n.transform.position = request.position;
        n.transform.rotation = request.rotation;
        n.transform.scale = scale;
    }

    let body = body_for(ctx, request);
    if let Some(body) = body {
        let surface = ColliderSurface {
            mass: o.mass.filter(|m| *m > 0.0),
            restitution: o.restitution,
            friction: Some(o.friction.unwrap_or(ctx.config.default_friction)),
        };
        ColliderSpec::new(shape)
            .with_surface(&surface)
            .attach(ctx.physics, body);
    }

    let instance = ctx.registry.register(
        ctx.scene,
        ctx.physics,
        NewInstance {
            asset_type: kind.as_str().to_string(),
            id_prefix: o.id.clone(),
            ..NewInstance::new(node, body)
        },
    );
    ctx.queue.push(node);
    tracing::debug!(
        instance_id = %instance.instance_id,
        kind = kind.as_str(),
        dynamic = instance.is_dynamic(),
        "primitive spawned"
    );
    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use stagehand_assets::{AssetOptions, MaterialOverride};
    use stagehand_scene::MaterialMode;

    #[test]
    fn system_kinds_parse_case_insensitively() {
        assert_eq!(SystemKind::from_type("Box"), Some(SystemKind::Box));
        assert_eq!(SystemKind::from_type("spotlight"), Some(SystemKind::SpotLight));
        assert_eq!(SystemKind::from_type("chair"), None);
        for kind in SystemKind::ALL {
            assert_eq!(SystemKind::from_type(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn box_gets_dynamic_body_and_matching_collider() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let request = SpawnRequest::new("box", Vec3::new(0.0, 3.0, 0.0)).with_options(AssetOptions {
            width: Some(2.0),
            height: Some(1.0),
            depth: Some(4.0),
            ..AssetOptions::default()
        });
        let instance = factory.spawn(&mut h.ctx(), SystemKind::Box, &request);

        let body = instance.rigid_body.unwrap();
        assert!(h.physics.body(body).unwrap().is_dynamic());
        let colliders = h.physics.body_colliders(body);
        assert_eq!(colliders.len(), 1);
        let cuboid = h.physics.colliders[colliders[0]].shape().as_cuboid().unwrap();
        assert_eq!(cuboid.half_extents.x, 1.0);
        assert_eq!(cuboid.half_extents.y, 0.5);
        assert_eq!(cuboid.half_extents.z, 2.0);
        assert_eq!(h.queue.len(), 1);
    }

    #[test]
    fn zero_mass_or_no_gravity_is_fixed() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let fixed = AssetOptions {
            gravity: Some(false),
            ..AssetOptions::default()
        };
        let a = factory.spawn(
            &mut h.ctx(),
            SystemKind::Box,
            &SpawnRequest::new("box", Vec3::ZERO).with_options(fixed),
        );
        let weightless = AssetOptions {
            mass: Some(0.0),
            ..AssetOptions::default()
        };
        let b = factory.spawn(
            &mut h.ctx(),
            SystemKind::Sphere,
            &SpawnRequest::new("sphere", Vec3::ZERO).with_options(weightless),
        );
        assert!(h.physics.body(a.rigid_body.unwrap()).unwrap().is_fixed());
        assert!(h.physics.body(b.rigid_body.unwrap()).unwrap().is_fixed());
    }

    #[test]
    fn physics_off_spawns_static_instance() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let options = AssetOptions {
            physics: Some(false),
            ..AssetOptions::default()
        };
        let instance = factory.spawn(
            &mut h.ctx(),
            SystemKind::Cylinder,
            &SpawnRequest::new("cylinder", Vec3::ZERO).with_options(options),
        );
        assert!(instance.rigid_body.is_none());
        assert_eq!(h.registry.static_len(), 1);
        assert_eq!(h.physics.bodies.len(), 0);
    }

    #[test]
    fn material_mode_override_uses_registry_cache() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let options = AssetOptions {
            material: Some(MaterialOverride {
                mode: Some(MaterialMode::Transparent),
                color: Some(Vec3::X),
            }),
            ..AssetOptions::default()
        };
        let instance = factory.spawn(
            &mut h.ctx(),
            SystemKind::Box,
            &SpawnRequest::new("box", Vec3::ZERO).with_options(options),
        );
        let mesh = h.scene.get(instance.visual_node).unwrap().mesh().unwrap();
        assert!(mesh.material.transparent);
        assert_eq!(h.registry.cached_materials(), 1);
    }

    #[test]
    fn spot_light_builds_target_and_debug_rig() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let options = AssetOptions {
            angle: Some(45.0),
            range: Some(4.0),
            target: Some(Vec3::new(0.0, 0.0, 0.0)),
            debug_helper: true,
            ..AssetOptions::default()
        };
        let instance = factory.spawn(
            &mut h.ctx(),
            SystemKind::SpotLight,
            &SpawnRequest::new("spot_light", Vec3::new(0.0, 4.0, 0.0)).with_options(options),
        );
        assert!(instance.rigid_body.is_none());

        let rig = factory.rigs()[0];
        assert_eq!(rig.light, instance.visual_node);
        let light = h.scene.get(rig.light).unwrap().light().unwrap();
        assert_eq!(light.target, rig.target);
        let target = h.scene.get(rig.target.unwrap()).unwrap();
        assert_eq!(target.transform.position, Vec3::new(0.0, -4.0, 0.0));

        let cone = h.scene.get(rig.cone.unwrap()).unwrap();
        assert!(!cone.visible);
        let radius = cone.mesh().unwrap().geometry.bounds.max.x;
        assert!((radius - 4.0).abs() < 1e-4);
    }

    #[test]
    fn debug_tick_follows_flag_and_light_edits() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let options = AssetOptions {
            debug_helper: true,
            ..AssetOptions::default()
        };
        let instance = factory.spawn(
            &mut h.ctx(),
            SystemKind::SpotLight,
            &SpawnRequest::new("spot_light", Vec3::ZERO).with_options(options),
        );
        let rig = factory.rigs()[0];

        if let Some(NodeKind::Light(l)) = h.scene.get_mut(instance.visual_node).map(|n| &mut n.kind) {
            l.range = 20.0;
        }
        let debug = DebugFlags {
            light_helpers: true,
            ..DebugFlags::default()
        };
        assert_eq!(factory.update_light_debug(&mut h.scene, debug), 1);
        let cone = h.scene.get(rig.cone.unwrap()).unwrap();
        assert!(cone.visible);
        assert!(h.scene.get(rig.helper.unwrap()).unwrap().visible);
        assert_eq!(cone.mesh().unwrap().geometry.bounds.min.y, -20.0);

        h.scene.remove_subtree(instance.visual_node);
        assert_eq!(factory.update_light_debug(&mut h.scene, debug), 0);
    }

    #[test]
    fn point_light_has_no_target() {
        let mut h = Harness::new();
        let mut factory = PrimitiveFactory::new();
        let instance = factory.spawn(
            &mut h.ctx(),
            SystemKind::PointLight,
            &SpawnRequest::new("light", Vec3::ONE),
        );
        let light = h.scene.get(instance.visual_node).unwrap().light().unwrap();
        assert_eq!(light.kind, LightKind::Point);
        assert!(light.target.is_none());
        assert!(factory.rigs().is_empty());
    }
}
