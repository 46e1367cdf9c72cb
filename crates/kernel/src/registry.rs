use glam::Vec3;
use stagehand_common::{DebugFlags, IdAllocator, InstanceId};
use stagehand_physics::{PhysicsWorld, RigidBodyHandle, quat_from_rapier, vec3_from_rapier};
use stagehand_scene::{Material, MaterialMode, NodeId, SceneGraph};
use std::collections::{BTreeMap, HashMap};

use crate::emission::EmissionState;

/// One spawned, registered asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInstance {
    pub instance_id: InstanceId,
    /// Root visual node. The scene graph owns it; the registry only refers
    /// to it.
    pub visual_node: NodeId,
    pub rigid_body: Option<RigidBodyHandle>,
    pub asset_type: String,
}

impl AssetInstance {
    pub fn is_dynamic(&self) -> bool {
        self.rigid_body.is_some()
    }
}

/// Which partition an instance lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Visual node plus rigid body.
    Dynamic,
    /// Visual node only.
    Static,
}

/// Input to `InstanceRegistry::register`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstance {
    pub visual_node: NodeId,
    pub rigid_body: Option<RigidBodyHandle>,
    pub asset_type: String,
    /// Prefix for the generated id, typically the manifest asset id.
    pub id_prefix: Option<String>,
}

impl NewInstance {
    pub fn new(visual_node: NodeId, rigid_body: Option<RigidBodyHandle>) -> Self {
        Self {
            visual_node,
            rigid_body,
            asset_type: String::new(),
            id_prefix: None,
        }
    }
}

/// Counters from one `synchronize` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub updated: usize,
    pub skipped_sleeping: usize,
    pub woken: usize,
    pub missing_bodies: usize,
}

type MaterialKey = (MaterialMode, [u32; 3]);

/// Central store of live instances.
///
/// Instances are partitioned into dynamic (with body) and static (without).
/// An ownership index maps every node of an instance's subtree to the
/// instance id, so any sub-mesh resolves to its owning body in one lookup.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    dynamic: BTreeMap<InstanceId, AssetInstance>,
    statics: BTreeMap<InstanceId, AssetInstance>,
    owners: HashMap<NodeId, InstanceId>,
    ids: IdAllocator,
    materials: HashMap<MaterialKey, Material>,
    emission: EmissionState,
    debug: DebugFlags,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(debug: DebugFlags) -> Self {
        Self {
            debug,
            ..Self::default()
        }
    }

    pub fn set_debug(&mut self, debug: DebugFlags) {
        self.debug = debug;
    }

    pub fn len(&self) -> usize {
        self.dynamic.len() + self.statics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dynamic_len(&self) -> usize {
        self.dynamic.len()
    }

    pub fn static_len(&self) -> usize {
        self.statics.len()
    }

    /// Register a visual node (and optional body) under a fresh id.
    pub fn add(
        &mut self,
        scene: &mut SceneGraph,
        physics: &PhysicsWorld,
        visual_node: NodeId,
        rigid_body: Option<RigidBodyHandle>,
    ) -> InstanceId {
        self.register(scene, physics, NewInstance::new(visual_node, rigid_body))
            .instance_id
    }

    /// Register an instance.
    ///
    /// Writes the id onto the visual node, indexes its whole subtree, and,
    /// when a body is supplied, copies the body pose onto the node.
    pub fn register(
        &mut self,
        scene: &mut SceneGraph,
        physics: &PhysicsWorld,
        new: NewInstance,
    ) -> AssetInstance {
        let instance_id = match new.id_prefix.as_deref() {
            Some(prefix) => self.ids.next_prefixed(prefix),
            None => self.ids.next_id(),
        };

        let pose = new.rigid_body.and_then(|h| {
            let body = physics.body(h)?;
            Some((vec3_from_rapier(body.translation()), quat_from_rapier(body.rotation())))
        });
        if let Some(node) = scene.get_mut(new.visual_node) {
            node.tags.instance_id = Some(instance_id.clone());
            if let Some((position, rotation)) = pose {
                node.transform.position = position;
                node.transform.rotation = rotation;
            }
        }
        if new.rigid_body.is_some() && pose.is_none() {
            tracing::warn!(%instance_id, "registered with a body handle the physics world does not know");
        }

        for node in scene.descendants(new.visual_node) {
            if node != new.visual_node {
                if let Some(n) = scene.get_mut(node) {
                    n.tags.root_model.get_or_insert(new.visual_node);
                }
            }
            self.owners.insert(node, instance_id.clone());
        }

        let instance = AssetInstance {
            instance_id: instance_id.clone(),
            visual_node: new.visual_node,
            rigid_body: new.rigid_body,
            asset_type: new.asset_type,
        };
        if self.debug.positions {
            tracing::debug!(%instance_id, ?pose, "instance registered");
        }
        let partition = if instance.is_dynamic() {
            &mut self.dynamic
        } else {
            &mut self.statics
        };
        partition.insert(instance_id, instance.clone());
        instance
    }

    /// Map a node created after registration (e.g. a helper) to an owner.
    pub fn index_node(&mut self, node: NodeId, owner: &InstanceId) -> bool {
        if !self.contains(owner) {
            return false;
        }
        self.owners.insert(node, owner.clone());
        true
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.dynamic.contains_key(id) || self.statics.contains_key(id)
    }

    pub fn get(&self, id: &InstanceId) -> Option<&AssetInstance> {
        self.dynamic.get(id).or_else(|| self.statics.get(id))
    }

    pub fn partition_of(&self, id: &InstanceId) -> Option<Partition> {
        if self.dynamic.contains_key(id) {
            Some(Partition::Dynamic)
        } else if self.statics.contains_key(id) {
            Some(Partition::Static)
        } else {
            None
        }
    }

    pub fn dynamic_instances(&self) -> impl Iterator<Item = &AssetInstance> {
        self.dynamic.values()
    }

    pub fn static_instances(&self) -> impl Iterator<Item = &AssetInstance> {
        self.statics.values()
    }

    /// All instances, dynamic first.
    pub fn instances(&self) -> impl Iterator<Item = &AssetInstance> {
        self.dynamic.values().chain(self.statics.values())
    }

    pub fn instance_for_body(&self, body: RigidBodyHandle) -> Option<&AssetInstance> {
        self.dynamic
            .values()
            .find(|i| i.rigid_body == Some(body))
    }

    /// Copy body poses onto visual nodes. Call once per frame after the
    /// physics step.
    ///
    /// Sleeping non-kinematic bodies are skipped: they have not moved. A node
    /// flagged as in manual motion wakes its sleeping body.
    pub fn synchronize(&self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) -> SyncStats {
        let _span = tracing::debug_span!("registry_sync", bodies = self.dynamic.len()).entered();
        let mut stats = SyncStats::default();

        for instance in self.dynamic.values() {
            let Some(handle) = instance.rigid_body else {
                continue;
            };
            let manual = scene
                .get(instance.visual_node)
                .is_some_and(|n| n.tags.manual_motion);
            let Some(body) = physics.body_mut(handle) else {
                tracing::debug!(instance_id = %instance.instance_id, "no body for dynamic instance");
                stats.missing_bodies += 1;
                continue;
            };

            let sleeping = body.is_sleeping();
            if sleeping && manual {
                body.wake_up(true);
                stats.woken += 1;
            }
            if sleeping && !body.is_kinematic() {
                stats.skipped_sleeping += 1;
                continue;
            }

            let position = vec3_from_rapier(body.translation());
            let rotation = quat_from_rapier(body.rotation());
            if let Some(node) = scene.get_mut(instance.visual_node) {
                node.transform.position = position;
                node.transform.rotation = rotation;
                stats.updated += 1;
            }
            if self.debug.positions {
                tracing::trace!(instance_id = %instance.instance_id, ?position, "synced");
            }
        }
        stats
    }

    /// Resolve the instance owning an arbitrary node: the root model, a
    /// display sub-mesh or a collision sub-mesh all resolve alike.
    ///
    /// Tries, in order: the ownership index, the id tag on the node, the
    /// node's root-model back-reference, indexed ancestors, and finally a
    /// registered visual node with the same name.
    pub fn find_owner(&self, scene: &SceneGraph, node: NodeId) -> Option<&AssetInstance> {
        if let Some(found) = self.owners.get(&node).and_then(|id| self.get(id)) {
            return Some(found);
        }
        let target = scene.get(node)?;
        if let Some(found) = target.tags.instance_id.as_ref().and_then(|id| self.get(id)) {
            return Some(found);
        }
        if let Some(found) = target
            .tags
            .root_model
            .and_then(|root| self.owners.get(&root))
            .and_then(|id| self.get(id))
        {
            return Some(found);
        }
        if let Some(found) = scene
            .ancestors(node)
            .find_map(|a| self.owners.get(&a))
            .and_then(|id| self.get(id))
        {
            return Some(found);
        }
        self.instances().find(|i| {
            scene
                .get(i.visual_node)
                .is_some_and(|v| v.name == target.name)
        })
    }

    /// Body owning a node, if the owner is dynamic.
    pub fn find_owning_body(&self, scene: &SceneGraph, node: NodeId) -> Option<RigidBodyHandle> {
        let body = self.find_owner(scene, node).and_then(|i| i.rigid_body);
        if body.is_none() {
            tracing::debug!(?node, "no owning body");
        }
        body
    }

    /// Remove one instance: drop its nodes and its body.
    pub fn remove(
        &mut self,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        id: &InstanceId,
    ) -> bool {
        let Some(instance) = self.dynamic.remove(id).or_else(|| self.statics.remove(id)) else {
            return false;
        };
        // Activation accepts either key.
        self.emission.forget(id.as_str());
        if let Some(name) = scene.get(instance.visual_node).map(|n| n.name.clone()) {
            self.emission.forget(&name);
        }
        self.owners.retain(|_, owner| owner != id);
        scene.remove_subtree(instance.visual_node);
        if let Some(body) = instance.rigid_body {
            physics.remove_body(body);
        }
        tracing::debug!(instance_id = %id, "instance removed");
        true
    }

    /// Detach and dispose every instance, clear all auxiliary state and
    /// restart the id counter. Returns how many instances were removed.
    pub fn cleanup(&mut self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) -> usize {
        let count = self.len();
        for instance in self.dynamic.values().chain(self.statics.values()) {
            scene.remove_subtree(instance.visual_node);
            if let Some(body) = instance.rigid_body {
                physics.remove_body(body);
            }
        }
        self.dynamic.clear();
        self.statics.clear();
        self.owners.clear();
        self.materials.clear();
        self.emission.clear();
        self.ids.reset();
        tracing::info!(removed = count, "instance registry cleaned up");
        count
    }

    /// Shared display material for a mode and base color.
    pub fn display_material(&mut self, mode: MaterialMode, color: Vec3) -> Material {
        let key = (mode, color.to_array().map(f32::to_bits));
        self.materials
            .entry(key)
            .or_insert_with(|| Material::for_mode(mode, color))
            .clone()
    }

    pub fn cached_materials(&self) -> usize {
        self.materials.len()
    }

    fn named_static(&self, scene: &SceneGraph, name: &str) -> Option<NodeId> {
        self.statics
            .values()
            .find(|i| {
                i.instance_id.as_str() == name
                    || scene.get(i.visual_node).is_some_and(|n| n.name == name)
            })
            .map(|i| i.visual_node)
    }

    /// Highlight a named static instance.
    pub fn activate(&mut self, scene: &mut SceneGraph, name: &str) -> bool {
        let Some(root) = self.named_static(scene, name) else {
            tracing::debug!(%name, "no static instance to activate");
            return false;
        };
        self.emission.activate(scene, name, root)
    }

    pub fn deactivate(&mut self, scene: &mut SceneGraph, name: &str) -> bool {
        self.emission.deactivate(scene, name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.emission.is_active(name)
    }

    pub fn ids_issued(&self) -> u64 {
        self.ids.issued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use stagehand_physics::rapier3d::prelude::*;
    use stagehand_physics::{quat_to_rapier, vec3_to_rapier};
    use stagehand_scene::{Geometry, Mesh, MeshRole, NodeKind, ShapeHint};

    fn body_at(physics: &mut PhysicsWorld, p: Vec3, sleeping: bool) -> RigidBodyHandle {
        let h = physics.add_body(
            RigidBodyBuilder::dynamic()
                .translation(vec3_to_rapier(p))
                .sleeping(sleeping)
                .build(),
        );
        physics.add_collider(ColliderBuilder::ball(0.5).build(), h);
        h
    }

    fn model(scene: &mut SceneGraph) -> (NodeId, NodeId, NodeId) {
        let root = scene.create("crate", NodeKind::Group);
        let display = scene.create(
            "crate_body",
            NodeKind::Mesh(Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Material::default())),
        );
        let mut col = Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Material::default());
        col.role = MeshRole::Collision(ShapeHint::Cuboid);
        let collision = scene.create("col_box_01", NodeKind::Mesh(col));
        scene.add_child(root, display);
        scene.add_child(root, collision);
        (root, display, collision)
    }

    #[test]
    fn ids_unique_and_partitioned() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let mut ids = Vec::new();
        for i in 0..10 {
            let node = scene.create(format!("n{i}"), NodeKind::Group);
            let body = (i % 2 == 0).then(|| body_at(&mut physics, Vec3::ZERO, false));
            ids.push((reg.add(&mut scene, &physics, node, body), body.is_some()));
        }
        let mut unique: Vec<_> = ids.iter().map(|(id, _)| id.clone()).collect();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 10);
        for (id, dynamic) in &ids {
            let expected = if *dynamic {
                Partition::Dynamic
            } else {
                Partition::Static
            };
            assert_eq!(reg.partition_of(id), Some(expected));
        }
        assert_eq!(reg.dynamic_len(), 5);
        assert_eq!(reg.static_len(), 5);
    }

    #[test]
    fn add_writes_id_and_body_pose_onto_node() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = body_at(&mut physics, Vec3::new(1.0, 2.0, 3.0), false);
        let node = scene.create("ball", NodeKind::Group);
        let id = reg.add(&mut scene, &physics, node, Some(body));
        let n = scene.get(node).unwrap();
        assert_eq!(n.tags.instance_id.as_ref(), Some(&id));
        assert_eq!(n.transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn register_uses_prefix() {
        let mut scene = SceneGraph::new();
        let physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let node = scene.create("floor", NodeKind::Group);
        let inst = reg.register(
            &mut scene,
            &physics,
            NewInstance {
                id_prefix: Some("floor".into()),
                asset_type: "box".into(),
                ..NewInstance::new(node, None)
            },
        );
        assert_eq!(inst.instance_id.as_str(), "floor_0");
        assert_eq!(inst.asset_type, "box");
    }

    #[test]
    fn sleeping_body_does_not_touch_node() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = body_at(&mut physics, Vec3::new(0.0, 5.0, 0.0), true);
        let node = scene.create("sleepy", NodeKind::Group);
        reg.add(&mut scene, &physics, node, Some(body));

        // Move the body behind the registry's back without waking it.
        physics
            .body_mut(body)
            .unwrap()
            .set_translation(vec3_to_rapier(Vec3::new(9.0, 9.0, 9.0)), false);
        let before = scene.get(node).unwrap().transform;

        let stats = reg.synchronize(&mut scene, &mut physics);
        assert_eq!(stats.skipped_sleeping, 1);
        assert_eq!(stats.updated, 0);
        assert_eq!(scene.get(node).unwrap().transform, before);
    }

    #[test]
    fn awake_body_pose_is_copied_exactly() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = body_at(&mut physics, Vec3::ZERO, false);
        let node = scene.create("awake", NodeKind::Group);
        reg.add(&mut scene, &physics, node, Some(body));

        let rot = Quat::from_rotation_y(0.5);
        {
            let b = physics.body_mut(body).unwrap();
            b.set_translation(vec3_to_rapier(Vec3::new(1.0, 2.0, 3.0)), true);
            b.set_rotation(quat_to_rapier(rot), true);
        }
        let stats = reg.synchronize(&mut scene, &mut physics);
        assert_eq!(stats.updated, 1);

        let expected_pos = physics.body_translation(body).unwrap();
        let expected_rot = physics.body_rotation(body).unwrap();
        let t = scene.get(node).unwrap().transform;
        assert_eq!(t.position, expected_pos);
        assert_eq!(t.rotation, expected_rot);
    }

    #[test]
    fn sleeping_kinematic_body_is_still_copied() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = physics.add_body(
            RigidBodyBuilder::kinematic_position_based()
                .sleeping(true)
                .build(),
        );
        let node = scene.create("platform", NodeKind::Group);
        reg.add(&mut scene, &physics, node, Some(body));

        physics
            .body_mut(body)
            .unwrap()
            .set_translation(vec3_to_rapier(Vec3::new(2.0, 4.0, 6.0)), false);
        assert!(physics.body(body).unwrap().is_sleeping());

        let stats = reg.synchronize(&mut scene, &mut physics);
        assert_eq!(stats.skipped_sleeping, 0);
        assert_eq!(stats.updated, 1);
        let t = scene.get(node).unwrap().transform;
        assert_eq!(t.position, physics.body_translation(body).unwrap());
        assert_eq!(t.position, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(t.rotation, physics.body_rotation(body).unwrap());
    }

    #[test]
    fn manual_motion_wakes_sleeping_body() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = body_at(&mut physics, Vec3::ZERO, true);
        let node = scene.create("held", NodeKind::Group);
        reg.add(&mut scene, &physics, node, Some(body));
        scene.get_mut(node).unwrap().tags.manual_motion = true;

        let stats = reg.synchronize(&mut scene, &mut physics);
        assert_eq!(stats.woken, 1);
        assert!(!physics.body(body).unwrap().is_sleeping());
    }

    #[test]
    fn find_owning_body_from_any_sub_node() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let (root, display, collision) = model(&mut scene);
        let body = body_at(&mut physics, Vec3::ZERO, false);
        reg.add(&mut scene, &physics, root, Some(body));

        assert_eq!(reg.find_owning_body(&scene, root), Some(body));
        assert_eq!(reg.find_owning_body(&scene, display), Some(body));
        assert_eq!(reg.find_owning_body(&scene, collision), Some(body));
    }

    #[test]
    fn late_child_resolves_through_ancestors() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let (root, display, _) = model(&mut scene);
        let body = body_at(&mut physics, Vec3::ZERO, false);
        reg.add(&mut scene, &physics, root, Some(body));

        let decal = scene.create("decal", NodeKind::Group);
        scene.add_child(display, decal);
        assert_eq!(reg.find_owning_body(&scene, decal), Some(body));
    }

    #[test]
    fn name_fallback_and_miss() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let body = body_at(&mut physics, Vec3::ZERO, false);
        let node = scene.create("twin", NodeKind::Group);
        reg.add(&mut scene, &physics, node, Some(body));

        let stranger = scene.create("twin", NodeKind::Group);
        assert_eq!(reg.find_owning_body(&scene, stranger), Some(body));

        let nobody = scene.create("nobody", NodeKind::Group);
        assert_eq!(reg.find_owning_body(&scene, nobody), None);
    }

    #[test]
    fn static_instance_has_no_body() {
        let mut scene = SceneGraph::new();
        let physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let node = scene.create("wall", NodeKind::Group);
        reg.add(&mut scene, &physics, node, None);
        assert!(reg.find_owner(&scene, node).is_some());
        assert_eq!(reg.find_owning_body(&scene, node), None);
    }

    #[test]
    fn remove_drops_nodes_body_and_index() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let (root, display, _) = model(&mut scene);
        scene.attach(root);
        let body = body_at(&mut physics, Vec3::ZERO, false);
        let id = reg.add(&mut scene, &physics, root, Some(body));

        assert!(reg.remove(&mut scene, &mut physics, &id));
        assert!(!scene.contains(display));
        assert!(physics.body(body).is_none());
        assert!(reg.is_empty());
        assert!(!reg.remove(&mut scene, &mut physics, &id));
    }

    #[test]
    fn cleanup_clears_everything_and_resets_ids() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        for i in 0..3 {
            let node = scene.create(format!("n{i}"), NodeKind::Group);
            scene.attach(node);
            let body = body_at(&mut physics, Vec3::ZERO, false);
            reg.add(&mut scene, &physics, node, Some(body));
        }
        let wall = scene.create("wall", NodeKind::Group);
        scene.attach(wall);
        reg.add(&mut scene, &physics, wall, None);
        reg.display_material(MaterialMode::OpaqueDark, Vec3::ONE);
        reg.activate(&mut scene, "wall");

        assert_eq!(reg.cleanup(&mut scene, &mut physics), 4);
        assert!(reg.is_empty());
        assert_eq!(scene.len(), 1);
        assert_eq!(physics.bodies.len(), 0);
        assert_eq!(reg.cached_materials(), 0);
        assert!(!reg.is_active("wall"));
        assert_eq!(reg.ids_issued(), 0);
    }

    #[test]
    fn material_cache_shares_by_mode_and_color() {
        let mut reg = InstanceRegistry::new();
        reg.display_material(MaterialMode::Transparent, Vec3::ONE);
        reg.display_material(MaterialMode::Transparent, Vec3::ONE);
        reg.display_material(MaterialMode::EmissiveBright, Vec3::ONE);
        assert_eq!(reg.cached_materials(), 2);
    }

    #[test]
    fn activation_only_targets_static_instances() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let (root, _, _) = model(&mut scene);
        reg.add(&mut scene, &physics, root, None);
        let ball = scene.create("ball", NodeKind::Group);
        let body = body_at(&mut physics, Vec3::ZERO, false);
        reg.add(&mut scene, &physics, ball, Some(body));

        assert!(reg.activate(&mut scene, "crate"));
        assert!(reg.is_active("crate"));
        assert!(!reg.activate(&mut scene, "ball"));
        assert!(reg.deactivate(&mut scene, "crate"));
    }

    #[test]
    fn remove_forgets_activation_under_id_and_name() {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut reg = InstanceRegistry::new();
        let (root, _, _) = model(&mut scene);
        let id = reg.add(&mut scene, &physics, root, None);

        assert!(reg.activate(&mut scene, id.as_str()));
        assert!(reg.is_active(id.as_str()));
        assert!(reg.remove(&mut scene, &mut physics, &id));
        assert!(!reg.is_active(id.as_str()));
        assert!(!reg.is_active("crate"));
    }
}
