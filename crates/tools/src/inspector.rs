use glam::{Quat, Vec3};
use stagehand_common::InstanceId;
use stagehand_kernel::{AssetInstance, InstanceRegistry, Partition};
use stagehand_physics::PhysicsWorld;
use stagehand_scene::SceneGraph;

/// Registry inspector for developer tooling and the CLI.
pub struct RegistryInspector;

impl RegistryInspector {
    /// Counts across the registry. `queued` is the number of spawned nodes
    /// still waiting for scene insertion.
    pub fn summary(
        registry: &InstanceRegistry,
        physics: &PhysicsWorld,
        queued: usize,
    ) -> RegistrySummary {
        let sleeping = registry
            .dynamic_instances()
            .filter_map(|i| i.rigid_body)
            .filter_map(|h| physics.body(h))
            .filter(|b| b.is_sleeping())
            .count();
        RegistrySummary {
            dynamic: registry.dynamic_len(),
            statics: registry.static_len(),
            sleeping,
            queued,
            physics_steps: physics.steps(),
            cached_materials: registry.cached_materials(),
        }
    }

    pub fn inspect_instance(
        registry: &InstanceRegistry,
        scene: &SceneGraph,
        physics: &PhysicsWorld,
        id: &InstanceId,
    ) -> Option<InstanceInfo> {
        let instance = registry.get(id)?;
        Some(Self::info(registry, scene, physics, instance))
    }

    /// Every instance, dynamic first.
    pub fn list_instances(
        registry: &InstanceRegistry,
        scene: &SceneGraph,
        physics: &PhysicsWorld,
    ) -> Vec<InstanceInfo> {
        registry
            .instances()
            .map(|i| Self::info(registry, scene, physics, i))
            .collect()
    }

    fn info(
        registry: &InstanceRegistry,
        scene: &SceneGraph,
        physics: &PhysicsWorld,
        instance: &AssetInstance,
    ) -> InstanceInfo {
        let node = scene.get(instance.visual_node);
        let transform = node.map(|n| n.transform).unwrap_or_default();
        let body = instance.rigid_body.and_then(|h| physics.body(h));
        InstanceInfo {
            id: instance.instance_id.clone(),
            asset_type: instance.asset_type.clone(),
            name: node.map(|n| n.name.clone()).unwrap_or_default(),
            partition: registry
                .partition_of(&instance.instance_id)
                .unwrap_or(Partition::Static),
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
            attached: scene.is_attached(instance.visual_node),
            sleeping: body.map(|b| b.is_sleeping()),
            colliders: instance
                .rigid_body
                .map(|h| physics.body_colliders(h).len())
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySummary {
    pub dynamic: usize,
    pub statics: usize,
    pub sleeping: usize,
    pub queued: usize,
    pub physics_steps: u64,
    pub cached_materials: usize,
}

impl std::fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registry: dynamic={} static={} sleeping={} queued={} steps={} materials={}",
            self.dynamic,
            self.statics,
            self.sleeping,
            self.queued,
            self.physics_steps,
            self.cached_materials
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub id: InstanceId,
    pub asset_type: String,
    pub name: String,
    pub partition: Partition,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Whether the visual node has been inserted into the scene yet.
    pub attached: bool,
    pub sleeping: Option<bool>,
    pub colliders: usize,
}

impl std::fmt::Display for InstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.partition {
            Partition::Dynamic => "dynamic",
            Partition::Static => "static",
        };
        write!(
            f,
            "{} [{} {}] '{}' pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            kind,
            self.asset_type,
            self.name,
            self.position.x,
            self.position.y,
            self.position.z,
            self.scale.x,
            self.scale.y,
            self.scale.z,
        )?;
        if let Some(sleeping) = self.sleeping {
            write!(f, " colliders={} sleeping={sleeping}", self.colliders)?;
        }
        if !self.attached {
            write!(f, " (pending)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_physics::{ColliderBuilder, RigidBodyBuilder};
    use stagehand_scene::NodeKind;

    fn populated() -> (SceneGraph, PhysicsWorld, InstanceRegistry, InstanceId, InstanceId) {
        let mut scene = SceneGraph::new();
        let mut physics = PhysicsWorld::default();
        let mut registry = InstanceRegistry::new();

        let body = physics.add_body(RigidBodyBuilder::dynamic().sleeping(true).build());
        physics.add_collider(ColliderBuilder::ball(0.5).build(), body);
        let ball = scene.create("ball", NodeKind::Group);
        scene.attach(ball);
        let dynamic = registry.add(&mut scene, &physics, ball, Some(body));

        let wall = scene.create("wall", NodeKind::Group);
        let fixed = registry.add(&mut scene, &physics, wall, None);
        (scene, physics, registry, dynamic, fixed)
    }

    #[test]
    fn summary_empty_registry() {
        let registry = InstanceRegistry::new();
        let physics = PhysicsWorld::default();
        let summary = RegistryInspector::summary(&registry, &physics, 0);
        assert_eq!(summary.dynamic, 0);
        assert_eq!(summary.statics, 0);
    }

    #[test]
    fn summary_counts_partitions_and_sleepers() {
        let (_, physics, registry, _, _) = populated();
        let summary = RegistryInspector::summary(&registry, &physics, 3);
        assert_eq!(summary.dynamic, 1);
        assert_eq!(summary.statics, 1);
        assert_eq!(summary.sleeping, 1);
        assert!(format!("{summary}").contains("queued=3"));
    }

    #[test]
    fn inspect_dynamic_and_static() {
        let (scene, physics, registry, dynamic, fixed) = populated();
        let d = RegistryInspector::inspect_instance(&registry, &scene, &physics, &dynamic).unwrap();
        assert_eq!(d.partition, Partition::Dynamic);
        assert_eq!(d.colliders, 1);
        assert_eq!(d.sleeping, Some(true));
        assert!(d.attached);

        let s = RegistryInspector::inspect_instance(&registry, &scene, &physics, &fixed).unwrap();
        assert_eq!(s.partition, Partition::Static);
        assert_eq!(s.sleeping, None);
        assert!(format!("{s}").contains("(pending)"));
    }

    #[test]
    fn inspect_missing_instance() {
        let (scene, physics, registry, _, _) = populated();
        let missing = InstanceId::from("nope_9");
        assert!(RegistryInspector::inspect_instance(&registry, &scene, &physics, &missing).is_none());
    }

    #[test]
    fn list_puts_dynamic_first() {
        let (scene, physics, registry, dynamic, _) = populated();
        let all = RegistryInspector::list_instances(&registry, &scene, &physics);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, dynamic);
    }
}
