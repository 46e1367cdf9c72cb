use stagehand_assets::TypeRegistry;
use stagehand_common::DebugFlags;
use stagehand_kernel::InstanceRegistry;
use stagehand_physics::PhysicsWorld;
use stagehand_scene::SceneGraph;

use crate::{InsertQueue, SpawnConfig, SpawnContext};

/// Owns everything a `SpawnContext` borrows.
pub struct Harness {
    pub scene: SceneGraph,
    pub physics: PhysicsWorld,
    pub registry: InstanceRegistry,
    pub types: TypeRegistry,
    pub queue: InsertQueue,
    pub config: SpawnConfig,
    pub debug: DebugFlags,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            scene: SceneGraph::new(),
            physics: PhysicsWorld::default(),
            registry: InstanceRegistry::new(),
            types: TypeRegistry::new(),
            queue: InsertQueue::default(),
            config: SpawnConfig::default(),
            debug: DebugFlags::default(),
        }
    }

    pub fn ctx(&mut self) -> SpawnContext<'_> {
        SpawnContext {
            scene: &mut self.scene,
            physics: &mut self.physics,
            registry: &mut self.registry,
            types: &self.types,
            queue: &mut self.queue,
            config: &self.config,
            debug: self.debug,
        }
    }
}
