use glam::{Quat, Vec3};
use stagehand_assets::{AssetOptions, TypeRegistry};
use stagehand_common::DebugFlags;
use stagehand_kernel::InstanceRegistry;
use stagehand_physics::PhysicsWorld;
use stagehand_scene::SceneGraph;

use crate::{InsertQueue, SpawnConfig};

/// Everything a factory touches while spawning, borrowed from the owning
/// stage for the duration of one call.
pub struct SpawnContext<'a> {
    pub scene: &'a mut SceneGraph,
    pub physics: &'a mut PhysicsWorld,
    pub registry: &'a mut InstanceRegistry,
    pub types: &'a TypeRegistry,
    pub queue: &'a mut InsertQueue,
    pub config: &'a SpawnConfig,
    pub debug: DebugFlags,
}

/// One spawn call: type id, world pose and options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub asset_type: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub options: AssetOptions,
}

impl SpawnRequest {
    pub fn new(asset_type: impl Into<String>, position: Vec3) -> Self {
        Self {
            asset_type: asset_type.into(),
            position,
            rotation: Quat::IDENTITY,
            options: AssetOptions::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_options(mut self, options: AssetOptions) -> Self {
        self.options = options;
        self
    }
}
