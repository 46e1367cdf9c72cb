use glam::{Quat, Vec3};
use stagehand_assets::{
    AssetError, AssetOptions, Manifest, MemoryTemplateLoader, TemplateLoader, TypeRegistry,
};
use stagehand_common::{DebugFlags, InstanceId, Ray};
use stagehand_input::{Action, ManipulationController, Outcome};
use stagehand_kernel::{AssetInstance, InstanceRegistry, SyncStats};
use stagehand_physics::{PhysicsWorld, RigidBodyHandle};
use stagehand_scene::{NodeId, SceneGraph};
use stagehand_spawn::{InsertQueue, SpawnContext, SpawnDispatcher, SpawnError, SpawnRequest};
use std::path::Path;
use std::time::Instant;

use crate::RuntimeConfig;

/// What one `frame` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub inserted: usize,
    pub sync: SyncStats,
    pub light_rigs: usize,
}

/// Outcome of populating from a manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateReport {
    pub spawned: Vec<InstanceId>,
    /// Manifest ids that failed to spawn.
    pub failed: Vec<String>,
}

/// Runtime context: scene, physics, both registries, the spawn pipeline and
/// the manipulation controller.
///
/// Dropping the stage releases everything; `cleanup` empties it in place.
pub struct Stage {
    config: RuntimeConfig,
    scene: SceneGraph,
    physics: PhysicsWorld,
    registry: InstanceRegistry,
    types: TypeRegistry,
    dispatcher: SpawnDispatcher,
    queue: InsertQueue,
    controller: ManipulationController,
    frames: u64,
}

impl Stage {
    /// A stage whose model factory has no templates.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_loader(config, Box::new(MemoryTemplateLoader::new()))
    }

    pub fn with_loader(config: RuntimeConfig, loader: Box<dyn TemplateLoader>) -> Self {
        Self {
            scene: SceneGraph::new(),
            physics: PhysicsWorld::new(config.physics),
            registry: InstanceRegistry::with_debug(config.debug),
            types: TypeRegistry::new(),
            dispatcher: SpawnDispatcher::new(loader),
            queue: InsertQueue::new(config.spawn.insert_budget),
            controller: ManipulationController::new(config.manipulation.clone()),
            frames: 0,
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn controller(&self) -> &ManipulationController {
        &self.controller
    }

    pub fn dispatcher(&self) -> &SpawnDispatcher {
        &self.dispatcher
    }

    pub fn pending_insertions(&self) -> usize {
        self.queue.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_debug(&mut self, debug: DebugFlags) {
        self.config.debug = debug;
        self.registry.set_debug(debug);
    }

    /// Load the asset type table. Later calls are no-ops.
    pub fn load_types(&mut self, path: impl AsRef<Path>) -> Result<usize, AssetError> {
        self.types.load_path(path)
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    fn spawn_context(&mut self) -> (&mut SpawnDispatcher, SpawnContext<'_>) {
        (
            &mut self.dispatcher,
            SpawnContext {
                scene: &mut self.scene,
                physics: &mut self.physics,
                registry: &mut self.registry,
                types: &self.types,
                queue: &mut self.queue,
                config: &self.config.spawn,
                debug: self.config.debug,
            },
        )
    }

    /// Spawn one asset. Unresolvable types and load failures are logged and
    /// yield `None`.
    pub fn spawn(
        &mut self,
        asset_type: &str,
        position: Vec3,
        rotation: Quat,
        options: AssetOptions,
    ) -> Option<AssetInstance> {
        let request = SpawnRequest::new(asset_type, position)
            .with_rotation(rotation)
            .with_options(options);
        self.spawn_request(&request)
    }

    pub fn spawn_request(&mut self, request: &SpawnRequest) -> Option<AssetInstance> {
        let (dispatcher, mut ctx) = self.spawn_context();
        dispatcher.spawn(&mut ctx, request)
    }

    pub fn try_spawn(&mut self, request: &SpawnRequest) -> Result<AssetInstance, SpawnError> {
        let (dispatcher, mut ctx) = self.spawn_context();
        dispatcher.try_spawn(&mut ctx, request)
    }

    /// Spawn every manifest entry, each under its manifest id.
    pub fn populate(&mut self, manifest: &Manifest) -> PopulateReport {
        let _span = tracing::info_span!("populate", assets = manifest.len()).entered();
        let mut report = PopulateReport::default();

        let system = manifest.system_assets.iter().map(|e| {
            let request = SpawnRequest::new(e.asset_type.clone(), e.position)
                .with_rotation(e.rotation_quat())
                .with_options(e.options());
            (e.id.clone(), request)
        });
        let custom = manifest.custom_assets.iter().map(|e| {
            let request = SpawnRequest::new(e.asset_type.clone(), e.position)
                .with_rotation(e.rotation_quat())
                .with_options(e.options());
            (e.id.clone(), request)
        });
        let requests: Vec<_> = system.chain(custom).collect();

        for (id, request) in requests {
            match self.spawn_request(&request) {
                Some(instance) => report.spawned.push(instance.instance_id),
                None => report.failed.push(id),
            }
        }
        tracing::info!(
            spawned = report.spawned.len(),
            failed = report.failed.len(),
            "manifest populated"
        );
        report
    }

    /// One frame: drain the insertion queue within budget, step physics,
    /// copy body poses onto visuals, then refresh light debug rigs.
    pub fn frame(&mut self) -> FrameStats {
        let _span = tracing::debug_span!("frame", n = self.frames).entered();
        let inserted = self.queue.drain(&mut self.scene);
        self.physics.step();
        let sync = self.registry.synchronize(&mut self.scene, &mut self.physics);
        let light_rigs = self
            .dispatcher
            .update_light_debug(&mut self.scene, self.config.debug);
        self.frames += 1;
        FrameStats {
            inserted,
            sync,
            light_rigs,
        }
    }

    /// Sync visuals from bodies without stepping.
    pub fn synchronize(&mut self) -> SyncStats {
        self.registry.synchronize(&mut self.scene, &mut self.physics)
    }

    /// Attach everything still queued, ignoring the per-frame budget.
    pub fn flush_insertions(&mut self) -> usize {
        self.queue.flush(&mut self.scene)
    }

    pub fn find_owning_body(&self, node: NodeId) -> Option<RigidBodyHandle> {
        self.registry.find_owning_body(&self.scene, node)
    }

    pub fn grab(&mut self, node: NodeId, viewpoint: Vec3, now: Instant) -> Option<RigidBodyHandle> {
        self.controller.grab(
            &mut self.scene,
            &mut self.physics,
            &self.registry,
            node,
            viewpoint,
            now,
        )
    }

    pub fn drag(&mut self, ray: &Ray, now: Instant) -> Option<Vec3> {
        self.controller.drag(&mut self.physics, ray, now)
    }

    pub fn release(&mut self, now: Instant) -> Option<Vec3> {
        self.controller.release(&mut self.scene, &mut self.physics, now)
    }

    pub fn shove(&mut self, node: NodeId, source: Vec3) -> Option<Vec3> {
        self.controller
            .shove(&self.scene, &mut self.physics, &self.registry, node, source)
    }

    pub fn zoom_in(&mut self) -> Option<f32> {
        self.controller.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Option<f32> {
        self.controller.zoom_out()
    }

    pub fn apply(&mut self, action: &Action, now: Instant) -> Outcome {
        self.controller.apply(
            action,
            &mut self.scene,
            &mut self.physics,
            &self.registry,
            now,
        )
    }

    pub fn activate(&mut self, name: &str) -> bool {
        self.registry.activate(&mut self.scene, name)
    }

    pub fn deactivate(&mut self, name: &str) -> bool {
        self.registry.deactivate(&mut self.scene, name)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.registry.is_active(name)
    }

    /// Remove one instance. A held instance is dropped from the grab first.
    pub fn remove(&mut self, id: &InstanceId) -> bool {
        let held = self.controller.session().map(|s| s.body);
        if held.is_some() && held == self.registry.get(id).and_then(|i| i.rigid_body) {
            self.controller.cancel(&mut self.scene, &mut self.physics);
        }
        self.registry
            .remove(&mut self.scene, &mut self.physics, id)
    }

    /// Dispose every instance and reset ids, caches, light rigs and the
    /// insertion queue. The type registry stays loaded.
    pub fn cleanup(&mut self) -> usize {
        self.controller.cancel(&mut self.scene, &mut self.physics);
        self.queue.clear();
        self.dispatcher.reset();
        self.registry.cleanup(&mut self.scene, &mut self.physics)
    }
}
