use stagehand_assets::{TemplateLoader, TypeRegistry};
use stagehand_common::DebugFlags;
use stagehand_kernel::AssetInstance;
use stagehand_scene::SceneGraph;

use crate::{ModelFactory, PrimitiveFactory, SpawnContext, SpawnError, SpawnRequest, SystemKind};

/// Where a type id is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    System(SystemKind),
    /// Template model by canonical type key.
    Model(String),
}

/// Routes spawn requests to the primitive/light factory or the model
/// factory, and owns both.
pub struct SpawnDispatcher {
    primitives: PrimitiveFactory,
    models: ModelFactory,
}

impl SpawnDispatcher {
    pub fn new(loader: Box<dyn TemplateLoader>) -> Self {
        Self {
            primitives: PrimitiveFactory::new(),
            models: ModelFactory::new(loader),
        }
    }

    pub fn primitives(&self) -> &PrimitiveFactory {
        &self.primitives
    }

    pub fn models(&self) -> &ModelFactory {
        &self.models
    }

    /// Built-ins first, then the type registry once it has loaded.
    pub fn route(types: &TypeRegistry, asset_type: &str) -> Option<Route> {
        if let Some(kind) = SystemKind::from_type(asset_type) {
            return Some(Route::System(kind));
        }
        if types.is_loaded() && types.recognizes(asset_type) {
            return Some(Route::Model(types.resolve(asset_type).to_string()));
        }
        None
    }

    pub fn try_spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        request: &SpawnRequest,
    ) -> Result<AssetInstance, SpawnError> {
        match Self::route(ctx.types, &request.asset_type) {
            Some(Route::System(kind)) => Ok(self.primitives.spawn(ctx, kind, request)),
            Some(Route::Model(key)) => self.models.spawn(ctx, &key, request),
            None => Err(SpawnError::UnknownType(request.asset_type.clone())),
        }
    }

    /// Spawn boundary: failures are logged and come back as `None`.
    pub fn spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        request: &SpawnRequest,
    ) -> Option<AssetInstance> {
        match self.try_spawn(ctx, request) {
            Ok(instance) => Some(instance),
            Err(e) => {
                tracing::warn!(asset_type = %request.asset_type, error = %e, "spawn failed");
                None
            }
        }
    }

    pub fn update_light_debug(&mut self, scene: &mut SceneGraph, debug: DebugFlags) -> usize {
        self.primitives.update_light_debug(scene, debug)
    }

    /// Forget light rigs and cached templates.
    pub fn reset(&mut self) {
        self.primitives.clear();
        self.models.clear();
    }
}
