use serde::{Deserialize, Serialize};
use stagehand_kernel::DEFAULT_FRICTION;
use stagehand_scene::MaterialMode;

/// Spawn-time defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Scene insertions performed per frame.
    pub insert_budget: usize,
    /// Display material mode for model meshes without an override.
    pub default_material_mode: MaterialMode,
    pub default_friction: f32,
    /// Whether new bodies may fall asleep.
    pub default_sleeping: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            insert_budget: 8,
            default_material_mode: MaterialMode::default(),
            default_friction: DEFAULT_FRICTION,
            default_sleeping: true,
        }
    }
}
