use glam::Vec3;
use stagehand_scene::{NodeId, SceneGraph};
use std::collections::HashMap;

/// Emissive color written onto every mesh of an activated object.
pub const HIGHLIGHT_EMISSIVE: Vec3 = Vec3::new(1.0, 0.85, 0.4);
pub const HIGHLIGHT_INTENSITY: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedEmissive {
    node: NodeId,
    emissive: Vec3,
    intensity: f32,
}

/// Highlight toggling for named static instances.
///
/// Original emissive values are captured on first activation and written
/// back on deactivation.
#[derive(Debug, Clone, Default)]
pub struct EmissionState {
    active: HashMap<String, bool>,
    originals: HashMap<String, Vec<SavedEmissive>>,
}

impl EmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.get(name).copied().unwrap_or(false)
    }

    /// Light up every mesh under `root`. Returns false if already active.
    pub fn activate(&mut self, scene: &mut SceneGraph, name: &str, root: NodeId) -> bool {
        if self.is_active(name) {
            return false;
        }
        let nodes = scene.descendants(root);
        let saved = self.originals.entry(name.to_string()).or_insert_with(|| {
            nodes
                .iter()
                .filter_map(|id| {
                    let mesh = scene.get(*id)?.mesh()?;
                    Some(SavedEmissive {
                        node: *id,
                        emissive: mesh.material.emissive,
                        intensity: mesh.material.emissive_intensity,
                    })
                })
                .collect()
        });
        for s in saved.iter() {
            if let Some(mesh) = scene.get_mut(s.node).and_then(|n| n.mesh_mut()) {
                mesh.material.emissive = HIGHLIGHT_EMISSIVE;
                mesh.material.emissive_intensity = HIGHLIGHT_INTENSITY;
            }
        }
        self.active.insert(name.to_string(), true);
        true
    }

    /// Restore cached emissive values. Returns false if not active.
    pub fn deactivate(&mut self, scene: &mut SceneGraph, name: &str) -> bool {
        if !self.is_active(name) {
            return false;
        }
        if let Some(saved) = self.originals.remove(name) {
            for s in saved {
                if let Some(mesh) = scene.get_mut(s.node).and_then(|n| n.mesh_mut()) {
                    mesh.material.emissive = s.emissive;
                    mesh.material.emissive_intensity = s.intensity;
                }
            }
        }
        self.active.remove(name);
        true
    }

    /// Forget state for one object without touching the scene.
    pub fn forget(&mut self, name: &str) {
        self.active.remove(name);
        self.originals.remove(name);
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.originals.clear();
    }

    pub fn active_count(&self) -> usize {
        self.active.values().filter(|a| **a).count()
    }
}
