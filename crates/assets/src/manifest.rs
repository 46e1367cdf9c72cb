//! The declarative spawn document: `system_assets[]` and `custom_assets[]`.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use stagehand_scene::{MaterialMode, ShapeHint};
use std::path::Path;

use crate::document::read_document;
use crate::AssetError;

/// Explicit collider shape/size for a custom asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderOverride {
    pub shape: Option<ShapeHint>,
    /// Full box width; overrides the derived x extent.
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    pub radius: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialOverride {
    pub mode: Option<MaterialMode>,
    pub color: Option<Vec3>,
}

/// Per-spawn options. Every field is optional; factories fall back to the
/// type descriptor and runtime defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetOptions {
    /// Instance-id prefix; manifest entries use their stable id here.
    pub id: Option<String>,
    /// Visual node name.
    pub name: Option<String>,
    pub scale: Option<Vec3>,
    pub color: Option<Vec3>,
    pub mass: Option<f32>,
    pub restitution: Option<f32>,
    pub friction: Option<f32>,
    /// `false` spawns a static instance with no rigid body.
    pub physics: Option<bool>,
    /// `false` makes the body fixed instead of dynamic.
    pub gravity: Option<bool>,
    /// Allow the body to fall asleep.
    pub sleeping: Option<bool>,

    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    pub radius: Option<f32>,

    pub intensity: Option<f32>,
    pub range: Option<f32>,
    /// Spot half-angle in degrees.
    pub angle: Option<f32>,
    pub penumbra: Option<f32>,
    /// World-space point the light aims at.
    pub target: Option<Vec3>,
    /// Build the cone + helper debug visualization for a light.
    pub debug_helper: bool,

    pub material: Option<MaterialOverride>,
    pub collider: Option<ColliderOverride>,
}

impl AssetOptions {
    /// Fields set in `other` win.
    pub fn merged(&self, other: &AssetOptions) -> AssetOptions {
        macro_rules! pick {
            ($($field:ident),*) => {
                AssetOptions {
                    $($field: other.$field.clone().or_else(|| self.$field.clone()),)*
                    debug_helper: self.debug_helper || other.debug_helper,
                }
            };
        }
        pick!(
            id, name, scale, color, mass, restitution, friction, physics, gravity, sleeping,
            width, height, depth, radius, intensity, range, angle, penumbra, target, material,
            collider
        )
    }
}

/// A built-in primitive or light placed by the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAssetEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub config: AssetOptions,
    #[serde(default)]
    pub additional_properties: AssetOptions,
}

impl SystemAssetEntry {
    pub fn rotation_quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    pub fn options(&self) -> AssetOptions {
        let mut options = self.config.merged(&self.additional_properties);
        options.id = Some(self.id.clone());
        options
    }
}

/// A template-model asset placed by the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAssetEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default)]
    pub material: Option<MaterialOverride>,
    #[serde(default)]
    pub collider: Option<ColliderOverride>,
    #[serde(default)]
    pub mass: Option<f32>,
    #[serde(default)]
    pub restitution: Option<f32>,
    #[serde(default)]
    pub physics: Option<bool>,
}

impl CustomAssetEntry {
    pub fn rotation_quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    pub fn options(&self) -> AssetOptions {
        AssetOptions {
            id: Some(self.id.clone()),
            scale: self.scale,
            mass: self.mass,
            restitution: self.restitution,
            physics: self.physics,
            material: self.material,
            collider: self.collider,
            ..AssetOptions::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub system_assets: Vec<SystemAssetEntry>,
    pub custom_assets: Vec<CustomAssetEntry>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        read_document(path)
    }

    pub fn len(&self) -> usize {
        self.system_assets.len() + self.custom_assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn euler_to_quat(r: Vec3) -> Quat {
    Quat::from_euler(glam::EulerRot::XYZ, r.x, r.y, r.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "system_assets": [
            { "id": "floor", "type": "box", "position": [0, -0.5, 0],
              "config": { "width": 20, "height": 1, "depth": 20, "gravity": false },
              "additional_properties": { "color": [0.2, 0.2, 0.2] } },
            { "id": "lamp", "type": "spot_light", "position": [0, 5, 0],
              "config": { "angle": 30, "range": 12, "debug_helper": true } }
        ],
        "custom_assets": [
            { "id": "crate_01", "type": "crate", "position": [1, 2, 3],
              "rotation": [0, 1.57, 0], "mass": 4.0,
              "material": { "mode": "emissive_bright" },
              "collider": { "shape": "ball" } }
        ]
    }"#;

    #[test]
    fn parse_manifest() {
        let m: Manifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(m.len(), 3);
        let floor = &m.system_assets[0];
        assert_eq!(floor.asset_type, "box");
        let opts = floor.options();
        assert_eq!(opts.id.as_deref(), Some("floor"));
        assert_eq!(opts.width, Some(20.0));
        assert_eq!(opts.gravity, Some(false));
        assert_eq!(opts.color, Some(Vec3::splat(0.2)));
        assert!(m.system_assets[1].options().debug_helper);
    }

    #[test]
    fn custom_entry_options() {
        let m: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let c = &m.custom_assets[0];
        let opts = c.options();
        assert_eq!(opts.mass, Some(4.0));
        assert_eq!(
            opts.material.and_then(|mat| mat.mode),
            Some(MaterialMode::EmissiveBright)
        );
        assert_eq!(opts.collider.and_then(|col| col.shape), Some(ShapeHint::Ball));
        assert!(c.rotation_quat().angle_between(Quat::IDENTITY) > 1.0);
    }

    #[test]
    fn merged_prefers_other() {
        let a = AssetOptions {
            mass: Some(1.0),
            width: Some(2.0),
            ..AssetOptions::default()
        };
        let b = AssetOptions {
            mass: Some(5.0),
            ..AssetOptions::default()
        };
        let m = a.merged(&b);
        assert_eq!(m.mass, Some(5.0));
        assert_eq!(m.width, Some(2.0));
    }

    #[test]
    fn empty_document_is_empty_manifest() {
        let m: Manifest = serde_json::from_str("{}").unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn load_yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        std::fs::write(
            &path,
            "custom_assets:\n  - id: c1\n    type: crate\n    position: [0, 1, 0]\n",
        )
        .unwrap();
        let m = Manifest::load(&path).unwrap();
        assert_eq!(m.custom_assets[0].position, Vec3::new(0.0, 1.0, 0.0));
    }
}
