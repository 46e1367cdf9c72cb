use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Display-material variant chosen for model sub-meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialMode {
    Transparent,
    #[default]
    OpaqueDark,
    EmissiveBright,
}

impl MaterialMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transparent => "transparent",
            Self::OpaqueDark => "opaque_dark",
            Self::EmissiveBright => "emissive_bright",
        }
    }
}

/// Surface parameters the core reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
    pub opacity: f32,
    pub transparent: bool,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            color: Vec3::splat(0.8),
            opacity: 1.0,
            transparent: false,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
        }
    }
}

impl Material {
    pub fn colored(name: impl Into<String>, color: Vec3) -> Self {
        Self {
            name: name.into(),
            color,
            ..Self::default()
        }
    }

    /// Build the display material for one mode.
    pub fn for_mode(mode: MaterialMode, color: Vec3) -> Self {
        let name = format!("{}_{:.2}_{:.2}_{:.2}", mode.as_str(), color.x, color.y, color.z);
        match mode {
            MaterialMode::Transparent => Self {
                name,
                color,
                opacity: 0.35,
                transparent: true,
                ..Self::default()
            },
            MaterialMode::OpaqueDark => Self {
                name,
                color: color * 0.2,
                ..Self::default()
            },
            MaterialMode::EmissiveBright => Self {
                name,
                color,
                emissive: color,
                emissive_intensity: 2.0,
                ..Self::default()
            },
        }
    }
}
