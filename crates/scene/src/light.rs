use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Point,
    Spot,
    Directional,
}

/// Light parameters attached to a light node.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    /// Reach in world units; 0 means unbounded.
    pub range: f32,
    /// Half-angle of the spot cone, radians.
    pub angle: f32,
    pub penumbra: f32,
    /// Node the light points at (spot and directional lights).
    pub target: Option<NodeId>,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            angle: std::f32::consts::FRAC_PI_6,
            penumbra: 0.0,
            target: None,
        }
    }

    /// Radius of the cone base at `range`.
    pub fn cone_radius(&self) -> f32 {
        self.range * self.angle.tan()
    }
}
