use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a spawned instance.
///
/// Ids are prefixed strings (`"crate_01_3"`, `"instance_7"`) so that manifest
/// asset ids stay visible in logs and inspector output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Monotonic counter producing unique instance ids.
///
/// Owned by the registry rather than living in a global; `reset` is called
/// from registry cleanup.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub const DEFAULT_PREFIX: &'static str = "instance";

    pub fn new() -> Self {
        Self::default()
    }

    /// Next raw counter value.
    pub fn next_raw(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Next id with the default prefix.
    pub fn next_id(&mut self) -> InstanceId {
        self.next_prefixed(Self::DEFAULT_PREFIX)
    }

    /// Next id with a caller-supplied prefix, e.g. a manifest asset id.
    pub fn next_prefixed(&mut self, prefix: &str) -> InstanceId {
        let n = self.next_raw();
        let prefix = if prefix.is_empty() {
            Self::DEFAULT_PREFIX
        } else {
            prefix
        };
        InstanceId(format!("{prefix}_{n}"))
    }

    /// Number of ids handed out since the last reset.
    pub fn issued(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose a matrix back into a transform.
    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, position) = m.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// A ray in world space, used for pointer picking and drag projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always normalized.
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; a zero direction falls back to -Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Flags gating debug-only behavior.
///
/// None of these may change control flow; they only enable extra logging or
/// helper visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugFlags {
    /// Log derived collider geometry.
    pub geometry: bool,
    /// Log body/visual positions during spawn and sync.
    pub positions: bool,
    /// Show light cone and helper nodes.
    pub light_helpers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_ids_are_unique_and_prefixed() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_prefixed("crate_01");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "instance_0");
        assert_eq!(b.as_str(), "crate_01_1");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn allocator_reset_restarts_counter() {
        let mut ids = IdAllocator::new();
        ids.next_id();
        ids.next_id();
        ids.reset();
        assert_eq!(ids.next_id().as_str(), "instance_0");
    }

    #[test]
    fn empty_prefix_uses_default() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_prefixed("").as_str(), "instance_0");
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_matrix_roundtrip_keeps_position() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(2.0));
        let back = Transform::from_matrix(t.to_matrix());
        assert!((back.position - t.position).length() < 1e-5);
        assert!((back.scale - t.scale).length() < 1e-5);
    }

    #[test]
    fn ray_normalizes_direction() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(r.direction, Vec3::NEG_Z);
        assert_eq!(r.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }
}
