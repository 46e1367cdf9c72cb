use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in a mesh's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on the origin.
    pub fn from_half_extents(half: Vec3) -> Self {
        Self::new(-half, half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere around `center()` enclosing the box.
    pub fn enclosing_radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

/// The shape a geometry was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    /// `length` is the straight section; total height is `length + 2 * radius`.
    Capsule { radius: f32, length: f32 },
    Cylinder { radius: f32, height: f32 },
    /// Apex at the local origin, opening along -Y.
    Cone { radius: f32, height: f32 },
    /// Imported geometry described only by its bounds.
    Imported,
}

/// Geometry as seen by the core: bounds only, no vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub primitive: Primitive,
    pub bounds: Aabb,
    /// Bounding-sphere radius around `bounds.center()`.
    pub bounding_radius: f32,
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let bounds = Aabb::from_half_extents(Vec3::new(width, height, depth) * 0.5);
        Self {
            primitive: Primitive::Box {
                width,
                height,
                depth,
            },
            bounds,
            bounding_radius: bounds.enclosing_radius(),
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self {
            primitive: Primitive::Sphere { radius },
            bounds: Aabb::from_half_extents(Vec3::splat(radius)),
            bounding_radius: radius,
        }
    }

    pub fn capsule(radius: f32, length: f32) -> Self {
        let half_height = length * 0.5 + radius;
        Self {
            primitive: Primitive::Capsule { radius, length },
            bounds: Aabb::from_half_extents(Vec3::new(radius, half_height, radius)),
            bounding_radius: half_height,
        }
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        let bounds = Aabb::from_half_extents(Vec3::new(radius, height * 0.5, radius));
        Self {
            primitive: Primitive::Cylinder { radius, height },
            bounds,
            bounding_radius: bounds.enclosing_radius(),
        }
    }

    pub fn cone(radius: f32, height: f32) -> Self {
        let bounds = Aabb::new(Vec3::new(-radius, -height, -radius), Vec3::new(radius, 0.0, radius));
        Self {
            primitive: Primitive::Cone { radius, height },
            bounds,
            bounding_radius: bounds.enclosing_radius(),
        }
    }

    /// Geometry known only by its bounds; the sphere defaults to the box's
    /// enclosing sphere when no radius is supplied.
    pub fn from_bounds(bounds: Aabb, bounding_radius: Option<f32>) -> Self {
        Self {
            primitive: Primitive::Imported,
            bounds,
            bounding_radius: bounding_radius.unwrap_or_else(|| bounds.enclosing_radius()),
        }
    }
}
