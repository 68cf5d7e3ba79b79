use glam::Vec2;
use parry2d::bounding_volume::{Aabb, BoundingVolume};
use parry2d::math::Point;

/// Axis-aligned box in world space
///
/// Used for character collision bounds and for the world-space footprint of
/// an active hitbox. Overlap is inclusive: boxes that share an edge touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Bounds {
    /// Create bounds from a center point and a full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size.abs() * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Convert to parry's bounding volume
    pub fn to_aabb(&self) -> Aabb {
        let min = self.min();
        let max = self.max();
        Aabb::new(Point::new(min.x, min.y), Point::new(max.x, max.y))
    }

    /// Check whether two boxes overlap or touch
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.to_aabb().intersects(&other.to_aabb())
    }

    /// Same box moved by an offset
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            half_extents: self.half_extents,
        }
    }
}
