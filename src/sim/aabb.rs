//! Axis-aligned bounding boxes
//!
//! Every entity in the world is a rectangle anchored at its top-left corner,
//! with y growing downward. Overlap is inclusive: boxes that share an edge
//! coordinate count as touching.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Inclusive overlap test on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }

    /// True when the box lies entirely within `[0, bounds]`
    pub fn inside(&self, bounds: Vec2) -> bool {
        let max = self.max();
        self.min.x >= 0.0 && self.min.y >= 0.0 && max.x <= bounds.x && max.y <= bounds.y
    }
}

/// Shared shape of every world entity: a position and a size
pub trait Body {
    fn pos(&self) -> Vec2;
    fn size(&self) -> Vec2;

    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos(), self.size())
    }

    fn overlaps<B: Body + ?Sized>(&self, other: &B) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Clamp a box position so it stays fully inside `[0, bounds]`
///
/// Boxes larger than the bounds pin to the origin.
pub fn clamp_inside(pos: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let max = (bounds - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}
