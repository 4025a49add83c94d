use glam::{IVec2, Vec2, Vec3};

/// Axis-aligned bound in object/camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Box3 {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend(p);
        }
        b
    }

    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Box3) -> Box3 {
        Box3 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True if every finite component is finite and the bound is non-empty.
    pub fn is_finite(&self) -> bool {
        !self.is_empty() && self.min.is_finite() && self.max.is_finite()
    }

    pub fn xy(&self) -> Box2 {
        Box2 {
            min: self.min.truncate(),
            max: self.max.truncate(),
        }
    }
}

/// Axis-aligned bound in raster/screen space, `f32`-valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub fn empty() -> Self {
        Self {
            min: Vec2::splat(f32::INFINITY),
            max: Vec2::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn intersects(&self, other: &Box2) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y)
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Box2) -> Box2 {
        Box2 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Axis-aligned bound in integer bucket/leaf coordinates, half-open
/// (`[min, max)` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Box2i {
    pub min: IVec2,
    pub max: IVec2,
}

impl Box2i {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Disjointness test used by the occlusion quadtree and the split store:
    /// two half-open integer boxes fail to overlap if one's min is at or past
    /// the other's max on either axis.
    pub fn disjoint(&self, other: &Box2i) -> bool {
        self.min.x >= other.max.x
            || self.max.x <= other.min.x
            || self.min.y >= other.max.y
            || self.max.y <= other.min.y
    }

    pub fn clamp_to(&self, bound: &Box2i) -> Box2i {
        Box2i {
            min: self.min.clamp(bound.min, bound.max),
            max: self.max.clamp(bound.min, bound.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box3_extend_grows_to_contain_points() {
        let mut b = Box3::empty();
        b.extend(Vec3::new(1.0, -2.0, 3.0));
        b.extend(Vec3::new(-1.0, 5.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
        assert!(b.is_finite());
    }

    #[test]
    fn box2i_disjoint_detects_touching_but_not_overlapping() {
        let a = Box2i::new(IVec2::new(0, 0), IVec2::new(2, 2));
        let b = Box2i::new(IVec2::new(2, 0), IVec2::new(4, 2));
        assert!(a.disjoint(&b), "half-open boxes sharing only an edge don't overlap");
        let c = Box2i::new(IVec2::new(1, 1), IVec2::new(3, 3));
        assert!(!a.disjoint(&c));
    }
}
