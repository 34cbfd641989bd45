//! Collision primitives: the player capsule, world triangles and boxes.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Triangles with less area than this are treated as degenerate.
const DEGENERATE_AREA: f32 = 1.0e-10;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// A box containing nothing. Growing it by any point yields that point.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from its corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut aabb, point| {
            aabb.grow(point);
            aabb
        })
    }

    /// Extend the box to contain `point`.
    #[inline]
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box grown by `margin` on every side.
    #[inline]
    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Whether the boxes overlap. Touching faces count as overlap.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Whether the box contains nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the longest axis (0 = x, 1 = y, 2 = z).
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }
}

/// A world-space triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    /// Create a triangle from its corners.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Cross product of the two edges leaving `a`. Length is twice the area.
    #[inline]
    pub fn scaled_normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Unit face normal following counter-clockwise winding, or `None` for
    /// degenerate triangles.
    pub fn normal(&self) -> Option<Vec3> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.scaled_normal().normalize())
    }

    /// Surface area.
    #[inline]
    pub fn area(&self) -> f32 {
        self.scaled_normal().length() * 0.5
    }

    /// Whether the triangle has (almost) no area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.area() > DEGENERATE_AREA)
    }

    /// Average of the three corners.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Bounding box of the corners.
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.a.min(self.b).min(self.c),
            max: self.a.max(self.b).max(self.c),
        }
    }

    /// Apply an affine transform to all corners.
    pub fn transformed(&self, transform: &Mat4) -> Triangle {
        Triangle {
            a: transform.transform_point3(self.a),
            b: transform.transform_point3(self.b),
            c: transform.transform_point3(self.c),
        }
    }
}

/// The player's collision volume: a line segment swept by a sphere.
///
/// `start` is the centre of the foot sphere and `end` the centre of the head
/// sphere. The camera is anchored at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Centre of the lower cap.
    pub start: Vec3,
    /// Centre of the upper cap (camera anchor).
    pub end: Vec3,
    /// Radius of the caps and the cylinder between them.
    pub radius: f32,
}

impl Capsule {
    /// Create a capsule from its core segment and radius.
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "capsule radius must be positive");
        Self { start, end, radius }
    }

    /// An upright capsule whose lowest point is `feet` and whose total height
    /// (cap to cap) is `height`.
    pub fn standing(feet: Vec3, height: f32, radius: f32) -> Self {
        let segment = (height - 2.0 * radius).max(0.0);
        let start = feet + Vec3::Y * radius;
        Self::new(start, start + Vec3::Y * segment, radius)
    }

    /// Move the whole capsule by `offset`.
    #[inline]
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Move the capsule so its lowest point sits at `feet`, keeping its shape.
    pub fn set_feet(&mut self, feet: Vec3) {
        let offset = feet - self.feet();
        self.translate(offset);
    }

    /// Lowest point of an upright capsule.
    #[inline]
    pub fn feet(&self) -> Vec3 {
        self.start - Vec3::Y * self.radius
    }

    /// Midpoint of the core segment.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Cap-to-cap length.
    #[inline]
    pub fn height(&self) -> f32 {
        self.start.distance(self.end) + 2.0 * self.radius
    }

    /// Bounds of the core segment grown by the radius.
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.start.min(self.end),
            max: self.start.max(self.end),
        }
        .expanded(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_aabb_union_and_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));

        assert!(!a.intersects(&b));
        let both = a.union(&b);
        assert!(both.contains(&a));
        assert!(both.contains(&b));

        // Shared face counts as overlap
        let c = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_empty_aabb() {
        assert!(Aabb::EMPTY.is_empty());
        let aabb = Aabb::from_points([Vec3::new(1.0, 2.0, 3.0)]);
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, aabb.max);
    }

    #[test]
    fn test_longest_axis() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn test_triangle_normal_follows_winding() {
        let normal = unit_triangle().normal().unwrap();
        assert_abs_diff_eq!(normal.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_triangle() {
        let flat = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert!(flat.is_degenerate());
        assert!(flat.normal().is_none());

        let point = Triangle::new(Vec3::ONE, Vec3::ONE, Vec3::ONE);
        assert!(point.is_degenerate());
    }

    #[test]
    fn test_standing_capsule() {
        let capsule = Capsule::standing(Vec3::new(1.0, 0.0, 2.0), 1.8, 0.35);
        assert_abs_diff_eq!(capsule.start.y, 0.35, epsilon = 1e-6);
        assert_abs_diff_eq!(capsule.end.y, 1.45, epsilon = 1e-6);
        assert_abs_diff_eq!(capsule.height(), 1.8, epsilon = 1e-6);
        assert_abs_diff_eq!(capsule.feet(), Vec3::new(1.0, 0.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_capsule_set_feet_keeps_shape() {
        let mut capsule = Capsule::standing(Vec3::ZERO, 1.8, 0.35);
        capsule.set_feet(Vec3::new(-2.0, 3.0, 4.0));
        assert_abs_diff_eq!(capsule.feet(), Vec3::new(-2.0, 3.0, 4.0), epsilon = 1e-6);
        assert_abs_diff_eq!(capsule.height(), 1.8, epsilon = 1e-5);
    }

    #[test]
    fn test_capsule_aabb() {
        let capsule = Capsule::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.5);
        let aabb = capsule.aabb();
        assert_eq!(aabb.min, Vec3::new(-0.5, 0.5, -0.5));
        assert_eq!(aabb.max, Vec3::new(0.5, 2.5, 0.5));
    }
}
