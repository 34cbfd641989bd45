//! Capsule-versus-triangle penetration tests.
//!
//! The narrow phase runs on parry3d. Both shapes are moved into a frame
//! centred on the capsule before the query, so precision near the player does
//! not depend on how far the triangle's corners reach.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real};
use parry3d::query;
use parry3d::shape as pshape;
use serde::{Deserialize, Serialize};

use super::shape::{Capsule, Triangle};

/// Contact normals at least this parallel to the face normal are face
/// contacts and take the exact face normal.
const FACE_ALIGNMENT: f32 = 0.9995;

/// Result of a penetrating capsule query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unit vector pointing out of the surface, toward the capsule axis.
    pub normal: Vec3,
    /// How far the capsule must move along `normal` to stop penetrating.
    pub depth: f32,
}

impl Contact {
    /// Whether this contact counts as standing on a floor.
    ///
    /// Any upward-facing normal qualifies, however steep.
    #[inline]
    pub fn is_floor(&self) -> bool {
        self.normal.y > 0.0
    }

    /// Translation that pushes the capsule out of the surface.
    #[inline]
    pub fn correction(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// Test a capsule against one triangle.
///
/// Returns `None` when the triangle is degenerate or the capsule does not
/// overlap it. Both faces of the triangle are solid.
pub fn capsule_triangle_contact(capsule: &Capsule, triangle: &Triangle) -> Option<Contact> {
    let face_normal = triangle.normal()?;
    let origin = capsule.center();

    let local_triangle = pshape::Triangle::new(
        to_point(triangle.a - origin),
        to_point(triangle.b - origin),
        to_point(triangle.c - origin),
    );
    let local_capsule = pshape::Capsule::new(
        to_point(capsule.start - origin),
        to_point(capsule.end - origin),
        capsule.radius,
    );

    let identity = Isometry::identity();
    let result = query::contact(&identity, &local_triangle, &identity, &local_capsule, 0.0)
        .ok()
        .flatten()?;

    let depth = -result.dist;
    if !(depth > 0.0) {
        return None;
    }

    // normal1 leaves the triangle toward the capsule
    let normal = Vec3::new(result.normal1.x, result.normal1.y, result.normal1.z);
    let alignment = normal.dot(face_normal);
    let normal = if alignment >= FACE_ALIGNMENT {
        face_normal
    } else if alignment <= -FACE_ALIGNMENT {
        -face_normal
    } else {
        normal
    };

    Some(Contact { normal, depth })
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}
