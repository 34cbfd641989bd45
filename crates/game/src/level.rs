//! Level geometry and spawn points.
//!
//! Levels are plain triangle soups. They are built synchronously before the
//! simulation starts and handed to the collision volume builder.

use flatwalk_physics::Triangle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned solid box, the building block of procedural levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBox {
    /// Center position.
    pub center: Vec3,

    /// Half-extents along each axis.
    pub half_extents: Vec3,
}

impl LevelBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Box spanning the two corners, in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Surface triangles of this box.
    pub fn triangles(&self) -> [Triangle; 12] {
        box_triangles(self.center, self.half_extents)
    }
}

/// A level containing collision geometry and a spawn point.
#[derive(Debug, Clone)]
pub struct Level {
    /// Display name.
    pub name: String,

    /// World-space collision triangles.
    pub triangles: Vec<Triangle>,

    /// Where the player's feet start.
    pub spawn: Vec3,
}

impl Level {
    /// Create a level from raw triangles.
    pub fn new(name: &str, triangles: Vec<Triangle>, spawn: Vec3) -> Self {
        Self {
            name: name.to_string(),
            triangles,
            spawn,
        }
    }

    /// Create a level from solid boxes.
    pub fn from_boxes(name: &str, boxes: &[LevelBox], spawn: Vec3) -> Self {
        let triangles = boxes.iter().flat_map(LevelBox::triangles).collect();
        Self::new(name, triangles, spawn)
    }

    /// A single square floor at y = 0, `half_size` meters from center to edge.
    pub fn flat_ground(half_size: f32) -> Self {
        let h = half_size;
        let triangles = vec![
            Triangle::new(Vec3::new(-h, 0.0, -h), Vec3::new(-h, 0.0, h), Vec3::new(h, 0.0, h)),
            Triangle::new(Vec3::new(-h, 0.0, -h), Vec3::new(h, 0.0, h), Vec3::new(h, 0.0, -h)),
        ];
        Self::new("flat_ground", triangles, Vec3::ZERO)
    }

    /// A two-room apartment.
    ///
    /// The floor is at y = 0 and the ceiling at y = 2.6. The west room spans
    /// x in [-6, 0] and holds the spawn point; the east room spans x in [0, 6]
    /// and holds a sofa. The rooms share a partition wall with a doorway at
    /// z in [-0.6, 0.6], 2.1 meters high.
    pub fn two_room_flat() -> Self {
        const CEILING: f32 = 2.6;
        const DOOR_HALF_WIDTH: f32 = 0.6;
        const DOOR_HEIGHT: f32 = 2.1;
        const WALL: f32 = 0.1;

        let (west, east) = (-6.0, 6.0);
        let (north, south) = (-8.0, 4.0);
        let wall_half_height = CEILING * 0.5;

        let boxes = [
            // Floor and ceiling slabs
            LevelBox::from_corners(
                Vec3::new(west - 2.0 * WALL, -2.0 * WALL, north - 2.0 * WALL),
                Vec3::new(east + 2.0 * WALL, 0.0, south + 2.0 * WALL),
            ),
            LevelBox::from_corners(
                Vec3::new(west - 2.0 * WALL, CEILING, north - 2.0 * WALL),
                Vec3::new(east + 2.0 * WALL, CEILING + 2.0 * WALL, south + 2.0 * WALL),
            ),
            // Outer walls
            LevelBox::new(
                Vec3::new(0.0, wall_half_height, north - WALL),
                Vec3::new(east + 2.0 * WALL, wall_half_height, WALL),
            ),
            LevelBox::new(
                Vec3::new(0.0, wall_half_height, south + WALL),
                Vec3::new(east + 2.0 * WALL, wall_half_height, WALL),
            ),
            LevelBox::from_corners(
                Vec3::new(west - 2.0 * WALL, 0.0, north),
                Vec3::new(west, CEILING, south),
            ),
            LevelBox::from_corners(Vec3::new(east, 0.0, north), Vec3::new(east + 2.0 * WALL, CEILING, south)),
            // Partition with a doorway and lintel
            LevelBox::from_corners(
                Vec3::new(-WALL, 0.0, north),
                Vec3::new(WALL, CEILING, -DOOR_HALF_WIDTH),
            ),
            LevelBox::from_corners(
                Vec3::new(-WALL, 0.0, DOOR_HALF_WIDTH),
                Vec3::new(WALL, CEILING, south),
            ),
            LevelBox::from_corners(
                Vec3::new(-WALL, DOOR_HEIGHT, -DOOR_HALF_WIDTH),
                Vec3::new(WALL, CEILING, DOOR_HALF_WIDTH),
            ),
            // Sofa
            LevelBox::new(Vec3::new(3.0, 0.25, 2.5), Vec3::new(1.0, 0.25, 0.5)),
        ];

        Self::from_boxes("two_room_flat", &boxes, Vec3::new(-2.0, 0.5, -4.5))
    }
}

/// Triangulate the surface of an axis-aligned box.
///
/// Faces are wound counter-clockwise seen from outside, so every triangle
/// normal points away from the box.
pub fn box_triangles(center: Vec3, half_extents: Vec3) -> [Triangle; 12] {
    let corner = |sx: f32, sy: f32, sz: f32| center + half_extents * Vec3::new(sx, sy, sz);

    // Corners indexed by bits: x = 1, y = 2, z = 4
    let c: [Vec3; 8] = std::array::from_fn(|i| {
        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
        corner(sign(1), sign(2), sign(4))
    });

    // Each face as a counter-clockwise quad seen from outside
    let faces = [
        [c[1], c[3], c[7], c[5]], // +X
        [c[0], c[4], c[6], c[2]], // -X
        [c[2], c[6], c[7], c[3]], // +Y
        [c[0], c[1], c[5], c[4]], // -Y
        [c[4], c[5], c[7], c[6]], // +Z
        [c[0], c[2], c[3], c[1]], // -Z
    ];

    let mut triangles = [Triangle::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO); 12];
    for (i, [a, b, c, d]) in faces.into_iter().enumerate() {
        triangles[2 * i] = Triangle::new(a, b, c);
        triangles[2 * i + 1] = Triangle::new(a, c, d);
    }
    triangles
}
