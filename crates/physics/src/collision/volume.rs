//! Static collision volume hierarchy over world triangles.
//!
//! The volume is built once from the level's triangle soup and is immutable
//! afterwards. Queries descend a bounding-volume tree, skipping every subtree
//! whose box misses the capsule's box, and run the exact capsule test only on
//! the triangles left in the surviving leaves.

use std::ops::Range;

use glam::{Mat4, Vec3};

use super::contact::{capsule_triangle_contact, Contact};
use super::shape::{Aabb, Capsule, Triangle};

/// Maximum number of triangles stored in one leaf.
pub const LEAF_CAPACITY: usize = 8;

/// A node of the bounding-volume tree.
#[derive(Debug, Clone)]
enum Node {
    /// Triangles `range` of the volume's (reordered) triangle list.
    Leaf { bounds: Aabb, range: Range<usize> },
    /// Two subtrees and the box enclosing both.
    Branch {
        bounds: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bounds(&self) -> &Aabb {
        match self {
            Node::Leaf { bounds, .. } | Node::Branch { bounds, .. } => bounds,
        }
    }

    fn count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => 1 + left.count() + right.count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Immutable spatial index answering capsule-versus-world queries.
///
/// # Thread Safety
///
/// Nothing mutates the volume after [`CollisionVolume::build`], so it can be
/// shared behind an `Arc` and queried from any thread.
#[derive(Debug, Clone, Default)]
pub struct CollisionVolume {
    /// Triangles, reordered so each leaf owns a contiguous range.
    triangles: Vec<Triangle>,
    /// Root of the tree, `None` when there is no geometry.
    root: Option<Node>,
    /// Degenerate triangles dropped during the build.
    skipped: usize,
}

impl CollisionVolume {
    /// A volume with no geometry. Every query reports no contact.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the hierarchy from world-space triangles.
    ///
    /// Zero-area triangles are dropped; they cannot change the outcome of a
    /// capsule query.
    pub fn build(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let mut kept = Vec::new();
        let mut skipped = 0;
        for triangle in triangles {
            if triangle.is_degenerate() {
                skipped += 1;
            } else {
                kept.push(triangle);
            }
        }

        let root = if kept.is_empty() {
            None
        } else {
            Some(build_node(&mut kept, 0))
        };

        let volume = Self {
            triangles: kept,
            root,
            skipped,
        };

        log::debug!(
            "built collision volume: {} triangles ({} degenerate skipped), {} nodes, depth {}",
            volume.triangle_count(),
            volume.skipped,
            volume.node_count(),
            volume.depth()
        );

        volume
    }

    /// Build from an indexed mesh placed in the world by `transform`.
    ///
    /// Faces referencing a vertex index past the end of `vertices` are
    /// ignored.
    pub fn from_indexed_mesh(vertices: &[Vec3], indices: &[[u32; 3]], transform: Mat4) -> Self {
        Self::build(mesh_triangles(vertices, indices, transform))
    }

    /// Find the deepest penetration between `capsule` and the world.
    ///
    /// When several triangles are penetrated to the same depth, the first one
    /// reached in traversal order wins.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let root = self.root.as_ref()?;
        let query = capsule.aabb();
        let mut deepest = None;
        self.collect_deepest(root, capsule, &query, &mut deepest);
        deepest
    }

    /// Triangles whose bounds overlap `region`, found through the tree.
    pub fn triangles_in(&self, region: &Aabb) -> Vec<&Triangle> {
        let mut found = Vec::new();
        if let Some(root) = &self.root {
            self.collect_overlapping(root, region, &mut found);
        }
        found
    }

    /// All stored triangles, in leaf order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of stored (non-degenerate) triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of degenerate triangles dropped at build time.
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Whether the volume holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of tree nodes (leaves and branches).
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::count)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Box enclosing all geometry, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|root| *root.bounds())
    }

    /// Visit every leaf as `(bounds, triangles)`.
    pub fn for_each_leaf(&self, mut visit: impl FnMut(&Aabb, &[Triangle])) {
        let mut stack: Vec<&Node> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { bounds, range } => visit(bounds, &self.triangles[range.clone()]),
                Node::Branch { left, right, .. } => {
                    stack.push(&**right);
                    stack.push(&**left);
                }
            }
        }
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn collect_deepest(
        &self,
        node: &Node,
        capsule: &Capsule,
        query: &Aabb,
        deepest: &mut Option<Contact>,
    ) {
        if !node.bounds().intersects(query) {
            return;
        }

        match node {
            Node::Leaf { range, .. } => {
                for triangle in &self.triangles[range.clone()] {
                    if !triangle.aabb().intersects(query) {
                        continue;
                    }
                    let Some(contact) = capsule_triangle_contact(capsule, triangle) else {
                        continue;
                    };
                    if deepest.map_or(true, |best| contact.depth > best.depth) {
                        *deepest = Some(contact);
                    }
                }
            }
            Node::Branch { left, right, .. } => {
                self.collect_deepest(left, capsule, query, deepest);
                self.collect_deepest(right, capsule, query, deepest);
            }
        }
    }

    fn collect_overlapping<'a>(&'a self, node: &Node, region: &Aabb, found: &mut Vec<&'a Triangle>) {
        if !node.bounds().intersects(region) {
            return;
        }

        match node {
            Node::Leaf { range, .. } => {
                found.extend(
                    self.triangles[range.clone()]
                        .iter()
                        .filter(|triangle| triangle.aabb().intersects(region)),
                );
            }
            Node::Branch { left, right, .. } => {
                self.collect_overlapping(left, region, found);
                self.collect_overlapping(right, region, found);
            }
        }
    }
}

/// Recursively split `triangles` (which start at `offset` in the full list)
/// at the median centroid along the longest axis of the centroid bounds.
///
/// Median splits halve the count at every level, so leaves never exceed
/// [`LEAF_CAPACITY`] and depth stays logarithmic.
fn build_node(triangles: &mut [Triangle], offset: usize) -> Node {
    let bounds = triangles
        .iter()
        .fold(Aabb::EMPTY, |bounds, triangle| bounds.union(&triangle.aabb()));

    if triangles.len() <= LEAF_CAPACITY {
        return Node::Leaf {
            bounds,
            range: offset..offset + triangles.len(),
        };
    }

    let axis = Aabb::from_points(triangles.iter().map(Triangle::centroid)).longest_axis();
    let mid = triangles.len() / 2;
    triangles.select_nth_unstable_by(mid, |a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

    let (left, right) = triangles.split_at_mut(mid);
    let left = build_node(left, offset);
    let right = build_node(right, offset + mid);

    Node::Branch {
        bounds,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Expand an indexed mesh into world-space triangles.
pub fn mesh_triangles<'a>(
    vertices: &'a [Vec3],
    indices: &'a [[u32; 3]],
    transform: Mat4,
) -> impl Iterator<Item = Triangle> + 'a {
    indices.iter().filter_map(move |face| {
        let corner = |index: u32| vertices.get(index as usize).copied();
        let triangle = Triangle::new(corner(face[0])?, corner(face[1])?, corner(face[2])?);
        Some(triangle.transformed(&transform))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A grid of `n * n` quads (two triangles each) in the y = 0 plane.
    fn floor_grid(n: usize, cell: f32) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(n * n * 2);
        for i in 0..n {
            for j in 0..n {
                let x0 = i as f32 * cell;
                let z0 = j as f32 * cell;
                let (x1, z1) = (x0 + cell, z0 + cell);
                triangles.push(Triangle::new(
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x0, 0.0, z1),
                    Vec3::new(x1, 0.0, z0),
                ));
                triangles.push(Triangle::new(
                    Vec3::new(x1, 0.0, z0),
                    Vec3::new(x0, 0.0, z1),
                    Vec3::new(x1, 0.0, z1),
                ));
            }
        }
        triangles
    }

    /// Deepest contact by testing every triangle, for comparison.
    fn brute_force(triangles: &[Triangle], capsule: &Capsule) -> Option<Contact> {
        triangles
            .iter()
            .filter_map(|triangle| capsule_triangle_contact(capsule, triangle))
            .fold(None, |best: Option<Contact>, contact| match best {
                Some(best) if best.depth >= contact.depth => Some(best),
                _ => Some(contact),
            })
    }

    #[test]
    fn test_empty_volume_never_collides() {
        let volume = CollisionVolume::build(Vec::new());
        assert!(volume.is_empty());
        assert_eq!(volume.node_count(), 0);
        assert!(volume.bounds().is_none());

        let capsule = Capsule::new(Vec3::ZERO, Vec3::Y, 0.5);
        assert!(volume.capsule_intersect(&capsule).is_none());
    }

    #[test]
    fn test_degenerate_triangles_are_skipped() {
        let mut triangles = floor_grid(2, 1.0);
        triangles.push(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 3.0));
        triangles.push(Triangle::new(Vec3::ONE, Vec3::ONE, Vec3::ONE));

        let volume = CollisionVolume::build(triangles);
        assert_eq!(volume.triangle_count(), 8);
        assert_eq!(volume.skipped_count(), 2);
    }

    #[test]
    fn test_leaves_are_bounded_and_cover_everything() {
        let triangles = floor_grid(20, 0.5);
        let total = triangles.len();
        let volume = CollisionVolume::build(triangles);

        let mut seen = 0;
        volume.for_each_leaf(|bounds, leaf| {
            assert!(!leaf.is_empty());
            assert!(leaf.len() <= LEAF_CAPACITY);
            for triangle in leaf {
                assert!(bounds.contains(&triangle.aabb()));
            }
            seen += leaf.len();
        });

        assert_eq!(seen, total);
        // 800 triangles halve down to leaves of at most 8
        assert!(volume.depth() <= 8, "depth {}", volume.depth());
    }

    #[test]
    fn test_query_only_touches_nearby_triangles() {
        let volume = CollisionVolume::build(floor_grid(20, 0.5));
        let capsule = Capsule::new(Vec3::new(5.2, 0.3, 5.2), Vec3::new(5.2, 1.5, 5.2), 0.35);

        let candidates = volume.triangles_in(&capsule.aabb());
        assert!(!candidates.is_empty());
        assert!(candidates.len() < volume.triangle_count() / 10);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut triangles = floor_grid(6, 1.0);
        // A wall along x = 3 and a ramp
        triangles.push(Triangle::new(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 3.0, 0.0),
            Vec3::new(3.0, 0.0, 6.0),
        ));
        triangles.push(Triangle::new(
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, 1.0, 6.0),
            Vec3::new(2.0, 0.0, 4.0),
        ));
        let volume = CollisionVolume::build(triangles.clone());

        let positions = [
            Vec3::new(1.5, 0.2, 1.5),
            Vec3::new(2.8, 0.5, 1.0),
            Vec3::new(2.8, 0.3, 0.5),
            Vec3::new(1.0, 0.4, 5.0),
            Vec3::new(4.5, 2.0, 4.5),
        ];

        for start in positions {
            let capsule = Capsule::new(start, start + Vec3::Y, 0.35);
            let fast = volume.capsule_intersect(&capsule);
            let slow = brute_force(&triangles, &capsule);
            match (fast, slow) {
                (Some(fast), Some(slow)) => assert_abs_diff_eq!(fast.depth, slow.depth, epsilon = 1e-6),
                (None, None) => {}
                other => panic!("tree and brute force disagree at {start:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_deepest_contact_wins() {
        // Floor at y = 0 and a wall at x = 1
        let triangles = vec![
            Triangle::new(
                Vec3::new(-5.0, 0.0, -5.0),
                Vec3::new(-5.0, 0.0, 5.0),
                Vec3::new(5.0, 0.0, -5.0),
            ),
            Triangle::new(
                Vec3::new(1.0, -5.0, -5.0),
                Vec3::new(1.0, 5.0, -5.0),
                Vec3::new(1.0, -5.0, 5.0),
            ),
        ];
        let volume = CollisionVolume::build(triangles);

        // 0.05 into the floor, 0.15 into the wall
        let capsule = Capsule::new(Vec3::new(0.8, 0.3, -1.0), Vec3::new(0.8, 1.3, -1.0), 0.35);
        let contact = volume.capsule_intersect(&capsule).unwrap();

        assert_abs_diff_eq!(contact.normal, -Vec3::X, epsilon = 1e-4);
        assert_abs_diff_eq!(contact.depth, 0.15, epsilon = 1e-4);
    }

    #[test]
    fn test_from_indexed_mesh_applies_transform() {
        let vertices = [
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
        ];
        let indices = [[0, 1, 2], [0, 1, 7]];
        let volume = CollisionVolume::from_indexed_mesh(
            &vertices,
            &indices,
            Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
        );

        assert_eq!(volume.triangle_count(), 1);
        let bounds = volume.bounds().unwrap();
        assert_abs_diff_eq!(bounds.min.y, 2.0, epsilon = 1e-6);
    }
}
