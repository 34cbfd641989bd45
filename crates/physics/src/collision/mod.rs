//! Collision detection against static world geometry.
//!
//! The world is a triangle soup indexed by a bounding-volume tree. The only
//! query the player needs is "how deep is this capsule inside the world, and
//! which way is out".
//!
//! # Key Types
//!
//! - [`CollisionVolume`]: The immutable tree over all world triangles
//! - [`Capsule`]: The player's swept-sphere collider
//! - [`Contact`]: Deepest penetration found by a query
//!
//! # Query Algorithm
//!
//! A capsule query:
//! - Walks the tree, skipping boxes that miss the capsule's bounds
//! - Runs parry3d's capsule-versus-triangle contact query on each remaining
//!   triangle, snapping face contacts to the exact face normal
//! - Keeps the single deepest penetration

mod contact;
mod shape;
mod volume;

pub use contact::{capsule_triangle_contact, Contact};
pub use shape::{Aabb, Capsule, Triangle};
pub use volume::{mesh_triangles, CollisionVolume, LEAF_CAPACITY};
