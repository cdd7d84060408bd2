//! A crate which builds linear bounding volume hierarchies (LBVHs) over large sets of
//! elements, in parallel and without locks.
//!
//! ## About
//!
//! Every element is represented by a bounding volume. The volumes' centers are quantized
//! into Morton codes, sorted, and turned into a binary radix tree whose internal nodes can
//! be computed independently of each other. The internal volumes are then merged bottom-up,
//! driven by one atomic counter per internal node. A hierarchy over `n` elements always has
//! exactly `n - 1` internal nodes and `n` leaves.
//!
//! Volumes are pluggable through the [`BoundingVolume`](bounding_hierarchy::BoundingVolume)
//! trait. Axis-aligned boxes ([`Aabb`](aabb::Aabb)) and balls ([`Ball`](ball::Ball)) are
//! provided.
//!
//! ## Example
//!
//! ```
//! use lbvh::aabb::Aabb;
//! use lbvh::bounding_hierarchy::Bounded;
//! use lbvh::lbvh::Lbvh;
//! use nalgebra::{Point3, Vector3};
//!
//! struct Sphere {
//!     position: Point3<f32>,
//!     radius: f32,
//! }
//!
//! impl Bounded<Aabb<f32, 3>> for Sphere {
//!     fn bounding_volume(&self) -> Aabb<f32, 3> {
//!         let half_size = Vector3::new(self.radius, self.radius, self.radius);
//!         let min = self.position - half_size;
//!         let max = self.position + half_size;
//!         Aabb::with_bounds(min, max)
//!     }
//! }
//!
//! let mut spheres = Vec::new();
//! for i in 0..1000u32 {
//!     let position = Point3::new(i as f32, i as f32, i as f32);
//!     let radius = (i % 10) as f32 + 1.0;
//!     spheres.push(Sphere { position, radius });
//! }
//!
//! let lbvh = Lbvh::<f32, 3>::build(&spheres).unwrap();
//! assert_eq!(lbvh.leaf_node_count(), 1000);
//!
//! let query = Aabb::with_bounds(Point3::new(0.0f32, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
//! let hits = lbvh.traverse(&query, &spheres);
//! assert!(!hits.is_empty());
//! ```
//!
//! ## Features
//!
//! - `rayon` (default **enabled**) - adds [`Lbvh::build_par`](lbvh::Lbvh::build_par), which
//!   runs every build stage on the rayon thread pool
//! - `serde` (default **disabled**) - adds `Serialize` and `Deserialize` implementations for
//!   volumes and nodes, and `Serialize` for hierarchies
//!

pub mod aabb;
pub mod ball;
pub mod bounding_hierarchy;
pub mod error;
pub mod lbvh;
pub mod morton;
mod utils;

#[cfg(test)]
mod testbase;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
