//! This module defines the [`Lbvh`] type, a linear bounding volume hierarchy.
//!
//! An [`Lbvh`] is built in bulk from a slice of [`Bounded`] elements. Leaves are ordered
//! along a Morton curve through the elements' volume centers and internal nodes are derived
//! from the sorted Morton keys, each one independently of the others. All stages can run
//! on the rayon thread pool through [`Lbvh::build_par`].
//!
//! [`Bounded`]: crate::bounding_hierarchy::Bounded
//!

mod build;
mod iter;
mod lbvh_impl;
mod node;

pub use self::iter::*;
pub use self::lbvh_impl::*;
pub use self::node::*;
