//! This module defines [`Lbvh`], its construction entry points and the read-only
//! accessors consumers of a built hierarchy rely on.
//!
//! [`Lbvh`]: struct.Lbvh.html
//!

use super::build::{build_from_volumes, SerialExecutor};
use super::iter::LbvhTraverseIterator;
use super::node::LbvhNode;
use crate::aabb::Aabb;
use crate::bounding_hierarchy::{BHValue, Bounded, BoundingVolume, IntersectsVolume};
use crate::error::{check_element_count, BuildError};

use std::fmt::Debug;
use std::marker::PhantomData;

/// A linear bounding volume hierarchy. Contains the list of [`LbvhNode`]s.
///
/// A hierarchy over `n` elements always owns exactly `2 * n - 1` nodes: `n - 1` internal
/// nodes at indices `0..n - 1` followed by `n` leaves. Node `0` is the root.
/// It is immutable once built, changed inputs require a new build.
///
/// With the `serde` feature a built hierarchy can be serialized as a snapshot. There is no
/// `Deserialize` implementation, [`Lbvh::build`] is the only way to obtain an [`Lbvh`].
///
/// [`LbvhNode`]: enum.LbvhNode.html
///
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lbvh<T: BHValue, const D: usize, V: BoundingVolume<T, D> = Aabb<T, D>> {
    nodes: Vec<LbvhNode<V>>,
    marker: PhantomData<T>,
}

impl<T: BHValue, const D: usize, V: BoundingVolume<T, D>> Lbvh<T, D, V> {
    /// Creates a new [`Lbvh`] from the `shapes` slice on the calling thread.
    ///
    /// Fails with [`BuildError::InsufficientElements`] for fewer than two shapes and with
    /// [`BuildError::CapacityExceeded`] for more than [`MAX_ELEMENTS`](crate::error::MAX_ELEMENTS).
    /// `shapes` is never modified.
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use lbvh::lbvh::Lbvh;
    /// use nalgebra::Point3;
    ///
    /// let points = vec![Point3::new(0.0f32, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
    /// let lbvh = Lbvh::<f32, 3>::build(&points).unwrap();
    ///
    /// assert_eq!(lbvh.node_count(), 3);
    /// assert_eq!(lbvh.root_volume().max, Point3::new(10.0, 0.0, 0.0));
    /// ```
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    ///
    pub fn build<Shape: Bounded<V>>(shapes: &[Shape]) -> Result<Lbvh<T, D, V>, BuildError> {
        check_element_count(shapes.len())?;
        let volumes = shapes
            .iter()
            .map(|shape| shape.bounding_volume())
            .collect::<Vec<_>>();
        let nodes = build_from_volumes::<T, D, V, _>(volumes, &SerialExecutor);
        Ok(Lbvh {
            nodes,
            marker: PhantomData,
        })
    }

    /// Creates a new [`Lbvh`] from the `shapes` slice, running every build stage on the
    /// rayon thread pool. The result is identical to [`Lbvh::build`].
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    ///
    #[cfg(feature = "rayon")]
    pub fn build_par<Shape: Bounded<V> + Sync>(
        shapes: &[Shape],
    ) -> Result<Lbvh<T, D, V>, BuildError> {
        use super::build::RayonExecutor;
        use rayon::prelude::*;

        check_element_count(shapes.len())?;
        let volumes = shapes
            .par_iter()
            .map(|shape| shape.bounding_volume())
            .collect::<Vec<_>>();
        let nodes = build_from_volumes::<T, D, V, _>(volumes, &RayonExecutor);
        Ok(Lbvh {
            nodes,
            marker: PhantomData,
        })
    }

    /// Returns the total number of nodes, `2 * n - 1` for `n` elements.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of internal nodes, `n - 1` for `n` elements.
    pub fn internal_node_count(&self) -> usize {
        self.nodes.len() / 2
    }

    /// Returns the number of leaves, one per element.
    pub fn leaf_node_count(&self) -> usize {
        self.nodes.len() / 2 + 1
    }

    /// Returns true if the node at `index` is a leaf.
    pub fn is_leaf(&self, index: usize) -> bool {
        index >= self.internal_node_count()
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    /// Panics if `index` is not smaller than [`Lbvh::node_count`].
    pub fn get_node(&self, index: usize) -> &LbvhNode<V> {
        &self.nodes[index]
    }

    /// Returns all nodes, internal nodes first.
    pub fn nodes(&self) -> &[LbvhNode<V>] {
        &self.nodes
    }

    /// Returns the merge of all element volumes.
    ///
    /// The merge is folded along the tree, so it is reproducible for volumes whose merge
    /// is not associative. It is the volume of the root node.
    pub fn global_volume(&self) -> V {
        self.root_volume()
    }

    /// Returns the volume of the root node.
    pub fn root_volume(&self) -> V {
        *self.nodes[0].bounding()
    }

    /// Returns the depth of the node at `index`. The root node has depth `0`.
    pub fn depth(&self, index: usize) -> u32 {
        let mut index = index;
        let mut depth = 0;
        while index != 0 {
            index = self.nodes[index].parent();
            depth += 1;
        }
        depth
    }

    /// Traverses the [`Lbvh`].
    /// Returns the subset of `shapes` whose leaf volumes intersect `query`.
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    ///
    pub fn traverse<'a, 'shape, Query: IntersectsVolume<V>, Shape>(
        &'a self,
        query: &'a Query,
        shapes: &'shape [Shape],
    ) -> Vec<&'shape Shape> {
        self.traverse_iterator(query, shapes).collect()
    }

    /// Creates a [`LbvhTraverseIterator`] to traverse the [`Lbvh`].
    /// Yields the subset of `shapes` whose leaf volumes intersect `query`.
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    /// [`LbvhTraverseIterator`]: struct.LbvhTraverseIterator.html
    ///
    pub fn traverse_iterator<'lbvh, 'shape, Query: IntersectsVolume<V>, Shape>(
        &'lbvh self,
        query: &'lbvh Query,
        shapes: &'shape [Shape],
    ) -> LbvhTraverseIterator<'lbvh, 'shape, T, D, V, Query, Shape> {
        LbvhTraverseIterator::new(self, query, shapes)
    }

    /// Prints the [`Lbvh`] in a tree-like visualization.
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    ///
    pub fn pretty_print(&self)
    where
        V: Debug,
    {
        self.print_node(0);
    }

    fn print_node(&self, index: usize)
    where
        V: Debug,
    {
        let padding = " ".repeat(self.depth(index) as usize);
        match self.nodes[index] {
            LbvhNode::Internal {
                child_l_index,
                child_r_index,
                ref bounding,
                ..
            } => {
                println!("{}node={} {:?}", padding, index, bounding);
                self.print_node(child_l_index);
                self.print_node(child_r_index);
            }
            LbvhNode::Leaf {
                element_index,
                ref bounding,
                ..
            } => {
                println!("{}leaf={} element={} {:?}", padding, index, element_index, bounding);
            }
        }
    }

    /// Verifies the subtree below `index`: the node sits on the correct side of the
    /// internal/leaf boundary, knows its parent, and leaves reference an unseen element
    /// whose volume they store. Increases `node_count` by the number of visited nodes.
    fn is_consistent_subtree<Shape: Bounded<V>>(
        &self,
        index: usize,
        expected_parent_index: usize,
        node_count: &mut usize,
        seen_elements: &mut [bool],
        shapes: &[Shape],
    ) -> bool
    where
        V: PartialEq,
    {
        if index >= self.nodes.len() {
            return false;
        }
        *node_count += 1;
        let node = &self.nodes[index];
        let correct_parent = node.parent() == expected_parent_index;
        let correct_kind = node.is_leaf() == self.is_leaf(index);
        match *node {
            LbvhNode::Internal {
                child_l_index,
                child_r_index,
                ..
            } => {
                let left = self.is_consistent_subtree(
                    child_l_index,
                    index,
                    node_count,
                    seen_elements,
                    shapes,
                );
                let right = self.is_consistent_subtree(
                    child_r_index,
                    index,
                    node_count,
                    seen_elements,
                    shapes,
                );
                correct_parent && correct_kind && left && right
            }
            LbvhNode::Leaf {
                element_index,
                ref bounding,
                ..
            } => {
                if element_index >= shapes.len() || seen_elements[element_index] {
                    return false;
                }
                seen_elements[element_index] = true;
                let correct_volume = shapes[element_index].bounding_volume() == *bounding;
                correct_parent && correct_kind && correct_volume
            }
        }
    }

    /// Checks if all children of a node have the correct parent index, that there is no
    /// detached subtree, and that the leaves map one to one onto `shapes`.
    pub fn is_consistent<Shape: Bounded<V>>(&self, shapes: &[Shape]) -> bool
    where
        V: PartialEq,
    {
        if self.nodes.len() + 1 != 2 * shapes.len() {
            return false;
        }

        // The counter for all nodes.
        let mut node_count = 0;
        let mut seen_elements = vec![false; shapes.len()];
        let subtree_consistent =
            self.is_consistent_subtree(0, 0, &mut node_count, &mut seen_elements, shapes);

        // Check if all nodes have been counted from the root node.
        // If this is false, it means we have a detached subtree.
        let is_connected = node_count == self.nodes.len();
        subtree_consistent && is_connected && seen_elements.iter().all(|seen| *seen)
    }

    /// Assert version of `is_consistent`.
    pub fn assert_consistent<Shape: Bounded<V>>(&self, shapes: &[Shape])
    where
        V: PartialEq + Debug,
    {
        assert_eq!(
            self.nodes.len() + 1,
            2 * shapes.len(),
            "Wrong node count for {} shapes",
            shapes.len()
        );

        let mut visited = vec![false; self.nodes.len()];
        let mut seen_elements = vec![false; shapes.len()];
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, expected_parent_index)) = stack.pop() {
            assert!(!visited[index], "Node {} is reachable twice", index);
            visited[index] = true;

            let node = &self.nodes[index];
            assert_eq!(
                expected_parent_index,
                node.parent(),
                "Wrong parent index. Expected: {}; Actual: {}",
                expected_parent_index,
                node.parent()
            );
            assert_eq!(
                node.is_leaf(),
                self.is_leaf(index),
                "Node {} is on the wrong side of the leaf boundary",
                index
            );

            match *node {
                LbvhNode::Internal {
                    child_l_index,
                    child_r_index,
                    ..
                } => {
                    stack.push((child_r_index, index));
                    stack.push((child_l_index, index));
                }
                LbvhNode::Leaf {
                    element_index,
                    ref bounding,
                    ..
                } => {
                    assert!(
                        !seen_elements[element_index],
                        "Element {} is referenced by more than one leaf",
                        element_index
                    );
                    seen_elements[element_index] = true;
                    assert_eq!(
                        shapes[element_index].bounding_volume(),
                        *bounding,
                        "Leaf {} does not store the volume of element {}",
                        index,
                        element_index
                    );
                }
            }
        }

        let detached = visited.iter().filter(|visited| !**visited).count();
        assert_eq!(detached, 0, "Detached subtree");
    }

    /// Check that the volumes in the [`Lbvh`] are tight, which means that every internal
    /// node's volume is exactly the merge of its children's volumes.
    ///
    /// [`Lbvh`]: struct.Lbvh.html
    ///
    pub fn assert_tight(&self)
    where
        V: PartialEq + Debug,
    {
        for (index, node) in self.nodes.iter().enumerate() {
            if let LbvhNode::Internal {
                child_l_index,
                child_r_index,
                ref bounding,
                ..
            } = *node
            {
                let joint = self.nodes[child_l_index]
                    .bounding()
                    .merge(self.nodes[child_r_index].bounding());
                assert_eq!(joint, *bounding, "Node {} is not tight", index);
            }
        }
    }
}
