use crate::bounding_hierarchy::{BHValue, BoundingVolume, IntersectsVolume};
use crate::lbvh::{Lbvh, LbvhNode};

/// Iterator to traverse an [`Lbvh`] depth first, left child before right child.
///
/// Subtrees whose volume does not intersect the query are skipped entirely.
pub struct LbvhTraverseIterator<
    'lbvh,
    'shape,
    T: BHValue,
    const D: usize,
    V: BoundingVolume<T, D>,
    Query: IntersectsVolume<V>,
    Shape,
> {
    /// Reference to the [`Lbvh`] to traverse
    lbvh: &'lbvh Lbvh<T, D, V>,
    /// Reference to the input query
    query: &'lbvh Query,
    /// Reference to the input shapes array
    shapes: &'shape [Shape],
    /// Nodes whose volume intersects the query and which are still to be visited.
    stack: Vec<usize>,
}

impl<
        'lbvh,
        'shape,
        T: BHValue,
        const D: usize,
        V: BoundingVolume<T, D>,
        Query: IntersectsVolume<V>,
        Shape,
    > LbvhTraverseIterator<'lbvh, 'shape, T, D, V, Query, Shape>
{
    /// Creates a new [`LbvhTraverseIterator`]
    pub fn new(lbvh: &'lbvh Lbvh<T, D, V>, query: &'lbvh Query, shapes: &'shape [Shape]) -> Self {
        let mut stack = Vec::new();
        if query.intersects_volume(lbvh.get_node(0).bounding()) {
            stack.push(0);
        }
        LbvhTraverseIterator {
            lbvh,
            query,
            shapes,
            stack,
        }
    }

    /// Pushes `index` if the query intersects the node's volume.
    fn push_if_intersected(&mut self, index: usize) {
        if self
            .query
            .intersects_volume(self.lbvh.get_node(index).bounding())
        {
            self.stack.push(index);
        }
    }
}

impl<'shape, T: BHValue, const D: usize, V: BoundingVolume<T, D>, Query: IntersectsVolume<V>, Shape>
    Iterator for LbvhTraverseIterator<'_, 'shape, T, D, V, Query, Shape>
{
    type Item = &'shape Shape;

    fn next(&mut self) -> Option<&'shape Shape> {
        while let Some(index) = self.stack.pop() {
            match *self.lbvh.get_node(index) {
                LbvhNode::Internal {
                    child_l_index,
                    child_r_index,
                    ..
                } => {
                    // Right first, so the left subtree is visited first.
                    self.push_if_intersected(child_r_index);
                    self.push_if_intersected(child_l_index);
                }
                LbvhNode::Leaf { element_index, .. } => {
                    return Some(&self.shapes[element_index]);
                }
            }
        }
        None
    }
}
