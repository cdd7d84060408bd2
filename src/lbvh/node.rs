/// The [`LbvhNode`] enum that describes a node in an [`Lbvh`].
/// It's either a leaf node that references one element (by holding its index)
/// or an internal node that has exactly two child nodes.
/// Both kinds store the volume enclosing their whole subtree.
///
/// Within an [`Lbvh`] over `n` elements, internal nodes occupy the indices `0..n - 1`
/// and leaves occupy `n - 1..2 * n - 1`. The root is node `0`, its parent index is `0`.
///
/// [`Lbvh`]: struct.Lbvh.html
///
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LbvhNode<V> {
    /// Leaf node.
    Leaf {
        /// The node's parent.
        parent_index: usize,

        /// Index of the element this leaf represents.
        element_index: usize,

        /// The volume of the element.
        bounding: V,
    },
    /// Internal node.
    Internal {
        /// The node's parent.
        parent_index: usize,

        /// Index of the left subtree's root node.
        child_l_index: usize,

        /// Index of the right subtree's root node.
        child_r_index: usize,

        /// The merged volume of both children.
        bounding: V,
    },
}

impl<V> LbvhNode<V> {
    /// Returns the index of the parent node.
    pub fn parent(&self) -> usize {
        match *self {
            LbvhNode::Leaf { parent_index, .. } | LbvhNode::Internal { parent_index, .. } => {
                parent_index
            }
        }
    }

    /// Returns the volume enclosing this node's subtree.
    pub fn bounding(&self) -> &V {
        match self {
            LbvhNode::Leaf { bounding, .. } | LbvhNode::Internal { bounding, .. } => bounding,
        }
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, LbvhNode::Leaf { .. })
    }

    /// Returns the index of the left child node.
    pub fn child_l(&self) -> usize {
        match *self {
            LbvhNode::Internal { child_l_index, .. } => child_l_index,
            _ => panic!("Tried to get the left child of a leaf node."),
        }
    }

    /// Returns the index of the right child node.
    pub fn child_r(&self) -> usize {
        match *self {
            LbvhNode::Internal { child_r_index, .. } => child_r_index,
            _ => panic!("Tried to get the right child of a leaf node."),
        }
    }

    /// Returns the index of the element contained within the node if is a leaf,
    /// or [`None`] if it is an internal node.
    pub fn element_index(&self) -> Option<usize> {
        match *self {
            LbvhNode::Leaf { element_index, .. } => Some(element_index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LbvhNode;

    #[test]
    fn test_leaf_accessors() {
        let leaf = LbvhNode::Leaf {
            parent_index: 3,
            element_index: 7,
            bounding: 1.5f32,
        };
        assert!(leaf.is_leaf());
        assert_eq!(leaf.parent(), 3);
        assert_eq!(leaf.element_index(), Some(7));
        assert_eq!(*leaf.bounding(), 1.5);
    }

    #[test]
    fn test_internal_accessors() {
        let node = LbvhNode::Internal {
            parent_index: 0,
            child_l_index: 1,
            child_r_index: 4,
            bounding: 2.0f32,
        };
        assert!(!node.is_leaf());
        assert_eq!(node.child_l(), 1);
        assert_eq!(node.child_r(), 4);
        assert_eq!(node.element_index(), None);
    }

    #[test]
    #[should_panic(expected = "Tried to get the left child of a leaf node.")]
    fn test_leaf_has_no_children() {
        let leaf = LbvhNode::Leaf {
            parent_index: 0,
            element_index: 0,
            bounding: 0.0f32,
        };
        leaf.child_l();
    }
}
