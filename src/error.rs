//! Error types returned by hierarchy construction.

use thiserror::Error;

/// Largest number of elements a hierarchy can be built over.
///
/// Node indices are kept within the range of a signed 32-bit integer.
pub const MAX_ELEMENTS: usize = i32::MAX as usize - 1;

/// Errors that can occur while building an [`Lbvh`](crate::lbvh::Lbvh).
///
/// Construction is all-or-nothing: when an error is returned no hierarchy exists.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// Fewer than two elements were given, no binary tree can be formed.
    #[error("a hierarchy needs at least 2 elements, got {count}")]
    InsufficientElements {
        /// Number of elements that were given.
        count: usize,
    },

    /// More elements were given than node indices can address.
    #[error("too many elements: got {count} but at most {max} are supported")]
    CapacityExceeded {
        /// Number of elements that were given.
        count: usize,
        /// Maximum number of elements.
        max: usize,
    },
}

/// Checks that `count` elements can form a hierarchy.
pub fn check_element_count(count: usize) -> Result<(), BuildError> {
    if count < 2 {
        return Err(BuildError::InsufficientElements { count });
    }
    if count > MAX_ELEMENTS {
        return Err(BuildError::CapacityExceeded {
            count,
            max: MAX_ELEMENTS,
        });
    }
    Ok(())
}
