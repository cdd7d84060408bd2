//! This module defines the [`BoundingVolume`] and [`Bounded`] traits, the two
//! customization points every hierarchy in this crate is generic over.

use nalgebra::{
    ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, Point, Scalar,
    SimdPartialOrd,
};
use num_traits::{Float, FromPrimitive, Signed, ToPrimitive};

/// Encapsulates the required traits for the value type used in the hierarchy.
pub trait BHValue:
    Scalar
    + Copy
    + FromPrimitive
    + ToPrimitive
    + Float
    + ClosedSubAssign
    + ClosedAddAssign
    + SimdPartialOrd
    + ClosedMulAssign
    + ClosedDivAssign
    + Signed
    + Send
    + Sync
{
}

impl<T> BHValue for T where
    T: Scalar
        + Copy
        + FromPrimitive
        + ToPrimitive
        + Float
        + ClosedSubAssign
        + ClosedAddAssign
        + SimdPartialOrd
        + ClosedMulAssign
        + ClosedDivAssign
        + Signed
        + Send
        + Sync
{
}

/// A volume that can enclose other volumes of its own kind.
///
/// Only volumes with a meaningful enclosing union qualify. `merge` must be
/// commutative up to rounding and must return `self` when both inputs are equal.
/// The corner and center accessors are used to place leaves on the Morton curve.
pub trait BoundingVolume<T: BHValue, const D: usize>: Copy + Send + Sync {
    /// Returns the smallest volume of this kind that encloses both `self` and `other`.
    fn merge(&self, other: &Self) -> Self;

    /// Returns the componentwise minimum corner of the volume's extent.
    fn lower_corner(&self) -> Point<T, D>;

    /// Returns the componentwise maximum corner of the volume's extent.
    fn upper_corner(&self) -> Point<T, D>;

    /// Returns the center of the volume.
    fn center(&self) -> Point<T, D>;
}

/// A trait implemented by things which can be enclosed by a volume of type `V`.
///
/// # Examples
/// ```
/// use lbvh::aabb::Aabb;
/// use lbvh::bounding_hierarchy::Bounded;
/// use nalgebra::Point3;
///
/// struct Segment {
///     a: Point3<f32>,
///     b: Point3<f32>,
/// }
///
/// impl Bounded<Aabb<f32, 3>> for Segment {
///     fn bounding_volume(&self) -> Aabb<f32, 3> {
///         Aabb::empty().grow(&self.a).grow(&self.b)
///     }
/// }
///
/// let segment = Segment {
///     a: Point3::new(0.0, 0.0, 0.0),
///     b: Point3::new(1.0, -1.0, 2.0),
/// };
/// let aabb = segment.bounding_volume();
/// assert_eq!(aabb.min, Point3::new(0.0, -1.0, 0.0));
/// assert_eq!(aabb.max, Point3::new(1.0, 0.0, 2.0));
/// ```
pub trait Bounded<V> {
    /// Returns the tightest volume of type `V` enclosing this element.
    fn bounding_volume(&self) -> V;
}

impl<V, B: Bounded<V>> Bounded<V> for &B {
    fn bounding_volume(&self) -> V {
        B::bounding_volume(self)
    }
}

/// A trait implemented by things that may or may not intersect a volume of type `V`.
/// Anything implementing it can be used as a query when traversing a hierarchy.
pub trait IntersectsVolume<V> {
    /// Returns whether this object intersects `volume`.
    fn intersects_volume(&self, volume: &V) -> bool;
}
