//! Axis Aligned Bounding Boxes.

use crate::bounding_hierarchy::{BHValue, Bounded, BoundingVolume, IntersectsVolume};
use nalgebra::{Point, SVector};

/// [`Aabb`] struct.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb<T: BHValue, const D: usize> {
    /// Minimum coordinates
    pub min: Point<T, D>,

    /// Maximum coordinates
    pub max: Point<T, D>,
}

impl<T: BHValue, const D: usize> Aabb<T, D> {
    /// Creates a new [`Aabb`] with the given bounds.
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0,-1.0,-1.0), Point3::new(1.0,1.0,1.0));
    /// assert_eq!(aabb.min.x, -1.0);
    /// assert_eq!(aabb.max.z, 1.0);
    /// ```
    pub fn with_bounds(min: Point<T, D>, max: Point<T, D>) -> Self {
        Aabb { min, max }
    }

    /// Creates a new empty [`Aabb`]. It is the identity of [`Aabb::join`].
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let point = Point3::new(1.0, 2.0, 3.0);
    /// let aabb = Aabb::empty().grow(&point);
    /// assert_eq!(aabb, Aabb::with_bounds(point, point));
    /// ```
    pub fn empty() -> Self {
        Self {
            min: Point::from(SVector::repeat(T::infinity())),
            max: Point::from(SVector::repeat(T::neg_infinity())),
        }
    }

    /// Creates a new infinite [`Aabb`] which contains every finite point.
    pub fn infinite() -> Self {
        Self {
            min: Point::from(SVector::repeat(T::neg_infinity())),
            max: Point::from(SVector::repeat(T::infinity())),
        }
    }

    /// Returns true if the [`Point`] is inside the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert!(aabb.contains(&Point3::new(0.0, 0.5, 1.0)));
    /// assert!(!aabb.contains(&Point3::new(0.0, 1.5, 0.0)));
    /// ```
    pub fn contains(&self, p: &Point<T, D>) -> bool {
        (0..D).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Returns true if the [`Point`] is approximately inside the [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_eps(&self, p: &Point<T, D>, epsilon: T) -> bool {
        (0..D).all(|i| (p[i] - self.min[i]) > -epsilon && (p[i] - self.max[i]) < epsilon)
    }

    /// Returns true if the `other` [`Aabb`] is approximately inside this [`Aabb`]
    /// with respect to some `epsilon`.
    pub fn approx_contains_aabb_eps(&self, other: &Aabb<T, D>, epsilon: T) -> bool {
        self.approx_contains_eps(&other.min, epsilon) && self.approx_contains_eps(&other.max, epsilon)
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and `other`.
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb1 = Aabb::with_bounds(Point3::new(-101.0, 0.0, 0.0), Point3::new(-100.0, 1.0, 1.0));
    /// let aabb2 = Aabb::with_bounds(Point3::new(100.0, 0.0, 0.0), Point3::new(101.0, 1.0, 1.0));
    /// let joint = aabb1.join(&aabb2);
    ///
    /// assert_eq!(joint.min, Point3::new(-101.0, 0.0, 0.0));
    /// assert_eq!(joint.max, Point3::new(101.0, 1.0, 1.0));
    /// ```
    pub fn join(&self, other: &Aabb<T, D>) -> Aabb<T, D> {
        Aabb::with_bounds(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Returns a new minimal [`Aabb`] which contains both this [`Aabb`] and the [`Point`] `other`.
    pub fn grow(&self, other: &Point<T, D>) -> Aabb<T, D> {
        Aabb::with_bounds(self.min.inf(other), self.max.sup(other))
    }

    /// Returns the size of this [`Aabb`] in all dimensions.
    pub fn size(&self) -> SVector<T, D> {
        self.max - self.min
    }

    /// Returns the center [`Point`] of the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use lbvh::aabb::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-1.0, 0.0, 3.0), Point3::new(1.0, 4.0, 5.0));
    /// assert_eq!(aabb.center(), Point3::new(0.0, 2.0, 4.0));
    /// ```
    pub fn center(&self) -> Point<T, D> {
        self.min + (self.size() / (T::one() + T::one()))
    }
}

impl<T: BHValue, const D: usize> BoundingVolume<T, D> for Aabb<T, D> {
    fn merge(&self, other: &Self) -> Self {
        self.join(other)
    }

    fn lower_corner(&self) -> Point<T, D> {
        self.min
    }

    fn upper_corner(&self) -> Point<T, D> {
        self.max
    }

    fn center(&self) -> Point<T, D> {
        Aabb::center(self)
    }
}

/// Implementation of [`Bounded`] for [`Aabb`].
impl<T: BHValue, const D: usize> Bounded<Aabb<T, D>> for Aabb<T, D> {
    fn bounding_volume(&self) -> Aabb<T, D> {
        *self
    }
}

/// Implementation of [`Bounded`] for [`Point`]s.
impl<T: BHValue, const D: usize> Bounded<Aabb<T, D>> for Point<T, D> {
    fn bounding_volume(&self) -> Aabb<T, D> {
        Aabb::with_bounds(*self, *self)
    }
}

impl<T: BHValue, const D: usize> IntersectsVolume<Aabb<T, D>> for Aabb<T, D> {
    fn intersects_volume(&self, aabb: &Aabb<T, D>) -> bool {
        (0..D).all(|i| self.max[i] >= aabb.min[i] && aabb.max[i] >= self.min[i])
    }
}

impl<T: BHValue, const D: usize> IntersectsVolume<Aabb<T, D>> for Point<T, D> {
    fn intersects_volume(&self, aabb: &Aabb<T, D>) -> bool {
        aabb.contains(self)
    }
}
