//! Balls, including circles and spheres.

use crate::{
    aabb::Aabb,
    bounding_hierarchy::{BHValue, Bounded, BoundingVolume, IntersectsVolume},
};
use nalgebra::{Point, SVector};

/// In 2D, a circle. In 3D, a sphere. Balls can be used both as bounding volumes and as
/// traversal queries.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ball<T: BHValue, const D: usize> {
    /// The center of the ball.
    pub center: Point<T, D>,
    /// The radius of the ball.
    pub radius: T,
}

impl<T: BHValue, const D: usize> Ball<T, D> {
    /// Creates a [`Ball`] with the given `center` and `radius`.
    ///
    /// # Panics
    /// Panics, in debug mode, if the radius is negative.
    ///
    /// # Examples
    /// ```
    /// use lbvh::ball::Ball;
    /// use nalgebra::Point3;
    ///
    /// let ball = Ball::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// assert_eq!(ball.center, Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(ball.radius, 1.0)
    /// ```
    pub fn new(center: Point<T, D>, radius: T) -> Self {
        debug_assert!(radius >= T::zero());
        Self { center, radius }
    }

    /// Returns true if this [`Ball`] contains the [`Point`].
    ///
    /// # Examples
    /// ```
    /// use lbvh::ball::Ball;
    /// use nalgebra::Point3;
    ///
    /// let ball = Ball::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// let point = Point3::new(1.25, 1.25, 1.25);
    ///
    /// assert!(ball.contains(&point));
    /// ```
    pub fn contains(&self, point: &Point<T, D>) -> bool {
        // Squaring the RHS is faster than computing the square root of the LHS.
        distance_squared(point, &self.center) <= self.radius.powi(2)
    }

    /// Returns true if `other` lies inside this [`Ball`], allowing for an error of `epsilon`.
    pub fn approx_contains_ball_eps(&self, other: &Ball<T, D>, epsilon: T) -> bool {
        distance_squared(&other.center, &self.center).sqrt() + other.radius <= self.radius + epsilon
    }

    /// Returns true if this [`Ball`] intersects the [`Aabb`].
    ///
    /// # Examples
    /// ```
    /// use lbvh::{aabb::Aabb, ball::Ball};
    /// use nalgebra::Point3;
    ///
    /// let ball = Ball::new(Point3::new(1.0, 1.0, 1.0), 1.0);
    /// let aabb = Aabb::with_bounds(Point3::new(1.25, 1.25, 1.25), Point3::new(3.0, 3.0, 3.0));
    ///
    /// assert!(ball.intersects_aabb(&aabb));
    /// ```
    pub fn intersects_aabb(&self, aabb: &Aabb<T, D>) -> bool {
        // https://gamemath.com/book/geomtests.html#intersection_sphere_aabb
        // Find the squared distance between the ball's center and the point in/on the
        // AABB that is closest to it.
        let mut distance_squared = T::zero();
        for i in 0..D {
            let closest_on_aabb = num_traits::clamp(self.center[i], aabb.min[i], aabb.max[i]);
            distance_squared += (closest_on_aabb - self.center[i]).powi(2);
        }
        distance_squared <= self.radius.powi(2)
    }

    /// Returns the smallest [`Ball`] enclosing both `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use lbvh::ball::Ball;
    /// use nalgebra::Point3;
    ///
    /// let a = Ball::new(Point3::new(0.0, 0.0, 0.0), 1.0);
    /// let b = Ball::new(Point3::new(4.0, 0.0, 0.0), 1.0);
    /// let enclosing = a.enclose(&b);
    ///
    /// assert_eq!(enclosing.center, Point3::new(2.0, 0.0, 0.0));
    /// assert_eq!(enclosing.radius, 3.0);
    /// ```
    pub fn enclose(&self, other: &Ball<T, D>) -> Ball<T, D> {
        let offset = other.center - self.center;
        let distance = distance_squared(&other.center, &self.center).sqrt();
        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }
        let two = T::one() + T::one();
        let radius = (distance + self.radius + other.radius) / two;
        // `distance` is non-zero here, a zero offset is caught by one of the branches above.
        let center = self.center + offset * ((radius - self.radius) / distance);
        Ball { center, radius }
    }
}

fn distance_squared<T: BHValue, const D: usize>(a: &Point<T, D>, b: &Point<T, D>) -> T {
    let mut distance_squared = T::zero();
    for i in 0..D {
        distance_squared += (a[i] - b[i]).powi(2);
    }
    distance_squared
}

impl<T: BHValue, const D: usize> BoundingVolume<T, D> for Ball<T, D> {
    fn merge(&self, other: &Self) -> Self {
        self.enclose(other)
    }

    fn lower_corner(&self) -> Point<T, D> {
        self.center - SVector::repeat(self.radius)
    }

    fn upper_corner(&self) -> Point<T, D> {
        self.center + SVector::repeat(self.radius)
    }

    fn center(&self) -> Point<T, D> {
        self.center
    }
}

impl<T: BHValue, const D: usize> Bounded<Ball<T, D>> for Ball<T, D> {
    fn bounding_volume(&self) -> Ball<T, D> {
        *self
    }
}

impl<T: BHValue, const D: usize> Bounded<Aabb<T, D>> for Ball<T, D> {
    fn bounding_volume(&self) -> Aabb<T, D> {
        Aabb::with_bounds(self.lower_corner(), self.upper_corner())
    }
}

impl<T: BHValue, const D: usize> Bounded<Ball<T, D>> for Point<T, D> {
    fn bounding_volume(&self) -> Ball<T, D> {
        Ball::new(*self, T::zero())
    }
}

impl<T: BHValue, const D: usize> IntersectsVolume<Aabb<T, D>> for Ball<T, D> {
    fn intersects_volume(&self, aabb: &Aabb<T, D>) -> bool {
        self.intersects_aabb(aabb)
    }
}

impl<T: BHValue, const D: usize> IntersectsVolume<Ball<T, D>> for Ball<T, D> {
    fn intersects_volume(&self, ball: &Ball<T, D>) -> bool {
        distance_squared(&ball.center, &self.center) <= (self.radius + ball.radius).powi(2)
    }
}

impl<T: BHValue, const D: usize> IntersectsVolume<Ball<T, D>> for Point<T, D> {
    fn intersects_volume(&self, ball: &Ball<T, D>) -> bool {
        ball.contains(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Ball;
    use crate::bounding_hierarchy::{BoundingVolume, IntersectsVolume};
    use crate::testbase::{tuple_to_point, tuplevec_small_strategy, TAabb3, TPoint3};
    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    #[test]
    fn ball_contains() {
        let ball = Ball::new(TPoint3::new(3.0, 4.0, 5.0), 1.5);

        // Ball should contain its own center.
        assert!(ball.contains(&ball.center));

        // Test some manually-selected points.
        let just_inside = TPoint3::new(3.04605, 3.23758, 3.81607);
        let just_outside = TPoint3::new(3.06066, 3.15813, 3.70917);
        assert!(ball.contains(&just_inside));
        assert!(!ball.contains(&just_outside));
    }

    #[test]
    fn ball_merge_keeps_enclosing_ball() {
        let outer = Ball::new(TPoint3::new(0.0, 0.0, 0.0), 5.0);
        let inner = Ball::new(TPoint3::new(1.0, 1.0, 0.0), 1.0);
        assert_eq!(outer.merge(&inner), outer);
        assert_eq!(inner.merge(&outer), outer);
        assert_eq!(inner.merge(&inner), inner);
    }

    #[test]
    fn ball_corners() {
        let ball = Ball::new(TPoint3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(ball.lower_corner(), TPoint3::new(0.5, 1.5, 2.5));
        assert_eq!(ball.upper_corner(), TPoint3::new(1.5, 2.5, 3.5));
        assert_eq!(BoundingVolume::center(&ball), ball.center);
    }

    #[test]
    fn ball_intersections() {
        let ball = Ball::new(TPoint3::new(0.0, 0.0, 0.0), 1.0);
        let near = Ball::new(TPoint3::new(1.5, 0.0, 0.0), 0.6);
        let far = Ball::new(TPoint3::new(3.0, 0.0, 0.0), 0.6);
        assert!(ball.intersects_volume(&near));
        assert!(!ball.intersects_volume(&far));

        let aabb = TAabb3::with_bounds(TPoint3::new(2.0, 2.0, 2.0), TPoint3::new(3.0, 3.0, 3.0));
        assert!(!ball.intersects_volume(&aabb));
    }

    proptest! {
        // Test whether the merged ball encloses both operands and is symmetric.
        #[test]
        fn test_merge_encloses_both(a in tuplevec_small_strategy(),
                                    b in tuplevec_small_strategy(),
                                    ra in 0.0f32..1000.0,
                                    rb in 0.0f32..1000.0) {
            let ball_a = Ball::new(tuple_to_point(&a), ra);
            let ball_b = Ball::new(tuple_to_point(&b), rb);
            let merged = ball_a.merge(&ball_b);
            let reversed = ball_b.merge(&ball_a);

            let epsilon = merged.radius * 1e-4 + 1e-3;
            assert!(merged.approx_contains_ball_eps(&ball_a, epsilon));
            assert!(merged.approx_contains_ball_eps(&ball_b, epsilon));
            assert_float_eq!(merged.radius, reversed.radius, r2nd <= 1e-5);
        }
    }
}
