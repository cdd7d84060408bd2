//! Common utilities shared by unit tests.
#![cfg(test)]

use crate::aabb::Aabb;
use crate::ball::Ball;
use crate::bounding_hierarchy::Bounded;
use crate::lbvh::Lbvh;
use nalgebra::{Point, SVector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Point type used throughout the tests.
pub type TPoint3 = Point<f32, 3>;
/// Vector type used throughout the tests.
pub type TVector3 = SVector<f32, 3>;
/// Box type used throughout the tests.
pub type TAabb3 = Aabb<f32, 3>;
/// Ball type used throughout the tests.
pub type TBall3 = Ball<f32, 3>;
/// Box hierarchy used throughout the tests.
pub type TLbvh3 = Lbvh<f32, 3>;
/// Ball hierarchy used throughout the tests.
pub type TBallLbvh3 = Lbvh<f32, 3, TBall3>;

/// A vector represented as a tuple
pub type TupleVec = (f32, f32, f32);

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e10 to 10e10
/// A small enough range to prevent most fp32 errors from breaking certain tests
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
    )
}

/// Generate a `TupleVec` for [`proptest::strategy::Strategy`] from -10e30 to 10e30
/// A small enough range to prevent `f32::MAX` ranges from breaking certain tests
pub fn tuplevec_large_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e30_f32..10e30_f32,
        -10e30_f32..10e30_f32,
        -10e30_f32..10e30_f32,
    )
}

/// Generate a scene of box centers inside a cube of edge 2000.
pub fn scene_strategy(max_len: usize) -> impl Strategy<Value = Vec<TupleVec>> {
    prop::collection::vec(
        (-1000.0f32..1000.0, -1000.0f32..1000.0, -1000.0f32..1000.0),
        2..max_len,
    )
}

/// Convert a `TupleVec` to a [`TPoint3`].
pub fn tuple_to_point(tpl: &TupleVec) -> TPoint3 {
    TPoint3::new(tpl.0, tpl.1, tpl.2)
}

/// Define some `Bounded` structure.
#[derive(Debug, Clone)]
pub struct UnitBox {
    pub id: i32,
    pub pos: TPoint3,
}

impl UnitBox {
    pub fn new(id: i32, pos: TPoint3) -> UnitBox {
        UnitBox { id, pos }
    }
}

/// `UnitBox`'s `Aabb`s are unit `Aabb`s centered on the box's position.
impl Bounded<TAabb3> for UnitBox {
    fn bounding_volume(&self) -> TAabb3 {
        let min = self.pos + TVector3::new(-0.5, -0.5, -0.5);
        let max = self.pos + TVector3::new(0.5, 0.5, 0.5);
        TAabb3::with_bounds(min, max)
    }
}

/// `UnitBox`'s balls circumscribe the unit box.
impl Bounded<TBall3> for UnitBox {
    fn bounding_volume(&self) -> TBall3 {
        TBall3::new(self.pos, 0.75f32.sqrt())
    }
}

/// Generate 21 `UnitBox`s along the X axis centered on whole numbers (-10,9,..,10).
/// The index is set to the rounded x-coordinate of the box center.
pub fn generate_aligned_boxes() -> Vec<UnitBox> {
    let mut shapes = Vec::new();
    for x in -10..11 {
        shapes.push(UnitBox::new(x, TPoint3::new(x as f32, 0.0, 0.0)));
    }
    shapes
}

/// Converts a list of tuples into `UnitBox`es with ascending ids.
pub fn boxes_from_tuples(tuples: &[TupleVec]) -> Vec<UnitBox> {
    tuples
        .iter()
        .enumerate()
        .map(|(i, tpl)| UnitBox::new(i as i32, tuple_to_point(tpl)))
        .collect()
}

/// A triangle struct. Instance of a more complex `Bounded` primitive.
#[derive(Debug)]
pub struct Triangle {
    pub a: TPoint3,
    pub b: TPoint3,
    pub c: TPoint3,
    aabb: TAabb3,
}

impl Triangle {
    pub fn new(a: TPoint3, b: TPoint3, c: TPoint3) -> Triangle {
        Triangle {
            a,
            b,
            c,
            aabb: TAabb3::empty().grow(&a).grow(&b).grow(&c),
        }
    }
}

impl Bounded<TAabb3> for Triangle {
    fn bounding_volume(&self) -> TAabb3 {
        self.aabb
    }
}

/// Creates `n` deterministic pseudo-random triangles within a cube of edge `2 * extent`.
pub fn create_n_random_triangles(n: usize, extent: f32, seed: u64) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut triangles = Vec::with_capacity(n);
    for _ in 0..n {
        let center = TPoint3::new(
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
        );
        let mut corner = || {
            center
                + TVector3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                )
        };
        let (a, b, c) = (corner(), corner(), corner());
        triangles.push(Triangle::new(a, b, c));
    }
    triangles
}

/// Creates `n` deterministic pseudo-random points within a cube of edge `2 * extent`.
pub fn create_n_random_points(n: usize, extent: f32, seed: u64) -> Vec<TPoint3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            TPoint3::new(
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
            )
        })
        .collect()
}
