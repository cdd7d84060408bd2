#![no_main]
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use arbitrary::Arbitrary;
use lbvh::aabb::Aabb;
use lbvh::ball::Ball;
use lbvh::bounding_hierarchy::{Bounded, IntersectsVolume};
use lbvh::error::BuildError;
use lbvh::lbvh::Lbvh;
use libfuzzer_sys::fuzz_target;
use nalgebra::{Point, SimdPartialOrd};
use ordered_float::NotNan;

type Float = f32;
const LIMIT: Float = 1_000_000.0;

fuzz_target!(|workload: Workload<3>| {
    workload.fuzz();
});

#[derive(Arbitrary)]
struct ArbitraryPoint<const D: usize> {
    coordinates: [NotNan<Float>; D],
}

impl<const D: usize> ArbitraryPoint<D> {
    fn point(&self) -> Point<Float, D> {
        Point::<_, D>::from_slice(&self.coordinates).map(|f| f.into_inner().clamp(-LIMIT, LIMIT))
    }
}

#[derive(Arbitrary)]
struct ArbitraryShape<const D: usize> {
    a: ArbitraryPoint<D>,
    b: ArbitraryPoint<D>,
}

impl<const D: usize> Debug for ArbitraryShape<D> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let aabb: Aabb<Float, D> = self.bounding_volume();
        Debug::fmt(&aabb, f)
    }
}

impl<const D: usize> Bounded<Aabb<Float, D>> for ArbitraryShape<D> {
    fn bounding_volume(&self) -> Aabb<Float, D> {
        let a = self.a.point();
        let b = self.b.point();
        Aabb::with_bounds(a.simd_min(b), a.simd_max(b))
    }
}

impl<const D: usize> Bounded<Ball<Float, D>> for ArbitraryShape<D> {
    fn bounding_volume(&self) -> Ball<Float, D> {
        let a = self.a.point();
        Ball::new(a, 0.0).enclose(&Ball::new(self.b.point(), 0.0))
    }
}

#[derive(Debug, Arbitrary)]
struct Workload<const D: usize> {
    shapes: Vec<ArbitraryShape<D>>,
    query: ArbitraryShape<D>,
}

impl<const D: usize> Workload<D> {
    fn fuzz(self) {
        let lbvh = match Lbvh::<Float, D>::build(&self.shapes) {
            Ok(lbvh) => lbvh,
            Err(err) => {
                assert_eq!(
                    err,
                    BuildError::InsufficientElements {
                        count: self.shapes.len()
                    }
                );
                return;
            }
        };

        // Check that these don't panic.
        lbvh.assert_consistent(&self.shapes);
        lbvh.assert_tight();

        let parallel = Lbvh::<Float, D>::build_par(&self.shapes).unwrap();
        assert_eq!(lbvh.nodes(), parallel.nodes());

        let balls = Lbvh::<Float, D, Ball<Float, D>>::build(&self.shapes).unwrap();
        balls.assert_consistent(&self.shapes);
        let parallel_balls = Lbvh::<Float, D, Ball<Float, D>>::build_par(&self.shapes).unwrap();
        assert_eq!(balls.nodes(), parallel_balls.nodes());

        // Traversal finds exactly the shapes a linear scan finds.
        let query: Aabb<Float, D> = self.query.bounding_volume();
        let traverse = lbvh
            .traverse(&query, &self.shapes)
            .into_iter()
            .map(ByPtr)
            .collect::<HashSet<_>>();
        let traverse_iterator = lbvh
            .traverse_iterator(&query, &self.shapes)
            .map(ByPtr)
            .collect::<HashSet<_>>();
        let linear = self
            .shapes
            .iter()
            .filter(|shape| {
                let aabb: Aabb<Float, D> = shape.bounding_volume();
                query.intersects_volume(&aabb)
            })
            .map(ByPtr)
            .collect::<HashSet<_>>();
        assert_eq!(traverse, traverse_iterator);
        assert_eq!(traverse, linear);
    }
}

#[derive(Debug)]
struct ByPtr<'a, T>(&'a T);

impl<'a, T> PartialEq for ByPtr<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a, T> Eq for ByPtr<'a, T> {}

impl<'a, T> Hash for ByPtr<'a, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as *const _ as usize);
    }
}
