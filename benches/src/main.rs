use std::{hint::black_box, time::Instant};

use clap::Parser;
use lbvh::{
    aabb::Aabb,
    bounding_hierarchy::{Bounded, IntersectsVolume},
    lbvh::Lbvh,
};
use nalgebra::{Point3, Vector3};
use rand::{rng, Rng};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    queries: usize,
    #[arg(long)]
    triangles: usize,
    #[arg(long)]
    samples: usize,
}

fn main() {
    let cli = Cli::parse();
    let mut rng = rng();

    let mut build_speedups = Vec::new();
    let mut query_speedups = Vec::new();
    let mut queries = Vec::new();
    let mut triangles = Vec::new();

    for i in 0..cli.samples {
        queries.clear();
        triangles.clear();

        for _ in 0..cli.queries {
            let corner = Point3::new(
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
            );
            let extent = Vector3::new(
                rng.random_range(0.0..=50.0),
                rng.random_range(0.0..=50.0),
                rng.random_range(0.0..=50.0),
            );
            queries.push(Aabb::<f32, 3>::with_bounds(corner, corner + extent));
        }

        for _ in 0..cli.triangles {
            let center = Point3::new(
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
                rng.random_range(-1000.0..=1000.0),
            );
            let mut corner = || {
                center
                    + Vector3::new(
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                        rng.random_range(-1.0..=1.0),
                    )
            };
            let (a, b, c) = (corner(), corner(), corner());
            triangles.push(Triangle {
                aabb: Aabb::empty().grow(&a).grow(&b).grow(&c),
            });
        }

        let mut serial_duration = f64::NAN;
        let mut parallel_duration = f64::NAN;

        let mut measure_serial = |triangles: &[Triangle]| {
            let start = Instant::now();
            let lbvh = Lbvh::<f32, 3>::build(black_box(triangles)).unwrap();
            serial_duration = start.elapsed().as_secs_f64();
            lbvh
        };

        let mut measure_parallel = |triangles: &[Triangle]| {
            let start = Instant::now();
            black_box(Lbvh::<f32, 3>::build_par(black_box(triangles)).unwrap());
            parallel_duration = start.elapsed().as_secs_f64();
        };

        // Flip order to minimize bias due to caching.
        let lbvh = if i % 2 == 0 {
            let lbvh = measure_serial(&triangles);
            measure_parallel(&triangles);
            lbvh
        } else {
            measure_parallel(&triangles);
            measure_serial(&triangles)
        };

        let start = Instant::now();
        for query in &queries {
            black_box(
                black_box(&triangles)
                    .iter()
                    .filter(|triangle| query.intersects_volume(&triangle.aabb))
                    .count(),
            );
        }
        let brute_force_duration = start.elapsed().as_secs_f64();

        let start = Instant::now();
        for query in &queries {
            black_box(
                lbvh.traverse_iterator(black_box(query), black_box(&triangles))
                    .count(),
            );
        }
        let traverse_duration = start.elapsed().as_secs_f64();

        build_speedups.push(serial_duration / parallel_duration);
        query_speedups.push(brute_force_duration / traverse_duration);
    }

    build_speedups.sort_by(|a, b| a.total_cmp(b));
    query_speedups.sort_by(|a, b| a.total_cmp(b));

    // Median.
    println!(
        "parallel build speedup: {}, query speedup: {}",
        build_speedups[cli.samples / 2],
        query_speedups[cli.samples / 2]
    );
}

struct Triangle {
    aabb: Aabb<f32, 3>,
}

impl Bounded<Aabb<f32, 3>> for Triangle {
    fn bounding_volume(&self) -> Aabb<f32, 3> {
        self.aabb
    }
}
