//! The staged construction of an [`Lbvh`](super::Lbvh).
//!
//! Every stage is a bulk loop over leaves or internal nodes and completes before the
//! next one starts:
//!
//! 1. leaf volumes (computed by the caller of [`build_from_volumes`]),
//! 2. reduction of all leaf corners into the Morton frame,
//! 3. Morton keys of the leaf centers inside the frame,
//! 4. sorting of the keys,
//! 5. tree shape, every internal node finds its children independently,
//! 6. bottom-up volumes, driven by one atomic arrival counter per internal node.

use super::node::LbvhNode;
use crate::aabb::Aabb;
use crate::bounding_hierarchy::{BHValue, BoundingVolume};
use crate::morton::{morton_code, MortonKey};
use crate::utils::WriteOnceSlice;

use log::{debug, trace};
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;

/// Runs the data-parallel loops of a build. A loop returns only after all its
/// iterations have finished.
pub(crate) trait BuildExecutor {
    /// Collects `f(0), f(1), .., f(len - 1)` in order.
    fn map<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Send + Sync;

    /// Calls `f` once for every index in `0..len`.
    fn for_each<F>(&self, len: usize, f: F)
    where
        F: Fn(usize) + Send + Sync;

    /// Folds `items` with `f` starting from `identity`, in unspecified order. `f` must be
    /// exactly associative and commutative for the result to be reproducible.
    fn reduce<V, F>(&self, items: &[V], identity: V, f: F) -> V
    where
        V: Copy + Send + Sync,
        F: Fn(&V, &V) -> V + Send + Sync;

    /// Sorts `keys` ascending.
    fn sort<K: Ord + Send>(&self, keys: &mut [K]);
}

/// Runs every loop on the calling thread.
pub(crate) struct SerialExecutor;

impl BuildExecutor for SerialExecutor {
    fn map<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Send + Sync,
    {
        (0..len).map(f).collect()
    }

    fn for_each<F>(&self, len: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        (0..len).for_each(f)
    }

    fn reduce<V, F>(&self, items: &[V], identity: V, f: F) -> V
    where
        V: Copy + Send + Sync,
        F: Fn(&V, &V) -> V + Send + Sync,
    {
        items.iter().fold(identity, |a, b| f(&a, b))
    }

    fn sort<K: Ord + Send>(&self, keys: &mut [K]) {
        keys.sort_unstable();
    }
}

/// Runs every loop on the rayon thread pool.
#[cfg(feature = "rayon")]
pub(crate) struct RayonExecutor;

#[cfg(feature = "rayon")]
impl BuildExecutor for RayonExecutor {
    fn map<R, F>(&self, len: usize, f: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Send + Sync,
    {
        use rayon::prelude::*;
        (0..len).into_par_iter().map(f).collect()
    }

    fn for_each<F>(&self, len: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        use rayon::prelude::*;
        (0..len).into_par_iter().for_each(f)
    }

    fn reduce<V, F>(&self, items: &[V], identity: V, f: F) -> V
    where
        V: Copy + Send + Sync,
        F: Fn(&V, &V) -> V + Send + Sync,
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .copied()
            .reduce(|| identity, |a, b| f(&a, &b))
    }

    fn sort<K: Ord + Send>(&self, keys: &mut [K]) {
        use rayon::prelude::*;
        keys.par_sort_unstable();
    }
}

/// Builds the node array from the volumes of `n >= 2` elements, `volumes[i]` belonging to
/// element `i`.
///
/// The result only depends on `volumes`, never on the executor or its scheduling.
pub(crate) fn build_from_volumes<T, const D: usize, V, E>(
    volumes: Vec<V>,
    executor: &E,
) -> Vec<LbvhNode<V>>
where
    T: BHValue,
    V: BoundingVolume<T, D>,
    E: BuildExecutor,
{
    let n = volumes.len();
    debug_assert!(n >= 2, "A hierarchy needs at least two leaves.");
    let internal_count = n - 1;
    debug!("building hierarchy over {} elements", n);

    // Joining boxes is exact, so the frame is the same for any fold order.
    let start = Instant::now();
    let corners = executor.map(n, |i| {
        Aabb::with_bounds(volumes[i].lower_corner(), volumes[i].upper_corner())
    });
    let frame = executor.reduce(&corners, Aabb::empty(), |a, b| a.join(b));
    trace!("morton frame reduced in {:?}", start.elapsed());

    let start = Instant::now();
    let mut keys = executor.map(n, |i| MortonKey {
        code: morton_code::<T, D, V>(&volumes[i], &frame.min, &frame.max),
        element: i as u32,
    });
    trace!("morton keys computed in {:?}", start.elapsed());

    // Keys are unique, an unstable sort yields the same order as a stable one.
    let start = Instant::now();
    executor.sort(&mut keys);
    trace!("keys sorted in {:?}", start.elapsed());

    let start = Instant::now();
    let children = executor.map(internal_count, |i| internal_children(&keys, i));
    let parents: Vec<AtomicUsize> = (0..2 * n - 1).map(|_| AtomicUsize::new(0)).collect();
    executor.for_each(internal_count, |i| {
        let (child_l, child_r) = children[i];
        parents[child_l].store(i, Ordering::Relaxed);
        parents[child_r].store(i, Ordering::Relaxed);
    });
    let parents: Vec<usize> = parents.into_iter().map(AtomicUsize::into_inner).collect();
    trace!("tree shape built in {:?}", start.elapsed());

    let start = Instant::now();
    let leaf_volumes = executor.map(n, |leaf| volumes[keys[leaf].element as usize]);
    let internal_volumes = propagate_volumes::<T, D, V, E>(&parents, &children, &leaf_volumes, executor);
    trace!("volumes propagated in {:?}", start.elapsed());

    let nodes = executor.map(2 * n - 1, |index| {
        if index < internal_count {
            let (child_l_index, child_r_index) = children[index];
            LbvhNode::Internal {
                parent_index: parents[index],
                child_l_index,
                child_r_index,
                bounding: internal_volumes[index],
            }
        } else {
            let leaf = index - internal_count;
            LbvhNode::Leaf {
                parent_index: parents[index],
                element_index: keys[leaf].element as usize,
                bounding: leaf_volumes[leaf],
            }
        }
    });
    debug!("built hierarchy with {} nodes", nodes.len());

    nodes
}

/// Finds the two children of internal node `i` over the sorted `keys`.
///
/// The node covers a contiguous range of leaves with `i` at one end. The direction of the
/// range follows the neighbor sharing the longer prefix with `i`, its length is bounded by
/// an exponential search and refined by a binary search. The split is the last position
/// whose prefix with `i` is longer than the prefix shared by the whole range.
///
/// Children are returned as node indices, leaves offset by `keys.len() - 1`.
pub(crate) fn internal_children(keys: &[MortonKey], i: usize) -> (usize, usize) {
    let n = keys.len() as i64;
    let i = i as i64;
    let key = &keys[i as usize];
    let delta = |j: i64| -> i32 {
        if j < 0 || j >= n {
            -1
        } else {
            key.common_prefix(&keys[j as usize])
        }
    };

    let d: i64 = if delta(i + 1) > delta(i - 1) { 1 } else { -1 };

    // Upper bound for the range length.
    let delta_min = delta(i - d);
    let mut l_max: i64 = 2;
    while delta(i + l_max * d) > delta_min {
        l_max *= 2;
    }

    // Exact range length.
    let mut l = 0;
    let mut t = l_max / 2;
    while t >= 1 {
        if delta(i + (l + t) * d) > delta_min {
            l += t;
        }
        t /= 2;
    }
    let j = i + l * d;

    // Split position.
    let delta_node = delta(j);
    let mut s = 0;
    let mut t = l;
    loop {
        t = (t + 1) / 2;
        if delta(i + (s + t) * d) > delta_node {
            s += t;
        }
        if t <= 1 {
            break;
        }
    }
    let gamma = i + s * d + d.min(0);

    let leaf_offset = n - 1;
    let child_l = if i.min(j) == gamma {
        leaf_offset + gamma
    } else {
        gamma
    };
    let child_r = if i.max(j) == gamma + 1 {
        leaf_offset + gamma + 1
    } else {
        gamma + 1
    };
    (child_l as usize, child_r as usize)
}

/// Computes the volume of every internal node bottom-up.
///
/// Every leaf climbs towards the root. On each internal node it increments the node's
/// arrival counter; the first arrival stops, the second merges both children (which are
/// final by then) and continues with the parent. Every internal node is therefore merged
/// exactly once without locks.
fn propagate_volumes<T, const D: usize, V, E>(
    parents: &[usize],
    children: &[(usize, usize)],
    leaf_volumes: &[V],
    executor: &E,
) -> Vec<V>
where
    T: BHValue,
    V: BoundingVolume<T, D>,
    E: BuildExecutor,
{
    let internal_count = children.len();
    let arrivals: Vec<AtomicU32> = (0..internal_count).map(|_| AtomicU32::new(0)).collect();
    let mut slots: Vec<MaybeUninit<V>> = (0..internal_count).map(|_| MaybeUninit::uninit()).collect();
    {
        let internal = WriteOnceSlice::new(&mut slots);
        let volume_of = |index: usize| -> V {
            if index >= internal_count {
                leaf_volumes[index - internal_count]
            } else {
                // SAFETY: the climb that reads an internal child is the second arrival at
                // its parent. The child was written before the first arrival's release
                // increment, which this climb's acquire increment synchronizes with.
                unsafe { internal.read(index) }
            }
        };

        executor.for_each(leaf_volumes.len(), |leaf| {
            let mut node = parents[internal_count + leaf];
            loop {
                if arrivals[node].fetch_add(1, Ordering::AcqRel) == 0 {
                    return;
                }
                let (child_l, child_r) = children[node];
                let volume = volume_of(child_l).merge(&volume_of(child_r));
                // SAFETY: only the second arrival reaches this point, once per node.
                unsafe { internal.write(node, volume) };
                if node == 0 {
                    return;
                }
                node = parents[node];
            }
        });
    }

    assert!(
        arrivals.iter().all(|arrival| arrival.load(Ordering::Relaxed) == 2),
        "Every internal node must be reached by both children."
    );
    slots
        .into_iter()
        // SAFETY: every slot was written by the second arrival at its node.
        .map(|slot| unsafe { slot.assume_init() })
        .collect()
}
