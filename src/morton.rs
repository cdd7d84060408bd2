//! Morton (Z-order) codes used to linearize leaves before the hierarchy is built.
//!
//! The center of every leaf volume is quantized relative to the box spanned by all leaf
//! corners into `D` integers of [`bits_per_axis`] bits each. The integers are interleaved
//! bit by bit with axis 0 in the most significant position of every group, so that points
//! that are close in space share long common prefixes.

use crate::bounding_hierarchy::{BHValue, BoundingVolume};
use nalgebra::Point;

/// Number of bits every axis is quantized to for a `dimensions`-dimensional code.
///
/// Three dimensions use 21 bits per axis, giving a 63-bit code.
pub const fn bits_per_axis(dimensions: usize) -> u32 {
    if dimensions == 0 {
        return 0;
    }
    let bits = 64 / dimensions;
    if bits > 32 {
        32
    } else {
        bits as u32
    }
}

/// Spread bits of a 21-bit value with 2-bit gaps for 3D Morton encoding.
///
/// Input:  ....... ....... ...xxxxx xxxxxxxx xxxxxxxx (21 bits)
/// Output: ..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x..x (63 bits)
#[inline]
pub fn spread_bits_3d(x: u32) -> u64 {
    let mut x = (x & 0x1FFFFF) as u64;
    x = (x | (x << 32)) & 0x1F00000000FFFF;
    x = (x | (x << 16)) & 0x1F0000FF0000FF;
    x = (x | (x << 8)) & 0x100F00F00F00F00F;
    x = (x | (x << 4)) & 0x10C30C30C30C30C3;
    x = (x | (x << 2)) & 0x1249249249249249;
    x
}

/// Spreads the lowest `bits` bits of `x` so that `dimensions - 1` zero bits separate them.
fn spread_bits(x: u32, bits: u32, dimensions: usize) -> u64 {
    let mut spread = 0u64;
    for bit in 0..bits {
        if x & (1 << bit) != 0 {
            spread |= 1 << (bit as usize * dimensions);
        }
    }
    spread
}

/// Interleaves `D` quantized coordinates into a single code, axis 0 most significant.
///
/// # Examples
/// ```
/// use lbvh::morton::interleave;
///
/// assert_eq!(interleave([1, 0, 0]), 0b100);
/// assert_eq!(interleave([0, 1, 0]), 0b010);
/// assert_eq!(interleave([0, 0, 1]), 0b001);
/// assert_eq!(interleave([3, 0, 0]), 0b100_100);
/// ```
pub fn interleave<const D: usize>(cells: [u32; D]) -> u64 {
    let mut code = 0;
    if D == 3 {
        for (axis, cell) in cells.iter().enumerate() {
            code |= spread_bits_3d(*cell) << (D - 1 - axis);
        }
    } else {
        let bits = bits_per_axis(D);
        for (axis, cell) in cells.iter().enumerate() {
            code |= spread_bits(*cell, bits, D) << (D - 1 - axis);
        }
    }
    code
}

/// Quantizes `point` into `D` cells of [`bits_per_axis`] bits, relative to the box spanned
/// by `lower` and `upper`. Axes without extent map to cell `0`, points outside the box are
/// clamped to the border cells.
pub fn quantize<T: BHValue, const D: usize>(
    point: &Point<T, D>,
    lower: &Point<T, D>,
    upper: &Point<T, D>,
) -> [u32; D] {
    let bits = bits_per_axis(D);
    let cells = (1u64 << bits) as f64;
    let max_cell = ((1u64 << bits) - 1) as u32;
    let mut quantized = [0u32; D];
    for (axis, cell) in quantized.iter_mut().enumerate() {
        let lo = lower[axis].to_f64().unwrap_or(0.0);
        let extent = upper[axis].to_f64().unwrap_or(0.0) - lo;
        if !(extent > 0.0) || !extent.is_finite() {
            continue;
        }
        let relative = (point[axis].to_f64().unwrap_or(lo) - lo) / extent;
        if !relative.is_finite() {
            continue;
        }
        let scaled = (relative.clamp(0.0, 1.0) * cells).floor();
        *cell = (scaled as u64).min(max_cell as u64) as u32;
    }
    quantized
}

/// Computes the Morton code of the center of `volume` inside the frame spanned by `lower`
/// and `upper`.
pub fn morton_code<T: BHValue, const D: usize, V: BoundingVolume<T, D>>(
    volume: &V,
    lower: &Point<T, D>,
    upper: &Point<T, D>,
) -> u64 {
    interleave(quantize(&volume.center(), lower, upper))
}

/// A leaf's sort key: its Morton code, extended by the index of the element it
/// represents. Keys of distinct elements are never equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MortonKey {
    /// The Morton code of the element's volume center.
    pub code: u64,
    /// The index of the element in the caller's input.
    pub element: u32,
}

impl MortonKey {
    /// Returns the length of the longest common prefix of `self` and `other`.
    ///
    /// Equal codes are told apart by their element indices, which extends the prefix
    /// beyond the 64 code bits.
    ///
    /// # Examples
    /// ```
    /// use lbvh::morton::MortonKey;
    ///
    /// let a = MortonKey { code: 0b1000, element: 0 };
    /// let b = MortonKey { code: 0b1100, element: 1 };
    /// assert_eq!(a.common_prefix(&b), 61);
    ///
    /// let c = MortonKey { code: 0b1000, element: 1 };
    /// assert_eq!(a.common_prefix(&c), 64 + 31);
    /// ```
    pub fn common_prefix(&self, other: &MortonKey) -> i32 {
        if self.code == other.code {
            64 + (self.element ^ other.element).leading_zeros() as i32
        } else {
            (self.code ^ other.code).leading_zeros() as i32
        }
    }
}
