//! Per-dimension sizes and index windows.
//!
//! [`Size`] counts elements per dimension (strides, tile grains, execution
//! rates); [`Window`] is an inclusive `[first:last]` index range per
//! dimension, relative to an iteration index (read and write patterns,
//! stencil neighbourhoods).

use itertools::Itertools;
use smallvec::{SmallVec, smallvec};

use crate::math::{ceil_div, clamp_to_positive, floor_div, lcm_i64};

/// Element count per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Size(SmallVec<[i64; 2]>);

impl Size {
    pub fn new(dims: impl IntoIterator<Item = i64>) -> Self {
        Self(dims.into_iter().collect())
    }

    /// `[1, .., 1]` over `nb_dims` dimensions.
    pub fn ones(nb_dims: usize) -> Self {
        Self(smallvec![1; nb_dims])
    }

    pub fn nb_dims(&self) -> usize {
        self.0.len()
    }

    /// Elements along `dim`; dimensions past the end count as 1.
    pub fn get(&self, dim: usize) -> i64 {
        self.0.get(dim).copied().unwrap_or(1)
    }

    pub fn set(&mut self, dim: usize, value: i64) {
        if dim >= self.0.len() {
            self.0.resize(dim + 1, 1);
        }
        self.0[dim] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    pub fn product(&self) -> i64 {
        self.0.iter().product()
    }

    pub fn is_ones(&self) -> bool {
        self.0.iter().all(|&n| n == 1)
    }

    fn zip_with(&self, other: &Size, f: impl Fn(i64, i64) -> i64) -> Size {
        let n = self.nb_dims().max(other.nb_dims());
        Size((0..n).map(|d| f(self.get(d), other.get(d))).collect())
    }

    pub fn lcm(&self, other: &Size) -> Size {
        self.zip_with(other, lcm_i64)
    }

    pub fn mul(&self, other: &Size) -> Size {
        self.zip_with(other, |a, b| a * b)
    }

    /// Per-dimension `ceil(self / other)`.
    pub fn div_ceil(&self, other: &Size) -> Size {
        self.zip_with(other, ceil_div)
    }
}

impl From<&[i64]> for Size {
    fn from(dims: &[i64]) -> Self {
        Self::new(dims.iter().copied())
    }
}

impl<const N: usize> From<[i64; N]> for Size {
    fn from(dims: [i64; N]) -> Self {
        Self::new(dims)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(","))
    }
}

/// Inclusive index range `[first:last]` per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Window(SmallVec<[(i64, i64); 2]>);

impl Window {
    pub fn new(ranges: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self(ranges.into_iter().collect())
    }

    /// `[0:0]` over `nb_dims` dimensions (a pointwise access).
    pub fn zero(nb_dims: usize) -> Self {
        Self(smallvec![(0, 0); nb_dims])
    }

    /// `[0:n-1]` per dimension: the window covered by one stride.
    pub fn covering(size: &Size) -> Self {
        Self(size.iter().map(|n| (0, n - 1)).collect())
    }

    /// `[-k:k]` in every dimension.
    pub fn symmetric(nb_dims: usize, k: i64) -> Self {
        Self(smallvec![(-k, k); nb_dims])
    }

    pub fn nb_dims(&self) -> usize {
        self.0.len()
    }

    /// Range along `dim`; dimensions past the end are `[0:0]`.
    pub fn range(&self, dim: usize) -> (i64, i64) {
        self.0.get(dim).copied().unwrap_or((0, 0))
    }

    pub fn first(&self, dim: usize) -> i64 {
        self.range(dim).0
    }

    pub fn last(&self, dim: usize) -> i64 {
        self.range(dim).1
    }

    /// Number of indices covered along `dim`.
    pub fn len(&self, dim: usize) -> i64 {
        let (first, last) = self.range(dim);
        last - first + 1
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().any(|&(first, last)| last < first)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&r| r == (0, 0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.0.iter().copied()
    }

    fn map(&self, nb_dims: usize, f: impl Fn(usize, (i64, i64)) -> (i64, i64)) -> Window {
        let n = self.nb_dims().max(nb_dims);
        Window((0..n).map(|d| f(d, self.range(d))).collect())
    }

    /// Smallest window covering both.
    pub fn union(&self, other: &Window) -> Window {
        self.map(other.nb_dims(), |d, (f, l)| {
            let (of, ol) = other.range(d);
            (f.min(of), l.max(ol))
        })
    }

    /// Minkowski sum: firsts and lasts added.
    pub fn add(&self, other: &Window) -> Window {
        self.map(other.nb_dims(), |d, (f, l)| {
            let (of, ol) = other.range(d);
            (f + of, l + ol)
        })
    }

    /// Part of the window exceeding one stride: `last = first + max(0, len - stride)`.
    pub fn sub_size(&self, stride: &Size) -> Window {
        self.map(stride.nb_dims(), |d, (f, l)| (f, f + clamp_to_positive((l - f + 1) - stride.get(d))))
    }

    /// Firsts rounded down and lasts rounded up to a multiple of `grain`.
    pub fn inflate_to_multiple_of(&self, grain: &Size) -> Window {
        self.map(0, |d, (f, l)| {
            let g = grain.get(d).abs().max(1);
            (floor_div(f, g) * g, ceil_div(l, g) * g)
        })
    }

    /// Division by `grain`, rounding firsts down and lasts up.
    pub fn div_round_outward(&self, grain: &Size) -> Window {
        self.map(0, |d, (f, l)| {
            let g = grain.get(d).abs().max(1);
            (floor_div(f, g), ceil_div(l, g))
        })
    }

    /// Per-dimension scaling by `num / den`, rounding outward.
    pub fn scale(&self, num: &Size, den: &Size) -> Window {
        self.map(0, |d, (f, l)| {
            let (n, q) = (num.get(d), den.get(d).max(1));
            (floor_div(f * n, q), ceil_div(l * n, q))
        })
    }

    /// Symmetric hull `[-m:m]` with `m = max(-first, last)`.
    pub fn symmetry_union(&self) -> Window {
        self.map(0, |_, (f, l)| {
            let m = (-f).max(l);
            (-m, m)
        })
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|(a, b)| format!("{a}:{b}")).join(","))
    }
}
