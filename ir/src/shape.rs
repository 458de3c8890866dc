//! Shapes of kernel data.
//!
//! Dimension 0 is the innermost one (image width), dimension 1 the line
//! index. Kernels deal with 1D and 2D data, so two dimensions stay inline.

use smallvec::SmallVec;

use crate::sint::Extent;

/// Sequence of declared extents; empty for scalars.
pub type Shape = SmallVec<[Extent; 2]>;

/// Shape with every extent fixed.
pub fn fixed(dims: &[usize]) -> Shape {
    dims.iter().copied().map(Extent::Fixed).collect()
}

/// Check if every dimension is a compile-time constant.
pub fn is_static(shape: &Shape) -> bool {
    shape.iter().all(Extent::is_fixed)
}

/// Number of elements, when every dimension has a known bound.
pub fn bounded_elements(shape: &Shape) -> Option<usize> {
    shape.iter().map(Extent::bound).product()
}

pub fn display(shape: &Shape) -> String {
    use itertools::Itertools;
    format!("[{}]", shape.iter().join("x"))
}
