//! Tile coordinates of every data item.
//!
//! Per dimension, with `g` the grain, `S` the slice length in grains and
//! `N` the extent, the grain-unit entries are
//!
//! ```text
//! nbg        = ceil(N / g)
//! pos        = part * S
//! size       = max(0, min(S, nbg - pos))
//! left       = min(lo, pos)
//! right      = max(0, min(hi, nbg - pos - size))
//! skip_begin = lo - left
//! skip_end   = max(0, pos + S + hi - nbg)
//! ```
//!
//! where `lo`/`hi` are the halo grains consumers need on each side. Pixel
//! entries scale by `g` and clamp to `N`; block entries scale by the
//! execution rate, rounding partial blocks up.

use kgen_ir::{
    DataId, Extent, GeomExpr, GeomKey, Geometry, Kernel, KernelData, LinearCoefficient, Quantity, Unit,
};
use tracing::trace;

use crate::error::{MissingTilingSnafu, Result};
use crate::partition::PartitionPlan;

fn ceil_by(expr: GeomExpr, den: i64) -> Result<GeomExpr> {
    Ok(expr.affine(LinearCoefficient::with_ceil(0, 1, den.max(1))?))
}

fn extent(data: &KernelData, dim: usize) -> GeomExpr {
    match data.shape()[dim] {
        Extent::Fixed(n) => GeomExpr::constant(n as i64),
        Extent::Dynamic { .. } => GeomExpr::extent(data.id()),
    }
}

/// Coordinates of one dimension, per unit.
struct DimGeometry {
    entries: Vec<(Quantity, GeomExpr)>,
}

impl DimGeometry {
    fn insert_into(self, geometry: &mut Geometry, dim: usize, unit: Unit) {
        for (quantity, expr) in self.entries {
            geometry.insert(GeomKey::new(dim, quantity, unit), expr);
        }
    }
}

/// Geometry of `data` over the kernel partition.
pub fn data_geometry(kernel: &Kernel, data: &KernelData, plan: &PartitionPlan) -> Result<Geometry> {
    let mut geometry = Geometry::new();
    if data.is_control() {
        return Ok(geometry);
    }
    let tiling = data.tiling().ok_or_else(|| MissingTilingSnafu { kernel: kernel.name(), data: data.name() }.build())?;
    let out_stride = kernel.producer(data.id()).map(|n| n.output_stride().clone());

    for dim in 0..data.nb_dims() {
        let g = tiling.grain.get(dim).max(1);
        let rate = tiling.execution_rate.get(dim).max(1);
        let stride = out_stride.as_ref().map_or(1, |s| s.get(dim)).max(1);
        let (first, last) = tiling.nbh_for_successors.range(dim);
        let lo = GeomExpr::constant(-first / g);
        let hi = GeomExpr::constant(last / g);

        let n = extent(data, dim);
        let nbg = ceil_by(n.clone(), g)?;
        let (pos, slice) = if plan.parts(dim) == 1 {
            (GeomExpr::constant(0), nbg.clone())
        } else {
            let s = plan.slice_grains(dim);
            (GeomExpr::part_index().scaled(s), GeomExpr::constant(s))
        };

        // Grain unit.
        let size = slice.clone().min(nbg.clone().sub(pos.clone())).clamp_non_negative();
        let left = lo.clone().min(pos.clone());
        let right = hi.clone().min(nbg.clone().sub(pos.clone()).sub(size.clone())).clamp_non_negative();
        let full_pos = pos.clone().sub(left.clone());
        let full_size = size.clone().add(left.clone()).add(right.clone());
        let skip_begin = lo.sub(left.clone());
        let skip_end = pos.clone().add(slice.clone()).add(hi.clone()).sub(nbg).clamp_non_negative();

        // Pixel unit.
        let pos_px = pos.clone().scaled(g);
        let slice_px = slice.clone().scaled(g);
        let size_px = slice_px.clone().min(n.clone().sub(pos_px.clone())).clamp_non_negative();
        let left_px = left.clone().scaled(g);
        let right_px =
            right.clone().scaled(g).min(n.clone().sub(pos_px.clone()).sub(slice_px)).clamp_non_negative();
        let full_pos_px = full_pos.clone().scaled(g);
        let full_size_px = full_size.clone().scaled(g).min(n.clone().sub(full_pos_px.clone())).clamp_non_negative();
        let skip_begin_px = skip_begin.clone().scaled(g);
        let skip_end_px = pos_px.clone().add(slice.add(hi).scaled(g)).sub(n).clamp_non_negative();

        // Block unit.
        let block = DimGeometry {
            entries: vec![
                (Quantity::SlicePosition, pos.clone().scaled(rate)),
                (Quantity::SliceSize, ceil_by(size_px.clone(), stride)?),
                (Quantity::FullSlicePosition, full_pos.clone().scaled(rate)),
                (Quantity::FullSliceSize, ceil_by(full_size_px.clone(), stride)?),
                (Quantity::LeftExtent, left.clone().scaled(rate)),
                (Quantity::RightExtent, ceil_by(right_px.clone(), stride)?),
                (Quantity::SkipBegin, skip_begin.clone().scaled(rate)),
                (Quantity::SkipEnd, ceil_by(skip_end_px.clone(), stride)?),
            ],
        };

        let grain = DimGeometry {
            entries: vec![
                (Quantity::SlicePosition, pos),
                (Quantity::SliceSize, size),
                (Quantity::FullSlicePosition, full_pos),
                (Quantity::FullSliceSize, full_size),
                (Quantity::LeftExtent, left),
                (Quantity::RightExtent, right),
                (Quantity::SkipBegin, skip_begin),
                (Quantity::SkipEnd, skip_end),
            ],
        };

        let pixel = DimGeometry {
            entries: vec![
                (Quantity::SlicePosition, pos_px),
                (Quantity::SliceSize, size_px),
                (Quantity::FullSlicePosition, full_pos_px),
                (Quantity::FullSliceSize, full_size_px),
                (Quantity::LeftExtent, left_px),
                (Quantity::RightExtent, right_px),
                (Quantity::SkipBegin, skip_begin_px),
                (Quantity::SkipEnd, skip_end_px),
            ],
        };

        grain.insert_into(&mut geometry, dim, Unit::Grain);
        block.insert_into(&mut geometry, dim, Unit::Block);
        pixel.insert_into(&mut geometry, dim, Unit::Pixel);
    }
    Ok(geometry)
}

#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn resolve_geometry(kernel: &mut Kernel, plan: &PartitionPlan) -> Result<()> {
    let ids: Vec<DataId> = kernel.data_items().map(KernelData::id).collect();
    for d in ids {
        let geometry = data_geometry(kernel, kernel.data(d), plan)?;
        trace!(data = kernel.data(d).name(), entries = geometry.len(), "geometry resolved");
        kernel.data_mut(d).resolve_geometry(geometry)?;
    }
    Ok(())
}
