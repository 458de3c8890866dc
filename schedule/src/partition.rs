//! Decomposition of the iteration space into parts.
//!
//! Every data item has the same number of grains along a dimension once
//! tile analysis ran, so one [`Partition`] per dimension describes the split
//! for the whole kernel; each data item scales it by its own grain.

use kgen_device::ComputeDevice;
use kgen_ir::math::ceil_div;
use kgen_ir::{Diagnostics, GranularityMode, Kernel, KernelData, Partition, Size};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::TilingConfig;
use crate::error::Result;

/// Partition of the kernel and the work-group shape executing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    pub nb_dims: usize,
    pub scan_dim: usize,
    pub partitions: SmallVec<[Partition; 2]>,
    pub work_groups: usize,
    pub work_items: usize,
}

impl PartitionPlan {
    /// Grains per part along `dim`; dimensions past the kernel's are whole.
    pub fn slice_grains(&self, dim: usize) -> i64 {
        self.partitions.get(dim).map_or(1, |p| p.slice_grains)
    }

    pub fn parts(&self, dim: usize) -> i64 {
        self.partitions.get(dim).map_or(1, |p| p.parts)
    }

    pub fn total_parts(&self) -> i64 {
        self.partitions.iter().map(|p| p.parts).product()
    }
}

fn grain(data: &KernelData) -> Size {
    data.tiling().map(|t| t.grain.clone()).unwrap_or_default()
}

/// Buffered footprint of one line of `data` along `dim` for a slice of
/// `slice` grains: the slice and its halo on both sides.
pub(crate) fn line_extent(data: &KernelData, dim: usize, slice: i64) -> i64 {
    let Some(tiling) = data.tiling() else { return 0 };
    let (lo, hi) = tiling.nbh_for_successors.range(dim);
    slice * tiling.grain.get(dim) + (hi - lo)
}

/// Grains along `dim`: the largest count over the iterative data. Fails with the name of a data item whose extent has no
/// known bound.
fn nb_grains(kernel: &Kernel, dim: usize) -> Result<i64, String> {
    let mut nb = 1;
    for data in kernel.iterative_data() {
        let Some(bound) = data.shape()[dim].bound() else {
            return Err(data.name().to_string());
        };
        nb = nb.max(ceil_div(bound as i64, grain(data).get(dim).max(1)));
    }
    Ok(nb)
}

/// Split the iteration space per `config`.
///
/// Every iterative item of a validated kernel has the plan's number of
/// dimensions. Returns `None` after reporting why no partition fits.
#[tracing::instrument(skip_all, fields(kernel = kernel.name(), mode = %config.mode))]
pub fn plan_partitions(
    kernel: &Kernel,
    device: &ComputeDevice,
    config: &TilingConfig,
    diag: &mut Diagnostics,
) -> Result<Option<PartitionPlan>> {
    let nb_dims = kernel.iterative_data().map(KernelData::nb_dims).max().unwrap_or(0);
    let scan_dim = config.scan_order.scan_dim(nb_dims);
    let mode = config.mode;

    let mut grains: SmallVec<[i64; 2]> = SmallVec::new();
    for dim in 0..nb_dims {
        match nb_grains(kernel, dim) {
            Ok(n) => grains.push(n),
            Err(_) if mode.is_whole_image() => grains.push(1),
            Err(data) => {
                diag.error(format!(
                    "kernel '{}': '{data}' has no bound on its extent in dimension {dim}, cannot tile it",
                    kernel.name()
                ))?;
                return Ok(None);
            }
        }
    }

    let nb_wg = config.nb_work_groups.unwrap_or_else(|| device.nb_compute_units()).max(1);
    let work_items = config.nb_work_items.unwrap_or_else(|| device.compute_unit().nb_compute_elements()).max(1);

    let partitions: SmallVec<[Partition; 2]> = match mode {
        GranularityMode::WholeImage => grains.iter().map(|&n| Partition::whole(n)).collect(),
        GranularityMode::WorkGroupSlicing => grains
            .iter()
            .enumerate()
            .map(|(dim, &n)| {
                if dim == scan_dim {
                    let parts = (nb_wg as i64).min(n).max(1);
                    Partition::split(n, ceil_div(n, parts))
                } else {
                    Partition::whole(n)
                }
            })
            .collect(),
        GranularityMode::ExternalTiling => match external_tiles(kernel, device, config, &grains, scan_dim, diag)? {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let total: i64 = partitions.iter().map(|p| p.parts).product();
    let work_groups = match mode {
        GranularityMode::WholeImage => 1,
        GranularityMode::WorkGroupSlicing => total as usize,
        GranularityMode::ExternalTiling => nb_wg.min(total as usize),
    };

    debug!(?partitions, work_groups, work_items, "partition planned");
    Ok(Some(PartitionPlan { nb_dims, scan_dim, partitions, work_groups, work_items }))
}

/// Kernel tiles for external tiling, fixed or fitted to the local memory.
fn external_tiles(
    kernel: &Kernel,
    device: &ComputeDevice,
    config: &TilingConfig,
    grains: &[i64],
    scan_dim: usize,
    diag: &mut Diagnostics,
) -> Result<Option<SmallVec<[Partition; 2]>>> {
    let reference = kernel.outputs().next().map(|d| grain(kernel.data(d))).unwrap_or_default();
    let buffered: Vec<&KernelData> = kernel.iterative_data().collect();

    let mut partitions: SmallVec<[Partition; 2]> = SmallVec::new();
    for (dim, &n) in grains.iter().enumerate() {
        let slice = match &config.tile {
            Some(tile) if dim < tile.nb_dims() => ceil_div(tile.get(dim), reference.get(dim).max(1)),
            Some(_) => n,
            None if dim == scan_dim => n,
            None => match device.local_memory_budget() {
                None => n,
                Some(budget) => {
                    let (fixed, per_grain) = buffered.iter().fold((0i64, 0i64), |(fixed, per_grain), d| {
                        let (lo, hi) = d.tiling().map_or((0, 0), |t| t.nbh_for_successors.range(dim));
                        let line = (d.elem_bytes() as i64) * i64::from(d.pattern().nb_buffer_slot());
                        (fixed + line * (hi - lo), per_grain + line * grain(d).get(dim))
                    });
                    if per_grain == 0 { n } else { (budget as i64 - fixed).div_euclid(per_grain) }
                }
            },
        };

        if slice < 1 {
            diag.error(format!(
                "kernel '{}': local memory too small for a tile of one grain in dimension {dim}",
                kernel.name()
            ))?;
            return Ok(None);
        }
        let partition = Partition::split(n, slice);

        if dim != scan_dim {
            for data in &buffered {
                let Some(tiling) = data.tiling() else { continue };
                let width = partition.slice_grains * tiling.grain.get(dim);
                let footprint = tiling.access_union.len(dim);
                if width < footprint && partition.parts > 1 {
                    let cause = if config.is_fixed_tile() { "tile" } else { "local memory budget" };
                    diag.error(format!(
                        "kernel '{}': {cause} limits '{}' to {width} pixels in dimension {dim}, narrower than its {footprint}-pixel stencil",
                        kernel.name(),
                        data.name()
                    ))?;
                    return Ok(None);
                }
            }
        }
        partitions.push(partition);
    }
    Ok(Some(partitions))
}
