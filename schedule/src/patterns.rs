//! Access-type selection.

use kgen_ir::{AccessType, DataId, GranularityMode, Kernel, KernelData, ScanOrder};
use tracing::trace;

use crate::error::{MissingTilingSnafu, Result};

/// Access type of one scheduled data item under `mode`.
pub fn select_access(data: &KernelData, mode: GranularityMode, scan_order: ScanOrder) -> Option<AccessType> {
    if data.is_control() {
        return Some(AccessType::No);
    }
    let two_d = data.nb_dims() >= 2;
    if mode.is_whole_image() {
        return Some(if two_d { AccessType::D2Intrinsic } else { AccessType::D1Intrinsic });
    }
    if !two_d {
        return Some(AccessType::D1By1DChunks);
    }

    let tiling = data.tiling()?;
    let s = scan_order.scan_dim(data.nb_dims());
    let flat = tiling.access_union.is_zero()
        && (0..data.nb_dims()).filter(|&d| d != s).all(|d| tiling.nbh_for_successors.range(d) == (0, 0));

    Some(match scan_order {
        _ if flat => AccessType::D2By1DChunks,
        ScanOrder::Columns if mode == GranularityMode::ExternalTiling => AccessType::D2ByColumn2DBlock,
        ScanOrder::Columns => AccessType::D2ByColumn,
        ScanOrder::Rows => AccessType::D2ByRow,
    })
}

#[tracing::instrument(skip_all, fields(kernel = kernel.name(), %mode))]
pub fn assign_access_patterns(kernel: &mut Kernel, mode: GranularityMode, scan_order: ScanOrder) -> Result<()> {
    let ids: Vec<DataId> = kernel.data_items().map(KernelData::id).collect();
    for d in ids {
        let data = kernel.data(d);
        let Some(access) = select_access(data, mode, scan_order) else {
            return MissingTilingSnafu { kernel: kernel.name(), data: data.name() }.fail();
        };
        trace!(data = data.name(), %access, "access assigned");
        kernel.data_mut(d).assign_access(access)?;
    }
    Ok(())
}

/// Switch multi-slot line buffers to their circular variant.
pub fn promote_circular_buffers(kernel: &mut Kernel) -> Result<()> {
    let promoted: Vec<(DataId, AccessType)> = kernel
        .data_items()
        .filter(|d| d.nb_dims() >= 2 && d.pattern().nb_buffer_slot() > 1)
        .filter_map(|d| d.pattern().access_type().circular().map(|c| (d.id(), c)))
        .filter(|&(d, c)| kernel.data(d).pattern().access_type() != c)
        .collect();
    for (d, access) in promoted {
        trace!(data = kernel.data(d).name(), %access, "circular buffer");
        kernel.data_mut(d).assign_access(access)?;
    }
    Ok(())
}
