//! Buffer-slot sizing.
//!
//! A slot is one line along the scan dimension. A buffer must hold every
//! line that is still live between the cycle it is produced and the cycle
//! its last consumer reads it, plus the lines of left halo that consumer
//! looks back at.

use kgen_ir::{DataId, GranularityMode, Kernel, KernelData, ScanOrder};
use tracing::trace;

use crate::error::{MissingTilingSnafu, Result};

/// Lines a consumer at `consumer_cycle` needs from a producer at
/// `producer_cycle`, reading from `read_first` along the scan dimension.
///
/// ```
/// use kgen_schedule::slots::consumer_slots;
/// assert_eq!(consumer_slots(1, 0, 1, 0), 2);
/// assert_eq!(consumer_slots(1, 0, 0, 0), 1);
/// ```
pub fn consumer_slots(grain: i64, producer_cycle: u32, consumer_cycle: u32, read_first: i64) -> i64 {
    let live = i64::from(consumer_cycle) - i64::from(producer_cycle) + 1;
    (grain * live - read_first).max(1)
}

fn data_slots(kernel: &Kernel, data: &KernelData, mode: GranularityMode, scan_order: ScanOrder) -> Result<u32> {
    if data.is_control() || mode.is_whole_image() {
        return Ok(1);
    }
    let tiling = data.tiling().ok_or_else(|| MissingTilingSnafu { kernel: kernel.name(), data: data.name() }.build())?;
    let s = scan_order.scan_dim(data.nb_dims());
    let grain = tiling.grain.get(s);
    let produced = data.pattern().scheduling_cycle().unwrap_or(0);

    let mut slots = kernel
        .users(data.id())
        .map(|edge| {
            let consumed = kernel.data(kernel.node(edge.target()).output()).pattern().scheduling_cycle().unwrap_or(0);
            consumer_slots(grain, produced, consumed, edge.read().first(s))
        })
        .max()
        .unwrap_or(grain);
    if data.is_output() {
        slots = slots.max(2 * grain);
    }
    Ok(slots.max(1) as u32)
}

#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn size_buffer_slots(kernel: &mut Kernel, mode: GranularityMode, scan_order: ScanOrder) -> Result<()> {
    let ids: Vec<DataId> = kernel.data_items().map(KernelData::id).collect();
    for d in ids {
        let slots = data_slots(kernel, kernel.data(d), mode, scan_order)?;
        trace!(data = kernel.data(d).name(), slots, "slots sized");
        kernel.data_mut(d).size_slots(slots)?;
    }
    Ok(())
}
