//! Device feasibility checks.
//!
//! Every problem found here is a recoverable compile error (or a warning)
//! pushed to the diagnostics channel; the caller only learns whether the
//! schedule is usable.

use itertools::Itertools;
use kgen_device::{ComputeDevice, TypeSupport};
use kgen_ir::{BufferUsage, Diagnostics, GranularityMode, Kernel, KernelData, ScanOrder, shape};
use tracing::debug;

use crate::error::Result;
use crate::partition::{PartitionPlan, line_extent};

/// Local memory of the buffer of `data` under `plan`:
/// `elem * Π_non-scan(line extent) * slots`.
pub fn buffer_bytes(data: &KernelData, plan: &PartitionPlan, scan_order: ScanOrder) -> usize {
    if data.is_control() || !data.pattern().access_type().is_buffered() {
        return 0;
    }
    let s = scan_order.scan_dim(data.nb_dims());
    let lines: i64 = (0..data.nb_dims()).filter(|&d| d != s).map(|d| line_extent(data, d, plan.slice_grains(d))).product();
    data.elem_bytes() * lines.max(0) as usize * data.pattern().nb_buffer_slot() as usize
}

/// Outcome of the feasibility checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetCheck {
    pub feasible: bool,
    pub buffers: Vec<BufferUsage>,
    pub budget: Option<usize>,
}

#[tracing::instrument(skip_all, fields(kernel = kernel.name(), %mode))]
pub fn check_budget(
    kernel: &Kernel,
    device: &ComputeDevice,
    plan: &PartitionPlan,
    mode: GranularityMode,
    scan_order: ScanOrder,
    diag: &mut Diagnostics,
) -> Result<BudgetCheck> {
    let name = kernel.name();
    let errors_before = diag.error_count();

    check_types(kernel, device, diag)?;

    let budget = if mode.is_whole_image() { device.memory_size() } else { device.local_memory_budget() };
    let buffers: Vec<BufferUsage> = kernel
        .data_items()
        .map(|d| BufferUsage { data: d.id(), name: d.name().to_string(), bytes: buffer_bytes(d, plan, scan_order) })
        .filter(|b| b.bytes > 0)
        .collect();

    if mode.is_whole_image() {
        let total: usize = kernel
            .iterative_data()
            .filter_map(|d| shape::bounded_elements(d.shape()).map(|n| n * d.elem_bytes()))
            .sum();
        if let Some(memory) = budget
            && total > memory
        {
            diag.error(format!("kernel '{name}': images need {total} bytes, more than the {memory} bytes of device memory"))?;
        }
    } else {
        match budget {
            None => diag.warning(format!("kernel '{name}': no local memory size defined, buffers are not checked")),
            Some(memory) => check_local_memory(name, &buffers, memory, diag)?,
        }
    }

    let unit = device.compute_unit();
    let threads = unit.nb_compute_elements() * device.compute_element().nb_hw_threads();
    if plan.work_items > threads {
        diag.error(format!(
            "kernel '{name}': {} work-items per group exceed the {threads} hardware threads of compute unit '{}'",
            plan.work_items,
            unit.name()
        ))?;
    }
    if plan.work_groups > device.nb_compute_units() {
        diag.warning(format!(
            "kernel '{name}': {} work-groups for {} compute units, groups will be serialized",
            plan.work_groups,
            device.nb_compute_units()
        ));
    }

    let feasible = diag.error_count() == errors_before;
    debug!(feasible, bytes = buffers.iter().map(|b| b.bytes).sum::<usize>(), ?budget, "budget checked");
    Ok(BudgetCheck { feasible, buffers, budget })
}

fn check_local_memory(kernel: &str, buffers: &[BufferUsage], memory: usize, diag: &mut Diagnostics) -> Result<()> {
    let mut oversized = false;
    for buffer in buffers.iter().filter(|b| b.bytes > memory) {
        oversized = true;
        diag.error(format!(
            "kernel '{kernel}': buffer of '{}' needs {} bytes, more than the {memory} bytes of local memory",
            buffer.name, buffer.bytes
        ))?;
    }

    let total: usize = buffers.iter().map(|b| b.bytes).sum();
    if !oversized
        && total > memory
        && let Some(largest) = buffers.iter().rev().max_by_key(|b| b.bytes)
    {
        diag.error(format!(
            "kernel '{kernel}': buffers need {total} bytes, more than the {memory} bytes of local memory (largest: '{}', {} bytes)",
            largest.name, largest.bytes
        ))?;
    }
    Ok(())
}

/// One diagnostic per element type the compute element lacks or emulates.
fn check_types(kernel: &Kernel, device: &ComputeDevice, diag: &mut Diagnostics) -> Result<()> {
    let element = device.compute_element().name();
    for data in kernel.data_items().unique_by(|d| d.dtype()) {
        let dtype = data.dtype();
        match device.type_support(dtype) {
            TypeSupport::No => diag.error(format!(
                "kernel '{}': type '{dtype}' of '{}' is not supported by compute element '{element}'",
                kernel.name(),
                data.name()
            ))?,
            TypeSupport::Soft => diag.warning(format!(
                "kernel '{}': type '{dtype}' of '{}' is emulated in software on compute element '{element}'",
                kernel.name(),
                data.name()
            )),
            TypeSupport::Native => {}
        }
    }
    Ok(())
}
