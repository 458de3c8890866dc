//! Scheduling and tiling analysis of kernels.
//!
//! [`analyze`] takes a validated kernel graph to a fully annotated one: every
//! data item ends in [`kgen_ir::DataState::GeometryResolved`] and the kernel
//! carries a [`kgen_ir::KernelSchedule`], or the schedule does not fit the
//! device and the reasons are left in the diagnostics channel.
//!
//! # Module Organization
//!
//! - [`order`] - Priority-aware topological sort of the nodes
//! - [`tile`] - Tile grains, execution rates and neighbourhoods
//! - [`cycles`] - Pipeline cycles
//! - [`patterns`] - Access types
//! - [`slots`] - Buffer-slot sizing
//! - [`partition`] - Split of the iteration space over work-groups or tiles
//! - [`budget`] - Device feasibility checks
//! - [`geometry`] - Tile coordinate expressions
//! - [`report`] - Tiling and memory reports

pub mod budget;
pub mod config;
pub mod cycles;
pub mod error;
pub mod geometry;
pub mod order;
pub mod partition;
pub mod patterns;
pub mod report;
pub mod slots;
pub mod tile;


use kgen_device::ComputeDevice;
use kgen_ir::{Diagnostics, Kernel, KernelSchedule};
use tracing::debug;

pub use config::TilingConfig;
pub use error::{Error, Result};
pub use order::topological_order;
pub use partition::PartitionPlan;
pub use report::{MemoryReport, ScheduleReport, TilingEntry, TilingReport};

/// Outcome of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    /// The kernel is annotated and ready for emission.
    Ready(ScheduleReport),
    /// The schedule does not fit the device; the errors were reported.
    Infeasible,
}

impl Analysis {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn report(&self) -> Option<&ScheduleReport> {
        match self {
            Self::Ready(report) => Some(report),
            Self::Infeasible => None,
        }
    }
}

/// Schedule `kernel` on `device`.
///
/// Any previous analysis of the kernel is discarded first. Internal
/// inconsistencies (cycles, illegal state transitions) are `Err`; a schedule
/// that does not fit is [`Analysis::Infeasible`].
#[tracing::instrument(skip_all, fields(kernel = kernel.name(), mode = %config.mode, scan = %config.scan_order))]
pub fn analyze(
    kernel: &mut Kernel,
    device: &ComputeDevice,
    config: &TilingConfig,
    diag: &mut Diagnostics,
) -> Result<Analysis> {
    kernel.reset_analysis();
    kernel.validate()?;
    kernel.derive_control_parameters();

    let order = topological_order(kernel)?;
    tile::analyze_tiles(kernel, &order)?;
    let pipeline = cycles::assign_cycles(kernel, &order, config.scan_order)?;
    patterns::assign_access_patterns(kernel, config.mode, config.scan_order)?;
    slots::size_buffer_slots(kernel, config.mode, config.scan_order)?;
    patterns::promote_circular_buffers(kernel)?;

    let Some(plan) = partition::plan_partitions(kernel, device, config, diag)? else {
        return Ok(Analysis::Infeasible);
    };
    let check = budget::check_budget(kernel, device, &plan, config.mode, config.scan_order, diag)?;
    if !check.feasible {
        return Ok(Analysis::Infeasible);
    }

    geometry::resolve_geometry(kernel, &plan)?;

    let report = ScheduleReport {
        tiling: TilingReport::from_kernel(kernel),
        memory: MemoryReport { kernel: kernel.name().to_string(), buffers: check.buffers.clone(), budget: check.budget },
    };
    debug!("{}", report.tiling);
    debug!("{}", report.memory);
    diag.message(1, report.tiling.to_string().trim_end());
    diag.message(2, report.memory.to_string().trim_end());

    kernel.set_schedule(KernelSchedule {
        mode: config.mode,
        scan_order: config.scan_order,
        scan_dim: plan.scan_dim,
        partitions: plan.partitions,
        work_groups: plan.work_groups,
        work_items: plan.work_items,
        node_order: pipeline.node_order,
        pipeline_depth: pipeline.depth,
        buffers: check.buffers,
        local_memory_budget: check.budget,
    });
    Ok(Analysis::Ready(report))
}
