//! Kernel-level scheduling annotations.
//!
//! Written by the scheduler once a kernel's analysis succeeded, read by the
//! emitter. Per-data annotations live on [`crate::KernelData`] itself.

use smallvec::SmallVec;

use crate::{DataId, NodeId};

/// Decomposition strategy of the whole-image iteration space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GranularityMode {
    /// One part covers the whole image; data stays in global memory.
    #[default]
    #[strum(serialize = "image", serialize = "whole_image")]
    WholeImage,

    /// Fixed-size kernel tiles, copied to local memory.
    #[strum(serialize = "tile", serialize = "external_tiling")]
    ExternalTiling,

    /// The scan dimension is split across work-groups, each pipelining its
    /// slice line by line.
    #[strum(serialize = "wg", serialize = "work_group_slicing")]
    WorkGroupSlicing,
}

impl GranularityMode {
    pub fn is_whole_image(&self) -> bool {
        matches!(self, Self::WholeImage)
    }

    pub fn is_tiled(&self) -> bool {
        !self.is_whole_image()
    }
}

/// Direction of the line pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ScanOrder {
    /// Line after line (scan dimension 1 of 2D data).
    #[default]
    Rows,
    /// Column after column (scan dimension 0).
    Columns,
}

impl ScanOrder {
    /// Pipelined dimension of data with `nb_dims` dimensions.
    pub const fn scan_dim(&self, nb_dims: usize) -> usize {
        match self {
            Self::Rows if nb_dims >= 2 => 1,
            _ => 0,
        }
    }
}

/// Split of one iteration dimension into parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Grains along the dimension.
    pub nb_grains: i64,
    /// Grains per part (the last part may be shorter).
    pub slice_grains: i64,
    /// Number of parts.
    pub parts: i64,
}

impl Partition {
    pub const fn whole(nb_grains: i64) -> Self {
        Self { nb_grains, slice_grains: nb_grains, parts: 1 }
    }

    pub fn split(nb_grains: i64, slice_grains: i64) -> Self {
        let slice_grains = slice_grains.clamp(1, nb_grains.max(1));
        let parts = (nb_grains + slice_grains - 1) / slice_grains;
        Self { nb_grains, slice_grains, parts: parts.max(1) }
    }
}

/// Local memory taken by one data item's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferUsage {
    pub data: DataId,
    pub name: String,
    pub bytes: usize,
}

/// Schedule of a whole kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSchedule {
    pub mode: GranularityMode,
    pub scan_order: ScanOrder,
    /// Scan dimension of the kernel iteration space.
    pub scan_dim: usize,
    /// Partition per iteration dimension.
    pub partitions: SmallVec<[Partition; 2]>,
    pub work_groups: usize,
    pub work_items: usize,
    /// Nodes by ascending cycle, ties by node order.
    pub node_order: Vec<NodeId>,
    /// Largest cycle of any node.
    pub pipeline_depth: u32,
    pub buffers: Vec<BufferUsage>,
    /// Local memory budget the buffers were checked against, if bounded.
    pub local_memory_budget: Option<usize>,
}

impl KernelSchedule {
    pub fn local_memory_bytes(&self) -> usize {
        self.buffers.iter().map(|b| b.bytes).sum()
    }

    pub fn partition(&self, dim: usize) -> Option<&Partition> {
        self.partitions.get(dim)
    }
}
