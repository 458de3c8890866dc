//! Data access patterns and the per-data analysis state machine.

use snafu::ensure;

use crate::error::{Result, ZeroBufferSlotsSnafu};

/// How a compute function indexes a data buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumIter, strum::EnumCount)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    /// Not accessed through a buffer (control scalars passed by value).
    No,
    /// Whole 1D array in place.
    #[strum(serialize = "D1_INTRINSIC")]
    D1Intrinsic,
    /// 1D array streamed in chunks.
    #[strum(serialize = "D1_BY_1D_CHUNKS")]
    D1By1DChunks,
    /// Whole 2D array in place.
    #[strum(serialize = "D2_INTRINSIC")]
    D2Intrinsic,
    /// 2D array streamed as flat 1D chunks.
    #[strum(serialize = "D2_BY_1D_CHUNKS")]
    D2By1DChunks,
    /// Row-major line pointer.
    #[default]
    #[strum(serialize = "D2_BY_ROW")]
    D2ByRow,
    /// Column-major line pointer.
    #[strum(serialize = "D2_BY_COLUMN")]
    D2ByColumn,
    /// Column scan over 2D blocks.
    #[strum(serialize = "D2_BY_COLUMN_2D_BLOCK")]
    D2ByColumn2DBlock,
    /// Circular buffer of row pointers.
    #[strum(serialize = "D2_BY_ROW_CIRCULAR_BUFFER")]
    D2ByRowCircularBuffer,
    /// Circular buffer of column pointers.
    #[strum(serialize = "D2_BY_COLUMN_CIRCULAR_BUFFER")]
    D2ByColumnCircularBuffer,
}

impl AccessType {
    pub const fn is_intrinsic(&self) -> bool {
        matches!(self, Self::D1Intrinsic | Self::D2Intrinsic)
    }

    pub const fn is_circular(&self) -> bool {
        matches!(self, Self::D2ByRowCircularBuffer | Self::D2ByColumnCircularBuffer)
    }

    /// Access types backed by a local scratch buffer.
    pub const fn is_buffered(&self) -> bool {
        !matches!(self, Self::No) && !self.is_intrinsic()
    }

    /// Circular-buffer variant of a line access, if it has one.
    pub const fn circular(&self) -> Option<AccessType> {
        match self {
            Self::D2ByRow | Self::D2ByRowCircularBuffer => Some(Self::D2ByRowCircularBuffer),
            Self::D2ByColumn | Self::D2ByColumnCircularBuffer => Some(Self::D2ByColumnCircularBuffer),
            _ => None,
        }
    }
}

/// Analysis progress of one data item.
///
/// Transitions only move forward, except that revising the access type of a
/// slot-sized item drops its geometry (back to [`DataState::SlotSized`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataState {
    #[default]
    Unscheduled,
    Scheduled,
    PatternAssigned,
    SlotSized,
    GeometryResolved,
}

/// Access classification, pipeline cycle and buffer-slot count of a data item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CodegenDataPattern {
    access: AccessType,
    scheduling_cycle: Option<u32>,
    nb_buffer_slot: u32,
}

impl CodegenDataPattern {
    pub fn set_access_type(&mut self, access: AccessType) {
        self.access = access;
    }

    pub const fn access_type(&self) -> AccessType {
        self.access
    }

    pub const fn has_access_type(&self) -> bool {
        !matches!(self.access, AccessType::No)
    }

    pub fn set_scheduling_cycle(&mut self, cycle: u32) {
        self.scheduling_cycle = Some(cycle);
    }

    pub const fn scheduling_cycle(&self) -> Option<u32> {
        self.scheduling_cycle
    }

    pub const fn is_scheduled(&self) -> bool {
        self.scheduling_cycle.is_some()
    }

    pub fn set_nb_buffer_slot(&mut self, slots: u32) -> Result<()> {
        ensure!(slots >= 1, ZeroBufferSlotsSnafu);
        self.nb_buffer_slot = slots;
        Ok(())
    }

    /// Zero until slot sizing has run.
    pub const fn nb_buffer_slot(&self) -> u32 {
        self.nb_buffer_slot
    }
}

impl std::fmt::Display for CodegenDataPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cycle = self.scheduling_cycle.map_or(-1, i64::from);
        write!(f, " {} sched={} slots={}", self.access, cycle, self.nb_buffer_slot)
    }
}
