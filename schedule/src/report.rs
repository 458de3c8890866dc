//! Tiling and memory reports.

use std::fmt;

use kgen_ir::{AccessType, BufferUsage, DataId, Kernel, Size, Window};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingEntry {
    pub data: DataId,
    pub name: String,
    pub grain: Size,
    pub execution_rate: Size,
    pub nbh_for_successors: Window,
    pub access: AccessType,
    pub cycle: u32,
    pub slots: u32,
}

/// Per-data outcome of the tile analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingReport {
    pub kernel: String,
    pub entries: Vec<TilingEntry>,
}

impl TilingReport {
    pub fn from_kernel(kernel: &Kernel) -> Self {
        let entries = kernel
            .iterative_data()
            .filter_map(|d| {
                let tiling = d.tiling()?;
                Some(TilingEntry {
                    data: d.id(),
                    name: d.name().to_string(),
                    grain: tiling.grain.clone(),
                    execution_rate: tiling.execution_rate.clone(),
                    nbh_for_successors: tiling.nbh_for_successors.clone(),
                    access: d.pattern().access_type(),
                    cycle: d.pattern().scheduling_cycle().unwrap_or(0),
                    slots: d.pattern().nb_buffer_slot(),
                })
            })
            .collect();
        Self { kernel: kernel.name().to_string(), entries }
    }

    pub fn entry(&self, name: &str) -> Option<&TilingEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl fmt::Display for TilingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tiling of kernel '{}':", self.kernel)?;
        for e in &self.entries {
            writeln!(
                f,
                "  {}: grain={} rate={} nbh={} {} cycle={} slots={}",
                e.name, e.grain, e.execution_rate, e.nbh_for_successors, e.access, e.cycle, e.slots
            )?;
        }
        Ok(())
    }
}

/// Local memory taken by a kernel's buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryReport {
    pub kernel: String,
    pub buffers: Vec<BufferUsage>,
    pub budget: Option<usize>,
}

impl MemoryReport {
    pub fn total_bytes(&self) -> usize {
        self.buffers.iter().map(|b| b.bytes).sum()
    }
}

fn kilobytes(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "memory of kernel '{}':", self.kernel)?;
        for b in &self.buffers {
            writeln!(f, "  {}: {:.2} KB", b.name, kilobytes(b.bytes))?;
        }
        write!(f, "  TOTAL: {:.2} KB", kilobytes(self.total_bytes()))?;
        match self.budget {
            Some(budget) => writeln!(f, " of {:.2} KB", kilobytes(budget)),
            None => writeln!(f),
        }
    }
}

/// Both reports of a scheduled kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub tiling: TilingReport,
    pub memory: MemoryReport,
}
