//! Intermediate representation of the kernel compiler.
//!
//! Kernels are data-flow graphs of compute nodes over named data items. The
//! scheduler annotates them in place (access patterns, pipeline cycles,
//! buffer slots, tile geometry); the emitter reads those annotations.
//!
//! # Module Organization
//!
//! - [`graph`] - Kernel arenas: data items, nodes, edges
//! - [`access`] - Access types and the per-data analysis state machine
//! - [`geometry`] - Tile coordinate expressions
//! - [`indexing`] - Per-dimension sizes and windows
//! - [`math`] - Exact rational and affine arithmetic
//! - [`diagnostics`] - Bounded diagnostics channel
//! - [`context`] - Per-compilation-unit state
//! - [`kernel_info`] - Kernel-level schedule annotation

pub mod access;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod indexing;
pub mod kernel_info;
pub mod math;
pub mod provenance;
pub mod shape;
pub mod sint;
pub mod types;

#[cfg(any(test, feature = "proptest"))]
pub mod test;

pub use access::{AccessType, CodegenDataPattern, DataState};
pub use context::UnitContext;
pub use diagnostics::{Abort, Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use geometry::{GeomExpr, GeomKey, GeomLeaf, Geometry, Quantity, Unit};
pub use graph::{DataEdge, FunctionNode, Kernel, KernelData, NodeDecl, NodeInput, TileInfo};
pub use indexing::{Size, Window};
pub use kernel_info::{BufferUsage, GranularityMode, KernelSchedule, Partition, ScanOrder};
pub use math::{LinearCoefficient, RationalNumber};
pub use provenance::SourceLocation;
pub use shape::Shape;
pub use sint::Extent;
pub use types::{BorderMode, DataId, DataRole, EdgeId, NodeId};

pub use kgen_dtype::ScalarType;
