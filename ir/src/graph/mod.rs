//! Kernel data-flow graph.
//!
//! A [`Kernel`] owns arenas of [`KernelData`], [`FunctionNode`] and
//! [`DataEdge`]. Edges are `(source data, target node)` index pairs; data
//! items keep their user edges and producer so traversal is O(1) both ways.

mod data;
mod kernel;
mod node;
mod traverse;
mod validate;

pub use data::{KernelData, TileInfo};
pub use kernel::Kernel;
pub use node::{DataEdge, FunctionNode, NodeDecl, NodeInput};
