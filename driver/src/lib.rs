//! Compiler driver.
//!
//! Reads the target device once, then compiles every kernel graph
//! description on a worker pool: graph building, scheduling, emission and
//! output commit, one [`kgen_ir::UnitContext`] per file.
//!
//! # Module Organization
//!
//! - [`options`] - Driver options
//! - [`graph_file`] - JSON kernel graph descriptions
//! - [`pipeline`] - Per-file pipelines and the worker pool
//! - [`resources`] - Output streams and temporary directories of a pipeline
//! - [`exec`] - Subprocess helpers

pub mod error;
pub mod exec;
pub mod graph_file;
pub mod options;
pub mod pipeline;
pub mod resources;


use kgen_device::ComputeDevice;
use kgen_ir::Diagnostics;

pub use error::{Error, Result};
pub use options::DriverOptions;
pub use pipeline::{FileOutcome, Session, compile_all, compile_file};
pub use resources::Resources;

/// Read the target device of `options`; configuration problems are left in
/// `diag` and any error among them rejects the device.
pub fn load_device(options: &DriverOptions, diag: &mut Diagnostics) -> Result<ComputeDevice> {
    let device = kgen_device::parse::read_file(&options.device, diag)?;
    diag.exit_if_error()?;
    Ok(device)
}
