//! Error types for code generation.

use kgen_ir::DataState;
use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur during code generation.
///
/// Both are compiler bugs: the scheduler must have run to completion on a
/// kernel before it reaches a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A data item was not taken to its final analysis state.
    #[snafu(display("kernel '{kernel}': '{data}' reached the emitter in state {state}"))]
    Unresolved { kernel: String, data: String, state: DataState },

    /// The kernel carries no schedule.
    #[snafu(display("kernel '{kernel}' reached the emitter without a schedule"))]
    NotScheduled { kernel: String },
}
