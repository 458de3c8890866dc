//! Code generation for scheduled kernels.
//!
//! Renderers read the scheduler's annotations and print them; they make no
//! decisions of their own. A kernel whose data did not all reach
//! [`kgen_ir::DataState::GeometryResolved`] is refused.
//!
//! # Architecture
//!
//! - **Traits**: Backend-agnostic interfaces (`Renderer`)
//! - **C**: OpenCL C entry point with the geometry prelude, local buffers
//!   and node calls in pipeline order

pub mod c;
pub mod error;
pub mod traits;
pub mod types;


pub use error::*;
pub use traits::*;
pub use types::*;

use kgen_ir::{DataState, Kernel};
use snafu::ensure;

/// Check that `kernel` went through the whole analysis.
pub fn ensure_resolved(kernel: &Kernel) -> Result<()> {
    for data in kernel.data_items() {
        ensure!(
            data.state() == DataState::GeometryResolved,
            UnresolvedSnafu { kernel: kernel.name(), data: data.name(), state: data.state() }
        );
    }
    ensure!(kernel.schedule().is_some(), NotScheduledSnafu { kernel: kernel.name() });
    Ok(())
}
