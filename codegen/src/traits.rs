//! Core traits for code generation.

use kgen_ir::Kernel;

use crate::{RenderedKernel, Result};

/// Backend-agnostic emission interface.
///
/// Implementers walk a scheduled kernel linearly: every decision (tiling,
/// cycles, buffers, coordinates) is already annotated on the graph.
pub trait Renderer {
    /// Render a scheduled kernel into target source.
    fn render(&self, kernel: &Kernel) -> Result<RenderedKernel>;

    /// Get the backend name (e.g., "opencl").
    fn backend_name(&self) -> &str;

    /// Extension of the files the rendered source is written to.
    fn file_extension(&self) -> &str;
}
