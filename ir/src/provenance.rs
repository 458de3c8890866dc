//! Source locations attached to kernels and diagnostics.

use std::sync::Arc;

use derive_more::Display;

/// A `file:line` position in a kernel source or target description.
///
/// The file name is shared: every diagnostic raised while reading one file
/// clones the same `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{file}:{line}")]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Self { file: file.into(), line }
    }

    /// Same file, another line.
    pub fn at_line(&self, line: u32) -> Self {
        Self { file: Arc::clone(&self.file), line }
    }
}
