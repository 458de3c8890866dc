use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that end the compilation of one input or of the whole run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Inconsistent command line.
    #[snafu(display("{reason}"))]
    Usage { reason: String },

    #[snafu(display("cannot read '{}': {source}", path.display()))]
    ReadInput { path: PathBuf, source: std::io::Error },

    #[snafu(display("'{}' is not a kernel graph description: {source}", path.display()))]
    GraphSyntax { path: PathBuf, source: serde_json::Error },

    /// The description parses but does not describe a valid graph.
    #[snafu(display("{file}: {reason}"))]
    GraphContent { file: String, reason: String },

    #[snafu(display("{source}"))]
    Ir { source: kgen_ir::Error },

    #[snafu(display("{source}"))]
    Device { source: kgen_device::Error },

    #[snafu(display("{source}"))]
    Schedule { source: kgen_schedule::Error },

    #[snafu(display("{source}"))]
    Aborted { source: kgen_ir::Abort },

    /// Errors were reported for the file; see its diagnostics.
    #[snafu(display("{file}: {count} error(s), no output generated"))]
    Compile { file: String, count: usize },

    #[snafu(display("cannot create a temporary directory: {source}"))]
    CreateTempDir { source: std::io::Error },

    #[snafu(display("cannot write '{}': {source}", path.display()))]
    WriteOutput { path: PathBuf, source: std::io::Error },

    #[snafu(display("cannot move the output to '{}': {source}", path.display()))]
    PersistOutput { path: PathBuf, source: tempfile::PersistError },

    /// Streams or temporary directories could not be released.
    #[snafu(display("cleanup failed for '{}': {source}", path.display()))]
    Cleanup { path: PathBuf, source: std::io::Error },

    #[snafu(display("unknown output stream #{index}"))]
    UnknownStream { index: usize },

    #[snafu(display("cannot run '{program}': {source}"))]
    Spawn { program: String, source: std::io::Error },

    /// A subprocess exited unsuccessfully; `stderr` holds its error output.
    #[snafu(display("'{program}' failed with status {status}"))]
    Subprocess { program: String, status: i32, stderr: String },

    #[snafu(display("cannot start the worker pool: {source}"))]
    WorkerPool { source: rayon::ThreadPoolBuildError },
}

impl Error {
    /// Process exit status this error terminates with.
    pub fn exit_status(&self) -> i32 {
        match self {
            Self::Subprocess { status, .. } => *status,
            Self::Aborted { source } => source.exit_status(),
            _ => 1,
        }
    }
}

impl From<kgen_ir::Error> for Error {
    fn from(source: kgen_ir::Error) -> Self {
        Self::Ir { source }
    }
}

impl From<kgen_device::Error> for Error {
    fn from(source: kgen_device::Error) -> Self {
        Self::Device { source }
    }
}

impl From<kgen_schedule::Error> for Error {
    fn from(source: kgen_schedule::Error) -> Self {
        Self::Schedule { source }
    }
}

impl From<kgen_ir::Abort> for Error {
    fn from(source: kgen_ir::Abort) -> Self {
        Self::Aborted { source }
    }
}
