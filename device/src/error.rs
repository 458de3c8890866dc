use std::path::PathBuf;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The device description file could not be read.
    #[snafu(display("cannot read device description '{}': {source}", path.display()))]
    ReadDescription { path: PathBuf, source: std::io::Error },

    /// Diagnostics stopped the compilation unit.
    #[snafu(display("{source}"))]
    Aborted { source: kgen_ir::Abort },

    /// Errors were reported while building the device; see the diagnostics.
    #[snafu(display("device '{name}' has {count} configuration error(s)"))]
    InvalidDevice { name: String, count: usize },
}

impl From<kgen_ir::Abort> for Error {
    fn from(source: kgen_ir::Abort) -> Self {
        Self::Aborted { source }
    }
}
