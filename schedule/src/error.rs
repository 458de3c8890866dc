use kgen_ir::Abort;
use snafu::Snafu;

/// Internal consistency errors of the scheduler.
///
/// Infeasible schedules are not errors: they are reported through the
/// diagnostics channel and surface as [`crate::Analysis::Infeasible`].
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Ir { source: kgen_ir::Error },

    #[snafu(display("{source}"))]
    Aborted { source: Abort },

    #[snafu(display("kernel '{kernel}': dependency cycle between nodes {nodes}"))]
    Cycle { kernel: String, nodes: String },

    #[snafu(display("kernel '{kernel}': node '{node}' reads '{data}' before it is scheduled"))]
    UnscheduledProducer { kernel: String, node: String, data: String },

    #[snafu(display("kernel '{kernel}': '{data}' has no tile analysis"))]
    MissingTiling { kernel: String, data: String },
}

impl From<kgen_ir::Error> for Error {
    fn from(source: kgen_ir::Error) -> Self {
        Self::Ir { source }
    }
}

impl From<Abort> for Error {
    fn from(source: Abort) -> Self {
        Self::Aborted { source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
