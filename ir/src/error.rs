use snafu::Snafu;

use crate::access::DataState;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Rational with a zero denominator.
    #[snafu(display("rational number {num}/0 has a zero denominator"))]
    ZeroDenominator { num: i64 },

    /// Reduced fraction outside the 64-bit range.
    #[snafu(display("rational number {num}/{den} does not fit in 64 bits"))]
    RationalOverflow { num: i128, den: i128 },

    /// Buffer-slot count of zero.
    #[snafu(display("number of buffer slots must be at least 1"))]
    ZeroBufferSlots,

    /// Per-dimension vectors disagree on their number of dimensions.
    #[snafu(display("{what}: expected {expected} dimension(s), got {actual}"))]
    DimensionMismatch { what: String, expected: usize, actual: usize },

    /// Iterative data of one kernel disagree on their dimensionality.
    #[snafu(display("kernel '{kernel}': '{data}' has {actual} dimension(s), the kernel iterates over {expected}"))]
    MixedDimensions { kernel: String, data: String, expected: usize, actual: usize },

    /// Two data items of one kernel share a name.
    #[snafu(display("kernel '{kernel}': data '{name}' is already defined"))]
    DuplicateName { kernel: String, name: String },

    /// Id not allocated by this kernel.
    #[snafu(display("kernel '{kernel}': unknown {what} #{index}"))]
    UnknownId { kernel: String, what: &'static str, index: usize },

    /// Node output already produced by another node.
    #[snafu(display("kernel '{kernel}': data '{data}' already has a producer"))]
    MultipleProducers { kernel: String, data: String },

    /// Read window incompatible with the consuming node.
    #[snafu(display("kernel '{kernel}', node '{node}': invalid read of '{data}': {reason}"))]
    InvalidReadPattern { kernel: String, node: String, data: String, reason: String },

    /// Write window not covering the output stride.
    #[snafu(display("kernel '{kernel}', node '{node}': write pattern {window} does not cover output stride {stride}"))]
    InvalidWritePattern { kernel: String, node: String, window: String, stride: String },

    /// Stride with a non-positive component.
    #[snafu(display("kernel '{kernel}', node '{node}': {which} stride {stride} must be strictly positive"))]
    InvalidStride { kernel: String, node: String, which: &'static str, stride: String },

    /// Iterative data used as a control input.
    #[snafu(display("kernel '{kernel}', node '{node}': control input '{data}' is iterative"))]
    IterativeControl { kernel: String, node: String, data: String },

    /// Control data read through a data edge.
    #[snafu(display("kernel '{kernel}', node '{node}': data input '{data}' is not iterative"))]
    NonIterativeInput { kernel: String, node: String, data: String },

    /// Node output declared with a shape unlike its node's iteration space.
    #[snafu(display("kernel '{kernel}': output '{data}' of '{node}' is not iterative"))]
    NonIterativeOutput { kernel: String, node: String, data: String },

    /// Only kernel inputs may have no producer.
    #[snafu(display("kernel '{kernel}': data '{data}' is neither an input nor produced by a node"))]
    Orphan { kernel: String, data: String },

    /// Illegal analysis state transition.
    #[snafu(display("data '{data}': illegal transition {from} -> {to}"))]
    InvalidTransition { data: String, from: DataState, to: DataState },
}
