//! Structural checks run before analysis.

use snafu::ensure;

use super::kernel::Kernel;
use crate::error::*;

impl Kernel {
    /// Check the graph invariants the scheduler relies on.
    ///
    /// Every non-input item has a producer; iterative items share one
    /// dimensionality, which the partition plan indexes; strides are strictly positive and
    /// match the output's dimensions; write patterns cover the output stride;
    /// read windows are well formed, read iterative data and cover at least
    /// one input stride; control inputs are loop invariant. Cycles are not
    /// detected here.
    #[tracing::instrument(skip_all, fields(kernel = %self.name()))]
    pub fn validate(&self) -> Result<()> {
        let kernel = || self.name().to_string();

        for data in self.data_items() {
            ensure!(
                data.is_input() || data.producer().is_some(),
                OrphanSnafu { kernel: kernel(), data: data.name().to_string() }
            );
        }

        let kernel_dims = self.iterative_data().map(|d| d.nb_dims()).max().unwrap_or(0);
        for data in self.iterative_data() {
            ensure!(
                data.nb_dims() == kernel_dims,
                MixedDimensionsSnafu {
                    kernel: kernel(),
                    data: data.name().to_string(),
                    expected: kernel_dims,
                    actual: data.nb_dims()
                }
            );
        }

        for node in self.nodes() {
            let output = self.data(node.output());
            let nb_dims = output.nb_dims();
            let node_name = || node.name().to_string();

            for (which, stride) in [("input", node.input_stride()), ("output", node.output_stride())] {
                ensure!(
                    stride.nb_dims() == nb_dims,
                    DimensionMismatchSnafu {
                        what: format!("{which} stride of '{}'", node.name()),
                        expected: nb_dims,
                        actual: stride.nb_dims()
                    }
                );
                ensure!(
                    stride.iter().all(|n| n > 0),
                    InvalidStrideSnafu { kernel: kernel(), node: node_name(), which, stride: stride.to_string() }
                );
            }

            let write = node.write_pattern();
            let covers = (0..nb_dims).all(|d| write.first(d) <= 0 && write.last(d) >= node.output_stride().get(d) - 1);
            ensure!(
                write.nb_dims() == nb_dims && covers,
                InvalidWritePatternSnafu {
                    kernel: kernel(),
                    node: node_name(),
                    window: write.to_string(),
                    stride: node.output_stride().to_string()
                }
            );

            for &control in node.control_inputs() {
                let data = self.data(control);
                ensure!(
                    data.is_control(),
                    IterativeControlSnafu { kernel: kernel(), node: node_name(), data: data.name().to_string() }
                );
            }

            for &edge_id in node.inputs() {
                let edge = self.edge(edge_id);
                let source = self.data(edge.source());
                let read = edge.read();
                let invalid = |reason: String| {
                    InvalidReadPatternSnafu {
                        kernel: kernel(),
                        node: node_name(),
                        data: source.name().to_string(),
                        reason,
                    }
                };

                ensure!(
                    source.is_iterative(),
                    NonIterativeInputSnafu { kernel: kernel(), node: node_name(), data: source.name().to_string() }
                );
                ensure!(
                    read.nb_dims() == source.nb_dims(),
                    invalid(format!("window {read} has {} dimension(s), data has {}", read.nb_dims(), source.nb_dims()))
                );
                ensure!(!read.is_empty(), invalid(format!("window {read} is empty")));
                for d in 0..read.nb_dims() {
                    let stride = node.input_stride().get(d);
                    ensure!(
                        read.len(d) >= stride,
                        invalid(format!("window {read} is narrower than the input stride {stride} along dimension {d}"))
                    );
                }
            }
        }
        Ok(())
    }
}
