//! Pipeline cycle of every data item.
//!
//! Kernel inputs and control data are available at cycle 0. A node runs one
//! cycle after its latest input, plus one cycle per grain of right halo it
//! has to wait for along the scan dimension.

use kgen_ir::math::{ceil_div, clamp_to_positive};
use kgen_ir::{DataEdge, Kernel, NodeId, ScanOrder};
use tracing::debug;

use crate::error::{MissingTilingSnafu, Result, UnscheduledProducerSnafu};

/// Cycle of each node and the order the emitter should list them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// Cycle per node, indexed by node id.
    pub node_cycles: Vec<u32>,
    /// Nodes by ascending cycle, ties in topological order.
    pub node_order: Vec<NodeId>,
    /// Largest node cycle; zero for a kernel without nodes.
    pub depth: u32,
}

/// Cycles a consumer waits after the producer of `edge`'s source.
pub fn edge_lag(kernel: &Kernel, edge: &DataEdge, scan_order: ScanOrder) -> Result<u32> {
    let source = kernel.data(edge.source());
    let tiling = source.tiling().ok_or_else(|| {
        MissingTilingSnafu { kernel: kernel.name(), data: source.name() }.build()
    })?;
    let s = scan_order.scan_dim(source.nb_dims());
    let in_stride = kernel.node(edge.target()).input_stride().get(s);
    let ahead = clamp_to_positive(edge.read().last(s) - (in_stride - 1));
    Ok(1 + ceil_div(ahead, tiling.grain.get(s).max(1)) as u32)
}

#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn assign_cycles(kernel: &mut Kernel, order: &[NodeId], scan_order: ScanOrder) -> Result<Pipeline> {
    let sources: Vec<_> = kernel.inputs().to_vec();
    for d in sources {
        kernel.data_mut(d).schedule_at(0)?;
    }

    let mut node_cycles = vec![0u32; kernel.nb_nodes()];
    for &n in order {
        let node = kernel.node(n);
        let mut cycle = 1u32;
        for edge in kernel.input_edges(n) {
            let source = kernel.data(edge.source());
            let Some(ready) = source.pattern().scheduling_cycle() else {
                return UnscheduledProducerSnafu { kernel: kernel.name(), node: node.name(), data: source.name() }
                    .fail();
            };
            cycle = cycle.max(ready + edge_lag(kernel, edge, scan_order)?);
        }
        for &control in node.control_inputs() {
            let source = kernel.data(control);
            let Some(ready) = source.pattern().scheduling_cycle() else {
                return UnscheduledProducerSnafu { kernel: kernel.name(), node: node.name(), data: source.name() }
                    .fail();
            };
            cycle = cycle.max(ready + 1);
        }

        let output = node.output();
        node_cycles[n.index()] = cycle;
        kernel.data_mut(output).schedule_at(cycle)?;
    }

    let mut node_order = order.to_vec();
    node_order.sort_by_key(|n| node_cycles[n.index()]);
    let depth = node_cycles.iter().copied().max().unwrap_or(0);
    debug!(depth, nodes = node_order.len(), "cycles assigned");
    Ok(Pipeline { node_cycles, node_order, depth })
}
