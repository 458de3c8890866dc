//! Producer/consumer navigation and control-parameter derivation.

use std::collections::BTreeSet;

use super::data::KernelData;
use super::kernel::Kernel;
use super::node::{DataEdge, FunctionNode};
use crate::types::{DataId, NodeId};

impl Kernel {
    /// Edges reading `data`.
    pub fn users(&self, data: DataId) -> impl Iterator<Item = &DataEdge> {
        self.data(data).users().iter().map(|&e| self.edge(e))
    }

    pub fn producer(&self, data: DataId) -> Option<&FunctionNode> {
        self.data(data).producer().map(|n| self.node(n))
    }

    /// Edges feeding `node`, in declaration order.
    pub fn input_edges(&self, node: NodeId) -> impl Iterator<Item = &DataEdge> {
        self.node(node).inputs().iter().map(|&e| self.edge(e))
    }

    /// Producers of the data `node` reads, with repeats.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.input_edges(node).filter_map(|e| self.data(e.source()).producer())
    }

    /// Consumers of `node`'s output, with repeats.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.users(self.node(node).output()).map(DataEdge::target)
    }

    /// Nodes whose output nobody reads.
    pub fn sinks(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(|n| self.data(n.output()).users().is_empty()).map(FunctionNode::id)
    }

    /// Iterative data items: everything except control scalars.
    pub fn iterative_data(&self) -> impl Iterator<Item = &KernelData> {
        self.data_items().filter(|d| d.is_iterative())
    }

    /// Fill every node's control parameters.
    ///
    /// A node needs its explicit control inputs, the parameters carrying the
    /// dynamic extents of everything it reads or writes, and, transitively,
    /// whatever its producers need. The sets only grow, so the fixpoint is
    /// reached even on graphs that still contain cycles.
    pub fn derive_control_parameters(&mut self) {
        let mut params: Vec<BTreeSet<DataId>> = self
            .nodes
            .iter()
            .map(|node| {
                let mut own: BTreeSet<DataId> = node.control_inputs.iter().copied().collect();
                let touched = node.inputs.iter().map(|&e| self.edges[e.index()].source).chain([node.output]);
                for data in touched {
                    own.extend(self.data[data.index()].shape().iter().filter_map(|e| e.param()));
                }
                own
            })
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for node in &self.nodes {
                let upstream: Vec<DataId> = node
                    .inputs
                    .iter()
                    .filter_map(|&e| self.data[self.edges[e.index()].source.index()].producer)
                    .flat_map(|p| params[p.index()].iter().copied().collect::<Vec<_>>())
                    .collect();
                let own = &mut params[node.id.index()];
                let before = own.len();
                own.extend(upstream);
                changed |= own.len() != before;
            }
        }

        for (node, set) in self.nodes.iter_mut().zip(params) {
            node.control_params = set.into_iter().collect();
        }
    }
}
