//! Topological order of a kernel's nodes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use itertools::Itertools;
use kgen_ir::{Kernel, NodeId};
use tracing::trace;

use crate::error::{CycleSnafu, Result};

/// Kahn sort of the node graph.
///
/// Among the nodes whose producers are all ordered, the lowest id goes
/// first, so declaration order is kept wherever dependencies allow it.
/// Fails with the names of the nodes left on a cycle.
pub fn topological_order(kernel: &Kernel) -> Result<Vec<NodeId>> {
    let mut pending: Vec<usize> = kernel.nodes().map(|n| kernel.predecessors(n.id()).count()).collect();

    // BinaryHeap is a max-heap; Reverse pops the smallest id first.
    let mut ready: BinaryHeap<Reverse<NodeId>> =
        kernel.nodes().filter(|n| pending[n.id().index()] == 0).map(|n| Reverse(n.id())).collect();

    let mut order = Vec::with_capacity(kernel.nb_nodes());
    while let Some(Reverse(node)) = ready.pop() {
        trace!(node = kernel.node(node).name(), position = order.len(), "ordered");
        order.push(node);
        for succ in kernel.successors(node) {
            let count = &mut pending[succ.index()];
            *count -= 1;
            if *count == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    if order.len() < kernel.nb_nodes() {
        let nodes = kernel.nodes().filter(|n| pending[n.id().index()] > 0).map(|n| format!("'{}'", n.name())).join(", ");
        return CycleSnafu { kernel: kernel.name(), nodes }.fail();
    }
    Ok(order)
}
