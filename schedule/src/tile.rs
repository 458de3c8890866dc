//! Tile grains and neighbourhoods.
//!
//! Three sweeps over the node order:
//!
//! 1. backward, the grain every consumer can be fed from;
//! 2. forward, the grain actually used, so a producer step never yields a
//!    partial block;
//! 3. backward, the halo consumers need around a grain.
//!
//! Data are visited as kernel inputs followed by node outputs in node order;
//! backward sweeps walk that list in reverse.

use kgen_ir::{DataId, Kernel, NodeId, Size, TileInfo, Window};
use tracing::trace;

use crate::error::Result;

fn data_order(kernel: &Kernel, order: &[NodeId]) -> Vec<DataId> {
    let inputs = kernel.inputs().iter().copied().filter(|&d| kernel.data(d).is_iterative());
    inputs.chain(order.iter().map(|&n| kernel.node(n).output())).collect()
}

/// Compute and record the [`TileInfo`] of every data item.
#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn analyze_tiles(kernel: &mut Kernel, order: &[NodeId]) -> Result<()> {
    let data = data_order(kernel, order);
    let mut info: Vec<TileInfo> = vec![TileInfo::default(); kernel.nb_data()];

    // Grain for successors.
    for &d in data.iter().rev() {
        let item = kernel.data(d);
        let mut grain = Size::ones(item.nb_dims());
        for edge in kernel.users(d) {
            let target = kernel.node(edge.target());
            let target_grain = &info[target.output().index()].grain_for_successors;
            let needed = target_grain.div_ceil(target.output_stride()).mul(target.input_stride());
            grain = grain.lcm(&needed);
        }
        if let Some(producer) = kernel.producer(d) {
            grain = grain.lcm(producer.output_stride());
        }
        info[d.index()].grain_for_successors = grain;
    }

    // Grain and execution rate.
    for &d in &data {
        let own = info[d.index()].grain_for_successors.clone();
        let (grain, rate) = match kernel.producer(d) {
            None => (own.clone(), own),
            Some(node) => {
                let grain = kernel.input_edges(node.id()).fold(own, |acc, edge| {
                    let src = &info[edge.source().index()].grain;
                    acc.lcm(&src.div_ceil(node.input_stride()).mul(node.output_stride()))
                });
                let rate = grain.div_ceil(node.output_stride());
                (grain, rate)
            }
        };
        info[d.index()].grain = grain;
        info[d.index()].execution_rate = rate;
    }

    // Neighbourhood for successors and access union.
    for &d in data.iter().rev() {
        let nb_dims = kernel.data(d).nb_dims();
        let mut nbh = Window::zero(nb_dims);
        let mut access = Window::zero(nb_dims);
        for edge in kernel.users(d) {
            let target = kernel.node(edge.target());
            let downstream = info[target.output().index()]
                .nbh_for_successors
                .scale(target.input_stride(), target.output_stride());
            nbh = nbh.union(&downstream.add(&edge.read().sub_size(target.input_stride())));
            access = access.union(edge.read());
        }
        let tile = &mut info[d.index()];
        tile.nbh_for_successors = nbh.inflate_to_multiple_of(&tile.grain);
        tile.access_union = access;
    }

    for &d in &data {
        let tile = std::mem::take(&mut info[d.index()]);
        trace!(
            data = kernel.data(d).name(),
            grain = %tile.grain,
            rate = %tile.execution_rate,
            nbh = %tile.nbh_for_successors,
            "tile analysed"
        );
        kernel.data_mut(d).set_tiling(tile)?;
    }

    // Control data carry no tile.
    let controls: Vec<DataId> = kernel.data_items().filter(|d| d.is_control()).map(|d| d.id()).collect();
    for d in controls {
        kernel.data_mut(d).set_tiling(TileInfo::default())?;
    }
    Ok(())
}
