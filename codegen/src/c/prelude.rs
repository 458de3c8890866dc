//! Geometry prelude: one integer constant per resolved coordinate.

use kgen_ir::{Extent, GeomLeaf, GranularityMode, Kernel, KernelData, KernelSchedule};

use super::types::c_ident;

/// Variable holding the part index along `dim`.
pub fn part_var(dim: usize) -> String {
    format!("kg_part{dim}")
}

/// Statements binding the part index of every split dimension.
///
/// Work-group slicing maps its single split dimension on the group id.
/// External tiles are walked by a loop over flattened tile numbers, opened
/// here and closed by the caller.
pub fn part_indices(schedule: &KernelSchedule) -> (Vec<String>, bool) {
    let split: Vec<usize> = (0..schedule.partitions.len()).filter(|&d| schedule.partitions[d].parts > 1).collect();
    match schedule.mode {
        GranularityMode::WholeImage => (Vec::new(), false),
        GranularityMode::WorkGroupSlicing => {
            (split.iter().map(|&d| format!("const int {} = get_group_id(0);", part_var(d))).collect(), false)
        }
        GranularityMode::ExternalTiling => {
            let total: i64 = split.iter().map(|&d| schedule.partitions[d].parts).product();
            let mut lines =
                vec![format!("for (int kg_tile = get_group_id(0); kg_tile < {total}; kg_tile += get_num_groups(0)) {{")];
            let mut stride = 1;
            for &d in &split {
                let parts = schedule.partitions[d].parts;
                lines.push(format!("const int {} = (kg_tile / {stride}) % {parts};", part_var(d)));
                stride *= parts;
            }
            (lines, true)
        }
    }
}

/// Name of the run-time extent of `data` along `dim`.
fn extent_name(kernel: &Kernel, data: &KernelData, dim: usize) -> String {
    match data.shape().get(dim) {
        Some(Extent::Dynamic { param, .. }) => c_ident(kernel.data(*param).name()),
        Some(Extent::Fixed(n)) => n.to_string(),
        None => "0".to_string(),
    }
}

/// One `const int` declaration per geometry entry of `data`.
pub fn geometry_lines(kernel: &Kernel, data: &KernelData) -> Vec<String> {
    let Some(geometry) = data.geometry() else {
        return Vec::new();
    };
    let name = c_ident(data.name());
    geometry
        .iter()
        .map(|(key, expr)| {
            let leaf = |l: GeomLeaf| match l {
                GeomLeaf::PartIndex => part_var(key.dim),
                GeomLeaf::Extent(id) => extent_name(kernel, kernel.data(id), key.dim),
            };
            format!("const int kg_{key}_{name} = {};", expr.render(&leaf))
        })
        .collect()
}
