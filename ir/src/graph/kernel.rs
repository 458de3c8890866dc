use itertools::Itertools;
use kgen_dtype::ScalarType;
use snafu::{OptionExt, ensure};
use tracing::trace;

use super::data::KernelData;
use super::node::{DataEdge, FunctionNode, NodeDecl, NodeInput};
use crate::context::UnitContext;
use crate::error::{DuplicateNameSnafu, MultipleProducersSnafu, NonIterativeOutputSnafu, Result, UnknownIdSnafu};
use crate::indexing::{Size, Window};
use crate::kernel_info::KernelSchedule;
use crate::provenance::SourceLocation;
use crate::shape::Shape;
use crate::types::{DataId, DataRole, EdgeId, NodeId};

/// A kernel's data-flow graph.
///
/// Data items, nodes and edges live in arenas owned by the kernel and refer
/// to one another through stable ids; ids index the arenas directly.
#[derive(Debug, Clone)]
pub struct Kernel {
    name: String,
    location: Option<SourceLocation>,
    pub(crate) data: Vec<KernelData>,
    pub(crate) nodes: Vec<FunctionNode>,
    pub(crate) edges: Vec<DataEdge>,
    inputs: Vec<DataId>,
    schedule: Option<KernelSchedule>,
}

impl Kernel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), location: None, data: Vec::new(), nodes: Vec::new(), edges: Vec::new(), inputs: Vec::new(), schedule: None }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    // ============================================================================
    // Construction
    // ============================================================================

    fn push_data(&mut self, name: &str, dtype: ScalarType, shape: Shape, iterative: bool, role: DataRole) -> Result<DataId> {
        ensure!(
            self.find_data(name).is_none(),
            DuplicateNameSnafu { kernel: self.name.clone(), name: name.to_string() }
        );
        let id = DataId::from_index(self.data.len());
        self.data.push(KernelData::new(id, name.to_string(), dtype, shape, iterative, role));
        trace!(kernel = %self.name, data = %id, name, "data added");
        Ok(id)
    }

    /// Iterative kernel parameter (an image or an array).
    pub fn add_input(&mut self, name: &str, dtype: ScalarType, shape: Shape) -> Result<DataId> {
        let id = self.push_data(name, dtype, shape, true, DataRole::Input)?;
        self.inputs.push(id);
        Ok(id)
    }

    /// Loop-invariant scalar kernel parameter.
    pub fn add_control(&mut self, name: &str, dtype: ScalarType) -> Result<DataId> {
        let id = self.push_data(name, dtype, Shape::new(), false, DataRole::Input)?;
        self.inputs.push(id);
        Ok(id)
    }

    /// Node output consumed inside the kernel; see [`Self::mark_output`].
    pub fn add_data(&mut self, name: &str, dtype: ScalarType, shape: Shape) -> Result<DataId> {
        self.push_data(name, dtype, shape, true, DataRole::Temporary)
    }

    /// Node output returned by the kernel.
    pub fn add_output(&mut self, name: &str, dtype: ScalarType, shape: Shape) -> Result<DataId> {
        self.push_data(name, dtype, shape, true, DataRole::Output)
    }

    pub fn mark_output(&mut self, id: DataId) -> Result<()> {
        let kernel = self.name.clone();
        let data = self.data.get_mut(id.index()).context(UnknownIdSnafu { kernel, what: "data", index: id.index() })?;
        if data.role() == DataRole::Temporary {
            data.set_role(DataRole::Output);
        }
        Ok(())
    }

    pub fn set_data_location(&mut self, id: DataId, location: SourceLocation) {
        if let Some(data) = self.data.get_mut(id.index()) {
            data.set_location(Some(location));
        }
    }

    fn check_data(&self, id: DataId) -> Result<()> {
        ensure!(
            id.index() < self.data.len(),
            UnknownIdSnafu { kernel: self.name.clone(), what: "data", index: id.index() }
        );
        Ok(())
    }

    /// Add a compute node; its unique number comes from `ctx`.
    pub fn add_node(&mut self, ctx: &mut UnitContext, decl: NodeDecl) -> Result<NodeId> {
        self.check_data(decl.output)?;
        let output = &self.data[decl.output.index()];
        ensure!(
            output.producer().is_none() && !output.is_input(),
            MultipleProducersSnafu { kernel: self.name.clone(), data: output.name().to_string() }
        );
        ensure!(
            output.is_iterative(),
            NonIterativeOutputSnafu {
                kernel: self.name.clone(),
                node: decl.name.clone(),
                data: output.name().to_string()
            }
        );
        for &control in &decl.control_inputs {
            self.check_data(control)?;
        }
        for input in &decl.inputs {
            self.check_data(input.source)?;
        }

        let nb_dims = output.nb_dims();
        let input_stride = decl.input_stride.unwrap_or_else(|| Size::ones(nb_dims));
        let output_stride = decl.output_stride.unwrap_or_else(|| Size::ones(nb_dims));
        let write_pattern = decl.write_pattern.unwrap_or_else(|| Window::covering(&output_stride));

        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(FunctionNode {
            id,
            uid: ctx.next_node_id(),
            mangled_name: ctx.mangle(&decl.name),
            name: decl.name,
            location: decl.location,
            inputs: Default::default(),
            control_inputs: decl.control_inputs.into_iter().collect(),
            output: decl.output,
            input_stride,
            output_stride,
            write_pattern,
            control_params: Vec::new(),
        });
        self.data[decl.output.index()].producer = Some(id);

        for input in decl.inputs {
            self.add_input_edge(id, input)?;
        }
        trace!(kernel = %self.name, node = %id, "node added");
        Ok(id)
    }

    /// Append a data input to an existing node.
    ///
    /// Edges may point backwards in declaration order, so a graph built this
    /// way can contain cycles; analysis rejects them.
    pub fn add_input_edge(&mut self, node: NodeId, input: NodeInput) -> Result<EdgeId> {
        self.check_data(input.source)?;
        ensure!(
            node.index() < self.nodes.len(),
            UnknownIdSnafu { kernel: self.name.clone(), what: "node", index: node.index() }
        );
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(DataEdge { id, source: input.source, target: node, read: input.read, border: input.border });
        self.nodes[node.index()].inputs.push(id);
        self.data[input.source.index()].users.push(id);
        Ok(id)
    }

    // ============================================================================
    // Access
    // ============================================================================

    /// Data item `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this kernel.
    pub fn data(&self, id: DataId) -> &KernelData {
        &self.data[id.index()]
    }

    /// Mutable data item `id`; panics like [`Self::data`].
    pub fn data_mut(&mut self, id: DataId) -> &mut KernelData {
        &mut self.data[id.index()]
    }

    /// Node `id`; panics if `id` was not issued by this kernel.
    pub fn node(&self, id: NodeId) -> &FunctionNode {
        &self.nodes[id.index()]
    }

    /// Edge `id`; panics if `id` was not issued by this kernel.
    pub fn edge(&self, id: EdgeId) -> &DataEdge {
        &self.edges[id.index()]
    }

    pub fn data_items(&self) -> impl Iterator<Item = &KernelData> {
        self.data.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FunctionNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &DataEdge> {
        self.edges.iter()
    }

    pub fn nb_data(&self) -> usize {
        self.data.len()
    }

    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Kernel parameters in declaration order.
    pub fn inputs(&self) -> &[DataId] {
        &self.inputs
    }

    pub fn outputs(&self) -> impl Iterator<Item = DataId> + '_ {
        self.data.iter().filter(|d| d.is_output()).map(KernelData::id)
    }

    pub fn temporaries(&self) -> impl Iterator<Item = DataId> + '_ {
        self.data.iter().filter(|d| d.role() == DataRole::Temporary).map(KernelData::id)
    }

    pub fn find_data(&self, name: &str) -> Option<DataId> {
        self.data.iter().find(|d| d.name() == name).map(KernelData::id)
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name() == name).map(FunctionNode::id)
    }

    pub fn schedule(&self) -> Option<&KernelSchedule> {
        self.schedule.as_ref()
    }

    pub fn set_schedule(&mut self, schedule: KernelSchedule) {
        self.schedule = Some(schedule);
    }

    /// Drop the kernel schedule and every per-data annotation.
    pub fn reset_analysis(&mut self) {
        self.schedule = None;
        self.data.iter_mut().for_each(KernelData::reset_analysis);
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "kernel {} {{", self.name)?;
        for data in &self.data {
            writeln!(f, "  {} {data}", data.role())?;
        }
        for node in &self.nodes {
            let inputs = node
                .inputs
                .iter()
                .map(|&e| {
                    let edge = self.edge(e);
                    format!("{}{}", self.data(edge.source).name(), edge.read)
                })
                .join(", ");
            writeln!(f, "  {} = {}({})", self.data(node.output).name(), node.name, inputs)?;
        }
        write!(f, "}}")
    }
}
