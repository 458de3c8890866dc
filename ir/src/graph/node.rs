use smallvec::SmallVec;

use crate::indexing::{Size, Window};
use crate::provenance::SourceLocation;
use crate::types::{BorderMode, DataId, EdgeId, NodeId};

/// One compute step of a kernel, producing exactly one data item.
#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub(crate) id: NodeId,
    pub(crate) uid: u32,
    pub(crate) name: String,
    pub(crate) mangled_name: String,
    pub(crate) location: Option<SourceLocation>,
    pub(crate) inputs: SmallVec<[EdgeId; 4]>,
    pub(crate) control_inputs: SmallVec<[DataId; 2]>,
    pub(crate) output: DataId,
    pub(crate) input_stride: Size,
    pub(crate) output_stride: Size,
    pub(crate) write_pattern: Window,
    pub(crate) control_params: Vec<DataId>,
}

impl FunctionNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Compilation-unit-wide unique number.
    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol of the compute function in generated code.
    pub fn mangled_name(&self) -> &str {
        &self.mangled_name
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Data input edges, in declaration order.
    pub fn inputs(&self) -> &[EdgeId] {
        &self.inputs
    }

    pub fn control_inputs(&self) -> &[DataId] {
        &self.control_inputs
    }

    pub fn output(&self) -> DataId {
        self.output
    }

    /// Input elements consumed per execution, per dimension.
    pub fn input_stride(&self) -> &Size {
        &self.input_stride
    }

    /// Output elements produced per execution, per dimension.
    pub fn output_stride(&self) -> &Size {
        &self.output_stride
    }

    pub fn write_pattern(&self) -> &Window {
        &self.write_pattern
    }

    /// Control parameters the node needs at run time, explicit or implied
    /// by dynamic extents upstream. Filled by
    /// [`crate::Kernel::derive_control_parameters`].
    pub fn control_params(&self) -> &[DataId] {
        &self.control_params
    }
}

/// Read of `source` by `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEdge {
    pub(crate) id: EdgeId,
    pub(crate) source: DataId,
    pub(crate) target: NodeId,
    pub(crate) read: Window,
    pub(crate) border: BorderMode,
}

impl DataEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> DataId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Window read around the consumer's iteration index.
    pub fn read(&self) -> &Window {
        &self.read
    }

    pub fn border(&self) -> BorderMode {
        self.border
    }
}

/// Data input of a node under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInput {
    pub source: DataId,
    pub read: Window,
    pub border: BorderMode,
}

impl NodeInput {
    pub fn new(source: DataId, read: Window) -> Self {
        Self { source, read, border: BorderMode::default() }
    }

    /// Pointwise read over `nb_dims` dimensions.
    pub fn pointwise(source: DataId, nb_dims: usize) -> Self {
        Self::new(source, Window::zero(nb_dims))
    }

    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }
}

/// Declaration consumed by [`crate::Kernel::add_node`].
///
/// Strides default to one element per dimension of the output; the write
/// pattern defaults to the window covered by the output stride.
#[derive(Debug, Clone, bon::Builder)]
pub struct NodeDecl {
    #[builder(into)]
    pub name: String,
    pub output: DataId,
    #[builder(default)]
    pub inputs: Vec<NodeInput>,
    #[builder(default)]
    pub control_inputs: Vec<DataId>,
    pub input_stride: Option<Size>,
    pub output_stride: Option<Size>,
    pub write_pattern: Option<Window>,
    pub location: Option<SourceLocation>,
}
