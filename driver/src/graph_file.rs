//! Kernel graph descriptions.
//!
//! A description is a JSON document listing kernels, each with its data
//! items and compute nodes:
//!
//! ```json
//! { "kernels": [ {
//!     "name": "blur",
//!     "data": [
//!       { "name": "w", "kind": "control", "type": "int" },
//!       { "name": "in", "kind": "input", "type": "uchar", "shape": [{ "param": "w", "max": 640 }, 480] },
//!       { "name": "out", "kind": "output", "type": "uchar", "shape": [{ "param": "w", "max": 640 }, 480] }
//!     ],
//!     "nodes": [
//!       { "name": "box3", "output": "out", "inputs": [{ "data": "in", "read": [[-1, 1], [-1, 1]], "border": "mirror" }] }
//!     ]
//! } ] }
//! ```
//!
//! Data must be declared before nodes or extents refer to them.

use std::path::Path;

use kgen_ir::{
    BorderMode, DataId, Extent, Kernel, NodeDecl, NodeInput, ScalarType, Shape, Size, SourceLocation, UnitContext,
    Window,
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::error::{GraphContentSnafu, GraphSyntaxSnafu, ReadInputSnafu, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    pub kernels: Vec<KernelDesc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelDesc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub data: Vec<DataDesc>,
    pub nodes: Vec<NodeDesc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Input,
    Control,
    Temporary,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDesc {
    pub name: String,
    pub kind: DataKind,
    #[serde(rename = "type")]
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<ExtentDesc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A fixed size, or the name of the control parameter carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtentDesc {
    Fixed(usize),
    Dynamic {
        param: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDesc {
    pub name: String,
    pub output: String,
    #[serde(default)]
    pub inputs: Vec<InputDesc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_stride: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_stride: Option<Vec<i64>>,
    /// Written window per dimension; the output stride otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<Vec<(i64, i64)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDesc {
    pub data: String,
    /// Read window per dimension; pointwise when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<Vec<(i64, i64)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

// ============================================================================
// Loading
// ============================================================================

/// Read the description at `path` and build its kernels in `ctx`.
pub fn load(path: &Path, ctx: &mut UnitContext) -> Result<Vec<Kernel>> {
    let text = std::fs::read_to_string(path).context(ReadInputSnafu { path })?;
    let file: GraphFile = serde_json::from_str(&text).context(GraphSyntaxSnafu { path })?;
    build_kernels(&file, ctx)
}

pub fn build_kernels(file: &GraphFile, ctx: &mut UnitContext) -> Result<Vec<Kernel>> {
    file.kernels.iter().map(|desc| build_kernel(desc, ctx)).collect()
}

fn location(ctx: &UnitContext, line: Option<u32>) -> Option<SourceLocation> {
    line.map(|line| SourceLocation::new(ctx.name(), line))
}

fn build_kernel(desc: &KernelDesc, ctx: &mut UnitContext) -> Result<Kernel> {
    let unit = ctx.name().to_string();
    let mut kernel = Kernel::new(desc.name.as_str());
    if let Some(loc) = location(ctx, desc.line) {
        kernel = kernel.with_location(loc);
    }

    for data in &desc.data {
        let dtype: ScalarType = data.dtype.parse().ok().context(GraphContentSnafu {
            file: unit.as_str(),
            reason: format!("kernel '{}': unknown element type '{}' of '{}'", desc.name, data.dtype, data.name),
        })?;
        let shape = shape_of(&kernel, &unit, data)?;
        let id = match data.kind {
            DataKind::Input => kernel.add_input(&data.name, dtype, shape)?,
            DataKind::Control => kernel.add_control(&data.name, dtype)?,
            DataKind::Temporary => kernel.add_data(&data.name, dtype, shape)?,
            DataKind::Output => kernel.add_output(&data.name, dtype, shape)?,
        };
        if let Some(loc) = location(ctx, data.line) {
            kernel.set_data_location(id, loc);
        }
    }

    for node in &desc.nodes {
        let lookup = |name: &str| data_id(&kernel, &unit, name, &node.name);
        let output = lookup(&node.output)?;
        let inputs = node
            .inputs
            .iter()
            .map(|input| {
                let source = lookup(&input.data)?;
                let read = match &input.read {
                    Some(ranges) => Window::new(ranges.iter().copied()),
                    None => Window::zero(kernel.data(source).nb_dims()),
                };
                let border = match &input.border {
                    Some(text) => text.parse::<BorderMode>().ok().context(GraphContentSnafu {
                        file: unit.as_str(),
                        reason: format!("node '{}': unknown border mode '{text}'", node.name),
                    })?,
                    None => BorderMode::default(),
                };
                Ok(NodeInput::new(source, read).with_border(border))
            })
            .collect::<Result<Vec<_>>>()?;
        let control_inputs = node.controls.iter().map(|c| lookup(c)).collect::<Result<Vec<_>>>()?;

        let decl = NodeDecl::builder()
            .name(node.name.as_str())
            .output(output)
            .inputs(inputs)
            .control_inputs(control_inputs)
            .maybe_input_stride(node.input_stride.as_deref().map(Size::from))
            .maybe_output_stride(node.output_stride.as_deref().map(Size::from))
            .maybe_write_pattern(node.write.as_ref().map(|w| Window::new(w.iter().copied())))
            .maybe_location(location(ctx, node.line))
            .build();
        kernel.add_node(ctx, decl)?;
    }

    debug!(kernel = kernel.name(), data = kernel.nb_data(), nodes = kernel.nb_nodes(), "kernel built");
    Ok(kernel)
}

fn data_id(kernel: &Kernel, unit: &str, name: &str, node: &str) -> Result<DataId> {
    kernel.find_data(name).context(GraphContentSnafu {
        file: unit,
        reason: format!("kernel '{}': node '{node}' refers to unknown data '{name}'", kernel.name()),
    })
}

fn shape_of(kernel: &Kernel, unit: &str, data: &DataDesc) -> Result<Shape> {
    data.shape
        .iter()
        .map(|extent| match extent {
            ExtentDesc::Fixed(n) => Ok(Extent::Fixed(*n)),
            ExtentDesc::Dynamic { param, max } => {
                let id = kernel.find_data(param).filter(|&id| kernel.data(id).is_control()).context(
                    GraphContentSnafu {
                        file: unit,
                        reason: format!(
                            "kernel '{}': extent of '{}' refers to '{param}', which is not a declared control parameter",
                            kernel.name(),
                            data.name
                        ),
                    },
                )?;
                Ok(Extent::Dynamic { param: id, max: *max })
            }
        })
        .collect()
}
