//! Types for code generation.

use kgen_ir::ScalarType;

/// A rendered kernel ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedKernel {
    /// The generated source.
    pub code: String,

    /// Entry point function name.
    pub entry_point: String,

    /// Kernel name.
    pub name: String,

    /// Argument information, in signature order.
    pub args: Vec<KernelArg>,

    /// Global work size.
    pub global_size: Option<[usize; 3]>,

    /// Local work size.
    pub local_size: Option<[usize; 3]>,
}

/// Information about one argument of the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelArg {
    /// Argument index.
    pub index: usize,

    /// Argument name.
    pub name: String,

    /// Element type.
    pub dtype: ScalarType,

    pub kind: ArgKind,
}

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Read-only global image.
    Input,
    /// Written global image.
    Output,
    /// Scalar passed by value.
    Control,
}

impl RenderedKernel {
    pub fn new(code: String, entry_point: String, name: String) -> Self {
        Self { code, entry_point, name, args: Vec::new(), global_size: None, local_size: None }
    }

    pub fn add_arg(&mut self, arg: KernelArg) {
        self.args.push(arg);
    }

    pub fn set_work_sizes(&mut self, global: [usize; 3], local: [usize; 3]) {
        self.global_size = Some(global);
        self.local_size = Some(local);
    }

    pub fn outputs(&self) -> impl Iterator<Item = &KernelArg> {
        self.args.iter().filter(|a| a.kind == ArgKind::Output)
    }
}
