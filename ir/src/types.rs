//! Arena handles and small enums of the kernel graph.

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Stable index of a [`crate::KernelData`] in its kernel.
    DataId,
    "d"
);
arena_id!(
    /// Stable index of a [`crate::FunctionNode`] in its kernel.
    NodeId,
    "n"
);
arena_id!(
    /// Stable index of a [`crate::DataEdge`] in its kernel.
    EdgeId,
    "e"
);

/// Role of a data item in its kernel's interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DataRole {
    /// Kernel parameter (iterative image or control scalar).
    Input,
    /// Node output returned by the kernel.
    Output,
    /// Node output consumed only inside the kernel.
    Temporary,
}

/// What a stencil reads outside the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum BorderMode {
    /// A constant value.
    ConstValue,
    /// The nearest edge pixel.
    Duplicate,
    /// The image mirrored at its edge.
    Mirror,
    /// Border outputs are not computed.
    Skip,
    /// Values extrapolated from the edge.
    Exp,
    /// Unspecified content.
    #[default]
    Undef,
}

impl BorderMode {
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}
