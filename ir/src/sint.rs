//! Declared extents: either a compile-time size or a size carried by a
//! control parameter at run time.

use crate::DataId;

/// One dimension of a data item's declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    /// Compile-time constant size.
    Fixed(usize),

    /// Size read from the control parameter `param` at run time, optionally
    /// bounded from above.
    Dynamic { param: DataId, max: Option<usize> },
}

impl Extent {
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub const fn as_fixed(&self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Dynamic { .. } => None,
        }
    }

    /// Largest size the dimension may take, when known.
    pub const fn bound(&self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Dynamic { max, .. } => *max,
        }
    }

    /// Control parameter carrying the size, for dynamic extents.
    pub const fn param(&self) -> Option<DataId> {
        match self {
            Self::Fixed(_) => None,
            Self::Dynamic { param, .. } => Some(*param),
        }
    }
}

impl From<usize> for Extent {
    fn from(n: usize) -> Self {
        Self::Fixed(n)
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Dynamic { param, max: Some(max) } => write!(f, "{param}<={max}"),
            Self::Dynamic { param, max: None } => write!(f, "{param}"),
        }
    }
}
