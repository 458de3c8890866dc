//! Resolved tile geometry of a data item.
//!
//! Every coordinate the emitter needs is a small expression tree whose
//! leaves are the calling part index (work-group or kernel tile along the
//! dimension), a run-time extent, or a constant, and whose affine steps are
//! [`LinearCoefficient`]s. Clamps use `min`/`max` nodes so sizes at the
//! iteration-space boundaries never go negative.

use std::collections::BTreeMap;

use crate::DataId;
use crate::math::LinearCoefficient;

/// Unit of measure of a geometry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::Display, strum::EnumIter, strum::AsRefStr)]
pub enum Unit {
    /// One scheduler step of the data (its tile grain).
    Grain,
    /// One node execution's output.
    Block,
    /// One element.
    #[strum(serialize = "Pix")]
    Pixel,
}

/// Coordinate family of a geometry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::Display, strum::EnumIter, strum::AsRefStr)]
pub enum Quantity {
    /// Start of the calling part's own slice.
    #[strum(serialize = "SlicePos")]
    SlicePosition,
    /// Length of the calling part's own slice, clamped at the end.
    SliceSize,
    /// Start of the slice including its available halo.
    #[strum(serialize = "FullSlicePos")]
    FullSlicePosition,
    /// Length of the slice including its available halo.
    FullSliceSize,
    /// Halo available before the slice.
    LeftExtent,
    /// Halo available after the slice.
    RightExtent,
    /// Halo missing before the iteration space (border padding).
    SkipBegin,
    /// Padding past the end of the iteration space.
    SkipEnd,
}

/// Geometry entry key within one data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeomKey {
    pub dim: usize,
    pub quantity: Quantity,
    pub unit: Unit,
}

impl GeomKey {
    pub const fn new(dim: usize, quantity: Quantity, unit: Unit) -> Self {
        Self { dim, quantity, unit }
    }
}

impl std::fmt::Display for GeomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.quantity.as_ref(), self.unit.as_ref(), self.dim)
    }
}

/// Leaves an expression can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomLeaf {
    /// Index of the calling part along the entry's dimension.
    PartIndex,
    /// Run-time extent of a data item along the entry's dimension.
    Extent(DataId),
}

/// Integer expression over the part index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeomExpr {
    Const(i64),
    Leaf(GeomLeaf),
    Affine(Box<GeomExpr>, LinearCoefficient),
    Add(Box<GeomExpr>, Box<GeomExpr>),
    Sub(Box<GeomExpr>, Box<GeomExpr>),
    Min(Box<GeomExpr>, Box<GeomExpr>),
    Max(Box<GeomExpr>, Box<GeomExpr>),
}

impl GeomExpr {
    pub const fn constant(n: i64) -> Self {
        Self::Const(n)
    }

    pub const fn part_index() -> Self {
        Self::Leaf(GeomLeaf::PartIndex)
    }

    pub const fn extent(data: DataId) -> Self {
        Self::Leaf(GeomLeaf::Extent(data))
    }

    pub const fn as_const(&self) -> Option<i64> {
        match self {
            Self::Const(n) => Some(*n),
            _ => None,
        }
    }

    /// `coef(self)`, folded when `self` is constant.
    pub fn affine(self, coef: LinearCoefficient) -> Self {
        if coef.is_neutral() {
            return self;
        }
        match self {
            Self::Const(n) => Self::Const(coef.apply_to(n)),
            other => Self::Affine(Box::new(other), coef),
        }
    }

    pub fn scaled(self, k: i64) -> Self {
        self.affine(LinearCoefficient::scale(k))
    }

    pub fn add(self, other: GeomExpr) -> Self {
        match (self, other) {
            (Self::Const(a), Self::Const(b)) => Self::Const(a + b),
            (e, Self::Const(0)) | (Self::Const(0), e) => e,
            (a, b) => Self::Add(Box::new(a), Box::new(b)),
        }
    }

    pub fn sub(self, other: GeomExpr) -> Self {
        match (self, other) {
            (Self::Const(a), Self::Const(b)) => Self::Const(a - b),
            (e, Self::Const(0)) => e,
            (a, b) => Self::Sub(Box::new(a), Box::new(b)),
        }
    }

    pub fn min(self, other: GeomExpr) -> Self {
        match (self, other) {
            (Self::Const(a), Self::Const(b)) => Self::Const(a.min(b)),
            (a, b) if a == b => a,
            (a, b) => Self::Min(Box::new(a), Box::new(b)),
        }
    }

    pub fn max(self, other: GeomExpr) -> Self {
        match (self, other) {
            (Self::Const(a), Self::Const(b)) => Self::Const(a.max(b)),
            (a, b) if a == b => a,
            (a, b) => Self::Max(Box::new(a), Box::new(b)),
        }
    }

    /// `max(0, self)`.
    pub fn clamp_non_negative(self) -> Self {
        self.max(Self::Const(0))
    }

    /// Evaluate for part `index`; `extent` resolves run-time extents.
    pub fn eval(&self, index: i64, extent: &impl Fn(DataId) -> i64) -> i64 {
        match self {
            Self::Const(n) => *n,
            Self::Leaf(GeomLeaf::PartIndex) => index,
            Self::Leaf(GeomLeaf::Extent(data)) => extent(*data),
            Self::Affine(inner, coef) => coef.apply_to(inner.eval(index, extent)),
            Self::Add(a, b) => a.eval(index, extent) + b.eval(index, extent),
            Self::Sub(a, b) => a.eval(index, extent) - b.eval(index, extent),
            Self::Min(a, b) => a.eval(index, extent).min(b.eval(index, extent)),
            Self::Max(a, b) => a.eval(index, extent).max(b.eval(index, extent)),
        }
    }

    /// Evaluate an expression whose extents are all compile-time constants.
    pub fn eval_static(&self, index: i64) -> Option<i64> {
        if self.has_extent_leaf() {
            return None;
        }
        Some(self.eval(index, &|_| 0))
    }

    pub fn has_extent_leaf(&self) -> bool {
        match self {
            Self::Const(_) | Self::Leaf(GeomLeaf::PartIndex) => false,
            Self::Leaf(GeomLeaf::Extent(_)) => true,
            Self::Affine(inner, _) => inner.has_extent_leaf(),
            Self::Add(a, b) | Self::Sub(a, b) | Self::Min(a, b) | Self::Max(a, b) => {
                a.has_extent_leaf() || b.has_extent_leaf()
            }
        }
    }

    /// Integer C expression; `leaf` names the leaves.
    pub fn render(&self, leaf: &impl Fn(GeomLeaf) -> String) -> String {
        match self {
            Self::Const(n) if *n < 0 => format!("({n})"),
            Self::Const(n) => n.to_string(),
            Self::Leaf(l) => leaf(*l),
            Self::Affine(inner, coef) => coef.generate_string(&inner.render(leaf)),
            Self::Add(a, b) => format!("({}+{})", a.render(leaf), b.render(leaf)),
            Self::Sub(a, b) => format!("({}-{})", a.render(leaf), b.render(leaf)),
            Self::Min(a, b) => format!("min({},{})", a.render(leaf), b.render(leaf)),
            Self::Max(a, b) => format!("max({},{})", a.render(leaf), b.render(leaf)),
        }
    }
}

/// All resolved geometry entries of one data item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Geometry {
    entries: BTreeMap<GeomKey, GeomExpr>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: GeomKey, expr: GeomExpr) {
        self.entries.insert(key, expr);
    }

    pub fn get(&self, dim: usize, quantity: Quantity, unit: Unit) -> Option<&GeomExpr> {
        self.entries.get(&GeomKey::new(dim, quantity, unit))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeomKey, &GeomExpr)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
