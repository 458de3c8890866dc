//! Element base types carried by kernel data.
//!
//! Kernel images and scalars all have a C-like base element type. The
//! scheduler needs two facts about it: the storage size in bytes, used to
//! size local buffers, and the precision class, used to check the target's
//! native type support.

#[cfg(any(test, feature = "proptest"))]
pub mod proptest_gen;


/// Scalar element types of kernel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray, strum::EnumString)]
#[cfg_attr(feature = "proptest", derive(proptest_derive::Arbitrary))]
pub enum ScalarType {
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "char")]
    Char,
    #[strum(serialize = "uchar", serialize = "unsigned char")]
    UChar,
    #[strum(serialize = "short")]
    Short,
    #[strum(serialize = "ushort", serialize = "unsigned short")]
    UShort,
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "uint", serialize = "unsigned int")]
    UInt,
    #[strum(serialize = "long")]
    Long,
    #[strum(serialize = "ulong", serialize = "unsigned long")]
    ULong,
    #[strum(serialize = "half")]
    Half,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "double")]
    Double,
}

/// Precision class of an element type, as far as device support goes.
///
/// Devices declare support for `float`, `double` and `long` separately;
/// every other type is assumed to be native.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecisionClass {
    /// Integer types of at most 32 bits, always native.
    Integer,
    /// 64-bit integers.
    Long,
    /// Single (and half) precision floating point.
    Float,
    /// Double precision floating point.
    Double,
}

impl ScalarType {
    pub const fn bytes(&self) -> usize {
        match self {
            Self::Bool | Self::Char | Self::UChar => 1,
            Self::Short | Self::UShort | Self::Half => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Long | Self::ULong | Self::Double => 8,
        }
    }

    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Char | Self::Short | Self::Int | Self::Long)
    }

    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UChar | Self::UShort | Self::UInt | Self::ULong)
    }

    pub const fn is_int(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Half | Self::Float | Self::Double)
    }

    pub const fn precision(&self) -> PrecisionClass {
        match self {
            Self::Long | Self::ULong => PrecisionClass::Long,
            Self::Half | Self::Float => PrecisionClass::Float,
            Self::Double => PrecisionClass::Double,
            _ => PrecisionClass::Integer,
        }
    }

    /// OpenCL C spelling of the type.
    pub const fn c_style(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::UChar => "uchar",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Half => "half",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.c_style())
    }
}
