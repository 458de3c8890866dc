//! Recognised device description keys.
//!
//! One table drives every level: each [`DeviceProperty`] knows the levels it
//! applies to and the value kind it takes, so unknown or misplaced keys are
//! rejected the same way everywhere.

use crate::model::TypeSupport;

/// Level of the device hierarchy a property is set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
pub enum DeviceLevel {
    #[strum(serialize = "device")]
    Device,
    #[strum(serialize = "compute unit")]
    ComputeUnit,
    #[strum(serialize = "compute element")]
    ComputeElement,
}

impl DeviceLevel {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Kind of value a property takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Bare key, no value.
    Flag,
    Integer,
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum DeviceProperty {
    NbComputeUnits,
    NbComputeElements,
    MemorySize,
    CacheSize,
    DataConnectivityToExt,
    DataConnectivityToLateral,
    #[strum(serialize = "Tfloat")]
    TFloat,
    #[strum(serialize = "Tdouble")]
    TDouble,
    #[strum(serialize = "Tlong")]
    TLong,
    SwThreads,
    DataCache,
    NbHwThreads,
}

impl DeviceProperty {
    pub const fn levels(self) -> &'static [DeviceLevel] {
        use DeviceLevel::*;
        match self {
            Self::NbComputeUnits => &[Device],
            Self::NbComputeElements => &[ComputeUnit],
            Self::MemorySize => &[Device, ComputeUnit, ComputeElement],
            Self::CacheSize | Self::DataCache | Self::DataConnectivityToExt | Self::DataConnectivityToLateral => {
                &[ComputeUnit, ComputeElement]
            }
            Self::TFloat | Self::TDouble | Self::TLong | Self::SwThreads | Self::NbHwThreads => &[ComputeElement],
        }
    }

    pub fn applies_to(self, level: DeviceLevel) -> bool {
        self.levels().contains(&level)
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            Self::NbComputeUnits | Self::NbComputeElements | Self::MemorySize | Self::CacheSize | Self::NbHwThreads => {
                ValueKind::Integer
            }
            Self::DataConnectivityToExt
            | Self::DataConnectivityToLateral
            | Self::TFloat
            | Self::TDouble
            | Self::TLong => ValueKind::Identifier,
            Self::SwThreads | Self::DataCache => ValueKind::Flag,
        }
    }

    /// Connectivity keys accumulate values instead of being redefined.
    pub const fn is_cumulative(self) -> bool {
        matches!(self, Self::DataConnectivityToExt | Self::DataConnectivityToLateral)
    }

    /// Type-support values accepted by a `T*` key; float cannot be absent.
    pub const fn accepted_support(self) -> &'static [TypeSupport] {
        match self {
            Self::TFloat => &[TypeSupport::Soft, TypeSupport::Native],
            _ => &[TypeSupport::No, TypeSupport::Soft, TypeSupport::Native],
        }
    }
}
