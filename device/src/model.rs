//! Read-only description of a target device.
//!
//! A [`ComputeDevice`] holds one [`ComputeUnit`] description replicated
//! `nb_compute_units` times; a unit holds one [`ComputeElement`] description
//! replicated `nb_compute_elements` times. Instances come out of
//! [`crate::DeviceConfig::final_check`] with every default filled in.

use kgen_dtype::{PrecisionClass, ScalarType};

/// Path between a memory level and a compute level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[strum(serialize_all = "lowercase")]
pub enum Connectivity {
    Dma,
    #[strum(serialize = "loadstore")]
    LoadStore,
}

/// Set of available connectivities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Connectivities {
    dma: bool,
    load_store: bool,
}

impl Connectivities {
    pub fn insert(&mut self, c: Connectivity) {
        match c {
            Connectivity::Dma => self.dma = true,
            Connectivity::LoadStore => self.load_store = true,
        }
    }

    pub const fn contains(&self, c: Connectivity) -> bool {
        match c {
            Connectivity::Dma => self.dma,
            Connectivity::LoadStore => self.load_store,
        }
    }

    pub const fn is_empty(&self) -> bool {
        !self.dma && !self.load_store
    }
}

impl std::fmt::Display for Connectivities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.dma, self.load_store) {
            (false, false) => write!(f, "none"),
            (true, false) => write!(f, "dma"),
            (false, true) => write!(f, "loadstore"),
            (true, true) => write!(f, "dma loadstore"),
        }
    }
}

/// How a compute element handles a precision class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[strum(serialize_all = "lowercase")]
pub enum TypeSupport {
    /// Not available at all.
    No,
    /// Emulated in software.
    Soft,
    /// Supported by the hardware.
    #[default]
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeElement {
    pub(crate) name: String,
    pub(crate) memory_size: Option<usize>,
    pub(crate) cache_size: Option<usize>,
    pub(crate) data_cache: bool,
    pub(crate) to_ext: Connectivities,
    pub(crate) to_lateral: Connectivities,
    pub(crate) nb_hw_threads: usize,
    pub(crate) sw_threads: bool,
    pub(crate) long_support: TypeSupport,
    pub(crate) float_support: TypeSupport,
    pub(crate) double_support: TypeSupport,
}

impl ComputeElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Private memory, if any.
    pub fn memory_size(&self) -> Option<usize> {
        self.memory_size
    }

    pub fn cache_size(&self) -> Option<usize> {
        self.cache_size
    }

    pub fn has_data_cache(&self) -> bool {
        self.data_cache
    }

    pub fn connectivity_to_ext(&self) -> Connectivities {
        self.to_ext
    }

    pub fn connectivity_to_lateral(&self) -> Connectivities {
        self.to_lateral
    }

    pub fn nb_hw_threads(&self) -> usize {
        self.nb_hw_threads
    }

    pub fn has_sw_threads(&self) -> bool {
        self.sw_threads
    }

    /// Support of a precision class; integers up to 32 bits are always native.
    pub fn precision_support(&self, class: PrecisionClass) -> TypeSupport {
        match class {
            PrecisionClass::Integer => TypeSupport::Native,
            PrecisionClass::Long => self.long_support,
            PrecisionClass::Float => self.float_support,
            PrecisionClass::Double => self.double_support,
        }
    }
}

impl std::fmt::Display for ComputeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compute element '{}': ", self.name)?;
        match self.memory_size {
            Some(bytes) => write!(f, "private memory = {bytes} bytes")?,
            None => write!(f, "no private memory")?,
        }
        write!(f, ", ext connectivity = {}, lateral connectivity = {}", self.to_ext, self.to_lateral)?;
        write!(f, ", {}", if self.data_cache { "data cache" } else { "no data cache" })?;
        write!(f, ", {} hw threads", self.nb_hw_threads)?;
        write!(f, ", {}", if self.sw_threads { "sw threads" } else { "no sw threads" })?;
        write!(f, ", {} long, {} float, {} double", self.long_support, self.float_support, self.double_support)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeUnit {
    pub(crate) name: String,
    pub(crate) memory_size: Option<usize>,
    pub(crate) cache_size: Option<usize>,
    pub(crate) data_cache: bool,
    pub(crate) to_ext: Connectivities,
    pub(crate) to_lateral: Connectivities,
    pub(crate) nb_compute_elements: usize,
}

impl ComputeUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local memory shared by the unit's elements, if any.
    pub fn memory_size(&self) -> Option<usize> {
        self.memory_size
    }

    pub fn cache_size(&self) -> Option<usize> {
        self.cache_size
    }

    pub fn has_data_cache(&self) -> bool {
        self.data_cache
    }

    pub fn connectivity_to_ext(&self) -> Connectivities {
        self.to_ext
    }

    pub fn connectivity_to_lateral(&self) -> Connectivities {
        self.to_lateral
    }

    pub fn nb_compute_elements(&self) -> usize {
        self.nb_compute_elements
    }
}

impl std::fmt::Display for ComputeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compute unit '{}': nbComputeElements={}", self.name, self.nb_compute_elements)?;
        match self.memory_size {
            Some(bytes) => write!(f, ", local memory = {bytes} bytes")?,
            None => write!(f, ", no local memory")?,
        }
        write!(f, ", ext connectivity = {}, lateral connectivity = {}", self.to_ext, self.to_lateral)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeDevice {
    pub(crate) name: String,
    pub(crate) memory_size: Option<usize>,
    pub(crate) nb_compute_units: usize,
    pub(crate) unit: ComputeUnit,
    pub(crate) element: ComputeElement,
}

impl ComputeDevice {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory_size(&self) -> Option<usize> {
        self.memory_size
    }

    pub fn nb_compute_units(&self) -> usize {
        self.nb_compute_units
    }

    pub fn compute_unit(&self) -> &ComputeUnit {
        &self.unit
    }

    pub fn compute_element(&self) -> &ComputeElement {
        &self.element
    }

    /// Compute elements over the whole device.
    pub fn nb_compute_elements_total(&self) -> usize {
        self.nb_compute_units * self.unit.nb_compute_elements
    }

    /// Memory a work-group may use for its buffers: the unit's local memory,
    /// else the device memory, else unbounded.
    pub fn local_memory_budget(&self) -> Option<usize> {
        self.unit.memory_size.or(self.memory_size)
    }

    pub fn type_support(&self, dtype: ScalarType) -> TypeSupport {
        self.element.precision_support(dtype.precision())
    }
}

impl std::fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device '{}': nbComputeUnits={}", self.name, self.nb_compute_units)?;
        match self.memory_size {
            Some(bytes) => writeln!(f, ", memory = {bytes} bytes")?,
            None => writeln!(f, ", no device memory")?,
        }
        writeln!(f, "{}", self.unit)?;
        write!(f, "{}", self.element)
    }
}
