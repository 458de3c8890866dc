//! Target device model.
//!
//! Describes the accelerator the scheduler fits kernels onto: a device with
//! `nbComputeUnits` identical compute units (work-groups), each holding
//! `nbComputeElements` identical compute elements (work-items). Descriptions
//! come from `.cfg` files ([`parse`]) or from [`ComputeDevice::builder`].

pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod property;


use bon::bon;

pub use config::DeviceConfig;
pub use error::{Error, Result};
pub use model::{ComputeDevice, ComputeElement, ComputeUnit, Connectivities, Connectivity, TypeSupport};
pub use property::{DeviceLevel, DeviceProperty};

#[bon]
impl ComputeDevice {
    /// Device connected to external memory through DMA at every level.
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(into, default = String::from("device"))] name: String,
        #[builder(default = 1)] nb_compute_units: usize,
        #[builder(default = 1)] nb_compute_elements: usize,
        #[builder(default = 1)] nb_hw_threads: usize,
        device_memory: Option<usize>,
        unit_memory: Option<usize>,
        #[builder(default)] float_support: TypeSupport,
        #[builder(default)] double_support: TypeSupport,
        #[builder(default)] long_support: TypeSupport,
    ) -> Self {
        let mut dma = Connectivities::default();
        dma.insert(Connectivity::Dma);
        Self {
            name,
            memory_size: device_memory,
            nb_compute_units: nb_compute_units.max(1),
            unit: ComputeUnit {
                name: "unit".to_string(),
                memory_size: unit_memory,
                cache_size: None,
                data_cache: false,
                to_ext: dma,
                to_lateral: Connectivities::default(),
                nb_compute_elements: nb_compute_elements.max(1),
            },
            element: ComputeElement {
                name: "element".to_string(),
                memory_size: None,
                cache_size: None,
                data_cache: false,
                to_ext: dma,
                to_lateral: Connectivities::default(),
                nb_hw_threads: nb_hw_threads.max(1),
                sw_threads: false,
                long_support,
                float_support,
                double_support,
            },
        }
    }
}
