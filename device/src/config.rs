//! Mutable device description under construction.
//!
//! Properties are applied one at a time, each problem reported through the
//! diagnostics channel with the caller's location. [`DeviceConfig::final_check`]
//! fills defaults and freezes the description into a [`ComputeDevice`].

use std::collections::HashSet;
use std::str::FromStr;

use kgen_ir::{Abort, Diagnostics, SourceLocation};
use snafu::ensure;
use tracing::debug;

use crate::error::{InvalidDeviceSnafu, Result};
use crate::model::{
    ComputeDevice, ComputeElement, ComputeUnit, Connectivities, Connectivity, TypeSupport,
};
use crate::property::{DeviceLevel, DeviceProperty, ValueKind};

#[derive(Debug, Clone, Default)]
struct LevelConfig {
    name: Option<String>,
    memory_size: Option<usize>,
    cache_size: Option<usize>,
    data_cache: bool,
    to_ext: Connectivities,
    to_lateral: Connectivities,
    count: Option<usize>,
    nb_hw_threads: Option<usize>,
    sw_threads: bool,
    long_support: Option<TypeSupport>,
    float_support: Option<TypeSupport>,
    double_support: Option<TypeSupport>,
}

impl LevelConfig {
    fn name(&self, level: DeviceLevel) -> String {
        self.name.clone().unwrap_or_else(|| match level {
            DeviceLevel::Device => "device".to_string(),
            DeviceLevel::ComputeUnit => "unit".to_string(),
            DeviceLevel::ComputeElement => "element".to_string(),
        })
    }
}

/// Device description being assembled from `key = value` properties.
#[derive(Debug, Clone, Default)]
pub struct DeviceConfig {
    levels: [LevelConfig; 3],
    declared: [bool; 3],
    defined: HashSet<(DeviceLevel, DeviceProperty)>,
    nb_errors: usize,
}

impl DeviceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.levels[DeviceLevel::Device.index()].name = Some(name.into());
        config.declared[DeviceLevel::Device.index()] = true;
        config
    }

    /// Report an error that makes the description invalid.
    pub(crate) fn error(
        &mut self,
        diag: &mut Diagnostics,
        location: Option<&SourceLocation>,
        text: String,
    ) -> Result<(), Abort> {
        self.nb_errors += 1;
        diag.error_at(location.cloned(), text)
    }

    fn level_prefix(&self, level: DeviceLevel) -> String {
        format!("{level} '{}'", self.levels[level.index()].name(level))
    }

    /// Open the description of a level, naming it.
    ///
    /// A device holds a single unit and a single element description;
    /// declaring one twice is an error.
    pub fn declare(
        &mut self,
        level: DeviceLevel,
        name: Option<&str>,
        location: Option<&SourceLocation>,
        diag: &mut Diagnostics,
    ) -> Result<(), Abort> {
        let idx = level.index();
        if self.declared[idx] && level != DeviceLevel::Device {
            let text = format!("{}: redefining a {level}", self.level_prefix(DeviceLevel::Device));
            return self.error(diag, location, text);
        }
        self.declared[idx] = true;
        if let Some(name) = name {
            self.levels[idx].name = Some(name.to_string());
        }
        Ok(())
    }

    /// Apply `key [= value]` to `level`.
    pub fn set_property(
        &mut self,
        level: DeviceLevel,
        key: &str,
        value: Option<&str>,
        location: Option<&SourceLocation>,
        diag: &mut Diagnostics,
    ) -> Result<(), Abort> {
        let prefix = self.level_prefix(level);
        let prop = match DeviceProperty::from_str(key) {
            Ok(prop) if prop.applies_to(level) => prop,
            _ => return self.error(diag, location, format!("{prefix}: unknown property '{key}'")),
        };

        if !prop.is_cumulative() && !self.defined.insert((level, prop)) {
            return self.error(diag, location, format!("{prefix}: redefining property '{key}'"));
        }

        let unknown_value = |v: &str| format!("{prefix}: for property '{key}', unknown value '{v}'");
        let idx = level.index();

        match (prop.kind(), value) {
            (ValueKind::Flag, None) => {
                match prop {
                    DeviceProperty::DataCache => self.levels[idx].data_cache = true,
                    _ => self.levels[idx].sw_threads = true,
                }
                Ok(())
            }
            (ValueKind::Flag, Some(v)) => self.error(diag, location, unknown_value(v)),
            (_, None) => self.error(diag, location, format!("{prefix}: property '{key}' requires a value")),

            (ValueKind::Integer, Some(v)) => {
                let Ok(n) = v.parse::<i64>() else {
                    return self.error(diag, location, unknown_value(v));
                };
                if n <= 0 {
                    return self.error(diag, location, format!("{prefix}: property '{key}' must be strictly positive"));
                }
                let n = n as usize;
                match prop {
                    DeviceProperty::MemorySize => self.levels[idx].memory_size = Some(n),
                    DeviceProperty::CacheSize => self.levels[idx].cache_size = Some(n),
                    DeviceProperty::NbHwThreads => self.levels[idx].nb_hw_threads = Some(n),
                    _ => self.levels[idx].count = Some(n),
                }
                Ok(())
            }

            (ValueKind::Identifier, Some(v)) if prop.is_cumulative() => {
                let Ok(c) = Connectivity::from_str(v) else {
                    return self.error(diag, location, unknown_value(v));
                };
                match prop {
                    DeviceProperty::DataConnectivityToExt => self.levels[idx].to_ext.insert(c),
                    _ => self.levels[idx].to_lateral.insert(c),
                }
                Ok(())
            }

            (ValueKind::Identifier, Some(v)) => {
                let support = TypeSupport::from_str(v).ok().filter(|s| prop.accepted_support().contains(s));
                let Some(support) = support else {
                    return self.error(diag, location, unknown_value(v));
                };
                match prop {
                    DeviceProperty::TFloat => self.levels[idx].float_support = Some(support),
                    DeviceProperty::TDouble => self.levels[idx].double_support = Some(support),
                    _ => self.levels[idx].long_support = Some(support),
                }
                Ok(())
            }
        }
    }

    /// Fill defaults, check connectivity and freeze the description.
    ///
    /// Fails when any error was reported while building this device.
    #[tracing::instrument(skip_all)]
    pub fn final_check(mut self, diag: &mut Diagnostics) -> Result<ComputeDevice> {
        for level in [DeviceLevel::ComputeUnit, DeviceLevel::ComputeElement] {
            if !self.declared[level.index()] {
                let text = format!("{}: no {level} defined", self.level_prefix(DeviceLevel::Device));
                self.error(diag, None, text)?;
            }
        }

        let [device, unit, element] = std::mem::take(&mut self.levels);

        let nb_compute_units = device.count.unwrap_or_else(|| {
            diag.warning("setting default nbComputeUnits value (1)");
            1
        });
        let nb_compute_elements = unit.count.unwrap_or_else(|| {
            diag.warning("setting default nbComputeElements value (1)");
            1
        });
        let nb_hw_threads = element.nb_hw_threads.unwrap_or_else(|| {
            diag.warning("setting default nbHwThreads value (1)");
            1
        });

        for (level, cfg) in [(DeviceLevel::ComputeUnit, &unit), (DeviceLevel::ComputeElement, &element)] {
            if cfg.to_ext.is_empty() {
                self.nb_errors += 1;
                diag.error(format!("no connectivity to the external memory defined for {level} '{}'", cfg.name(level)))?;
            }
        }

        let name = device.name(DeviceLevel::Device);
        ensure!(self.nb_errors == 0, InvalidDeviceSnafu { name, count: self.nb_errors });

        let device = ComputeDevice {
            name,
            memory_size: device.memory_size,
            nb_compute_units,
            unit: ComputeUnit {
                name: unit.name(DeviceLevel::ComputeUnit),
                memory_size: unit.memory_size,
                cache_size: unit.cache_size,
                data_cache: unit.data_cache,
                to_ext: unit.to_ext,
                to_lateral: unit.to_lateral,
                nb_compute_elements,
            },
            element: ComputeElement {
                name: element.name(DeviceLevel::ComputeElement),
                memory_size: element.memory_size,
                cache_size: element.cache_size,
                data_cache: element.data_cache,
                to_ext: element.to_ext,
                to_lateral: element.to_lateral,
                nb_hw_threads,
                sw_threads: element.sw_threads,
                long_support: element.long_support.unwrap_or_default(),
                float_support: element.float_support.unwrap_or_default(),
                double_support: element.double_support.unwrap_or_default(),
            },
        };
        debug!(device = %device.name(), units = device.nb_compute_units(), budget = ?device.local_memory_budget(), "device checked");
        Ok(device)
    }
}
