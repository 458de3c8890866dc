//! Reader for `.cfg` device descriptions.
//!
//! ```text
//! # comment
//! [device stxp70]
//! nbComputeUnits = 16
//! [compute_unit cluster]
//! memorySize = 262144
//! dataConnectivityToExt = dma
//! [compute_element pe]
//! dataConnectivityToExt = loadstore
//! dataCache
//! ```
//!
//! Section headers name the level and optionally the instance. Every
//! diagnostic carries the `file:line` of the offending line.

use std::path::Path;

use kgen_ir::{Diagnostics, SourceLocation};
use snafu::ResultExt;
use tracing::debug;

use crate::config::DeviceConfig;
use crate::error::{ReadDescriptionSnafu, Result};
use crate::model::ComputeDevice;
use crate::property::DeviceLevel;

fn section_level(kind: &str) -> Option<DeviceLevel> {
    match kind {
        "device" => Some(DeviceLevel::Device),
        "compute_unit" => Some(DeviceLevel::ComputeUnit),
        "compute_element" => Some(DeviceLevel::ComputeElement),
        _ => None,
    }
}

/// Build a device from the text of a description; `file` names it in
/// diagnostics.
#[tracing::instrument(skip(text, diag))]
pub fn parse_str(text: &str, file: &str, diag: &mut Diagnostics) -> Result<ComputeDevice> {
    let origin = SourceLocation::new(file, 0);
    let mut config = DeviceConfig::new("device");
    let mut level: Option<DeviceLevel> = None;

    for (n, raw) in text.lines().enumerate() {
        let location = origin.at_line(n as u32 + 1);
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(header) = header.strip_suffix(']') else {
                config.error(diag, Some(&location), format!("malformed section header '{line}'"))?;
                continue;
            };
            let mut words = header.split_whitespace();
            let kind = words.next().unwrap_or_default();
            match section_level(kind) {
                Some(l) => {
                    config.declare(l, words.next(), Some(&location), diag)?;
                    level = Some(l);
                }
                None => {
                    config.error(diag, Some(&location), format!("unknown section '{kind}'"))?;
                    level = None;
                }
            }
            continue;
        }

        let Some(current) = level else {
            config.error(diag, Some(&location), format!("property '{line}' outside of any section"))?;
            continue;
        };

        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim()).filter(|v| !v.is_empty())),
            None => (line, None),
        };
        config.set_property(current, key, value, Some(&location), diag)?;
    }

    let device = config.final_check(diag)?;
    debug!(file, device = %device.name(), "device description read");
    Ok(device)
}

/// Read and build the device described in `path`.
pub fn read_file(path: &Path, diag: &mut Diagnostics) -> Result<ComputeDevice> {
    let text = std::fs::read_to_string(path).context(ReadDescriptionSnafu { path })?;
    parse_str(&text, &path.display().to_string(), diag)
}
