//! Descriptions, devices and options shared by the driver tests.

use std::path::{Path, PathBuf};

use kgen_device::ComputeDevice;
use kgen_ir::GranularityMode;
use kgen_schedule::TilingConfig;

use crate::DriverOptions;
use crate::graph_file::{DataDesc, DataKind, ExtentDesc, GraphFile, InputDesc, KernelDesc, NodeDesc};

/// `in -> f0[-radius:radius] -> out` over float images of `dims`.
pub fn stencil_description(name: &str, dims: &[usize], radius: i64) -> GraphFile {
    let shape: Vec<ExtentDesc> = dims.iter().map(|&n| ExtentDesc::Fixed(n)).collect();
    let image = |name: &str, kind| DataDesc {
        name: name.to_string(),
        kind,
        dtype: "float".to_string(),
        shape: shape.clone(),
        line: None,
    };
    let read = (radius != 0).then(|| vec![(-radius, radius); dims.len()]);
    let node = NodeDesc {
        name: "f0".to_string(),
        output: "out".to_string(),
        inputs: vec![InputDesc { data: "in".to_string(), read, border: None }],
        controls: Vec::new(),
        input_stride: None,
        output_stride: None,
        write: None,
        line: None,
    };
    GraphFile {
        kernels: vec![KernelDesc {
            name: name.to_string(),
            line: None,
            data: vec![image("in", DataKind::Input), image("out", DataKind::Output)],
            nodes: vec![node],
        }],
    }
}

pub fn write_description(dir: &Path, file_name: &str, graph: &GraphFile) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, serde_json::to_string_pretty(graph).unwrap()).unwrap();
    path
}

pub fn device(unit_memory: Option<usize>) -> ComputeDevice {
    ComputeDevice::builder().nb_compute_units(4).nb_compute_elements(4).maybe_unit_memory(unit_memory).build()
}

/// Work-group slicing into `outdir`.
pub fn options(inputs: Vec<PathBuf>, outdir: &Path) -> DriverOptions {
    DriverOptions::builder()
        .inputs(inputs)
        .device("unused.cfg")
        .outdir(outdir)
        .tiling(TilingConfig::builder().mode(GranularityMode::WorkGroupSlicing).build())
        .max_errors(5)
        .build()
}

/// Names of the files in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> =
        std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
    names.sort();
    names
}
