//! Driver options.
//!
//! Built from the command line by `kgenc`, or directly through
//! [`DriverOptions::builder`] when the driver is used as a library.

use std::path::{Path, PathBuf};

use bon::bon;
use kgen_ir::Diagnostics;
use kgen_schedule::TilingConfig;
use snafu::ensure;

use crate::error::{Result, UsageSnafu};

/// Extensions stripped from an input name to get the default program name.
const INPUT_EXTENSIONS: [&str; 3] = [".json", ".ikg", ".kg"];

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub inputs: Vec<PathBuf>,
    /// Target device description.
    pub device: PathBuf,
    /// Name of the generated program; the input file radix otherwise.
    pub program_name: Option<String>,
    pub outdir: PathBuf,
    pub tiling: TilingConfig,
    pub max_errors: usize,
    pub verbosity: u8,
    /// Worker threads; rayon's default otherwise.
    pub jobs: Option<usize>,
    /// Keep per-kernel intermediate sources.
    pub keep_intermediate: bool,
    /// Analyse only, write nothing.
    pub check_only: bool,
    /// Print the tiling and memory reports.
    pub report: bool,
    /// Command run on every emitted kernel source before the output is
    /// committed, with the source path appended.
    pub validator: Vec<String>,
}

#[bon]
impl DriverOptions {
    #[builder(finish_fn = build)]
    pub fn builder(
        inputs: Vec<PathBuf>,
        #[builder(into)] device: PathBuf,
        #[builder(into)] program_name: Option<String>,
        #[builder(into, default = PathBuf::from("."))] outdir: PathBuf,
        #[builder(default)] tiling: TilingConfig,
        max_errors: Option<usize>,
        #[builder(default)] verbosity: u8,
        jobs: Option<usize>,
        #[builder(default)] keep_intermediate: bool,
        #[builder(default)] check_only: bool,
        #[builder(default)] report: bool,
        #[builder(default)] validator: Vec<String>,
    ) -> Self {
        let max_errors = max_errors.filter(|&n| n > 0).unwrap_or_else(|| Diagnostics::from_env().max_errors());
        Self {
            inputs,
            device,
            program_name,
            outdir,
            tiling,
            max_errors,
            verbosity,
            jobs: jobs.filter(|&n| n > 0),
            keep_intermediate,
            check_only,
            report,
            validator,
        }
    }

    /// Reject inconsistent combinations before any file is read.
    pub fn check(&self) -> Result<()> {
        ensure!(!self.inputs.is_empty(), UsageSnafu { reason: "no file to compile in the command line" });
        ensure!(
            self.program_name.is_none() || self.inputs.len() == 1,
            UsageSnafu { reason: "cannot specify -o with multiple files" }
        );
        Ok(())
    }

    /// Diagnostics channel for one compilation unit.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::builder().max_errors(self.max_errors).verbosity(self.verbosity).build()
    }

    /// Program name generated from `input`.
    pub fn program_name(&self, input: &Path) -> String {
        if let Some(name) = &self.program_name {
            return name.clone();
        }
        let mut name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        while let Some(stripped) = INPUT_EXTENSIONS.iter().find_map(|ext| name.strip_suffix(ext)) {
            name = stripped.to_string();
        }
        if name.is_empty() { "kernel".to_string() } else { name }
    }

    /// Output file of `input` for a backend writing `.extension` files.
    pub fn output_path(&self, input: &Path, extension: &str) -> PathBuf {
        self.outdir.join(format!("{}.{extension}", self.program_name(input)))
    }
}
