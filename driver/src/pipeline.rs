//! Per-file compilation pipelines.
//!
//! Every input file compiles on its own rayon worker with its own
//! [`UnitContext`] and [`Resources`]; the device description and the
//! options are shared read-only. Resources are shut down before the
//! outcome of a file is returned, whatever that outcome is.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kgen_codegen::{RenderedKernel, Renderer};
use kgen_codegen::c::CRenderer;
use kgen_device::ComputeDevice;
use kgen_ir::{Diagnostic, Diagnostics, UnitContext};
use kgen_schedule::{Analysis, ScheduleReport, analyze};
use rayon::prelude::*;
use snafu::ResultExt;
use tracing::{debug, info, warn};

use crate::error::{CompileSnafu, Error, Result, WorkerPoolSnafu, WriteOutputSnafu};
use crate::exec::{self, PendingProcess};
use crate::graph_file;
use crate::options::DriverOptions;
use crate::resources::Resources;

/// What happened to one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub reports: Vec<ScheduleReport>,
    /// Committed output, if any.
    pub output: Option<PathBuf>,
    pub result: Result<()>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole run, in input order.
#[derive(Debug)]
pub struct Session {
    pub files: Vec<FileOutcome>,
}

impl Session {
    /// 0 when every file compiled, the status of the first failure otherwise.
    pub fn exit_status(&self) -> i32 {
        self.files.iter().find_map(|f| f.result.as_ref().err()).map_or(0, Error::exit_status)
    }
}

/// Compile every input of `options` for `device`.
#[tracing::instrument(skip_all, fields(files = options.inputs.len()))]
pub fn compile_all(options: &DriverOptions, device: &ComputeDevice) -> Result<Session> {
    options.check()?;
    let compile = || -> Vec<FileOutcome> {
        options.inputs.par_iter().map(|input| compile_file(input, options, device)).collect()
    };
    let files = match options.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build().context(WorkerPoolSnafu)?;
            pool.install(compile)
        }
        None => compile(),
    };
    Ok(Session { files })
}

/// Compile one input file; never fails, the failure is in the outcome.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn compile_file(input: &Path, options: &DriverOptions, device: &ComputeDevice) -> FileOutcome {
    let mut ctx = UnitContext::new(input.display().to_string(), options.diagnostics());
    let mut resources = Resources::new(options.keep_intermediate);
    let mut reports = Vec::new();

    let result = compile_unit(input, options, device, &mut ctx, &mut resources, &mut reports);
    let cleanup = resources.shutdown();
    let result = match (result, cleanup) {
        (Ok(output), Ok(())) => Ok(output),
        (Err(err), _) | (Ok(_), Err(err)) => Err(err),
    };

    let (output, result) = match result {
        Ok(output) => (output, Ok(())),
        Err(err) => {
            warn!(%err, "compilation failed");
            (None, Err(err))
        }
    };
    FileOutcome { input: input.to_path_buf(), diagnostics: ctx.diagnostics.take_entries(), reports, output, result }
}

fn compile_unit(
    input: &Path,
    options: &DriverOptions,
    device: &ComputeDevice,
    ctx: &mut UnitContext,
    resources: &mut Resources,
    reports: &mut Vec<ScheduleReport>,
) -> Result<Option<PathBuf>> {
    let mut kernels = match graph_file::load(input, ctx) {
        Ok(kernels) => kernels,
        Err(err @ Error::ReadInput { .. }) => return Err(ctx.diagnostics.fatal(None, err.to_string()).into()),
        Err(err) => return Err(err),
    };

    for kernel in &mut kernels {
        let analysis = analyze(kernel, device, &options.tiling, &mut ctx.diagnostics)
            .map_err(|err| schedule_failure(err, &mut ctx.diagnostics))?;
        match analysis {
            Analysis::Ready(report) => reports.push(report),
            Analysis::Infeasible => debug!(kernel = kernel.name(), "kernel does not fit the device"),
        }
    }
    if ctx.diagnostics.has_errors() {
        return CompileSnafu { file: ctx.name(), count: ctx.diagnostics.error_count() }.fail();
    }
    if options.check_only {
        return Ok(None);
    }

    let renderer = CRenderer::new();
    let rendered = kernels
        .iter()
        .map(|k| renderer.render(k))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ctx.diagnostics.internal(err.to_string()))?;

    if options.keep_intermediate || !options.validator.is_empty() {
        let staging = resources.temp_dir()?;
        let mut pending = Vec::with_capacity(rendered.len());
        let staged = stage_sources(&rendered, &staging, renderer.file_extension(), &options.validator, &mut pending);
        let validated = exec::wait_all(pending);
        staged.and(validated)?;
    }

    let target = options.output_path(input, renderer.file_extension());
    let stream = resources.open_output(&target)?;
    for kernel in &rendered {
        resources.write(stream, &kernel.code)?;
    }
    let output = resources.commit(stream)?;
    info!(output = %output.display(), kernels = rendered.len(), "program written");
    Ok(Some(output))
}

/// Scheduler errors on a validated kernel are compiler bugs, except for
/// aborts already reported and the graph's own defects.
pub(crate) fn schedule_failure(err: kgen_schedule::Error, diag: &mut Diagnostics) -> Error {
    match err {
        kgen_schedule::Error::Aborted { source } => source.into(),
        err @ (kgen_schedule::Error::Ir { .. } | kgen_schedule::Error::Cycle { .. }) => err.into(),
        err => diag.internal(err.to_string()).into(),
    }
}

/// Write every kernel source under `staging` and start `validator` on each;
/// started processes are left in `pending` even when a later step fails.
fn stage_sources(
    rendered: &[RenderedKernel],
    staging: &Path,
    extension: &str,
    validator: &[String],
    pending: &mut Vec<PendingProcess>,
) -> Result<()> {
    for kernel in rendered {
        let path = staging.join(format!("{}.{extension}", kernel.entry_point));
        std::fs::write(&path, &kernel.code).context(WriteOutputSnafu { path: &path })?;
        if let Some((program, args)) = validator.split_first() {
            let argv = args.iter().map(OsString::from).chain([path.into_os_string()]);
            pending.push(exec::spawn(program, argv)?);
        }
    }
    Ok(())
}
