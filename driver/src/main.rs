use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use kgen_driver::{DriverOptions, Session, compile_all, load_device};
use kgen_ir::{Diagnostics, GranularityMode, ScanOrder, Size};
use kgen_schedule::TilingConfig;
use kgen_schedule::config::parse_tile;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "kgenc", version)]
#[command(about = "Schedule image-processing kernel graphs onto a device and emit OpenCL C")]
struct Cli {
    /// Kernel graph descriptions (JSON)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Target device description (.cfg)
    #[arg(short = 'd', long = "target-device")]
    device: PathBuf,

    /// Name of the generated program (single input only)
    #[arg(short = 'o')]
    output: Option<String>,

    /// Output directory of generated files
    #[arg(long, default_value = ".")]
    outdir: PathBuf,

    /// Kernel granularity: image, tile or wg
    #[arg(long)]
    granularity: Option<GranularityMode>,

    /// Pipeline direction: rows or columns
    #[arg(long)]
    scan: Option<ScanOrder>,

    /// Work-groups to slice over
    #[arg(long = "nb-wg")]
    nb_work_groups: Option<usize>,

    /// Work-items per group
    #[arg(long = "nb-wi")]
    nb_work_items: Option<usize>,

    /// Fixed kernel tile in pixels, `W` or `WxH`
    #[arg(long, value_parser = tile_arg)]
    tile: Option<Size>,

    /// Error count stopping a compilation unit
    #[arg(long)]
    max_errors: Option<usize>,

    /// Worker threads
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Keep intermediate files
    #[arg(long)]
    keep: bool,

    /// Parse and check but do not generate any output file
    #[arg(long)]
    parse: bool,

    /// Display the tiling and memory reports
    #[arg(long)]
    report: bool,

    /// Command run on every generated kernel source
    #[arg(long, value_delimiter = ' ')]
    validate: Vec<String>,

    /// More compiler messages
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn tile_arg(text: &str) -> Result<Size, String> {
    parse_tile(text).ok_or_else(|| format!("'{text}' is not a tile: expected W or WxH with positive sizes"))
}

impl Cli {
    /// Environment defaults, overridden by the command line.
    fn into_options(self) -> DriverOptions {
        let env = TilingConfig::from_env();
        let tiling = TilingConfig::builder()
            .mode(self.granularity.unwrap_or(env.mode))
            .scan_order(self.scan.unwrap_or(env.scan_order))
            .maybe_nb_work_groups(self.nb_work_groups.or(env.nb_work_groups))
            .maybe_nb_work_items(self.nb_work_items.or(env.nb_work_items))
            .maybe_tile(self.tile.or(env.tile))
            .build();

        DriverOptions::builder()
            .inputs(self.inputs)
            .device(self.device)
            .maybe_program_name(self.output)
            .outdir(self.outdir)
            .tiling(tiling)
            .maybe_max_errors(self.max_errors)
            .verbosity(self.verbose)
            .maybe_jobs(self.jobs)
            .keep_intermediate(self.keep)
            .check_only(self.parse)
            .report(self.report)
            .validator(self.validate)
            .build()
    }
}

fn print_session(session: &Session, report: bool) {
    for file in &session.files {
        for diagnostic in &file.diagnostics {
            eprintln!("{diagnostic}");
        }
        if report {
            for schedule in &file.reports {
                print!("{}{}", schedule.tiling, schedule.memory);
            }
        }
        match &file.result {
            Ok(()) => info!(input = %file.input.display(), output = ?file.output, "compiled"),
            Err(err) => eprintln!("{}: {err}", file.input.display()),
        }
    }
}

fn exit_code(status: i32) -> ExitCode {
    ExitCode::from(u8::try_from(status).unwrap_or(1))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kgenc=info,kgen_driver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let report = cli.report;
    let options = cli.into_options();

    let mut device_diag = Diagnostics::builder().max_errors(options.max_errors).build();
    let device = match load_device(&options, &mut device_diag) {
        Ok(device) => device,
        Err(err) => {
            device_diag.entries().iter().for_each(|d| eprintln!("{d}"));
            error!(%err, "cannot load the target device");
            return exit_code(err.exit_status());
        }
    };
    device_diag.entries().iter().for_each(|d| eprintln!("{d}"));

    match compile_all(&options, &device) {
        Ok(session) => {
            print_session(&session, report);
            exit_code(session.exit_status())
        }
        Err(err) => {
            eprintln!("kgenc: {err}");
            exit_code(err.exit_status())
        }
    }
}
