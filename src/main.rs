use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use network_ml_export::config::ExportConfig;
use network_ml_export::context::{OutputPaths, RunContext};
use network_ml_export::data::loader::scenario_name;
use network_ml_export::pipeline;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Parquet,
    Csv,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Parquet => "parquet",
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "network-ml-export")]
#[command(
    version,
    about = "Export input/output timeseries of a solved network for ML training",
    long_about = None
)]
struct Cli {
    /// Solved network: export folder or .json file
    #[arg(short, long)]
    network: PathBuf,

    /// JSON config file (export_ml.keep_na_columns, schema overrides)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep output columns that contain missing values
    #[arg(long)]
    keep_na_columns: bool,

    /// Output directory for derived artifact paths
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output format for derived artifact paths
    #[arg(short, long, value_enum, default_value_t = Format::Parquet)]
    format: Format,

    /// Explicit inputs table path (requires --outputs and --outputs-p)
    #[arg(long, requires_all = ["outputs", "outputs_p"])]
    inputs: Option<PathBuf>,

    /// Explicit outputs table path
    #[arg(long, requires_all = ["inputs", "outputs_p"])]
    outputs: Option<PathBuf>,

    /// Explicit nodal power table path
    #[arg(long, requires_all = ["inputs", "outputs"])]
    outputs_p: Option<PathBuf>,

    /// Scenario name used in logs and derived file names (default: network file stem)
    #[arg(long)]
    scenario: Option<String>,

    /// Build every table but write nothing
    #[arg(long)]
    dry_run: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn output_paths(&self, scenario: &str) -> Result<OutputPaths> {
        match (&self.inputs, &self.outputs, &self.outputs_p) {
            (Some(inputs), Some(outputs), Some(outputs_p)) => Ok(OutputPaths {
                inputs: inputs.clone(),
                outputs: outputs.clone(),
                outputs_p: outputs_p.clone(),
            }),
            (None, None, None) => Ok(OutputPaths::in_dir(
                &self.out_dir,
                scenario,
                self.format.extension(),
            )),
            _ => bail!("--inputs, --outputs and --outputs-p must be given together"),
        }
    }

    fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = cli
        .scenario
        .clone()
        .unwrap_or_else(|| scenario_name(&cli.network));
    let mut config = ExportConfig::load(cli.config.as_deref())?;
    if cli.keep_na_columns {
        config.export_ml.keep_na_columns = true;
    }

    let ctx = RunContext {
        dry_run: cli.dry_run,
        ..RunContext::new(scenario)
    };
    let paths = cli.output_paths(&ctx.scenario)?;
    pipeline::run(&ctx, &config, &cli.network, &paths)?;
    Ok(())
}
