//! beneish - Beneish M-Score manipulation dashboard
//!
//! Usage:
//!   beneish dashboard                     # interactive session
//!   beneish dashboard data.csv            # interactive, file preloaded
//!   beneish run data.xlsx --tune --explain # batch pipeline
//!   beneish --variant comparison run data.csv --tune

use beneish::config::{DashboardConfig, Variant};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

mod dashboard;
mod error;
mod output;

use dashboard::{Command, Dashboard};
use error::{CliError, Result};

/// beneish - earnings-manipulation screening on Beneish M-Score ratios
#[derive(Parser)]
#[command(name = "beneish")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dashboard layout (baseline, comparison)
    #[arg(long, global = true)]
    variant: Option<Variant>,

    /// Fraction of rows held out for testing (0.1 to 0.5)
    #[arg(long, global = true)]
    test_size: Option<f64>,

    /// Seed for the split and the seeded models
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard reading commands from stdin
    Dashboard {
        /// Workbook (.xlsx) or CSV file to load on start
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Load, train and optionally tune and explain in one pass
    Run {
        /// Workbook (.xlsx) or CSV file with the eight ratios and a Manipulator column
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Run the XGBoost grid search after the bench
        #[arg(long)]
        tune: bool,

        /// Render SHAP charts for the tuned model
        #[arg(long)]
        explain: bool,
    },
}

fn log_subscriber<W>(verbose: bool, ansi: bool, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fallback = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("BENEISH_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .finish()
}

fn init_logging(verbose: bool, color: bool) {
    let ansi = color && io::stderr().is_terminal();
    let _ = tracing::subscriber::set_global_default(log_subscriber(verbose, ansi, io::stderr));
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }
    if let Some(test_size) = cli.test_size {
        config.test_size = test_size;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_color {
        config.color = false;
    }
    config.validate()?;
    Ok(config)
}

fn run_batch(
    config: DashboardConfig,
    json: bool,
    file: PathBuf,
    tune: bool,
    explain: bool,
) -> Result<()> {
    let mut dash = Dashboard::new(config, json, io::stdout().lock());
    let mut commands = vec![Command::Load(file), Command::Train];
    if tune {
        commands.push(Command::Tune);
    }
    if explain {
        commands.push(Command::Explain(Some(true)));
    }
    for command in commands {
        if let Err(err) = dash.execute(command) {
            if !err.is_warning() {
                return Err(err);
            }
            dash.report_error(&err)?;
        }
    }
    Ok(())
}

fn execute(cli: Cli, config: DashboardConfig) -> Result<()> {
    if !config.color {
        colored::control::set_override(false);
    }
    tracing::debug!(variant = %config.variant, test_size = config.test_size, "configuration resolved");

    match cli.command {
        Commands::Dashboard { file } => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let mut dash = Dashboard::new(config, cli.json, io::stdout().lock());
            if let Some(path) = file {
                if let Err(err) = dash.execute(Command::Load(path)) {
                    dash.report_error(&err)?;
                }
            }
            dash.repl(stdin.lock(), interactive)
        }
        Commands::Run {
            file,
            tune,
            explain,
        } => run_batch(config, cli.json, file, tune, explain),
    }
}

fn report_failure<W: Write>(err: &CliError, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", output::error(&err.to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = load_config(&cli).and_then(|config| {
        init_logging(cli.verbose, config.color);
        execute(cli, config)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report_failure(&err, &mut io::stderr().lock());
            err.exit_code()
        }
    }
}
