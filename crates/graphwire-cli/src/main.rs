//! # graphwire CLI
//!
//! Compiles JSON service-definition documents into a wired service graph.
//!
//! Arguments are parsed first, then the tracing subscriber is installed, then
//! the configuration is layered (defaults, file, environment). A failing
//! command is logged, rendered to stderr and turned into its exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                    |
//! |------|----------------------------|
//! |  0   | Success                    |
//! |  1   | Internal / system error    |
//! |  2   | User / validation error    |
//! |  3   | Resource not found         |
//! |  4   | Configuration error        |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::CliResult,
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let (cli, config) = match start() {
        Ok(started) => started,
        Err(code) => return code,
    };

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let color =
        !(cli.global.no_color || config.output.no_color) && std::io::stderr().is_terminal();

    match run(cli, config, output) {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            err.log();
            eprint!("{}", err.render(verbose, color));
            ExitCode::from(err.exit_code())
        }
    }
}

/// Parse arguments, install the subscriber, and load the config. Failures
/// here have already been reported when the exit code comes back.
fn start() -> Result<(Cli, AppConfig), ExitCode> {
    let cli = Cli::try_parse().map_err(|e| {
        let _ = e.print();
        // --help and --version go to stdout and are not failures
        if e.use_stderr() {
            ExitCode::from(2)
        } else {
            ExitCode::SUCCESS
        }
    })?;

    init_logging(&cli.global).map_err(|e| {
        eprintln!("graphwire: {e:#}");
        ExitCode::from(1)
    })?;
    debug!(global = ?cli.global, "Arguments parsed");

    let config = AppConfig::load(cli.global.config.as_deref()).map_err(|e| {
        tracing::error!("{e:#}");
        eprintln!("graphwire: {e:#}");
        ExitCode::from(4)
    })?;

    Ok((cli, config))
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Compile(cmd) => commands::compile::execute(cmd, config, output),
        Commands::Check(cmd) => commands::check::execute(cmd, config, output),
        Commands::Resolve(cmd) => commands::resolve::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
