//! Tracing subscriber setup for the binary.
//!
//! The library crates only emit events; this is the one place a subscriber
//! is installed. `RUST_LOG`, when set, replaces the filter derived from
//! `-v`/`-q`:
//!
//! | Flags    | graphwire crates log at |
//! |----------|-------------------------|
//! | `-q`     | ERROR                   |
//! | (none)   | WARN                    |
//! | `-v`     | INFO                    |
//! | `-vv`    | DEBUG                   |
//! | `-vvv`   | TRACE                   |

use std::io::IsTerminal as _;

use anyhow::Context as _;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

const CRATES: [&str; 3] = ["graphwire", "graphwire_core", "graphwire_adapters"];

/// Install the global subscriber, writing to stderr so stdout stays
/// reserved for command output.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => crate_filter(level_for(args))?,
    };

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("tracing subscriber already installed")
}

fn level_for(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Everything outside the graphwire crates stays off.
fn crate_filter(level: LevelFilter) -> anyhow::Result<EnvFilter> {
    CRATES.iter().try_fold(
        EnvFilter::new("off"),
        |filter, krate| {
            let directive = format!("{krate}={level}")
                .parse()
                .with_context(|| format!("bad log directive for {krate}"))?;
            Ok(filter.add_directive(directive))
        },
    )
}
