//! Stdout rendering shared by the commands.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Writes command output in the resolved format, honouring `--quiet` and
/// the colour settings.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// The `--output-format` flag wins over `output.format`; `auto` resolves
    /// to human output on a terminal and plain output otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Auto)
            }
            explicit => explicit,
        };
        let resolved_format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            other => other,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Plain line on stdout.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(msg, |m| m.to_string())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.line(&format!("ok: {msg}"), |m| m.green().to_string())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.line(&format!("warning: {msg}"), |m| m.yellow().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.line(text, |m| m.bold().to_string())
    }

    /// Pretty JSON. Quiet mode does not apply; `--output-format json` output
    /// is the result itself.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        self.term.write_line(&serde_json::to_string_pretty(value)?)
    }

    fn line(&self, msg: &str, style: fn(&str) -> String) -> io::Result<()> {
        match (self.quiet, self.no_color) {
            (true, _) => Ok(()),
            (false, true) => self.term.write_line(msg),
            (false, false) => self.term.write_line(&style(msg)),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}
