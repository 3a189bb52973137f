//! Command-line grammar (clap derive). Commands receive these structs and
//! nothing else from clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "graphwire",
    bin_name = "graphwire",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Compile JSON service definitions into a wired service graph",
    long_about = "graphwire loads JSON service-definition documents, follows their \
                  imports, validates every definition, flattens inheritance and \
                  wires tagged handlers into their buses.",
    after_help = "EXAMPLES:\n\
        \x20 graphwire compile config/services.json\n\
        \x20 graphwire compile config/services.json -I shared --prefix acme\n\
        \x20 graphwire check config/*.json\n\
        \x20 graphwire resolve '@?logger'",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile documents and print the resulting graph.
    #[command(
        visible_alias = "c",
        about = "Compile documents into a service graph",
        after_help = "EXAMPLES:\n\
            \x20 graphwire compile services.json\n\
            \x20 graphwire compile services.json --capabilities caps.json\n\
            \x20 graphwire --output-format json compile services.json > graph.json"
    )]
    Compile(CompileArgs),

    /// Compile documents and report success or the first error.
    #[command(
        about = "Validate documents without printing the graph",
        after_help = "EXAMPLES:\n\
            \x20 graphwire check services.json\n\
            \x20 graphwire check a.json b.json -I vendor/config"
    )]
    Check(CheckArgs),

    /// Show how a string is read by the reference grammar.
    #[command(
        about = "Interpret a string through the reference grammar",
        after_help = "EXAMPLES:\n\
            \x20 graphwire resolve '@mailer'\n\
            \x20 graphwire resolve '@?logger=' '@@literal' '@=service(\"a\")'"
    )]
    Resolve(ResolveArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 graphwire completions bash > ~/.local/share/bash-completion/completions/graphwire\n\
            \x20 graphwire completions zsh  > ~/.zfunc/_graphwire\n\
            \x20 graphwire completions fish > ~/.config/fish/completions/graphwire.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the graphwire configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 graphwire config get wiring.prefix\n\
            \x20 graphwire config list\n\
            \x20 graphwire config path"
    )]
    Config(ConfigCommands),
}

// ── shared compiler options ───────────────────────────────────────────────────

/// Options that shape a compilation, shared by `compile` and `check`.
#[derive(Debug, Args)]
pub struct CompilerOptions {
    /// Entry documents, compiled into one graph in order.
    #[arg(value_name = "FILE", required = true, help = "Entry documents")]
    pub files: Vec<String>,

    /// Extra import roots, tried before the configured ones.
    #[arg(
        short = 'I',
        long = "include",
        value_name = "DIR",
        help = "Additional directory to search for imports"
    )]
    pub include: Vec<PathBuf>,

    /// Capability manifest used by tag wiring.
    #[arg(
        long = "capabilities",
        value_name = "FILE",
        help = "Capability manifest (JSON)"
    )]
    pub capabilities: Option<PathBuf>,

    /// Namespace prefix of wiring targets and tags.
    #[arg(
        long = "prefix",
        value_name = "PREFIX",
        help = "Wiring prefix (default: common)"
    )]
    pub prefix: Option<String>,

    /// Namespaces whose blocks become parameters.
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "NAMESPACE",
        help = "Accept NAMESPACE blocks and expose them as NAMESPACE.* parameters"
    )]
    pub extensions: Vec<String>,
}

// ── compile ───────────────────────────────────────────────────────────────────

/// Arguments for `graphwire compile`.
#[derive(Debug, Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub compiler: CompilerOptions,

    /// Write the compiled graph as JSON to a file.
    #[arg(
        short = 'o',
        long = "out",
        value_name = "FILE",
        help = "Write the compiled graph (JSON) to FILE"
    )]
    pub out: Option<PathBuf>,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `graphwire check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub compiler: CompilerOptions,
}

// ── resolve ───────────────────────────────────────────────────────────────────

/// Arguments for `graphwire resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Strings to interpret.
    #[arg(value_name = "STRING", required = true, allow_hyphen_values = true)]
    pub inputs: Vec<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `graphwire completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `graphwire config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `wiring.prefix`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_compile_command() {
        let cli = Cli::parse_from([
            "graphwire",
            "compile",
            "a.json",
            "b.json",
            "-I",
            "shared",
            "--prefix",
            "acme",
            "-e",
            "mailer",
        ]);
        let Commands::Compile(args) = cli.command else {
            panic!("expected Compile command");
        };
        assert_eq!(args.compiler.files, ["a.json", "b.json"]);
        assert_eq!(args.compiler.include, [PathBuf::from("shared")]);
        assert_eq!(args.compiler.prefix.as_deref(), Some("acme"));
        assert_eq!(args.compiler.extensions, ["mailer"]);
        assert!(args.out.is_none());
    }

    #[test]
    fn compile_requires_a_file() {
        assert!(Cli::try_parse_from(["graphwire", "compile"]).is_err());
        assert!(Cli::try_parse_from(["graphwire", "check"]).is_err());
    }

    #[test]
    fn resolve_accepts_several_strings() {
        let cli = Cli::parse_from(["graphwire", "resolve", "@a", "@?b="]);
        let Commands::Resolve(args) = cli.command else {
            panic!("expected Resolve command");
        };
        assert_eq!(args.inputs, ["@a", "@?b="]);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["graphwire", "check", "a.json", "-vv", "--no-color"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["graphwire", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
