//! Implementation of the `graphwire check` command.

use serde_json::json;
use tracing::instrument;

use crate::{
    cli::{CheckArgs, OutputFormat},
    commands::build_compiler,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Compile the documents and report the outcome without printing the graph.
///
/// A failure surfaces as the returned error, so the exit code carries the
/// error category.
#[instrument(skip_all, fields(files = args.compiler.files.len()))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let files = args.compiler.files.as_slice();
    let compiler = build_compiler(&args.compiler, &config)?;
    let graph = compiler
        .compile_all(files)
        .with_cli_context(|| format!("checking {}", files.join(", ")))?;

    match output.format() {
        OutputFormat::Json => output.json(&json!({
            "ok": true,
            "files": files,
            "definitions": graph.definitions().len(),
            "aliases": graph.aliases().len(),
            "resources": graph.resources().count(),
        }))?,
        _ => {
            if graph.is_empty() && graph.aliases().is_empty() {
                output.warning("The documents define no services")?;
            }
            output.success(&format!(
                "{} OK: {} definitions, {} aliases from {} documents",
                files.join(", "),
                graph.definitions().len(),
                graph.aliases().len(),
                graph.resources().count()
            ))?;
        }
    }

    Ok(())
}
