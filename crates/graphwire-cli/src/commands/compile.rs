//! Implementation of the `graphwire compile` command.
//!
//! Responsibility: build a compiler from flags and config, run it over the
//! entry documents, and render the compiled graph. No compilation rules live
//! here.

use std::path::Path;

use tracing::{info, instrument};

use graphwire_core::domain::{CompiledGraph, ServiceDefinition};

use crate::{
    cli::{CompileArgs, OutputFormat},
    commands::build_compiler,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `graphwire compile` command.
#[instrument(skip_all, fields(files = args.compiler.files.len()))]
pub fn execute(args: CompileArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let compiler = build_compiler(&args.compiler, &config)?;
    let graph = compiler
        .compile_all(args.compiler.files.as_slice())
        .with_cli_context(|| format!("compiling {}", args.compiler.files.join(", ")))?;

    info!(
        definitions = graph.definitions().len(),
        aliases = graph.aliases().len(),
        "Graph compiled"
    );

    if let Some(path) = &args.out {
        write_graph(&graph, path)?;
    }

    match output.format() {
        OutputFormat::Json => output.json(&graph)?,
        _ => {
            output.header("Compiled graph")?;
            for line in summary_lines(&graph) {
                output.print(&line)?;
            }
            if let Some(path) = &args.out {
                output.success(&format!("Graph written to {}", path.display()))?;
            }
        }
    }

    Ok(())
}

fn write_graph(graph: &CompiledGraph, path: &Path) -> CliResult<()> {
    let text = serde_json::to_string_pretty(graph)
        .map_err(std::io::Error::from)
        .with_cli_context(|| "serialising the compiled graph")?;
    std::fs::write(path, text).map_err(|source| CliError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Human-readable description of a compiled graph, one entry per line.
fn summary_lines(graph: &CompiledGraph) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} definitions, {} aliases, {} parameters",
        graph.definitions().len(),
        graph.aliases().len(),
        graph.parameters().len()
    )];

    if !graph.definitions().is_empty() {
        lines.push(String::new());
        lines.push("Definitions:".into());
        let width = graph.definitions().keys().map(String::len).max().unwrap_or(0);
        for (id, definition) in graph.definitions() {
            lines.push(format!("  {id:<width$}  {}", describe(definition)));
        }
    }

    if !graph.aliases().is_empty() {
        lines.push(String::new());
        lines.push("Aliases:".into());
        for (id, alias) in graph.aliases() {
            let visibility = if alias.public { "" } else { " (private)" };
            lines.push(format!("  {id} -> {}{visibility}", alias.target));
        }
    }

    let resources: Vec<_> = graph.resources().collect();
    if !resources.is_empty() {
        lines.push(String::new());
        lines.push("Resources:".into());
        lines.extend(resources.iter().map(|p| format!("  {}", p.display())));
    }

    lines
}

fn describe(definition: &ServiceDefinition) -> String {
    let mut text = definition.class().unwrap_or("-").to_string();
    if definition.is_abstract() {
        text.push_str(" [abstract]");
    }
    if !definition.is_public() {
        text.push_str(" [private]");
    }
    let calls = definition.method_calls().len();
    if calls > 0 {
        text.push_str(&format!(" ({calls} calls)"));
    }
    let tags: Vec<_> = definition.tags().iter().map(|t| t.name.as_str()).collect();
    if !tags.is_empty() {
        text.push_str(&format!(" #{}", tags.join(" #")));
    }
    text
}
