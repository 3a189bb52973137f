//! Subcommand implementations.
//!
//! Each command translates its arguments into calls on `graphwire-core`
//! services wired with `graphwire-adapters`, then renders the result.

pub mod check;
pub mod compile;
pub mod completions;
pub mod config;
pub mod resolve;

use std::path::PathBuf;

use tracing::debug;

use graphwire_adapters::{LocalFileLocator, ParametersExtension, load_capability_manifest};
use graphwire_core::{
    application::{GraphCompiler, TagWiringCompiler},
    domain::CapabilityRegistry,
};

use crate::{
    cli::CompilerOptions,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Assemble a compiler from command-line options layered over the config.
///
/// `-I` directories are searched before `loader.search_paths`; flags for the
/// prefix and capability manifest replace their config values; extension
/// namespaces from both sources are registered, each once.
pub(crate) fn build_compiler(opts: &CompilerOptions, config: &AppConfig) -> CliResult<GraphCompiler> {
    let search_paths: Vec<PathBuf> = opts
        .include
        .iter()
        .chain(&config.loader.search_paths)
        .cloned()
        .collect();
    debug!(?search_paths, "Import roots");

    let prefix = opts
        .prefix
        .clone()
        .unwrap_or_else(|| config.wiring.prefix.clone());
    if prefix.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: "the wiring prefix must not be empty".into(),
            source: None,
        });
    }

    let capabilities = match opts.capabilities.as_ref().or(config.wiring.capabilities.as_ref()) {
        Some(path) => load_capability_manifest(path)?,
        None => CapabilityRegistry::new(),
    };

    let mut compiler = GraphCompiler::new(Box::new(LocalFileLocator::with_search_paths(search_paths)))
        .with_max_import_depth(config.loader.max_import_depth)
        .with_wiring(TagWiringCompiler::new(prefix, capabilities));

    for namespace in opts.extensions.iter().chain(&config.extensions.parameter_namespaces) {
        if compiler.extensions().has(namespace) {
            continue;
        }
        compiler.register_extension(Box::new(ParametersExtension::new(namespace.as_str())))?;
    }

    Ok(compiler)
}
