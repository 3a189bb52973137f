//! The definition graph under construction and its frozen, compiled form.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

use crate::domain::{
    definition::{Alias, MethodCall, ServiceDefinition, Tag},
    error::DomainError,
    parameters::Parameters,
    value::Value,
};

/// Ids of every definition carrying `tag`, each with its instances of that
/// tag, in definition order.
pub type TaggedIds = IndexMap<String, Vec<Tag>>;

/// Mutable arena of definitions, aliases and parameters owned by one
/// compilation pass.
///
/// Definitions are keyed by id and keep insertion order. Nothing outside
/// the compiler holds a reference into the arena; when the pass succeeds it
/// is consumed by [`DefinitionGraph::freeze`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionGraph {
    parameters: Parameters,
    definitions: IndexMap<String, ServiceDefinition>,
    aliases: IndexMap<String, Alias>,
    extension_configs: IndexMap<String, Vec<Map<String, JsonValue>>>,
    resources: Vec<PathBuf>,
}

impl DefinitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Parameters ────────────────────────────────────────────────────────

    pub fn set_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    // ── Definitions and aliases ──────────────────────────────────────────

    /// True if `id` names a definition or an alias.
    pub fn has(&self, id: &str) -> bool {
        self.definitions.contains_key(id) || self.aliases.contains_key(id)
    }

    /// Insert or replace a definition, dropping any alias with the same id.
    pub fn set_definition(&mut self, id: impl Into<String>, definition: ServiceDefinition) {
        let id = id.into();
        self.aliases.shift_remove(&id);
        self.definitions.insert(id, definition);
    }

    /// Insert or replace an alias, dropping any definition with the same id.
    pub fn set_alias(&mut self, id: impl Into<String>, alias: Alias) {
        let id = id.into();
        self.definitions.shift_remove(&id);
        self.aliases.insert(id, alias);
    }

    pub fn definition(&self, id: &str) -> Option<&ServiceDefinition> {
        self.definitions.get(id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &ServiceDefinition)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &Alias)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Follow aliases from `id` to the id they finally point at.
    ///
    /// An id that is not an alias is returned unchanged. Alias loops stop
    /// after every alias has been visited once.
    pub fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str {
        resolve_alias_in(&self.aliases, id)
    }

    /// Append a deferred method call to the definition named by `id`
    /// (after alias resolution).
    pub fn add_method_call(&mut self, id: &str, call: MethodCall) -> Result<(), DomainError> {
        let target = self.resolve_alias(id).to_string();
        let definition =
            self.definitions
                .get_mut(&target)
                .ok_or_else(|| DomainError::ServiceNotFound {
                    id: id.to_string(),
                })?;
        definition.add_method_call(call);
        Ok(())
    }

    pub fn find_tagged_service_ids(&self, tag: &str) -> TaggedIds {
        tagged_in(&self.definitions, tag)
    }

    // ── Extensions and resources ─────────────────────────────────────────

    /// Queue one configuration block for the extension `namespace`.
    pub fn load_from_extension(&mut self, namespace: &str, config: Map<String, JsonValue>) {
        self.extension_configs
            .entry(namespace.to_string())
            .or_default()
            .push(config);
    }

    /// Blocks queued for `namespace`, in load order.
    pub fn extension_configs(&self, namespace: &str) -> &[Map<String, JsonValue>] {
        self.extension_configs
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Namespaces that received at least one block, in first-seen order.
    pub fn extension_namespaces(&self) -> impl Iterator<Item = &str> {
        self.extension_configs.keys().map(String::as_str)
    }

    pub fn add_resource(&mut self, path: impl Into<PathBuf>) {
        self.resources.push(path.into());
    }

    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    // ── Inheritance ──────────────────────────────────────────────────────

    /// Replace every child definition with its flattened form.
    ///
    /// Parent chains are walked by id lookup. Returns how many definitions
    /// were flattened.
    pub fn resolve_inheritance(&mut self) -> Result<usize, DomainError> {
        let children: Vec<String> = self
            .definitions
            .iter()
            .filter(|(_, d)| d.parent().is_some())
            .map(|(id, _)| id.clone())
            .collect();

        let mut flattened = IndexMap::new();
        for id in &children {
            self.flatten(id, &mut flattened)?;
        }

        let count = flattened.len();
        for (id, definition) in flattened {
            // existing key: position is kept
            self.definitions.insert(id, definition);
        }
        Ok(count)
    }

    fn flatten(
        &self,
        id: &str,
        done: &mut IndexMap<String, ServiceDefinition>,
    ) -> Result<(), DomainError> {
        // Walk up until a root or an already flattened ancestor.
        let mut chain: Vec<&str> = vec![id];
        let mut current = id;
        while !done.contains_key(current) {
            let Some(parent) = self.lookup(current)?.parent() else {
                break;
            };
            let parent_id = self.resolve_alias(parent);
            if !self.definitions.contains_key(parent_id) {
                return Err(DomainError::MissingParent {
                    id: current.to_string(),
                    parent: parent.to_string(),
                });
            }
            if chain.contains(&parent_id) {
                let mut names = chain.clone();
                names.push(parent_id);
                return Err(DomainError::ParentCycle {
                    chain: names.join(" -> "),
                });
            }
            chain.push(parent_id);
            current = parent_id;
        }

        for pair in chain.windows(2).rev() {
            let (child_id, parent_id) = (pair[0], pair[1]);
            if done.contains_key(child_id) {
                continue;
            }
            let flat = {
                let parent = match done.get(parent_id) {
                    Some(flat) => flat,
                    None => self.lookup(parent_id)?,
                };
                self.lookup(child_id)?.inherit(parent)
            };
            done.insert(child_id.to_string(), flat);
        }
        Ok(())
    }

    fn lookup(&self, id: &str) -> Result<&ServiceDefinition, DomainError> {
        self.definitions
            .get(id)
            .ok_or_else(|| DomainError::ServiceNotFound { id: id.to_string() })
    }

    /// Consume the arena into the read-only graph handed to the host.
    pub fn freeze(self) -> CompiledGraph {
        CompiledGraph {
            parameters: self.parameters,
            definitions: self.definitions,
            aliases: self.aliases,
            resources: self.resources,
        }
    }
}

/// The result of a successful compilation. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledGraph {
    parameters: Parameters,
    definitions: IndexMap<String, ServiceDefinition>,
    aliases: IndexMap<String, Alias>,
    resources: Vec<PathBuf>,
}

impl CompiledGraph {
    pub fn has(&self, id: &str) -> bool {
        self.definitions.contains_key(id) || self.aliases.contains_key(id)
    }

    /// The definition for `id`, following aliases.
    pub fn get(&self, id: &str) -> Result<&ServiceDefinition, DomainError> {
        self.definitions
            .get(resolve_alias_in(&self.aliases, id))
            .ok_or_else(|| DomainError::ServiceNotFound { id: id.to_string() })
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn tagged(&self, tag: &str) -> TaggedIds {
        tagged_in(&self.definitions, tag)
    }

    pub fn definitions(&self) -> &IndexMap<String, ServiceDefinition> {
        &self.definitions
    }

    pub fn aliases(&self) -> &IndexMap<String, Alias> {
        &self.aliases
    }

    pub fn resources(&self) -> impl Iterator<Item = &Path> {
        self.resources.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn resolve_alias_in<'a>(aliases: &'a IndexMap<String, Alias>, id: &'a str) -> &'a str {
    let mut current = id;
    for _ in 0..=aliases.len() {
        match aliases.get(current) {
            Some(alias) => current = &alias.target,
            None => break,
        }
    }
    current
}

fn tagged_in(definitions: &IndexMap<String, ServiceDefinition>, tag: &str) -> TaggedIds {
    definitions
        .iter()
        .filter(|(_, d)| d.has_tag(tag))
        .map(|(id, d)| (id.clone(), d.tags_named(tag).cloned().collect()))
        .collect()
}
