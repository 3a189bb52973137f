//! Tag wiring: discovers tagged definitions and binds them into the
//! well-known dispatcher definitions.
//!
//! # Rules
//!
//! Each [`WiringRule`] names a target definition, the tag it collects and
//! how a match is bound. All ids are namespaced by a prefix
//! (`<prefix>.command_service_map`, `<prefix>.command_handler`, ...).
//! A target missing from the graph skips its rule.
//!
//! Handlers and subscribers are loaded lazily by the dispatchers, so every
//! match must be public, concrete, and of a class registered with the
//! matching [`Capability`]. Any violation aborts compilation.

use tracing::{debug, info, instrument};

use crate::{
    application::ports::ContainerBuilder,
    domain::{
        Capability, CapabilityRegistry, DomainError, MethodCall, Reference, ServiceDefinition,
        Value, resolve_placeholders,
    },
    error::GraphResult,
};

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "common";

// ── Rule table ───────────────────────────────────────────────────────────────

/// How a tagged definition is bound into its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `addFilter(@id)` once per definition.
    Filter,
    /// `registerHandler(<attribute value>, "id")` once per tag instance.
    Handler {
        attribute: &'static str,
        capability: Capability,
    },
    /// `registerService(<class>, "id")` once per definition.
    Subscriber { capability: Capability },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WiringRule {
    /// Target definition id, without prefix.
    pub target: &'static str,
    /// Tag name, without prefix.
    pub tag: &'static str,
    pub binding: Binding,
}

/// Rules in the order they run.
pub static WIRING_RULES: &[WiringRule] = &[
    WiringRule {
        target: "command_pipeline",
        tag: "command_filter",
        binding: Binding::Filter,
    },
    WiringRule {
        target: "command_service_map",
        tag: "command_handler",
        binding: Binding::Handler {
            attribute: "command",
            capability: Capability::CommandHandler,
        },
    },
    WiringRule {
        target: "event_dispatcher",
        tag: "event_subscriber",
        binding: Binding::Subscriber {
            capability: Capability::EventSubscriber,
        },
    },
    WiringRule {
        target: "query_pipeline",
        tag: "query_filter",
        binding: Binding::Filter,
    },
    WiringRule {
        target: "query_service_map",
        tag: "query_handler",
        binding: Binding::Handler {
            attribute: "query",
            capability: Capability::QueryHandler,
        },
    },
];

// ── Compiler pass ────────────────────────────────────────────────────────────

/// Runs every [`WIRING_RULES`] entry against a container.
#[derive(Debug, Clone)]
pub struct TagWiringCompiler {
    prefix: String,
    capabilities: CapabilityRegistry,
}

impl Default for TagWiringCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, CapabilityRegistry::new())
    }
}

impl TagWiringCompiler {
    pub fn new(prefix: impl Into<String>, capabilities: CapabilityRegistry) -> Self {
        Self {
            prefix: prefix.into(),
            capabilities,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// Prefixed id for a target or tag name.
    pub fn id(&self, name: &str) -> String {
        format!("{}.{}", self.prefix, name)
    }

    /// Run all rules. Returns the number of bindings added.
    #[instrument(skip_all, fields(prefix = %self.prefix))]
    pub fn process(&self, container: &mut dyn ContainerBuilder) -> GraphResult<usize> {
        let mut total = 0;
        for rule in WIRING_RULES {
            total += self.apply(rule, container)?;
        }
        info!(bindings = total, "Tag wiring complete");
        Ok(total)
    }

    fn apply(&self, rule: &WiringRule, container: &mut dyn ContainerBuilder) -> GraphResult<usize> {
        let target = self.id(rule.target);
        if container
            .definition(container.resolve_alias(&target))
            .is_none()
        {
            debug!(target = %target, "Target not defined, skipping");
            return Ok(0);
        }

        let tag = self.id(rule.tag);
        let mut calls = Vec::new();

        for (id, tags) in container.find_tagged_service_ids(&tag) {
            match rule.binding {
                Binding::Filter => {
                    calls.push(MethodCall::new(
                        "addFilter",
                        vec![Reference::strict(id.as_str()).into()],
                    ));
                }
                Binding::Handler {
                    attribute,
                    capability,
                } => {
                    self.check_eligible(&id, capability, container)?;
                    for instance in &tags {
                        let Some(message) = instance.attribute(attribute) else {
                            return Err(DomainError::wiring(
                                &id,
                                format!(
                                    "Service \"{id}\" is missing the \"{attribute}\" attribute on tag \"{tag}\""
                                ),
                            )
                            .into());
                        };
                        calls.push(MethodCall::new(
                            "registerHandler",
                            vec![message.clone().into(), Value::from(id.as_str())],
                        ));
                    }
                }
                Binding::Subscriber { capability } => {
                    let class = self.check_eligible(&id, capability, container)?;
                    calls.push(MethodCall::new(
                        "registerService",
                        vec![Value::from(class), Value::from(id.as_str())],
                    ));
                }
            }
        }

        let count = calls.len();
        for call in calls {
            container.add_method_call(&target, call)?;
        }
        debug!(target = %target, tag = %tag, bindings = count, "Wired");
        Ok(count)
    }

    /// Check a lazily loaded handler or subscriber and return its resolved
    /// class.
    fn check_eligible(
        &self,
        id: &str,
        capability: Capability,
        container: &dyn ContainerBuilder,
    ) -> GraphResult<String> {
        let role = describe(capability);
        let definition: &ServiceDefinition = container
            .definition(id)
            .ok_or_else(|| DomainError::ServiceNotFound { id: id.to_string() })?;

        if !definition.is_public() {
            return Err(DomainError::wiring(
                id,
                format!("The service \"{id}\" must be public as {role}s are lazy-loaded"),
            )
            .into());
        }
        if definition.is_abstract() {
            return Err(DomainError::wiring(
                id,
                format!("The service \"{id}\" must not be abstract as {role}s are lazy-loaded"),
            )
            .into());
        }

        let Some(class) = definition.class() else {
            return Err(DomainError::wiring(
                id,
                format!("The service \"{id}\" has no class; a {role} needs one"),
            )
            .into());
        };
        let class = resolve_placeholders(class, container.parameters())?;

        if !self.capabilities.implements(&class, capability) {
            return Err(DomainError::wiring(
                id,
                format!(
                    "The service \"{id}\" (class \"{class}\") is not registered as a {role} ({capability})"
                ),
            )
            .into());
        }
        Ok(class)
    }
}

fn describe(capability: Capability) -> &'static str {
    match capability {
        Capability::CommandHandler => "command handler",
        Capability::QueryHandler => "query handler",
        Capability::EventSubscriber => "event subscriber",
    }
}
