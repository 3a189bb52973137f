//! Capability registry.
//!
//! Tag wiring only binds a handler or subscriber whose class is known to
//! satisfy the matching capability. Classes are not introspected: each one
//! is described once by a [`ClassDescriptor`] registered before compilation,
//! and the wiring pass queries the [`CapabilityRegistry`].
//!
//! # Registering a class
//!
//! 1. Build a [`ClassDescriptor`] with the capabilities the class satisfies
//! 2. [`CapabilityRegistry::register`] it
//!
//! A class that was never registered implements nothing.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

// ── Capabilities ─────────────────────────────────────────────────────────────

/// A dispatch role a class can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CommandHandler,
    QueryHandler,
    EventSubscriber,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::CommandHandler,
        Capability::QueryHandler,
        Capability::EventSubscriber,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CommandHandler => "command_handler",
            Self::QueryHandler => "query_handler",
            Self::EventSubscriber => "event_subscriber",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownCapability {
                name: s.to_string(),
            })
    }
}

// ── Descriptors ──────────────────────────────────────────────────────────────

/// One class and the capabilities it satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    pub class: String,
    pub capabilities: IndexSet<Capability>,
}

impl ClassDescriptor {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            capabilities: IndexSet::new(),
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn implements(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Class name to descriptor.
///
/// Class names are compared after dropping one leading `\`, so
/// `\App\Handler` and `App\Handler` are the same class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityRegistry {
    classes: IndexMap<String, ClassDescriptor>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Registering the same class twice merges the
    /// capability sets.
    pub fn register(&mut self, descriptor: ClassDescriptor) -> &mut Self {
        let key = normalize(&descriptor.class).to_string();
        match self.classes.get_mut(&key) {
            Some(existing) => existing.capabilities.extend(descriptor.capabilities),
            None => {
                self.classes.insert(key, descriptor);
            }
        }
        self
    }

    pub fn descriptor(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(normalize(class))
    }

    pub fn implements(&self, class: &str, capability: Capability) -> bool {
        self.descriptor(class)
            .is_some_and(|d| d.implements(capability))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }
}

fn normalize(class: &str) -> &str {
    class.strip_prefix('\\').unwrap_or(class)
}
