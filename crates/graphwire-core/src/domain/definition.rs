//! Service definitions and aliases: the nodes of the definition graph.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::value::{Scalar, Value};

/// A factory or configurator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Callable {
    /// A plain function name, or a static `Class::method` string.
    Function(String),
    /// A method invoked on a service reference or class name.
    Method { target: Value, method: String },
}

/// A deferred method call made on the instance after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Capability metadata attached to a definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    pub attributes: IndexMap<String, Scalar>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Scalar) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// An attribute that is present and not null.
    pub fn attribute(&self, key: &str) -> Option<&Scalar> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }
}

/// Replaces the decorated service with this one, keeping the original
/// reachable under `inner_name` (or `<id>.inner`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub id: String,
    pub inner_name: Option<String>,
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub message: Option<String>,
}

/// One service definition.
///
/// Flags are stored as `Option<bool>` so that inheritance can tell "unset"
/// from "false"; the accessors apply the defaults (`shared` and `public` are
/// true, everything else false).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceDefinition {
    parent: Option<String>,
    class: Option<String>,
    shared: Option<bool>,
    lazy: Option<bool>,
    public: Option<bool>,
    #[serde(rename = "abstract")]
    is_abstract: Option<bool>,
    synthetic: Option<bool>,
    autowire: Option<bool>,
    factory: Option<Callable>,
    configurator: Option<Callable>,
    file: Option<String>,
    arguments: Vec<Value>,
    properties: IndexMap<String, Value>,
    calls: Vec<MethodCall>,
    tags: Vec<Tag>,
    decoration: Option<Decoration>,
    deprecation: Option<Deprecation>,
    autowiring_types: Vec<String>,
}

impl ServiceDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// A child definition inheriting unset fields from `parent`.
    pub fn child_of(parent: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..Self::default()
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn is_shared(&self) -> bool {
        self.shared.unwrap_or(true)
    }

    pub fn is_public(&self) -> bool {
        self.public.unwrap_or(true)
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy.unwrap_or(false)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract.unwrap_or(false)
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic.unwrap_or(false)
    }

    pub fn is_autowired(&self) -> bool {
        self.autowire.unwrap_or(false)
    }

    pub fn factory(&self) -> Option<&Callable> {
        self.factory.as_ref()
    }

    pub fn configurator(&self) -> Option<&Callable> {
        self.configurator.as_ref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn method_calls(&self) -> &[MethodCall] {
        &self.calls
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// All instances of one tag, in declaration order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub fn decoration(&self) -> Option<&Decoration> {
        self.decoration.as_ref()
    }

    pub fn deprecation(&self) -> Option<&Deprecation> {
        self.deprecation.as_ref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn autowiring_types(&self) -> &[String] {
        &self.autowiring_types
    }

    // ── Mutators ──────────────────────────────────────────────────────────

    pub fn set_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.class = Some(class.into());
        self
    }

    pub fn set_shared(&mut self, shared: bool) -> &mut Self {
        self.shared = Some(shared);
        self
    }

    pub fn set_public(&mut self, public: bool) -> &mut Self {
        self.public = Some(public);
        self
    }

    pub fn set_lazy(&mut self, lazy: bool) -> &mut Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn set_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.is_abstract = Some(is_abstract);
        self
    }

    pub fn set_synthetic(&mut self, synthetic: bool) -> &mut Self {
        self.synthetic = Some(synthetic);
        self
    }

    pub fn set_autowired(&mut self, autowire: bool) -> &mut Self {
        self.autowire = Some(autowire);
        self
    }

    pub fn set_factory(&mut self, factory: Callable) -> &mut Self {
        self.factory = Some(factory);
        self
    }

    pub fn set_configurator(&mut self, configurator: Callable) -> &mut Self {
        self.configurator = Some(configurator);
        self
    }

    pub fn set_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = Some(file.into());
        self
    }

    pub fn set_arguments(&mut self, arguments: Vec<Value>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    pub fn set_properties(&mut self, properties: IndexMap<String, Value>) -> &mut Self {
        self.properties = properties;
        self
    }

    pub fn add_method_call(&mut self, call: MethodCall) -> &mut Self {
        self.calls.push(call);
        self
    }

    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    pub fn set_decorated_service(
        &mut self,
        id: impl Into<String>,
        inner_name: Option<String>,
        priority: i64,
    ) -> &mut Self {
        self.decoration = Some(Decoration {
            id: id.into(),
            inner_name,
            priority,
        });
        self
    }

    pub fn set_deprecated(&mut self, message: Option<String>) -> &mut Self {
        self.deprecation = Some(Deprecation { message });
        self
    }

    pub fn add_autowiring_type(&mut self, ty: impl Into<String>) -> &mut Self {
        self.autowiring_types.push(ty.into());
        self
    }

    /// Flatten this child definition onto an already flattened `parent`.
    ///
    /// Tags, `shared`, `abstract`, `synthetic`, decoration and autowiring
    /// types always come from the child.
    pub fn inherit(&self, parent: &ServiceDefinition) -> ServiceDefinition {
        let mut arguments = parent.arguments.clone();
        arguments.extend(self.arguments.iter().cloned());

        let mut properties = parent.properties.clone();
        for (k, v) in &self.properties {
            properties.insert(k.clone(), v.clone());
        }

        let mut calls = parent.calls.clone();
        calls.extend(self.calls.iter().cloned());

        ServiceDefinition {
            parent: None,
            class: self.class.clone().or_else(|| parent.class.clone()),
            shared: self.shared,
            lazy: self.lazy.or(parent.lazy),
            public: self.public.or(parent.public),
            is_abstract: self.is_abstract,
            synthetic: self.synthetic,
            autowire: self.autowire.or(parent.autowire),
            factory: self.factory.clone().or_else(|| parent.factory.clone()),
            configurator: self
                .configurator
                .clone()
                .or_else(|| parent.configurator.clone()),
            file: self.file.clone().or_else(|| parent.file.clone()),
            arguments,
            properties,
            calls,
            tags: self.tags.clone(),
            decoration: self.decoration.clone(),
            deprecation: self
                .deprecation
                .clone()
                .or_else(|| parent.deprecation.clone()),
            autowiring_types: self.autowiring_types.clone(),
        }
    }
}

/// A second id for an existing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias {
    pub target: String,
    pub public: bool,
}

impl Alias {
    pub fn new(target: impl Into<String>, public: bool) -> Self {
        Self {
            target: target.into(),
            public,
        }
    }
}
