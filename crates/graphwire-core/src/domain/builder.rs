//! Definition builder: one validated `services` entry to one definition or
//! alias.
//!
//! All shape rules for individual keys live here; the key allow-list lives
//! in [`crate::domain::schema`].

use serde_json::{Map, Value as JsonValue};

use crate::domain::{
    definition::{Alias, Callable, MethodCall, ServiceDefinition, Tag},
    error::DomainError,
    reference::{resolve_str, resolve_value},
    schema::check_definition_keys,
    value::{Scalar, Value},
};

/// What a single `services` entry produces.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltEntry {
    Definition(ServiceDefinition),
    Alias(Alias),
}

/// Build the definition (or alias) declared under `id` in `file`.
pub fn build_entry(id: &str, entry: &JsonValue, file: &str) -> Result<BuiltEntry, DomainError> {
    if let Some(target) = entry.as_str().and_then(|s| s.strip_prefix('@')) {
        return Ok(BuiltEntry::Alias(Alias::new(target, true)));
    }

    let Some(entry) = entry.as_object() else {
        return Err(DomainError::definition(
            id,
            file,
            format!(
                "a service definition must be an object or a string starting with \"@\" but {} found",
                json_type(entry)
            ),
        ));
    };

    check_definition_keys(id, entry, file)?;

    let ctx = EntryContext { id, file, entry };

    if let Some(target) = ctx.string("alias")? {
        let public = entry.get("public").is_none_or(is_truthy);
        return Ok(BuiltEntry::Alias(Alias::new(target, public)));
    }

    let mut def = match ctx.string("parent")? {
        Some(parent) => ServiceDefinition::child_of(parent),
        None => ServiceDefinition::new(),
    };

    if let Some(class) = ctx.string("class")? {
        def.set_class(class);
    }
    if let Some(v) = ctx.flag("shared")? {
        def.set_shared(v);
    }
    if let Some(v) = ctx.flag("synthetic")? {
        def.set_synthetic(v);
    }
    if let Some(v) = ctx.flag("lazy")? {
        def.set_lazy(v);
    }
    if let Some(v) = ctx.flag("public")? {
        def.set_public(v);
    }
    if let Some(v) = ctx.flag("abstract")? {
        def.set_abstract(v);
    }

    // Presence alone marks the definition deprecated, even with a null value.
    if let Some(message) = entry.get("deprecated") {
        let message = match message {
            JsonValue::Null => None,
            other => match Scalar::from_json(other) {
                Some(s) => Some(s.to_string()),
                None => {
                    return Err(ctx.invalid("the \"deprecated\" message must be a string or null"));
                }
            },
        };
        def.set_deprecated(message);
    }

    if let Some(factory) = ctx.present("factory") {
        def.set_factory(ctx.callable("factory", factory)?);
    }
    if let Some(path) = ctx.string("file")? {
        def.set_file(path);
    }
    if let Some(args) = ctx.present("arguments") {
        def.set_arguments(ctx.sequence("arguments", args)?);
    }
    if let Some(props) = ctx.present("properties") {
        let Some(props) = props.as_object() else {
            return Err(ctx.invalid("parameter \"properties\" must be an object"));
        };
        def.set_properties(
            props
                .iter()
                .map(|(k, v)| (k.clone(), resolve_value(v)))
                .collect(),
        );
    }
    if let Some(configurator) = ctx.present("configurator") {
        def.set_configurator(ctx.callable("configurator", configurator)?);
    }
    if let Some(calls) = ctx.present("calls") {
        for call in ctx.calls(calls)? {
            def.add_method_call(call);
        }
    }
    if let Some(tags) = ctx.present("tags") {
        for tag in ctx.tags(tags)? {
            def.add_tag(tag);
        }
    }
    if let Some(decorated) = ctx.string("decorates")? {
        if decorated.starts_with('@') {
            return Err(DomainError::InvalidDecorates {
                id: id.to_string(),
                file: file.to_string(),
                value: decorated.to_string(),
                suggestion: decorated[1..].to_string(),
            });
        }
        let inner_name = ctx.string("decoration_inner_name")?.map(str::to_string);
        let priority = match ctx.present("decoration_priority") {
            None => 0,
            Some(p) => p
                .as_i64()
                .ok_or_else(|| ctx.invalid("\"decoration_priority\" must be an integer"))?,
        };
        def.set_decorated_service(decorated, inner_name, priority);
    }
    if let Some(v) = ctx.flag("autowire")? {
        def.set_autowired(v);
    }
    if let Some(types) = ctx.present("autowiring_types") {
        for ty in ctx.autowiring_types(types)? {
            def.add_autowiring_type(ty);
        }
    }

    Ok(BuiltEntry::Definition(def))
}

/// The entry under construction plus where it came from.
struct EntryContext<'a> {
    id: &'a str,
    file: &'a str,
    entry: &'a Map<String, JsonValue>,
}

impl<'a> EntryContext<'a> {
    fn invalid(&self, reason: impl Into<String>) -> DomainError {
        DomainError::definition(self.id, self.file, reason)
    }

    /// A key that is present with a non-null value.
    fn present(&self, key: &str) -> Option<&'a JsonValue> {
        self.entry.get(key).filter(|v| !v.is_null())
    }

    fn string(&self, key: &str) -> Result<Option<&'a str>, DomainError> {
        match self.present(key) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(format!("\"{key}\" must be a string"))),
        }
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, DomainError> {
        match self.present(key) {
            None => Ok(None),
            Some(JsonValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(format!("\"{key}\" must be a boolean"))),
        }
    }

    fn sequence(&self, key: &str, value: &JsonValue) -> Result<Vec<Value>, DomainError> {
        match value {
            JsonValue::Array(items) => Ok(items.iter().map(resolve_value).collect()),
            _ => Err(self.invalid(format!("parameter \"{key}\" must be an array"))),
        }
    }

    /// Parse a factory or configurator.
    ///
    /// Accepts a function name, `"service:method"`, or `[target, method]`.
    fn callable(&self, option: &'static str, value: &JsonValue) -> Result<Callable, DomainError> {
        match value {
            JsonValue::String(s) => {
                if let Some(bare) = s.strip_prefix('@') {
                    return Err(DomainError::InvalidFactoryReference {
                        option,
                        id: self.id.to_string(),
                        file: self.file.to_string(),
                        value: s.clone(),
                        suggestion: bare.to_string(),
                    });
                }
                if s.contains("::") || !s.contains(':') {
                    return Ok(Callable::Function(s.clone()));
                }
                match s.split_once(':') {
                    Some((service, method))
                        if !service.is_empty() && !method.is_empty() && !method.contains(':') =>
                    {
                        Ok(Callable::Method {
                            target: resolve_str(&format!("@{service}")),
                            method: method.to_string(),
                        })
                    }
                    _ => Err(self.invalid(format!(
                        "parameter \"{option}\" must use the \"service:method\" form, got \"{s}\""
                    ))),
                }
            }
            JsonValue::Array(parts) => match parts.as_slice() {
                [target, JsonValue::String(method)] if !target.is_null() => Ok(Callable::Method {
                    target: resolve_value(target),
                    method: method.clone(),
                }),
                _ => Err(self.invalid(format!(
                    "parameter \"{option}\" must contain an array with two elements"
                ))),
            },
            _ => Err(self.invalid(format!(
                "parameter \"{option}\" must be a string or an array"
            ))),
        }
    }

    fn calls(&self, value: &JsonValue) -> Result<Vec<MethodCall>, DomainError> {
        let JsonValue::Array(calls) = value else {
            return Err(self.invalid("parameter \"calls\" must be an array"));
        };

        calls
            .iter()
            .map(|call| {
                let (method, args) = match call {
                    JsonValue::Object(obj) => (obj.get("method"), obj.get("arguments")),
                    JsonValue::Array(pair) if pair.len() <= 2 => (pair.first(), pair.get(1)),
                    _ => {
                        return Err(self.invalid(
                            "a \"calls\" entry must be {\"method\", \"arguments\"} or [method, arguments]",
                        ));
                    }
                };
                let Some(JsonValue::String(method)) = method else {
                    return Err(self.invalid("a \"calls\" entry is missing its method name"));
                };
                let arguments = match args {
                    None | Some(JsonValue::Null) => Vec::new(),
                    Some(args) => self.sequence("calls.arguments", args)?,
                };
                Ok(MethodCall::new(method.clone(), arguments))
            })
            .collect()
    }

    fn tags(&self, value: &JsonValue) -> Result<Vec<Tag>, DomainError> {
        let JsonValue::Array(tags) = value else {
            return Err(self.invalid("parameter \"tags\" must be an array"));
        };

        let mut out = Vec::with_capacity(tags.len());
        for tag in tags {
            let Some(tag) = tag.as_object() else {
                return Err(self.invalid("a \"tags\" entry must be an object"));
            };
            let name = match tag.get("name") {
                None => return Err(self.invalid("a \"tags\" entry is missing a \"name\" key")),
                Some(JsonValue::String(name)) if !name.is_empty() => name,
                Some(_) => return Err(self.invalid("the tag name must be a non-empty string")),
            };

            let mut built = Tag::new(name.clone());
            for (attribute, value) in tag.iter().filter(|(k, _)| k.as_str() != "name") {
                let scalar =
                    Scalar::from_json(value).ok_or_else(|| DomainError::InvalidTagAttribute {
                        id: self.id.to_string(),
                        tag: name.clone(),
                        attribute: attribute.clone(),
                        file: self.file.to_string(),
                    })?;
                built = built.with_attribute(attribute.clone(), scalar);
            }
            out.push(built);
        }
        Ok(out)
    }

    fn autowiring_types(&self, value: &JsonValue) -> Result<Vec<String>, DomainError> {
        match value {
            JsonValue::String(s) => Ok(vec![s.clone()]),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        self.invalid("an \"autowiring_types\" entry must be a string")
                    })
                })
                .collect(),
            _ => Err(self.invalid("parameter \"autowiring_types\" must be a string or an array")),
        }
    }
}

/// Loose truthiness used for the `public` flag of an alias object.
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty() && s != "0",
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(_) => true,
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
