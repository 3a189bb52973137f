//! `%name%` placeholder resolution against the parameter bag.
//!
//! `%%` is a literal percent sign. A `%` that does not open a well-formed
//! placeholder (non-empty name, no whitespace, closing `%`) is kept as-is.
//! Parameter values may themselves contain placeholders.

use indexmap::IndexMap;

use crate::domain::{error::DomainError, value::Value};

pub type Parameters = IndexMap<String, Value>;

/// Replace every placeholder in `input`.
pub fn resolve_placeholders(input: &str, parameters: &Parameters) -> Result<String, DomainError> {
    let mut stack = Vec::new();
    expand(input, parameters, &mut stack)
}

fn expand(
    input: &str,
    parameters: &Parameters,
    stack: &mut Vec<String>,
) -> Result<String, DomainError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        match after.find('%') {
            Some(end) if is_name(&after[..end]) => {
                let name = &after[..end];
                out.push_str(&lookup(name, input, parameters, stack)?);
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup(
    name: &str,
    embedded_in: &str,
    parameters: &Parameters,
    stack: &mut Vec<String>,
) -> Result<String, DomainError> {
    if stack.iter().any(|n| n == name) {
        return Err(DomainError::ParameterCycle {
            name: name.to_string(),
        });
    }

    let value = parameters
        .get(name)
        .ok_or_else(|| DomainError::ParameterNotFound {
            name: name.to_string(),
        })?;

    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => {
            stack.push(name.to_string());
            let expanded = expand(s, parameters, stack);
            stack.pop();
            expanded?
        }
        other => {
            return Err(DomainError::ParameterNotScalar {
                name: name.to_string(),
                value: format!("{embedded_in} ({})", other.type_name()),
            });
        }
    };
    Ok(text)
}

fn is_name(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, Value)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn strings_without_placeholders_are_unchanged() {
        let p = Parameters::new();
        assert_eq!(resolve_placeholders("App\\Handler", &p).unwrap(), "App\\Handler");
    }

    #[test]
    fn placeholders_are_substituted() {
        let p = params(&[
            ("ns", Value::from("App")),
            ("version", Value::Int(2)),
        ]);
        assert_eq!(
            resolve_placeholders("%ns%\\V%version%\\Handler", &p).unwrap(),
            "App\\V2\\Handler"
        );
    }

    #[test]
    fn escapes_and_malformed_percent_signs_are_literal() {
        let p = Parameters::new();
        assert_eq!(resolve_placeholders("100%%", &p).unwrap(), "100%");
        assert_eq!(resolve_placeholders("50% off", &p).unwrap(), "50% off");
        assert_eq!(resolve_placeholders("% a b %", &p).unwrap(), "% a b %");
    }

    #[test]
    fn nested_parameters_resolve_recursively() {
        let p = params(&[
            ("root", Value::from("App")),
            ("handlers", Value::from("%root%\\Handler")),
        ]);
        assert_eq!(
            resolve_placeholders("%handlers%\\Create", &p).unwrap(),
            "App\\Handler\\Create"
        );
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let err = resolve_placeholders("%nope%", &Parameters::new()).unwrap_err();
        assert_eq!(
            err,
            DomainError::ParameterNotFound {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn cycles_are_detected() {
        let p = params(&[("a", Value::from("%b%")), ("b", Value::from("%a%"))]);
        let err = resolve_placeholders("%a%", &p).unwrap_err();
        assert!(matches!(err, DomainError::ParameterCycle { .. }));
    }

    #[test]
    fn structured_values_cannot_be_embedded() {
        let p = params(&[("list", Value::List(vec![]))]);
        let err = resolve_placeholders("x%list%", &p).unwrap_err();
        assert!(matches!(err, DomainError::ParameterNotScalar { ref name, .. } if name == "list"));
    }
}
