//! Implementation of the `graphwire resolve` command.

use serde_json::json;

use graphwire_core::domain::{Reference, Value, resolve_str};

use crate::{
    cli::{OutputFormat, ResolveArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ResolveArgs, output: OutputManager) -> CliResult<()> {
    let resolved: Vec<(String, Value)> = args
        .inputs
        .into_iter()
        .map(|input| {
            let value = resolve_str(&input);
            (input, value)
        })
        .collect();

    match output.format() {
        OutputFormat::Json => {
            let entries: Vec<_> = resolved
                .iter()
                .map(|(input, value)| json!({"input": input, "value": value}))
                .collect();
            output.json(&entries)?;
        }
        _ => {
            for (input, value) in &resolved {
                output.print(&format!("{input}  =>  {}", describe(value)))?;
            }
        }
    }

    Ok(())
}

fn describe(value: &Value) -> String {
    let Value::Reference(reference) = value else {
        return match value.as_str() {
            Some(s) => format!("string \"{s}\""),
            None => value.type_name().to_string(),
        };
    };

    let strictness = |strict: &bool| if *strict { "" } else { ", non-strict" };
    match reference {
        Reference::Strict { id, strict } => {
            format!("reference to service \"{id}\"{}", strictness(strict))
        }
        Reference::Optional { id, strict } => format!(
            "optional reference to service \"{id}\", null when missing{}",
            strictness(strict)
        ),
        Reference::Expression { source } => format!("expression `{source}`"),
        Reference::Literal { value } => format!("literal string \"{value}\""),
    }
}
