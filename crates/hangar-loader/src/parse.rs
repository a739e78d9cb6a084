// SPDX-License-Identifier: MIT

//! Raw-phase YAML→typed parse (§4.C). Grounded on the teacher's
//! `crates/runbook/src/parser.rs` two-phase (decode, then per-field
//! transform/validate) approach; unlike the teacher (which validates after
//! a single `serde` decode into the final struct), parameters here need
//! per-field type coercion driven by the declared `type`, so this module
//! walks the generic JSON value tree directly rather than deriving
//! `Deserialize` on `Parameter`.

use serde_json::Value;

use hangar_core::{
    coerce_value, Definition, DefinitionError, ItemsSpec, ParamType, Parameter, ProcessorRef,
    RuntimeSpec, SourceLoc, YamlError,
};

use crate::raw::escape_bare_templates;

fn loc() -> SourceLoc {
    // The underlying `serde_yaml`/`serde_json` value tree this module walks
    // does not retain per-node line/column once converted; `SourceLoc`
    // exists in the type for forward compatibility with a location-aware
    // parser and is reported as the document start until then.
    SourceLoc::default()
}

/// Parse an action file's bytes into a `Definition`, applying the §4.C
/// raw-phase transforms (version default, parameter name/type/default/enum
/// normalisation, runtime validation).
pub fn parse_definition(source: &str) -> Result<Definition, DefinitionError> {
    let escaped = escape_bare_templates(source);
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(&escaped).map_err(|e| DefinitionError::Yaml(YamlError(e.to_string())))?;
    let value: Value = serde_json::to_value(&yaml_value)
        .map_err(|e| DefinitionError::Yaml(YamlError(e.to_string())))?;

    let version = value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or("1")
        .to_string();
    if version != "1" {
        return Err(DefinitionError::UnsupportedVersion { version, loc: loc() });
    }

    let action_node = value.get("action").cloned().unwrap_or(Value::Null);
    let title = action_node
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);
    let description = action_node
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    let aliases = action_node
        .get("alias")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let arguments = parse_parameter_list(action_node.get("arguments"))?;
    let options = parse_parameter_list(action_node.get("options"))?;

    let runtime_node = value.get("runtime").cloned().ok_or(DefinitionError::InvalidRuntime { loc: loc() })?;
    let runtime = RuntimeSpec::from_value(&runtime_node)?;

    let working_directory = value
        .get("working_directory")
        .and_then(Value::as_str)
        .map(str::to_string);

    let definition = Definition {
        version,
        title,
        description,
        aliases,
        arguments,
        options,
        runtime,
        working_directory,
    };

    definition.validate_unique_names()?;
    definition.validate_runtime()?;
    Ok(definition)
}

fn parse_parameter_list(node: Option<&Value>) -> Result<Vec<Parameter>, DefinitionError> {
    let Some(Value::Array(items)) = node else {
        return Ok(Vec::new());
    };
    items.iter().map(parse_parameter).collect()
}

fn parse_parameter(raw: &Value) -> Result<Parameter, DefinitionError> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if name.is_empty() {
        return Err(DefinitionError::EmptyName { loc: loc() });
    }
    if !hangar_core::is_valid_name(&name) {
        return Err(DefinitionError::InvalidName { name, loc: loc() });
    }

    let param_type = match raw.get("type").and_then(Value::as_str) {
        None => ParamType::String,
        Some("string") => ParamType::String,
        Some("integer") => ParamType::Integer,
        Some("number") => ParamType::Number,
        Some("boolean") => ParamType::Boolean,
        Some("array") => ParamType::Array,
        Some(other) => {
            return Err(DefinitionError::TypeMismatch {
                field: format!("{name}.type"),
                got: other.to_string(),
                want: "string|integer|number|boolean|array".to_string(),
                loc: loc(),
            })
        }
    };

    let items = if param_type == ParamType::Array {
        let item_type = raw
            .get("items")
            .and_then(|i| i.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("string");
        let parsed = match item_type {
            "string" => ParamType::String,
            "integer" => ParamType::Integer,
            "number" => ParamType::Number,
            "boolean" => ParamType::Boolean,
            other => {
                return Err(DefinitionError::TypeMismatch {
                    field: format!("{name}.items.type"),
                    got: other.to_string(),
                    want: "string|integer|number|boolean".to_string(),
                    loc: loc(),
                })
            }
        };
        Some(Box::new(ItemsSpec { param_type: parsed }))
    } else {
        None
    };

    let enum_values = match raw.get("enum").and_then(Value::as_array) {
        Some(values) => Some(
            values
                .iter()
                .map(|v| coerce_value(v, param_type))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| DefinitionError::TypeMismatch {
                    field: format!("{name}.enum"),
                    got: e.value,
                    want: e.want.to_string(),
                    loc: loc(),
                })?,
        ),
        None => None,
    };

    let default = match raw.get("default") {
        Some(Value::Null) | None => None,
        Some(v) => Some(coerce_value(v, param_type).map_err(|e| DefinitionError::TypeMismatch {
            field: format!("{name}.default"),
            got: e.value,
            want: e.want.to_string(),
            loc: loc(),
        })?),
    };

    let required = raw.get("required").and_then(Value::as_bool).unwrap_or(false);
    let shorthand = raw
        .get("shorthand")
        .and_then(Value::as_str)
        .and_then(|s| s.chars().next());

    let process = raw
        .get("process")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|p| {
                    let processor = p.get("processor")?.as_str()?.to_string();
                    let options = p.get("options").cloned().unwrap_or(Value::Null);
                    Some(ProcessorRef { processor, options })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Parameter {
        title: raw.get("title").and_then(Value::as_str).map(str::to_string),
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        param_type: Some(param_type),
        items,
        enum_values,
        default,
        required,
        shorthand,
        process,
        raw: raw.clone(),
        name,
    })
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
