// SPDX-License-Identifier: MIT

//! Hand-rolled JSON-Schema-shaped validator (§4.E).
//!
//! Grounded on the teacher's own hand-rolled `crates/runbook/src/
//! validate.rs`, which checks shell/template/cross-reference constraints
//! without a schema library; this module applies the same approach to the
//! property/type/enum constraints a `Parameter` list implies. The emitted
//! schema shape (`{type:object, required:[...], properties:{...}}`) is
//! JSON-Schema-compatible so external tooling can consume it (§6), but the
//! validation logic itself is first-party.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::error::{ValidationError, ValidationIssue};
use crate::param::{ParamType, Parameter};

/// Build the `{type:object, required:[...], properties:{...}}` schema for
/// one section (`arguments` or `options`) of a definition.
pub fn section_schema(params: &[Parameter]) -> Value {
    let required: Vec<&str> = params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();
    let mut properties = serde_json::Map::new();
    for p in params {
        properties.insert(p.name.clone(), property_schema(p));
    }
    json!({
        "type": "object",
        "required": required,
        "properties": Value::Object(properties),
        "additionalProperties": false,
    })
}

fn property_schema(p: &Parameter) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("type".to_string(), json!(p.resolved_type().as_str()));
    if let Some(enums) = &p.enum_values {
        obj.insert("enum".to_string(), json!(enums));
    }
    if p.resolved_type() == ParamType::Array {
        let item_ty = p
            .items
            .as_ref()
            .map(|i| i.param_type.as_str())
            .unwrap_or("string");
        obj.insert("items".to_string(), json!({ "type": item_ty }));
    }
    Value::Object(obj)
}

/// Full definition-level schema: `{type:object, required:[arguments,
/// options], properties:{arguments:{...}, options:{...}}}` (§4.E).
pub fn definition_schema(arguments: &[Parameter], options: &[Parameter]) -> Value {
    json!({
        "type": "object",
        "required": ["arguments", "options"],
        "properties": {
            "arguments": section_schema(arguments),
            "options": section_schema(options),
        },
    })
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn matches_type(v: &Value, ty: ParamType) -> bool {
    match ty {
        ParamType::String => v.is_string(),
        ParamType::Integer => v.is_i64() || v.is_u64(),
        ParamType::Number => v.is_number(),
        ParamType::Boolean => v.is_boolean(),
        ParamType::Array => v.is_array(),
    }
}

/// Validate one section (`arguments`/`options`) against its parameter
/// list, producing the exact error shapes of §4.E.
pub fn validate_section(
    section: &str,
    params: &[Parameter],
    values: &HashMap<String, Value>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut missing: Vec<&str> = params
        .iter()
        .filter(|p| p.required && !values.contains_key(&p.name))
        .map(|p| p.name.as_str())
        .collect();
    missing.sort();
    if missing.len() == 1 {
        issues.push(ValidationIssue::new(
            [section],
            format!("missing property '{}'", missing[0]),
        ));
    } else if missing.len() > 1 {
        let joined = missing
            .iter()
            .map(|n| format!("'{n}'"))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(ValidationIssue::new(
            [section],
            format!("missing properties {joined}"),
        ));
    }

    let declared: std::collections::HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let mut additional: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|k| !declared.contains(k))
        .collect();
    additional.sort();
    for key in additional.drain(..) {
        issues.push(ValidationIssue::new(
            [section],
            format!("additional properties '{key}' not allowed"),
        ));
    }

    for p in params {
        let Some(value) = values.get(&p.name) else {
            continue;
        };
        let ty = p.resolved_type();
        if !matches_type(value, ty) {
            issues.push(ValidationIssue::new(
                [section, p.name.as_str()],
                format!("got {}, want {}", type_name(value), ty.as_str()),
            ));
            continue;
        }
        if let Some(enums) = &p.enum_values {
            if !enums.contains(value) {
                issues.push(ValidationIssue::new(
                    [section, p.name.as_str()],
                    "value must be one of the declared enum values",
                ));
            }
        }
        if ty == ParamType::Array {
            if let Some(item_ty) = p.items.as_ref().map(|i| i.param_type) {
                if let Value::Array(items) = value {
                    for (idx, item) in items.iter().enumerate() {
                        if !matches_type(item, item_ty) {
                            issues.push(ValidationIssue::new(
                                [section, p.name.as_str(), &idx.to_string()],
                                format!("got {}, want {}", type_name(item), item_ty.as_str()),
                            ));
                        }
                    }
                }
            }
        }
    }

    issues
}

/// Validate both sections together, returning the combined error array
/// (§4.E, §8.5). `validated` pre-set bypasses this entirely — callers check
/// that flag before invoking.
pub fn validate(
    arguments: &[Parameter],
    options: &[Parameter],
    args: &HashMap<String, Value>,
    opts: &HashMap<String, Value>,
) -> Result<(), ValidationError> {
    let mut issues = validate_section("arguments", arguments, args);
    issues.extend(validate_section("options", options, opts));
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
