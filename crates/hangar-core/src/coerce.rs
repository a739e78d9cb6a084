// SPDX-License-Identifier: MIT

//! Type coercion between untyped YAML/JSON/CLI values and a `Parameter`'s
//! declared type (§3, §4.E, §9 "Dynamic typing at the boundary").

use serde_json::Value;
use thiserror::Error;

use crate::param::ParamType;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot coerce {value:?} to {want}")]
pub struct CoerceError {
    pub value: String,
    pub want: &'static str,
}

fn err(value: impl std::fmt::Debug, want: &'static str) -> CoerceError {
    CoerceError {
        value: format!("{value:?}"),
        want,
    }
}

/// Coerce a single scalar string (as received from CLI positional/flag
/// parsing) to the parameter's declared type.
pub fn coerce_scalar_str(s: &str, ty: ParamType) -> Result<Value, CoerceError> {
    match ty {
        ParamType::String => Ok(Value::String(s.to_string())),
        ParamType::Integer => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| err(s, "integer")),
        ParamType::Number => s
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| err(s, "number")),
        ParamType::Boolean => match s {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(err(s, "boolean")),
        },
        ParamType::Array => Err(err(s, "array (use coerce_array_str)")),
    }
}

/// Coerce a comma-separated CLI string into the untyped-sequence array
/// shape the validator expects (§9: "array-of-any as the storage shape").
pub fn coerce_array_str(s: &str, item_ty: ParamType) -> Result<Value, CoerceError> {
    let items = s
        .split(',')
        .map(|piece| coerce_scalar_str(piece.trim(), item_ty))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

/// Coerce an arbitrary YAML/JSON value (as found in `default:`/`enum:`
/// nodes) to the declared type; integer/number/boolean also accept their
/// string forms (§4.C).
pub fn coerce_value(value: &Value, ty: ParamType) -> Result<Value, CoerceError> {
    match (ty, value) {
        (ParamType::String, Value::String(_)) => Ok(value.clone()),
        (ParamType::String, other) => Ok(Value::String(other.to_string())),
        (ParamType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        (ParamType::Integer, Value::String(s)) => coerce_scalar_str(s, ParamType::Integer),
        (ParamType::Number, Value::Number(_)) => Ok(value.clone()),
        (ParamType::Number, Value::String(s)) => coerce_scalar_str(s, ParamType::Number),
        (ParamType::Boolean, Value::Bool(_)) => Ok(value.clone()),
        (ParamType::Boolean, Value::String(s)) => coerce_scalar_str(s, ParamType::Boolean),
        (ParamType::Array, Value::Array(_)) => Ok(value.clone()),
        (ParamType::Array, Value::String(s)) => coerce_array_str(s, ParamType::String),
        _ => Err(err(value, ty.as_str())),
    }
}

#[cfg(test)]
#[path = "coerce_tests.rs"]
mod tests;
