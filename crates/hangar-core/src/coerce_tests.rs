// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;

#[test]
fn coerces_scalars() {
    assert_eq!(coerce_scalar_str("42", ParamType::Integer).unwrap(), json!(42));
    assert_eq!(coerce_scalar_str("3.5", ParamType::Number).unwrap(), json!(3.5));
    assert_eq!(coerce_scalar_str("true", ParamType::Boolean).unwrap(), json!(true));
    assert_eq!(coerce_scalar_str("hi", ParamType::String).unwrap(), json!("hi"));
}

#[test]
fn rejects_bad_scalars() {
    assert!(coerce_scalar_str("nope", ParamType::Integer).is_err());
    assert!(coerce_scalar_str("maybe", ParamType::Boolean).is_err());
}

#[test]
fn coerces_comma_separated_array() {
    let v = coerce_array_str("1, 2, 3", ParamType::Integer).unwrap();
    assert_eq!(v, json!([1, 2, 3]));
}

#[test]
fn coerce_value_accepts_string_forms() {
    assert_eq!(coerce_value(&json!("7"), ParamType::Integer).unwrap(), json!(7));
    assert_eq!(coerce_value(&json!("false"), ParamType::Boolean).unwrap(), json!(false));
}
