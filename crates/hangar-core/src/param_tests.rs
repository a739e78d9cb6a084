// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn valid_names() {
    assert!(is_valid_name("arg_a"));
    assert!(is_valid_name("opt-b"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("1abc"));
    assert!(!is_valid_name("has space"));
}

#[test]
fn dash_underscore_equivalence() {
    assert_eq!(normalize_name("opt-b"), normalize_name("opt_b"));
}

#[test]
fn default_param_type_is_string() {
    assert_eq!(ParamType::default(), ParamType::String);
}
