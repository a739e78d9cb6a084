// SPDX-License-Identifier: MIT

use super::*;
use std::collections::HashMap;

#[test]
fn substitutes_known_vars() {
    let mut vars = HashMap::new();
    vars.insert("arg_a".to_string(), "hi".to_string());
    vars.insert("opt_b".to_string(), "world".to_string());
    let out = interpolate("echo {{ .arg_a }} {{ .opt_b }}", &vars).unwrap();
    assert_eq!(out, "echo hi world");
}

#[test]
fn aggregates_undefined_variables() {
    let vars = HashMap::new();
    let err = interpolate("{{ .a }} and {{ .b }}", &vars).unwrap_err();
    match err {
        TemplateError::UndefinedVariables { names } => assert_eq!(names, vec!["a".to_string(), "b".to_string()]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn single_s6_case_matches_scenario() {
    // S6 from the spec: command ["echo", "{{ .arg_a }} {{ .opt_b }}"],
    // with an undefined .opt_c in the same command aborting load with one
    // aggregated error.
    let mut vars = HashMap::new();
    vars.insert("arg_a".to_string(), "hi".to_string());
    vars.insert("opt_b".to_string(), "world".to_string());
    let err = interpolate("{{ .opt_c }}", &vars).unwrap_err();
    assert!(matches!(err, TemplateError::UndefinedVariables { names } if names == vec!["opt_c".to_string()]));
}
