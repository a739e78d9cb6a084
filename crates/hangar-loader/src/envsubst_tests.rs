// SPDX-License-Identifier: MIT

use super::*;
use std::collections::HashMap;

#[test]
fn substitutes_bare_and_braced_vars() {
    let mut env = HashMap::new();
    env.insert("HOME".to_string(), "/root".to_string());
    assert_eq!(substitute("$HOME/x", &env), "/root/x");
    assert_eq!(substitute("${HOME}/x", &env), "/root/x");
}

#[test]
fn unknown_var_substitutes_to_empty() {
    let env = HashMap::new();
    assert_eq!(substitute("[$MISSING]", &env), "[]");
}

#[test]
fn default_value_used_when_unset() {
    let env = HashMap::new();
    assert_eq!(substitute("${MISSING-fallback}", &env), "fallback");
}

#[test]
fn default_value_ignored_when_set() {
    let mut env = HashMap::new();
    env.insert("X".to_string(), "actual".to_string());
    assert_eq!(substitute("${X-fallback}", &env), "actual");
}
