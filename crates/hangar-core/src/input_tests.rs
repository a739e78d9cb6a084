// SPDX-License-Identifier: MIT

use super::*;
use crate::definition::RuntimeSpec;
use serde_json::json;
use std::sync::Arc;

fn def_with_args() -> Arc<Definition> {
    Arc::new(Definition {
        version: "1".to_string(),
        title: None,
        description: None,
        aliases: vec![],
        arguments: vec![
            Parameter {
                name: "arg_a".to_string(),
                title: None,
                description: None,
                param_type: None,
                items: None,
                enum_values: None,
                default: Some(json!("default_a")),
                required: false,
                shorthand: None,
                process: vec![],
                raw: Value::Null,
            },
            Parameter {
                name: "files".to_string(),
                title: None,
                description: None,
                param_type: Some(ParamType::Array),
                items: Some(Box::new(crate::param::ItemsSpec {
                    param_type: ParamType::String,
                })),
                enum_values: None,
                default: None,
                required: false,
                shorthand: None,
                process: vec![],
                raw: Value::Null,
            },
        ],
        options: vec![Parameter {
            name: "opt_b".to_string(),
            title: None,
            description: None,
            param_type: None,
            items: None,
            enum_values: None,
            default: None,
            required: false,
            shorthand: None,
            process: vec![],
            raw: Value::Null,
        }],
        runtime: RuntimeSpec::Plugin,
        working_directory: None,
    })
}

#[test]
fn set_then_unset_leaves_changed_set_unchanged() {
    let mut input = Input::empty(def_with_args());
    let before = input.args_changed();
    input.set_arg("arg_a", json!("x"));
    input.unset_arg("arg_a");
    assert_eq!(input.args_changed(), before);
}

#[test]
fn unset_on_unset_key_is_noop() {
    let mut input = Input::empty(def_with_args());
    input.unset_arg("arg_a");
    assert!(input.args_changed().is_empty());
}

#[test]
fn args_contains_defaults_union_changed_values() {
    let mut input = Input::empty(def_with_args());
    assert_eq!(input.args().get("arg_a"), Some(&json!("default_a")));
    input.set_arg("arg_a", json!("changed"));
    assert_eq!(input.args().get("arg_a"), Some(&json!("changed")));
}

#[test]
fn positional_to_named_coerces_and_respects_count() {
    let def = def_with_args();
    let input = Input::empty(Arc::clone(&def));
    let named = input
        .args_pos_to_named(&["hi".to_string(), "a,b,c".to_string()])
        .unwrap();
    assert_eq!(named.get("arg_a"), Some(&json!("hi")));
    assert_eq!(named.get("files"), Some(&json!(["a", "b", "c"])));
}

#[test]
fn surplus_positional_args_rejected() {
    let def = def_with_args();
    let input = Input::empty(def);
    let err = input
        .args_pos_to_named(&["a".to_string(), "b".to_string(), "c".to_string()])
        .unwrap_err();
    assert!(matches!(err, InputError::TooManyPositional { declared: 2, received: 3 }));
}

#[test]
fn reserved_positional_key_never_visible_in_args() {
    let def = def_with_args();
    let mut args = HashMap::new();
    args.insert(
        POSITIONAL_RESERVED_KEY.to_string(),
        json!(["hi"]),
    );
    let input = Input::new(def, args, HashMap::new(), vec![]).unwrap();
    assert!(!input.args().contains_key(POSITIONAL_RESERVED_KEY));
    assert_eq!(input.args_positional(), &["hi".to_string()]);
}
