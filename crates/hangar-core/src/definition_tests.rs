// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;

fn plugin_def() -> Definition {
    Definition {
        version: "1".to_string(),
        title: Some("Hi".to_string()),
        description: None,
        aliases: vec![],
        arguments: vec![],
        options: vec![],
        runtime: RuntimeSpec::Plugin,
        working_directory: None,
    }
}

#[test]
fn runtime_spec_accepts_bare_plugin_string() {
    let spec = RuntimeSpec::from_value(&json!("plugin")).unwrap();
    assert_eq!(spec.kind(), "plugin");
}

#[test]
fn runtime_spec_rejects_unknown_bare_string() {
    assert!(RuntimeSpec::from_value(&json!("bogus")).is_err());
}

#[test]
fn runtime_spec_parses_container_mapping() {
    let spec = RuntimeSpec::from_value(&json!({
        "type": "container",
        "image": "my/image:v1",
        "command": ["/bin/sh", "-c", "echo ok"],
    }))
    .unwrap();
    match spec {
        RuntimeSpec::Container(c) => assert_eq!(c.image, "my/image:v1"),
        _ => panic!("expected container"),
    }
}

#[test]
fn container_runtime_requires_image_and_command() {
    let mut def = plugin_def();
    def.runtime = RuntimeSpec::Container(ContainerSpec {
        image: String::new(),
        command: CommandSpec::Single(String::new()),
        build: None,
        extra_hosts: vec![],
        env: EnvSpec::Empty,
        user: None,
    });
    assert!(def.validate_runtime().is_err());
}

#[test]
fn unsupported_version_rejected() {
    let mut def = plugin_def();
    def.version = "2".to_string();
    assert!(def.validate_runtime().is_err());
}

#[test]
fn duplicate_names_considering_dash_underscore() {
    let mut def = plugin_def();
    def.arguments.push(Parameter {
        name: "arg-a".to_string(),
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
    });
    def.options.push(Parameter {
        name: "arg_a".to_string(),
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
    });
    let err = def.validate_unique_names().unwrap_err();
    assert!(matches!(err, crate::error::DefinitionError::DuplicateName { .. }));
}

#[test]
fn env_spec_normalizes_map_sorted() {
    let mut m = std::collections::HashMap::new();
    m.insert("B".to_string(), "2".to_string());
    m.insert("A".to_string(), "1".to_string());
    let spec = EnvSpec::Map(m);
    assert_eq!(spec.normalized(), vec!["A=1".to_string(), "B=2".to_string()]);
}

#[test]
fn usage_line_marks_required_vs_optional() {
    let mut def = plugin_def();
    def.arguments.push(Parameter {
        name: "file".to_string(),
        title: None,
        description: None,
        param_type: None,
        items: None,
        enum_values: None,
        default: None,
        required: true,
        shorthand: None,
        process: vec![],
        raw: Value::Null,
    });
    assert_eq!(def.usage_line(), "<file>");
}
