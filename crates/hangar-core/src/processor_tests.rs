// SPDX-License-Identifier: MIT

use super::*;
use crate::definition::RuntimeSpec;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

struct UppercaseProcessor;

impl ValueProcessor for UppercaseProcessor {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn applicable_types(&self) -> Applicability {
        Applicability::Types(vec![ParamType::String])
    }

    fn apply(&self, value: Value, _is_changed: bool, _param: &Parameter, _action: &Action) -> Result<Value, String> {
        Ok(Value::String(value.as_str().unwrap_or_default().to_uppercase()))
    }
}

fn sample_action() -> Action {
    let def = Definition {
        version: "1".to_string(),
        title: None,
        description: None,
        aliases: vec![],
        arguments: vec![],
        options: vec![],
        runtime: RuntimeSpec::Plugin,
        working_directory: None,
    };
    Action::new("a", PathBuf::from("/x"), PathBuf::from("/x/action.yaml"), def)
}

fn param_with_processor(name: &str, processor: &str) -> Parameter {
    Parameter {
        name: name.to_string(),
        title: None,
        description: None,
        param_type: Some(ParamType::String),
        items: None,
        enum_values: None,
        default: None,
        required: false,
        shorthand: None,
        process: vec![crate::param::ProcessorRef {
            processor: processor.to_string(),
            options: Value::Null,
        }],
        raw: Value::Null,
    }
}

#[test]
fn missing_processor_is_not_exist() {
    let registry = ProcessorRegistry::new();
    let p = param_with_processor("a", "bogus");
    let err = registry.resolve_chain(&p).unwrap_err();
    assert!(matches!(err, ProcessorError::NotExist { .. }));
}

#[test]
fn inapplicable_type_is_not_applicable() {
    let registry = ProcessorRegistry::new();
    registry.register(Arc::new(UppercaseProcessor));
    let mut p = param_with_processor("a", "uppercase");
    p.param_type = Some(ParamType::Integer);
    let err = registry.resolve_chain(&p).unwrap_err();
    assert!(matches!(err, ProcessorError::NotApplicable { .. }));
}

#[test]
fn chain_applies_in_order() {
    let registry = ProcessorRegistry::new();
    registry.register(Arc::new(UppercaseProcessor));
    let p = param_with_processor("a", "uppercase");
    let chain = registry.resolve_chain(&p).unwrap();
    let action = sample_action();
    let out = registry
        .apply_chain(&chain, json!("hi"), true, &p, &action)
        .unwrap();
    assert_eq!(out, json!("HI"));
}
