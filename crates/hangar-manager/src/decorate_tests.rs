// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hangar_core::{Applicability, Definition, ParamType, Parameter, ProcessorRef, RuntimeSpec, ValueProcessor};
use serde_json::Value;

use super::*;

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

fn param(name: &str, processor: Option<&str>) -> Parameter {
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
        process: processor
            .map(|p| vec![ProcessorRef { processor: p.to_string(), options: Value::Null }])
            .unwrap_or_default(),
        raw: Value::Null,
    }
}

fn action_with(runtime: RuntimeSpec, options: Vec<Parameter>) -> Action {
    let def = Definition {
        version: "1".to_string(),
        title: None,
        description: None,
        aliases: vec![],
        arguments: vec![],
        options,
        runtime,
        working_directory: None,
    };
    Action::new("a", PathBuf::from("/x"), PathBuf::from("/x/action.yaml"), def)
}

#[test]
fn decorate_sets_the_plugin_marker_and_records_resolved_processors() {
    let processors = Arc::new(ProcessorRegistry::new());
    processors.register(Arc::new(UppercaseProcessor));
    let decorator = Decorator::new(processors);

    let action = action_with(RuntimeSpec::Plugin, vec![param("name", Some("uppercase"))]);
    let decorated = decorator.decorate(&action);

    assert_eq!(decorated.runtime.unwrap().kind, "plugin");
    assert!(decorated.processor_names.contains_key("uppercase"));
}

#[test]
fn decorate_does_not_fail_on_an_unresolvable_processor_chain() {
    let processors = Arc::new(ProcessorRegistry::new());
    let decorator = Decorator::new(processors);

    let action = action_with(RuntimeSpec::Plugin, vec![param("name", Some("bogus"))]);
    let decorated = decorator.decorate(&action);

    assert_eq!(decorated.runtime.unwrap().kind, "plugin");
    assert!(decorated.processor_names.is_empty());
}

#[tokio::test]
async fn build_runtime_for_plugin_uses_the_registered_callback() {
    let processors = Arc::new(ProcessorRegistry::new());
    let decorator = Decorator::new(processors);
    let called = Arc::new(AtomicBool::new(false));
    let called_clone = Arc::clone(&called);
    decorator.register_function("a", move |_action| {
        called_clone.store(true, Ordering::SeqCst);
        Ok(())
    });

    let action = action_with(RuntimeSpec::Plugin, vec![]);
    let decorated = decorator.decorate(&action);
    let mut runtime = decorator.build_runtime(&decorated).unwrap();

    let outcome = runtime.execute(&decorated).await;
    assert_eq!(outcome.unwrap().exit_code, 0);
    assert!(called.load(Ordering::SeqCst));
}

#[test]
fn build_runtime_without_a_registered_callback_is_no_runtime() {
    let processors = Arc::new(ProcessorRegistry::new());
    let decorator = Decorator::new(processors);

    let action = action_with(RuntimeSpec::Plugin, vec![]);
    let decorated = decorator.decorate(&action);

    let err = decorator.build_runtime(&decorated).unwrap_err();
    assert!(matches!(err, ManagerError::NoRuntime { .. }));
}

#[test]
fn build_runtime_for_shell_uses_the_configured_env_factory() {
    let processors = Arc::new(ProcessorRegistry::new());
    let decorator = Decorator::new(processors);
    decorator.set_shell_env_factory(|| {
        let mut env = std::collections::HashMap::new();
        env.insert("HANGAR_TEST".to_string(), "1".to_string());
        env
    });

    let action = action_with(RuntimeSpec::Shell(hangar_core::ShellSpec { script: "true".to_string(), env: Default::default() }), vec![]);
    let decorated = decorator.decorate(&action);
    assert!(decorator.build_runtime(&decorated).is_ok());
}
