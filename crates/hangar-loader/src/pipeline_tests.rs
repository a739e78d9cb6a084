// SPDX-License-Identifier: MIT

use super::*;
use hangar_core::{Action, Definition, RuntimeSpec};
use std::collections::HashMap;
use std::path::PathBuf;

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

#[test]
fn pipeline_runs_stages_in_order() {
    let action = sample_action();
    let mut env = HashMap::new();
    env.insert("HOME".to_string(), "/root".to_string());
    let mut vars = HashMap::new();
    vars.insert("name".to_string(), "world".to_string());
    let ctx = LoadContext::new(&action, env, vars);

    let pipeline = full_pipeline();
    let out = pipeline
        .apply("echo $HOME/{{ .name }} # a comment\n", &ctx)
        .unwrap();
    assert_eq!(out, "echo /root/world \n");
}

#[test]
fn undefined_template_var_surfaces_as_load_error() {
    let action = sample_action();
    let ctx = LoadContext::new(&action, HashMap::new(), HashMap::new());
    let pipeline = full_pipeline();
    let err = pipeline.apply("{{ .missing }}", &ctx).unwrap_err();
    assert!(matches!(err, LoadError::Template(_)));
}
