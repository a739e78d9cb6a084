// SPDX-License-Identifier: MIT

use super::*;
use crate::definition::RuntimeSpec;
use std::path::PathBuf;

#[test]
fn new_run_starts_created() {
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
    let action = Action::new("a", PathBuf::from("/x"), PathBuf::from("/x/action.yaml"), def);
    let run = RunInfo::new("id-1".to_string(), action);
    assert_eq!(run.status, RunStatus::Created);
}

#[test]
fn generated_ids_are_time_prefixed() {
    let id = RunInfo::generate_id(12345, "abcd");
    assert_eq!(id, "12345-abcd");
}
