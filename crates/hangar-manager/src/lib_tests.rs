// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hangar_core::{Definition, RuntimeError, RuntimeSpec};

use super::*;

fn plugin_action(id: &str) -> Action {
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
    Action::new(id, PathBuf::from("/x"), PathBuf::from("/x/action.yaml"), def)
}

#[test]
fn get_returns_a_decorated_clone_and_get_ref_returns_the_raw_pointer() {
    let manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("hello"));

    let decorated = manager.get("hello").unwrap();
    assert_eq!(decorated.runtime.unwrap().kind, "plugin");
    assert!(manager.get_ref("hello").is_some());
    assert!(manager.get("missing").is_none());
}

#[test]
fn all_decorates_every_stored_action() {
    let manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("a"));
    manager.add(plugin_action("b"));
    let all = manager.all();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|a| a.runtime.is_some()));
}

#[tokio::test]
async fn run_on_an_unregistered_id_is_not_found() {
    let manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    let err = manager.run("missing").await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { .. }));
}

#[tokio::test]
async fn run_executes_the_bound_callback_and_finishes() {
    let manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("hello"));
    let called = Arc::new(AtomicBool::new(false));
    let called_clone = Arc::clone(&called);
    manager.decorator().register_function("hello", move |_action| {
        called_clone.store(true, Ordering::SeqCst);
        Ok(())
    });

    let info = manager.run("hello").await.unwrap();
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(info.status, RunStatus::Finished);
}

#[tokio::test]
async fn run_without_a_bound_callback_surfaces_no_runtime_and_marks_the_run_errored() {
    let manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("hello"));

    let err = manager.run("hello").await.unwrap_err();
    assert!(matches!(err, ManagerError::NoRuntime { .. }));
}

#[tokio::test]
async fn run_background_transitions_status_and_publishes_no_error_on_success() {
    let mut manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("hello"));
    manager.decorator().register_function("hello", |_action| Ok(()));
    let mut error_rx = manager.take_error_receiver().unwrap();
    let manager = Arc::new(manager);

    let info = manager.run_background("hello").unwrap();
    assert_eq!(info.status, RunStatus::Created);

    for _ in 0..10 {
        tokio::task::yield_now().await;
        if manager.run_table.get(&info.id).map(|i| i.status) == Some(RunStatus::Finished) {
            break;
        }
    }
    assert_eq!(manager.run_table.get(&info.id).unwrap().status, RunStatus::Finished);
    assert!(error_rx.try_recv().is_err());
}

#[tokio::test]
async fn run_background_publishes_the_terminal_error_on_the_channel() {
    let mut manager = Manager::new(Arc::new(ProcessorRegistry::new()));
    manager.add(plugin_action("hello"));
    manager
        .decorator()
        .register_function("hello", |_action| Err(RuntimeError::Driver("boom".to_string())));
    let mut error_rx = manager.take_error_receiver().unwrap();
    let manager = Arc::new(manager);

    let info = manager.run_background("hello").unwrap();
    let (run_id, err) = error_rx.recv().await.unwrap();
    assert_eq!(run_id, info.id);
    assert!(matches!(err, RuntimeError::Driver(_)));
    assert_eq!(manager.run_table.get(&info.id).unwrap().status, RunStatus::Error);
}
