// SPDX-License-Identifier: MIT

use super::*;
use hangar_core::{Definition, RuntimeSpec};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn plugin_action() -> Action {
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

#[tokio::test]
async fn executes_callback_and_reports_zero_exit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_callback = Arc::clone(&calls);
    let mut runtime = FunctionRuntime::new(move |_action| {
        calls_in_callback.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let action = plugin_action();
    let outcome = runtime.execute(&action).await.unwrap();
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn propagates_callback_error() {
    let mut runtime = FunctionRuntime::new(|_action| {
        Err(RuntimeError::Unbound {
            action_id: "a".to_string(),
        })
    });
    let action = plugin_action();
    assert!(runtime.execute(&action).await.is_err());
}

#[tokio::test]
async fn clone_box_shares_the_same_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_callback = Arc::clone(&calls);
    let mut runtime = FunctionRuntime::new(move |_action| {
        calls_in_callback.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let mut cloned = runtime.clone_box();
    let action = plugin_action();
    runtime.execute(&action).await.unwrap();
    cloned.execute(&action).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
