// SPDX-License-Identifier: MIT

use super::*;
use hangar_core::{Action, Definition, RuntimeSpec};
use std::path::PathBuf;

struct DummyRuntime {
    calls: u32,
}

#[async_trait::async_trait]
impl Runtime for DummyRuntime {
    async fn init(&mut self, _action: &Action) -> Result<(), RuntimeError> {
        self.calls += 1;
        Ok(())
    }

    async fn execute(&mut self, _action: &Action) -> Result<ExecOutcome, RuntimeError> {
        Ok(ExecOutcome { exit_code: 0 })
    }

    async fn close(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Runtime> {
        Box::new(DummyRuntime { calls: self.calls })
    }
}

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
async fn trait_object_dispatches_through_box() {
    let mut runtime: Box<dyn Runtime> = Box::new(DummyRuntime { calls: 0 });
    let action = plugin_action();
    runtime.init(&action).await.unwrap();
    let outcome = runtime.execute(&action).await.unwrap();
    assert_eq!(outcome.exit_code, 0);

    let cloned = runtime.clone_box();
    drop(runtime);
    drop(cloned);
}
