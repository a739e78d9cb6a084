// SPDX-License-Identifier: MIT

//! The manager (§4.J): composes the action registry, the runtime
//! decorator, and the run table into the single entry point callers use
//! to add actions, fetch decorated clones, and execute them.

mod decorate;
mod error;
mod registry;
mod run_table;

pub use decorate::Decorator;
pub use error::ManagerError;
pub use registry::Registry;
pub use run_table::RunTable;

use std::sync::Arc;

use tokio::sync::mpsc;

use hangar_core::{Action, ProcessorRegistry, RunInfo, RunStatus, RuntimeError};
use hangar_runtime::Runtime;

/// Published on a `RunBackground` call's terminal error (`RuntimeError`
/// isn't `Clone`, so the channel carries the run id and the error itself
/// rather than a reference back into the run table).
pub type BackgroundError = (String, RuntimeError);

pub struct Manager {
    registry: Registry,
    decorator: Decorator,
    run_table: RunTable,
    error_tx: mpsc::UnboundedSender<BackgroundError>,
    error_rx: Option<mpsc::UnboundedReceiver<BackgroundError>>,
}

impl Manager {
    pub fn new(processors: Arc<ProcessorRegistry>) -> Self {
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        Self {
            registry: Registry::new(),
            decorator: Decorator::new(processors),
            run_table: RunTable::new(),
            error_tx,
            error_rx: Some(error_rx),
        }
    }

    pub fn decorator(&self) -> &Decorator {
        &self.decorator
    }

    /// Takes ownership of the background-error receiver. `None` if already
    /// taken — there is exactly one consumer per manager instance.
    pub fn take_error_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<BackgroundError>> {
        self.error_rx.take()
    }

    pub fn add(&self, action: Action) {
        self.registry.add(action);
    }

    /// A decorated clone (§4.J), or `None` if no action is registered
    /// under `id`.
    pub fn get(&self, id: &str) -> Option<Action> {
        self.registry.get_ref(id).map(|action| self.decorator.decorate(&action))
    }

    /// The stored pointer, undecorated (`GetRef`, "used sparingly").
    pub fn get_ref(&self, id: &str) -> Option<Arc<Action>> {
        self.registry.get_ref(id)
    }

    pub fn all(&self) -> Vec<Action> {
        self.registry.all_ref().iter().map(|action| self.decorator.decorate(action)).collect()
    }

    /// Registers a `RunInfo`, builds and invokes the bound runtime
    /// synchronously, and transitions the run's status to its terminal
    /// state before returning.
    pub async fn run(&self, id: &str) -> Result<RunInfo, ManagerError> {
        let action = self.registry.get_ref(id).ok_or_else(|| ManagerError::NotFound { id: id.to_string() })?;
        let decorated = self.decorator.decorate(&action);
        let run_info = self.register_run(decorated);
        self.run_table.set_status(&run_info.id, RunStatus::Running);

        match self.execute(&run_info.action).await {
            Ok(()) => {
                self.run_table.set_status(&run_info.id, RunStatus::Finished);
                Ok(self.run_table.get(&run_info.id).unwrap_or(run_info))
            }
            Err(e) => {
                self.run_table.set_status(&run_info.id, RunStatus::Error);
                Err(e)
            }
        }
    }

    /// Spawns the run on a background task; the terminal error, if any, is
    /// published on the manager's error channel rather than returned
    /// (`RunBackground`, §4.J). Returns the `RunInfo` registered in
    /// `Created` status immediately, before the task transitions it.
    pub fn run_background(self: &Arc<Self>, id: &str) -> Result<RunInfo, ManagerError> {
        let action = self.registry.get_ref(id).ok_or_else(|| ManagerError::NotFound { id: id.to_string() })?;
        let decorated = self.decorator.decorate(&action);
        let run_info = self.register_run(decorated);
        let run_id = run_info.id.clone();

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.run_table.set_status(&run_id, RunStatus::Running);
            let action = manager.run_table.get(&run_id).map(|info| info.action);
            let Some(action) = action else { return };
            match manager.execute(&action).await {
                Ok(()) => manager.run_table.set_status(&run_id, RunStatus::Finished),
                Err(ManagerError::Runtime(e)) => {
                    manager.run_table.set_status(&run_id, RunStatus::Error);
                    let _ = manager.error_tx.send((run_id.clone(), e));
                }
                Err(_) => manager.run_table.set_status(&run_id, RunStatus::Error),
            }
        });

        Ok(run_info)
    }

    fn register_run(&self, action: Action) -> RunInfo {
        let now_millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        self.run_table.register(now_millis, &suffix[..8], action)
    }

    async fn execute(&self, action: &Action) -> Result<(), ManagerError> {
        let mut runtime: Box<dyn Runtime> = self.decorator.build_runtime(action)?;
        runtime.init(action).await?;

        if !action.input.validated {
            let flag_verdict = runtime.as_flags_mut().and_then(|flags| {
                flags.set_flags(&action.input);
                flags.validate_input(&action.input)
            });
            match flag_verdict {
                Some(result) => result.map_err(|e| ManagerError::Runtime(RuntimeError::Validation(e)))?,
                None => hangar_core::validate(
                    &action.definition.arguments,
                    &action.definition.options,
                    action.input.args(),
                    action.input.opts(),
                )
                .map_err(|e| ManagerError::Runtime(RuntimeError::Validation(e)))?,
            }
        }

        let result = runtime.execute(action).await;
        let close_result = runtime.close().await;
        let outcome = result?;
        close_result?;
        let _ = outcome;
        Ok(())
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
