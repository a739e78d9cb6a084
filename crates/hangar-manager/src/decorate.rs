// SPDX-License-Identifier: MIT

//! Decoration (§4.J): on `Get`/`All`, select a default runtime for the
//! action's declared runtime type and wire value processors. Grounded on
//! `crates/engine/src/executor.rs`'s step of resolving a `CommandDef`'s
//! defaults before dispatch, re-expressed here as two independent,
//! infallible-from-the-caller's-view passes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use hangar_core::{Action, BoundRuntimeMarker, Parameter, ProcessorRegistry, RuntimeError};
use hangar_runtime::{FunctionRuntime, Runtime, ShellRuntime};

use crate::error::ManagerError;

type FunctionCallback = Arc<dyn Fn(&Action) -> Result<(), RuntimeError> + Send + Sync>;
type ContainerFactory = Arc<dyn Fn() -> Box<dyn Runtime> + Send + Sync>;
type ShellEnvFactory = Arc<dyn Fn() -> HashMap<String, String> + Send + Sync>;

fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Selects a default runtime per declared kind and records resolvable
/// value-processor chains. Construction of the concrete runtime is
/// deferred to `build_runtime`, since `Action` only carries a
/// `BoundRuntimeMarker` (the tag), not a `Box<dyn Runtime>` — the manager
/// builds the concrete runtime immediately before `Execute`.
pub struct Decorator {
    processors: Arc<ProcessorRegistry>,
    function_callbacks: RwLock<HashMap<String, FunctionCallback>>,
    container_factory: RwLock<Option<ContainerFactory>>,
    shell_env: RwLock<ShellEnvFactory>,
}

impl Decorator {
    pub fn new(processors: Arc<ProcessorRegistry>) -> Self {
        Self {
            processors,
            function_callbacks: RwLock::new(HashMap::new()),
            container_factory: RwLock::new(None),
            shell_env: RwLock::new(Arc::new(process_env)),
        }
    }

    /// Registers the in-process callback a `plugin` action dispatches to.
    /// Plugin actions carry no callback in their `Definition` (§3: the
    /// map-based callback shape is legacy), so it must be bound here by id.
    pub fn register_function(&self, action_id: impl Into<String>, callback: impl Fn(&Action) -> Result<(), RuntimeError> + Send + Sync + 'static) {
        self.function_callbacks.write().insert(action_id.into(), Arc::new(callback));
    }

    /// Installs the factory used to build a fresh `ContainerRuntime` (a
    /// real one needs a `Driver`, which this crate has no opinion on).
    pub fn set_container_factory(&self, factory: impl Fn() -> Box<dyn Runtime> + Send + Sync + 'static) {
        *self.container_factory.write() = Some(Arc::new(factory));
    }

    /// Overrides the environment a `ShellRuntime` is constructed with.
    /// Defaults to the manager process's own environment (§4.I default).
    pub fn set_shell_env_factory(&self, factory: impl Fn() -> HashMap<String, String> + Send + Sync + 'static) {
        *self.shell_env.write() = Arc::new(factory);
    }

    /// Returns a decorated clone: runtime marker set, the working directory
    /// resolved, and each parameter's processor chain resolved and run over
    /// its current value (§4.E: "on `Input.Set`... each parameter's chain
    /// runs in declaration order"). Unresolvable chains and processor
    /// failures are logged, not propagated — `Get`/`All` stay infallible
    /// (§4.J).
    pub fn decorate(&self, action: &Action) -> Action {
        let mut decorated = action.clone_for_binding();
        decorated.runtime = Some(BoundRuntimeMarker {
            kind: action.definition.runtime.kind().to_string(),
        });

        match hangar_loader::resolve_working_dir(action, &process_env()) {
            Ok(wd) => decorated.wd = Some(wd),
            Err(e) => {
                tracing::warn!(action = %action.id, error = %e, "failed to resolve working_directory template, using the discovery directory");
            }
        }

        for param in &action.definition.arguments {
            self.apply_param_chain(action, &mut decorated, param, true);
        }
        for param in &action.definition.options {
            self.apply_param_chain(action, &mut decorated, param, false);
        }

        decorated
    }

    fn apply_param_chain(&self, action: &Action, decorated: &mut Action, param: &Parameter, is_argument: bool) {
        let chain = match self.processors.resolve_chain(param) {
            Ok(chain) => chain,
            Err(e) => {
                tracing::warn!(action = %action.id, param = %param.name, error = %e, "unresolved processor chain");
                return;
            }
        };
        for processor in &chain {
            decorated.processor_names.insert(processor.name().to_string(), ());
        }
        if chain.is_empty() {
            return;
        }

        let current = if is_argument {
            action.input.args().get(&param.name).cloned()
        } else {
            action.input.opts().get(&param.name).cloned()
        };
        let Some(value) = current else { return };
        let is_changed = action.input.is_changed(&param.name);

        match self.processors.apply_chain(&chain, value, is_changed, param, action) {
            Ok(processed) => {
                if is_argument {
                    decorated.input.set_processed_arg(&param.name, processed);
                } else {
                    decorated.input.set_processed_opt(&param.name, processed);
                }
            }
            Err(e) => {
                tracing::warn!(action = %action.id, param = %param.name, error = %e, "processor chain application failed");
            }
        }
    }

    /// Builds the concrete runtime for a decorated action's bound kind.
    pub fn build_runtime(&self, action: &Action) -> Result<Box<dyn Runtime>, ManagerError> {
        let marker = action.runtime.as_ref().ok_or_else(|| ManagerError::NoRuntime { id: action.id.clone() })?;
        match marker.kind.as_str() {
            "plugin" => {
                let callback = self
                    .function_callbacks
                    .read()
                    .get(&action.id)
                    .cloned()
                    .ok_or_else(|| ManagerError::NoRuntime { id: action.id.clone() })?;
                Ok(Box::new(FunctionRuntime::new(move |a| callback(a))))
            }
            "container" => self
                .container_factory
                .read()
                .as_ref()
                .map(|factory| factory())
                .ok_or_else(|| ManagerError::NoRuntime { id: action.id.clone() }),
            "shell" => {
                let env = (self.shell_env.read())();
                Ok(Box::new(ShellRuntime::new(env)))
            }
            other => Err(ManagerError::NoRuntime { id: format!("{} (unknown kind {other:?})", action.id) }),
        }
    }
}

#[cfg(test)]
#[path = "decorate_tests.rs"]
mod tests;
