// SPDX-License-Identifier: MIT

//! Runtime abstraction (§4.G): every runtime exposes `init`/`execute`/
//! `close`/`clone_box`. A runtime may additionally implement the `flags`
//! capability exposing a CLI-facing parameter group.
//!
//! The set of runtime kinds is closed (container | function | shell), but
//! the container implementation lives in a downstream crate
//! (`hangar-container`, to keep this crate free of a container-engine
//! dependency), so the concrete kinds can't be expressed as one local enum
//! the way a single-crate rewrite would. `Box<dyn Runtime>` stands in for
//! that tagged union across the crate boundary; `hangar_core::
//! BoundRuntimeMarker` still carries the closed-set tag for bookkeeping.

use async_trait::async_trait;

use hangar_core::{Action, Input, RuntimeError, ValidationError};

/// Result of a runtime's `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub exit_code: i32,
}

#[async_trait]
pub trait Runtime: Send + Sync {
    async fn init(&mut self, action: &Action) -> Result<(), RuntimeError>;
    async fn execute(&mut self, action: &Action) -> Result<ExecOutcome, RuntimeError>;
    async fn close(&mut self) -> Result<(), RuntimeError>;

    /// A fresh instance in initial state, so the same action template can
    /// be used from multiple callers (§4.G).
    fn clone_box(&self) -> Box<dyn Runtime>;

    /// Optional access to the `RuntimeFlags` capability this concrete
    /// runtime may implement. `None` for runtimes with no flag group
    /// (function, shell); overridden by `ContainerRuntime`.
    fn as_flags_mut(&mut self) -> Option<&mut dyn RuntimeFlags> {
        None
    }
}

/// Optional capability: a runtime that exposes a named group of
/// parameters as CLI flags (§4.G).
pub trait RuntimeFlags {
    fn flag_group(&self) -> &'static str;

    fn set_flags(&mut self, input: &Input);

    /// May short-circuit action-level validation (used for `--exec`,
    /// which passes positional args through unvalidated). `None` defers
    /// to normal validation.
    fn validate_input(&self, input: &Input) -> Option<Result<(), ValidationError>>;
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
