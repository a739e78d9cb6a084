// SPDX-License-Identifier: MIT

//! In-process function runtime (§4.I): wraps a user callback and executes
//! it directly. No flags, no lifecycle beyond the call.

use std::sync::Arc;

use async_trait::async_trait;

use hangar_core::{Action, RuntimeError};

use crate::runtime::{ExecOutcome, Runtime};

type Callback = Arc<dyn Fn(&Action) -> Result<(), RuntimeError> + Send + Sync>;

/// Wraps `fn(ctx, action) error` (§4.I; the earlier `map[string]any`
/// callback shape is legacy per §9's open-question resolution and is not
/// carried forward).
pub struct FunctionRuntime {
    callback: Callback,
}

impl FunctionRuntime {
    pub fn new(callback: impl Fn(&Action) -> Result<(), RuntimeError> + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }
}

#[async_trait]
impl Runtime for FunctionRuntime {
    async fn init(&mut self, _action: &Action) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn execute(&mut self, action: &Action) -> Result<ExecOutcome, RuntimeError> {
        (self.callback)(action)?;
        Ok(ExecOutcome { exit_code: 0 })
    }

    async fn close(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Runtime> {
        Box::new(FunctionRuntime {
            callback: Arc::clone(&self.callback),
        })
    }
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
