// SPDX-License-Identifier: MIT

//! Run table (§4.J): tracks registered executions and their status
//! transitions. Grounded on `crates/engine/src/executor.rs`'s
//! `Arc<Mutex<MaterializedState>>` shared-state idiom, using
//! `parking_lot::RwLock` for the multi-reader `Get`/`All` access pattern.

use std::collections::HashMap;

use parking_lot::RwLock;

use hangar_core::{Action, RunInfo, RunStatus};

#[derive(Default)]
pub struct RunTable {
    runs: RwLock<HashMap<String, RunInfo>>,
}

impl RunTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new run in `Created` status and returns its id.
    pub fn register(&self, now_millis: u128, suffix: &str, action: Action) -> RunInfo {
        let id = RunInfo::generate_id(now_millis, suffix);
        let info = RunInfo::new(id.clone(), action);
        self.runs.write().insert(id, info.clone());
        info
    }

    pub fn get(&self, id: &str) -> Option<RunInfo> {
        self.runs.read().get(id).cloned()
    }

    pub fn all(&self) -> Vec<RunInfo> {
        self.runs.read().values().cloned().collect()
    }

    /// No-op if `id` isn't registered — a run that's already been pruned
    /// can still have its terminal status reported by a lagging caller.
    pub fn set_status(&self, id: &str, status: RunStatus) {
        if let Some(info) = self.runs.write().get_mut(id) {
            info.status = status;
        }
    }
}

#[cfg(test)]
#[path = "run_table_tests.rs"]
mod tests;
