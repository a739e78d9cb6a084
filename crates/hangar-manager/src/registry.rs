// SPDX-License-Identifier: MIT

//! Action registry (§4.J): `Add` installs an action by id, last write
//! wins within the process. Grounded on `crates/runbook/src/parser.rs`'s
//! `Runbook` HashMap-of-entities storage, behind `parking_lot::RwLock`
//! per `crates/daemon`'s shared-state convention.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use hangar_core::Action;

#[derive(Default)]
struct RegistryState {
    actions: HashMap<String, Arc<Action>>,
    /// Alias -> canonical id (§SUPPLEMENTED FEATURES: alias resolution).
    aliases: HashMap<String, String>,
}

/// Stores actions and their declared aliases. No decoration happens
/// here — that's `decorate::Decorator`'s job, applied by the manager on
/// `get`/`all`.
#[derive(Default)]
pub struct Registry {
    state: RwLock<RegistryState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `action` by id, last write wins (§4.J). An id collision
    /// silently replaces the prior entry and its alias bindings.
    pub fn add(&self, action: Action) {
        let mut state = self.state.write();
        let id = action.id.clone();
        for alias in &action.definition.aliases {
            state.aliases.insert(alias.clone(), id.clone());
        }
        state.actions.insert(id, Arc::new(action));
    }

    /// The stored pointer, resolving through the alias index if `id`
    /// isn't a canonical id (`GetRef`, §4.J: "read-only, used sparingly").
    pub fn get_ref(&self, id: &str) -> Option<Arc<Action>> {
        let state = self.state.read();
        if let Some(action) = state.actions.get(id) {
            return Some(Arc::clone(action));
        }
        let canonical = state.aliases.get(id)?;
        state.actions.get(canonical).cloned()
    }

    pub fn all_ref(&self) -> Vec<Arc<Action>> {
        self.state.read().actions.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
