// SPDX-License-Identifier: MIT

//! `Action` — the unit of work (§3).

use std::path::PathBuf;
use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::Definition;
use crate::input::Input;

/// A named runtime binding recorded on an `Action`. The concrete runtime
/// object lives in `hangar-runtime`/`hangar-container`; this crate only
/// needs to know a runtime has been selected and by what name, to keep
/// `hangar-core` free of a dependency on either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRuntimeMarker {
    pub kind: String,
}

/// The unit of work (§3): a stable id, a pointer into the discovery
/// filesystem, a `Definition`, an `Input` (may be unset), and a processor
/// map. The registry's stored values are immutable once added; callers
/// always receive a clone before mutating (§3 Ownership).
#[derive(Debug, Clone)]
pub struct Action {
    pub id: String,
    /// Directory the action file was discovered in.
    pub fsdir: PathBuf,
    /// Full path to the action definition file.
    pub fpath: PathBuf,
    /// Working directory the action executes from, once resolved.
    pub wd: Option<PathBuf>,
    pub definition: Arc<Definition>,
    pub input: Input,
    pub runtime: Option<BoundRuntimeMarker>,
    /// processor name -> declared options, keyed for quick lookup by the
    /// decorator (§4.J); resolution itself lives in `hangar-manager`.
    pub processor_names: HashMap<String, ()>,
}

impl Action {
    pub fn new(id: impl Into<String>, fsdir: PathBuf, fpath: PathBuf, definition: Definition) -> Self {
        let definition = Arc::new(definition);
        Self {
            id: id.into(),
            fsdir,
            fpath,
            wd: None,
            input: Input::empty(Arc::clone(&definition)),
            definition,
            runtime: None,
            processor_names: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        self.definition.title.as_deref().unwrap_or(&self.id)
    }

    pub fn working_dir(&self) -> PathBuf {
        self.wd.clone().unwrap_or_else(|| self.fsdir.clone())
    }

    /// Clone this action for a caller to bind input/runtime to, per §3
    /// ("cloned before any mutation").
    pub fn clone_for_binding(&self) -> Action {
        self.clone()
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
