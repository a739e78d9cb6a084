// SPDX-License-Identifier: MIT

//! Discovery strategies: the `IsValid`/id-derivation contract a filesystem
//! walk applies to each candidate path (§4.F).

use std::path::Path;

use hangar_core::IdError;

pub trait DiscoveryStrategy {
    /// Whether `path` names a file the walk should hand to the parser pool.
    fn is_valid(&self, path: &Path) -> bool;

    /// Derive the stable action id for a path this strategy accepted.
    fn derive_id(&self, path: &Path) -> Result<String, IdError>;
}

/// Matches `(actions|…/actions)/[^/]+/action.ya?ml`; rejects any deeper
/// nesting inside the `actions/` directory (§4.F).
pub struct YamlActionStrategy;

impl DiscoveryStrategy for YamlActionStrategy {
    fn is_valid(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if file_name != "action.yaml" && file_name != "action.yml" {
            return false;
        }
        let components: Vec<&str> = path
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect();
        if components.len() < 3 {
            return false;
        }
        let action_dir = components[components.len() - 2];
        let actions_dir = components[components.len() - 3];
        !action_dir.is_empty() && actions_dir == "actions"
    }

    fn derive_id(&self, path: &Path) -> Result<String, IdError> {
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        hangar_core::derive_id(&dir.to_string_lossy())
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
