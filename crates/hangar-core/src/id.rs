// SPDX-License-Identifier: MIT

//! Action-id derivation from a discovered filesystem path.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("cannot derive an id from a root-level path: {0}")]
    EmptyPrefix(String),
}

/// Default id provider (§4.F): locate the last `/actions/` marker in `dir`,
/// replace it with `:`, replace remaining separators with `.`, trim leading
/// and trailing `.`/`:`.
///
/// `dir` is the directory containing `action.yaml`, not the file path itself.
pub fn derive_id(dir: &str) -> Result<String, IdError> {
    let normalized = dir.replace('\\', "/");
    let marker = "/actions/";

    let (prefix, rest) = match normalized.rfind(marker) {
        Some(idx) => (&normalized[..idx], &normalized[idx + marker.len()..]),
        None => {
            if let Some(rest) = normalized.strip_prefix("actions/") {
                ("", rest)
            } else if normalized.trim_end_matches('/') == "actions" {
                ("", "")
            } else {
                (normalized.as_str(), "")
            }
        }
    };

    let prefix_part = prefix.trim_matches('/').replace('/', ".");
    let rest_part = rest.trim_matches('/').replace('/', ".");

    let joined = if prefix_part.is_empty() {
        rest_part
    } else if rest_part.is_empty() {
        prefix_part
    } else {
        format!("{prefix_part}:{rest_part}")
    };

    let trimmed = joined.trim_matches(|c| c == '.' || c == ':').to_string();
    if trimmed.is_empty() {
        return Err(IdError::EmptyPrefix(dir.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
