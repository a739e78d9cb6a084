// SPDX-License-Identifier: MIT

//! Go-style `{{ .name }}` input substitution (§4.C stage 3), adapted from
//! the teacher's `crates/runbook/src/template.rs` `${name}` substitution —
//! same `LazyLock<Regex>` + single-pass-collect-errors shape, different
//! delimiter syntax.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use hangar_core::TemplateError;

static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*\.([A-Za-z0-9_]+)\s*\}\}").expect("static regex"));

/// Substitute every `{{ .name }}` occurrence in `input` using `vars`.
/// Undefined variables are collected and returned as a single aggregated
/// error rather than failing on the first miss (§4.C).
pub fn interpolate(input: &str, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut undefined = Vec::new();
    for caps in VAR_PATTERN.captures_iter(input) {
        let name = &caps[1];
        if !vars.contains_key(name) {
            undefined.push(name.to_string());
        }
    }
    if !undefined.is_empty() {
        undefined.sort();
        undefined.dedup();
        return Err(TemplateError::UndefinedVariables { names: undefined });
    }

    Ok(VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

/// Every referenced `{{ .name }}` identifier in `input`, regardless of
/// whether it resolves — used by callers that need the full reference set
/// before binding values (e.g. cross-checking against declared parameters).
pub fn referenced_names(input: &str) -> Vec<String> {
    VAR_PATTERN
        .captures_iter(input)
        .map(|c| c[1].to_string())
        .collect()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
