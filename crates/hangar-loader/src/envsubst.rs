// SPDX-License-Identifier: MIT

//! Shell-style environment substitution (§4.C stage 2): `$VAR`, `${VAR}`,
//! `${VAR-default}`; unknown variables substitute to empty. Grounded on the
//! teacher's `crates/runbook/src/template.rs` `ENV_PATTERN` + `interpolate`
//! two-stage substitution shape.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(-([^}]*))?\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("static regex")
});

pub fn substitute(input: &str, env: &HashMap<String, String>) -> String {
    ENV_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            if let Some(braced) = caps.get(1) {
                let name = braced.as_str();
                match env.get(name) {
                    Some(v) => v.clone(),
                    None => caps
                        .get(3)
                        .map(|d| d.as_str().to_string())
                        .unwrap_or_default(),
                }
            } else if let Some(bare) = caps.get(4) {
                env.get(bare.as_str()).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .into_owned()
}

#[cfg(test)]
#[path = "envsubst_tests.rs"]
mod tests;
