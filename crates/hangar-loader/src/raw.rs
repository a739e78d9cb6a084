// SPDX-License-Identifier: MIT

//! Raw-phase unescaping (§4.C): wrap bare `{{ ... }}` template fragments
//! in double quotes before the YAML parser sees them, so they round-trip
//! as strings instead of being mis-parsed as YAML flow mappings. Grounded
//! on the teacher's `template.rs` regex-construction idiom, applied here
//! to a pre-parse rewrite rather than a post-parse substitution.

use std::sync::LazyLock;

use regex::Regex;

static RAW_TEMPLATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}\n]*\}\}").expect("static regex"));

pub fn escape_bare_templates(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut last_end = 0;
    for m in RAW_TEMPLATE_PATTERN.find_iter(input) {
        out.push_str(&input[last_end..m.start()]);
        let already_quoted = input[..m.start()].trim_end().ends_with('"')
            && input[m.end()..].trim_start().starts_with('"');
        if already_quoted {
            out.push_str(m.as_str());
        } else {
            out.push('"');
            out.push_str(m.as_str());
            out.push('"');
        }
        last_end = m.end();
    }
    out.push_str(&input[last_end..]);
    out
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
