// SPDX-License-Identifier: MIT

//! Ties the load pipeline (§4.D) to a bound `Action`: builds the
//! substitution maps and renders the runtime's command/script strings
//! through the template phase (§4.C) ahead of execution.

use std::collections::HashMap;
use std::path::PathBuf;

use hangar_core::{Action, RuntimeSpec, TemplateError};

use crate::pipeline::{full_pipeline, LoadContext, LoadError, LoadStage};

/// Build the `{{ .name }}` substitution map: parameter names (dashes
/// normalised to underscores) to their current string value, plus the
/// action's positional arguments and the `current_working_dir` built-in
/// (§4.C).
pub fn template_vars(action: &Action) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for (k, v) in action.input.args().iter().chain(action.input.opts().iter()) {
        let key = hangar_core::normalize_name(k);
        vars.insert(key, value_to_template_string(v));
    }
    for (idx, pos) in action.input.args_positional().iter().enumerate() {
        vars.insert(format!("arg{idx}"), pos.clone());
    }
    vars.insert(
        "current_working_dir".to_string(),
        action.working_dir().display().to_string(),
    );
    vars
}

fn value_to_template_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_to_template_string)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// Environment passed through to substitution: the process env plus any
/// `TEST_ENV_*` variables (§6 lists these as the explicit read set).
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Render every string in a container/shell command through the full
/// pipeline, aggregating undefined-variable errors across all strings
/// into one (§4.C: "a single aggregated error").
pub fn render_command(
    action: &Action,
    env: &HashMap<String, String>,
) -> Result<Vec<String>, TemplateError> {
    let vars = template_vars(action);
    let ctx = LoadContext::new(action, env.clone(), vars);
    let pipeline = full_pipeline();

    let raw_command: Vec<String> = match &action.definition.runtime {
        RuntimeSpec::Container(c) => c.command.as_vec(),
        RuntimeSpec::Shell(s) => vec![s.script.clone()],
        RuntimeSpec::Plugin => Vec::new(),
    };

    let mut rendered = Vec::with_capacity(raw_command.len());
    let mut undefined = Vec::new();
    for piece in &raw_command {
        match pipeline.apply(piece, &ctx) {
            Ok(out) => rendered.push(out),
            Err(crate::pipeline::LoadError::Template(TemplateError::UndefinedVariables { names })) => {
                undefined.extend(names);
            }
            Err(crate::pipeline::LoadError::Template(other)) => return Err(other),
        }
    }
    if !undefined.is_empty() {
        undefined.sort();
        undefined.dedup();
        return Err(TemplateError::UndefinedVariables { names: undefined });
    }
    Ok(rendered)
}

/// Resolves the optional `working_directory` path template (§6) through
/// the same comment/env/template pipeline a command goes through, relative
/// to the action's discovery directory. Falls back to `action.working_dir()`
/// unchanged when the action declares no override.
pub fn resolve_working_dir(action: &Action, env: &HashMap<String, String>) -> Result<PathBuf, TemplateError> {
    let Some(template) = action.definition.working_directory.as_deref() else {
        return Ok(action.working_dir());
    };
    let vars = template_vars(action);
    let ctx = LoadContext::new(action, env.clone(), vars);
    let rendered = match full_pipeline().apply(template, &ctx) {
        Ok(out) => out,
        Err(LoadError::Template(e)) => return Err(e),
    };
    let path = PathBuf::from(rendered);
    Ok(if path.is_absolute() { path } else { action.fsdir.join(path) })
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
