// SPDX-License-Identifier: MIT

//! `Input` — user/caller-supplied values for an action (§3, §4.E).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::coerce::{coerce_array_str, coerce_scalar_str, CoerceError};
use crate::definition::Definition;
use crate::param::{normalize_name, Parameter, ParamType};

/// Reserved key stripped from the named-args view before storage (§3).
pub const POSITIONAL_RESERVED_KEY: &str = "__positional_strings";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("accepts {declared} arg(s), received {received}")]
    TooManyPositional { declared: usize, received: usize },

    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

/// A set of streams an `Input` can carry (§3). The core treats these as
/// opaque capability flags; the concrete IO wiring is the caller's.
#[derive(Debug, Clone, Default)]
pub struct IoStreams {
    pub stdin_attached: bool,
    pub stdout_attached: bool,
    pub stderr_attached: bool,
    pub tty: bool,
}

#[derive(Debug, Clone)]
pub struct Input {
    definition: Arc<Definition>,
    /// As-provided values, before default injection (§8.3, §8.4).
    raw_args: HashMap<String, Value>,
    raw_opts: HashMap<String, Value>,
    /// With declared defaults applied.
    args: HashMap<String, Value>,
    opts: HashMap<String, Value>,
    positional: Vec<String>,
    changed: HashSet<String>,
    pub validated: bool,
    grouped_flags: HashMap<String, HashMap<String, Value>>,
    pub streams: IoStreams,
}

impl Input {
    pub fn empty(definition: Arc<Definition>) -> Self {
        let mut input = Self {
            definition,
            raw_args: HashMap::new(),
            raw_opts: HashMap::new(),
            args: HashMap::new(),
            opts: HashMap::new(),
            positional: Vec::new(),
            changed: HashSet::new(),
            validated: false,
            grouped_flags: HashMap::new(),
            streams: IoStreams::default(),
        };
        input.apply_defaults();
        input
    }

    /// `NewInput` (§4.E): takes raw named maps plus positional args, strips
    /// the reserved key, applies defaults, and stores both raw and
    /// defaulted views.
    pub fn new(
        definition: Arc<Definition>,
        mut args: HashMap<String, Value>,
        opts: HashMap<String, Value>,
        positional: Vec<String>,
    ) -> Result<Self, InputError> {
        let positional = if let Some(Value::Array(arr)) = args.remove(POSITIONAL_RESERVED_KEY) {
            arr.into_iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect()
        } else {
            positional
        };

        let mut input = Self {
            definition,
            raw_args: args,
            raw_opts: opts,
            args: HashMap::new(),
            opts: HashMap::new(),
            positional: Vec::new(),
            changed: HashSet::new(),
            validated: false,
            grouped_flags: HashMap::new(),
            streams: IoStreams::default(),
        };

        let named_from_positional = input.args_pos_to_named(&positional)?;
        for (k, v) in named_from_positional {
            input.raw_args.entry(k).or_insert(v);
        }
        input.positional = positional;
        input.apply_defaults();
        Ok(input)
    }

    fn apply_defaults(&mut self) {
        self.args.clear();
        self.opts.clear();
        for p in &self.definition.arguments {
            let v = self
                .raw_args
                .get(&p.name)
                .or_else(|| self.raw_args.get(&p.normalized_name()))
                .cloned()
                .or_else(|| p.default.clone());
            if let Some(v) = v {
                self.args.insert(p.name.clone(), v);
            }
        }
        for p in &self.definition.options {
            let v = self
                .raw_opts
                .get(&p.name)
                .or_else(|| self.raw_opts.get(&p.normalized_name()))
                .cloned()
                .or_else(|| p.default.clone());
            if let Some(v) = v {
                self.opts.insert(p.name.clone(), v);
            }
        }
    }

    /// `ArgsPosToNamed` (§4.E): maps a positional list to named entries
    /// using the argument definitions in order, coercing each string to
    /// the declared type (array arguments split on comma).
    pub fn args_pos_to_named(
        &self,
        positional: &[String],
    ) -> Result<HashMap<String, Value>, InputError> {
        let declared = &self.definition.arguments;
        if positional.len() > declared.len() {
            return Err(InputError::TooManyPositional {
                declared: declared.len(),
                received: positional.len(),
            });
        }
        let mut out = HashMap::new();
        for (param, raw) in declared.iter().zip(positional.iter()) {
            let value = match param.resolved_type() {
                ParamType::Array => {
                    let item_ty = param
                        .items
                        .as_ref()
                        .map(|i| i.param_type)
                        .unwrap_or(ParamType::String);
                    coerce_array_str(raw, item_ty)?
                }
                ty => coerce_scalar_str(raw, ty)?,
            };
            out.insert(param.name.clone(), value);
        }
        Ok(out)
    }

    pub fn set_arg(&mut self, key: &str, value: Value) {
        self.raw_args.insert(key.to_string(), value.clone());
        self.args.insert(normalize_for_lookup(&self.definition.arguments, key), value);
        self.changed.insert(normalize_name(key));
    }

    pub fn unset_arg(&mut self, key: &str) {
        let norm = normalize_name(key);
        if !self.changed.contains(&norm) {
            return; // no-op on an unset key (§8.3)
        }
        self.raw_args.remove(key);
        self.changed.remove(&norm);
        self.apply_defaults();
    }

    pub fn set_opt(&mut self, key: &str, value: Value) {
        self.raw_opts.insert(key.to_string(), value.clone());
        self.opts.insert(normalize_for_lookup(&self.definition.options, key), value);
        self.changed.insert(normalize_name(key));
    }

    pub fn unset_opt(&mut self, key: &str) {
        let norm = normalize_name(key);
        if !self.changed.contains(&norm) {
            return;
        }
        self.raw_opts.remove(key);
        self.changed.remove(&norm);
        self.apply_defaults();
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.changed.contains(&normalize_name(key))
    }

    pub fn args_changed(&self) -> Vec<String> {
        let mut v: Vec<_> = self.changed.iter().cloned().collect();
        v.sort();
        v
    }

    pub fn args(&self) -> &HashMap<String, Value> {
        &self.args
    }

    pub fn opts(&self) -> &HashMap<String, Value> {
        &self.opts
    }

    pub fn args_positional(&self) -> &[String] {
        &self.positional
    }

    /// Overwrites a defaulted value with the result of running its
    /// processor chain, without touching the raw/changed bookkeeping
    /// (§4.E: processors run between defaulting and validation).
    pub fn set_processed_arg(&mut self, key: &str, value: Value) {
        self.args.insert(key.to_string(), value);
    }

    pub fn set_processed_opt(&mut self, key: &str, value: Value) {
        self.opts.insert(key.to_string(), value);
    }

    pub fn group_flags(&self, group: &str) -> Option<&HashMap<String, Value>> {
        self.grouped_flags.get(group)
    }

    pub fn set_group_flags(&mut self, group: &str, flags: HashMap<String, Value>) {
        self.grouped_flags.insert(group.to_string(), flags);
    }
}

fn normalize_for_lookup(params: &[Parameter], key: &str) -> String {
    params
        .iter()
        .find(|p| p.name == key || p.normalized_name() == normalize_name(key))
        .map(|p| p.name.clone())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
