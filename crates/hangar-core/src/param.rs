// SPDX-License-Identifier: MIT

//! `Parameter` — the shared argument/option descriptor (§3).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*$").expect("static regex"));

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Names are considered equal for uniqueness purposes when `-` and `_`
/// are normalised to the same character (§3 Definition invariant).
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
        }
    }
}

impl Default for ParamType {
    fn default() -> Self {
        ParamType::String
    }
}

/// A single `{processor, options?}` reference in a parameter's `process` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorRef {
    pub processor: String,
    #[serde(default)]
    pub options: Value,
}

/// An argument or option descriptor (§3 Parameter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub param_type: Option<ParamType>,
    /// Sub-type for `array` parameters; `None` defaults to `string` at parse time.
    #[serde(default)]
    pub items: Option<Box<ItemsSpec>>,
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub shorthand: Option<char>,
    #[serde(default)]
    pub process: Vec<ProcessorRef>,
    /// The raw YAML mapping this parameter was parsed from, retained so the
    /// full set of JSON-Schema features can be re-emitted (§3).
    #[serde(default)]
    pub raw: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsSpec {
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

impl Parameter {
    pub fn title_or_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn resolved_type(&self) -> ParamType {
        self.param_type.unwrap_or(ParamType::String)
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

#[cfg(test)]
#[path = "param_tests.rs"]
mod tests;
