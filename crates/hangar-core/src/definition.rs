// SPDX-License-Identifier: MIT

//! `Definition` — the parsed action file (§3, §6).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::param::{is_valid_name, Parameter};

fn default_version() -> String {
    "1".to_string()
}

/// Command accepts either a single string or a sequence of strings (§4.C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Single(String),
    Multiple(Vec<String>),
}

impl CommandSpec {
    pub fn is_empty(&self) -> bool {
        match self {
            CommandSpec::Single(s) => s.trim().is_empty(),
            CommandSpec::Multiple(v) => v.is_empty(),
        }
    }

    /// A single-string command is kept as one element (e.g. a shell
    /// one-liner), not split on whitespace — splitting would corrupt any
    /// quoted argument and isn't implied by §4.C.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            CommandSpec::Single(s) => vec![s],
            CommandSpec::Multiple(v) => v,
        }
    }

    pub fn as_vec(&self) -> Vec<String> {
        self.clone().into_vec()
    }
}

/// Env accepts either `KEY=VALUE` strings or a mapping; normalised to the
/// string form (§4.C).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum EnvSpec {
    #[default]
    Empty,
    List(Vec<String>),
    Map(HashMap<String, String>),
}

impl EnvSpec {
    pub fn normalized(&self) -> Vec<String> {
        match self {
            EnvSpec::Empty => Vec::new(),
            EnvSpec::List(v) => v.clone(),
            EnvSpec::Map(m) => {
                let mut out: Vec<String> = m.iter().map(|(k, v)| format!("{k}={v}")).collect();
                out.sort();
                out
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildSpec {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    pub command: CommandSpec,
    #[serde(default)]
    pub build: Option<BuildSpec>,
    #[serde(default)]
    pub extra_hosts: Vec<String>,
    #[serde(default)]
    pub env: EnvSpec,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSpec {
    pub script: String,
    #[serde(default)]
    pub env: EnvSpec,
}

/// The `runtime` discriminated union (§3): `plugin` (may be a bare scalar
/// string in raw YAML), `container`, or the implicit `shell` variant.
///
/// Deserialize is hand-written rather than derived, the same way the
/// teacher's `ArgSpec` (in `command.rs`) accepts either a bare string or a
/// struct mapping: the derived internally-tagged form alone can't also
/// accept the `"plugin"` scalar.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuntimeSpec {
    Plugin,
    Container(ContainerSpec),
    Shell(ShellSpec),
}

impl<'de> Deserialize<'de> for RuntimeSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        RuntimeSpec::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl RuntimeSpec {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, crate::error::DefinitionError> {
        use crate::error::{DefinitionError, SourceLoc};

        if let Some(s) = value.as_str() {
            return if s == "plugin" {
                Ok(RuntimeSpec::Plugin)
            } else {
                Err(DefinitionError::InvalidRuntime {
                    loc: SourceLoc::default(),
                })
            };
        }

        let Some(obj) = value.as_object() else {
            return Err(DefinitionError::InvalidRuntime {
                loc: SourceLoc::default(),
            });
        };
        match obj.get("type").and_then(|t| t.as_str()) {
            Some("plugin") => Ok(RuntimeSpec::Plugin),
            Some("container") => serde_json::from_value(value.clone())
                .map(RuntimeSpec::Container)
                .map_err(|_| DefinitionError::InvalidRuntime {
                    loc: SourceLoc::default(),
                }),
            Some("shell") => serde_json::from_value(value.clone())
                .map(RuntimeSpec::Shell)
                .map_err(|_| DefinitionError::InvalidRuntime {
                    loc: SourceLoc::default(),
                }),
            _ => Err(DefinitionError::InvalidRuntime {
                loc: SourceLoc::default(),
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeSpec::Plugin => "plugin",
            RuntimeSpec::Container(_) => "container",
            RuntimeSpec::Shell(_) => "shell",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "alias")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Parameter>,
    #[serde(default)]
    pub options: Vec<Parameter>,
    pub runtime: RuntimeSpec,
    #[serde(default)]
    pub working_directory: Option<String>,
}

impl Definition {
    /// Argument and option names share one namespace and must be unique
    /// within an action, with `-`/`_` considered equivalent (§3).
    pub fn validate_unique_names(&self) -> Result<(), crate::error::DefinitionError> {
        use crate::error::{DefinitionError, SourceLoc};
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for p in self.arguments.iter().chain(self.options.iter()) {
            if p.name.is_empty() {
                return Err(DefinitionError::EmptyName {
                    loc: SourceLoc::default(),
                });
            }
            if !is_valid_name(&p.name) {
                return Err(DefinitionError::InvalidName {
                    name: p.name.clone(),
                    loc: SourceLoc::default(),
                });
            }
            let norm = p.normalized_name();
            if !seen.insert(norm) {
                return Err(DefinitionError::DuplicateName {
                    name: p.name.clone(),
                    loc: SourceLoc::default(),
                });
            }
        }
        Ok(())
    }

    /// A container runtime must have a non-empty image and non-empty
    /// command (§3 invariant).
    pub fn validate_runtime(&self) -> Result<(), crate::error::DefinitionError> {
        use crate::error::{DefinitionError, SourceLoc};
        if let RuntimeSpec::Container(c) = &self.runtime {
            if c.image.trim().is_empty() {
                return Err(DefinitionError::MissingField {
                    field: "image".to_string(),
                    loc: SourceLoc::default(),
                });
            }
            if c.command.is_empty() {
                return Err(DefinitionError::MissingField {
                    field: "command".to_string(),
                    loc: SourceLoc::default(),
                });
            }
        }
        if self.version != "1" {
            return Err(DefinitionError::UnsupportedVersion {
                version: self.version.clone(),
                loc: SourceLoc::default(),
            });
        }
        Ok(())
    }

    pub fn all_params(&self) -> impl Iterator<Item = &Parameter> {
        self.arguments.iter().chain(self.options.iter())
    }

    /// Render the one-line usage string, e.g. `<arg> [--opt <val>]`
    /// (supplemented feature, grounded on the teacher's `ArgSpec::usage_line`).
    pub fn usage_line(&self) -> String {
        let mut parts = Vec::new();
        for a in &self.arguments {
            if a.required {
                parts.push(format!("<{}>", a.name));
            } else {
                parts.push(format!("[{}]", a.name));
            }
        }
        for o in &self.options {
            if o.resolved_type() == crate::param::ParamType::Boolean {
                parts.push(format!("[--{}]", o.name));
            } else {
                parts.push(format!("[--{} <val>]", o.name));
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
