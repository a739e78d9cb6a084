// SPDX-License-Identifier: MIT

//! Error taxonomy (§7). One enum per failing operation, never a single
//! monolithic error type — following the teacher's `ParseError`/
//! `ArgSpecError` split.

use thiserror::Error;

/// A source location carried on definition errors (§4.C: "errors carry
/// source line/column").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("unsupported version {version:?} at {loc}")]
    UnsupportedVersion { version: String, loc: SourceLoc },

    #[error("parameter name is empty at {loc}")]
    EmptyName { loc: SourceLoc },

    #[error("invalid parameter name {name:?} at {loc}")]
    InvalidName { name: String, loc: SourceLoc },

    #[error("duplicate name {name:?} at {loc}")]
    DuplicateName { name: String, loc: SourceLoc },

    #[error("missing required field {field:?} at {loc}")]
    MissingField { field: String, loc: SourceLoc },

    #[error("type mismatch for {field:?}: got {got}, want {want} at {loc}")]
    TypeMismatch {
        field: String,
        got: String,
        want: String,
        loc: SourceLoc,
    },

    #[error("structural mismatch for {field:?}: {message} at {loc}")]
    StructuralMismatch {
        field: String,
        message: String,
        loc: SourceLoc,
    },

    #[error("runtime section is missing or unrecognised at {loc}")]
    InvalidRuntime { loc: SourceLoc },

    #[error("yaml parse error: {0}")]
    Yaml(#[from] YamlError),
}

/// Wraps the underlying YAML/JSON decode error message without exposing
/// the `serde_yaml`/`serde_json` error types directly in the public error
/// surface of this crate.
#[derive(Debug)]
pub struct YamlError(pub String);

impl std::fmt::Display for YamlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for YamlError {}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("undefined variable(s): {}", .names.join(", "))]
    UndefinedVariables { names: Vec<String> },

    #[error("malformed environment variable reference: {0}")]
    MalformedEnvRef(String),
}

/// One JSON-pointer-tagged validation failure (§4.E).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// e.g. `["arguments", "arg_name"]` or `["options", "opt_name", "0"]`.
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl IntoIterator<Item = impl Into<String>>, message: impl Into<String>) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn pointer(&self) -> String {
        format!("[{}]", self.path.join(", "))
    }
}

#[derive(Debug, Error)]
#[error("schema validation failed: {}", .issues.iter().map(|i| format!("{}: {}", i.pointer(), i.message)).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("processor {name:?} does not exist")]
    NotExist { name: String },

    #[error("processor {name:?} is not applicable to parameter {param:?}")]
    NotApplicable { name: String, param: String },

    #[error("processor {name:?} options invalid for parameter {param:?}: {cause}")]
    OptionsValidation {
        name: String,
        param: String,
        cause: String,
    },

    #[error("processor {processor:?} failed on parameter {param:?}: {cause}")]
    Handler {
        processor: String,
        param: String,
        cause: String,
    },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("container name {name:?} already in use, try again")]
    NameInUse { name: String },

    #[error("action {action_id} exited with code {code}")]
    ExitCode { action_id: String, code: i32 },

    #[error("wait channel failed for action {action_id}: {message}")]
    WaitFailed { action_id: String, message: String },

    #[error("driver error: {0}")]
    Driver(String),

    #[error("image ensure failed for tag {tag:?}: {message}")]
    ImageEnsure { tag: String, message: String },

    #[error("image remove failed for tag {tag:?}: {message}")]
    ImageRemove { tag: String, message: String },

    #[error("no runtime bound for action {action_id}")]
    Unbound { action_id: String },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("io error acquiring lock at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lock at {path} is held by another process")]
    WouldBlock { path: String },
}

#[derive(Debug, Error)]
pub enum BuildCacheError {
    #[error("sum file {path} has a malformed line: {line:?}")]
    MalformedLine { path: String, line: String },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
