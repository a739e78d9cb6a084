// SPDX-License-Identifier: MIT

//! Typed model for the container-backed action engine (§3): `Action`,
//! `Definition`, `Parameter`, `Input`, the hand-rolled schema validator,
//! value processors, and run bookkeeping.

mod action;
mod coerce;
mod definition;
mod error;
mod id;
mod input;
mod param;
mod processor;
mod run_info;
mod schema;

pub use action::{Action, BoundRuntimeMarker};
pub use coerce::{coerce_array_str, coerce_scalar_str, coerce_value, CoerceError};
pub use definition::{BuildSpec, CommandSpec, ContainerSpec, Definition, EnvSpec, RuntimeSpec, ShellSpec};
pub use error::{
    BuildCacheError, DefinitionError, LockError, ProcessorError, RuntimeError, SourceLoc,
    TemplateError, ValidationError, ValidationIssue, YamlError,
};
pub use id::{derive_id, IdError};
pub use input::{Input, InputError, IoStreams, POSITIONAL_RESERVED_KEY};
pub use param::{is_valid_name, normalize_name, ItemsSpec, ParamType, Parameter, ProcessorRef};
pub use processor::{Applicability, ProcessorRegistry, ValueProcessor};
pub use run_info::{RunInfo, RunStatus};
pub use schema::{definition_schema, section_schema, validate, validate_section};
