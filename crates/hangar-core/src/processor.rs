// SPDX-License-Identifier: MIT

//! Value processors: named, typed transformations applied to a parameter
//! value between defaulting and validation (§4.E, Glossary).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::action::Action;
use crate::error::ProcessorError;
use crate::param::{ParamType, Parameter};

/// Either a concrete set of applicable types, or "any" (§4.E).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    Any,
    Types(Vec<ParamType>),
}

impl Applicability {
    pub fn allows(&self, ty: ParamType) -> bool {
        match self {
            Applicability::Any => true,
            Applicability::Types(types) => types.contains(&ty),
        }
    }
}

/// A registered value processor. Dynamic dispatch, since the set of
/// processors is open (plugins may register more) — per §9's guidance to
/// use tagged variants only for the closed `Runtime` set.
pub trait ValueProcessor: Send + Sync {
    fn name(&self) -> &str;
    fn applicable_types(&self) -> Applicability;
    /// JSON-Schema-shaped description of this processor's accepted options.
    fn options_schema(&self) -> Value {
        Value::Object(Default::default())
    }
    fn validate_options(&self, options: &Value) -> Result<(), String> {
        let _ = options;
        Ok(())
    }
    /// Apply the processor to `value`. `is_changed` indicates whether the
    /// value was user-supplied (vs. defaulted).
    fn apply(
        &self,
        value: Value,
        is_changed: bool,
        param: &Parameter,
        action: &Action,
    ) -> Result<Value, String>;
}

/// Registry of processors by name, keyed behind a lock since registration
/// may occur after first use (§5: "registration after first use is
/// permitted but not synchronised beyond map-level locking").
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: RwLock<HashMap<String, Arc<dyn ValueProcessor>>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, processor: Arc<dyn ValueProcessor>) {
        self.processors
            .write()
            .insert(processor.name().to_string(), processor);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueProcessor>> {
        self.processors.read().get(name).cloned()
    }

    /// Resolve a parameter's declared processor chain against this
    /// registry, returning `not-exist`/`not-applicable`/`options-validation`
    /// errors as appropriate (§4.E).
    pub fn resolve_chain(
        &self,
        param: &Parameter,
    ) -> Result<Vec<Arc<dyn ValueProcessor>>, ProcessorError> {
        let mut chain = Vec::with_capacity(param.process.len());
        for entry in &param.process {
            let Some(processor) = self.get(&entry.processor) else {
                return Err(ProcessorError::NotExist {
                    name: entry.processor.clone(),
                });
            };
            if !processor.applicable_types().allows(param.resolved_type()) {
                return Err(ProcessorError::NotApplicable {
                    name: entry.processor.clone(),
                    param: param.name.clone(),
                });
            }
            processor
                .validate_options(&entry.options)
                .map_err(|cause| ProcessorError::OptionsValidation {
                    name: entry.processor.clone(),
                    param: param.name.clone(),
                    cause,
                })?;
            chain.push(processor);
        }
        Ok(chain)
    }

    /// Run a resolved chain over `value` in declaration order (§4.E: "On
    /// `Input.Set`... each parameter's chain runs in declaration order").
    pub fn apply_chain(
        &self,
        chain: &[Arc<dyn ValueProcessor>],
        mut value: Value,
        is_changed: bool,
        param: &Parameter,
        action: &Action,
    ) -> Result<Value, ProcessorError> {
        for processor in chain {
            value = processor
                .apply(value, is_changed, param, action)
                .map_err(|cause| ProcessorError::Handler {
                    processor: processor.name().to_string(),
                    param: param.name.clone(),
                    cause,
                })?;
        }
        Ok(value)
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
