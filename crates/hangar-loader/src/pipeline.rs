// SPDX-License-Identifier: MIT

//! Load pipeline (§4.D): composable stages sharing a `LoadContext`,
//! grounded on the teacher's `crates/runbook/src/parser.rs`
//! `parse_runbook_inner` numbered-step pipeline, restructured here as
//! first-class composable stages (`NewPipeProcessor` equivalent) rather
//! than inline numbered steps, since the spec calls that composition out
//! as a named contract (§4.D).

use std::collections::HashMap;

use hangar_core::{Action, TemplateError};
use thiserror::Error;

use crate::{comment, envsubst, template};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Carries the action reference and both substitution maps through the
/// pipeline (§4.D: "carries the action reference and is passed to each
/// stage").
pub struct LoadContext<'a> {
    pub action: &'a Action,
    pub env: HashMap<String, String>,
    pub template_vars: HashMap<String, String>,
}

impl<'a> LoadContext<'a> {
    pub fn new(action: &'a Action, env: HashMap<String, String>, template_vars: HashMap<String, String>) -> Self {
        Self {
            action,
            env,
            template_vars,
        }
    }
}

pub trait LoadStage {
    fn apply(&self, input: &str, ctx: &LoadContext) -> Result<String, LoadError>;
}

/// Stage 1: strip `#`-to-EOL comments outside quoted spans. Pure — does
/// not consult the context (§4.D: "the env processor is pure").
pub struct CommentStage;

impl LoadStage for CommentStage {
    fn apply(&self, input: &str, _ctx: &LoadContext) -> Result<String, LoadError> {
        Ok(comment::strip_comments(input))
    }
}

/// Stage 2: `$VAR`/`${VAR}`/`${VAR-default}` environment substitution.
pub struct EnvStage;

impl LoadStage for EnvStage {
    fn apply(&self, input: &str, ctx: &LoadContext) -> Result<String, LoadError> {
        Ok(envsubst::substitute(input, &ctx.env))
    }
}

/// Stage 3: `{{ .name }}` input substitution — consults the action's
/// current input after default injection (§4.D).
pub struct TemplateStage;

impl LoadStage for TemplateStage {
    fn apply(&self, input: &str, ctx: &LoadContext) -> Result<String, LoadError> {
        template::interpolate(input, &ctx.template_vars).map_err(LoadError::from)
    }
}

/// `NewPipeProcessor(p1, p2, …)`: runs stages in order, threading the
/// output of each into the next.
pub struct PipeStage {
    stages: Vec<Box<dyn LoadStage>>,
}

impl PipeStage {
    pub fn new(stages: Vec<Box<dyn LoadStage>>) -> Self {
        Self { stages }
    }
}

impl LoadStage for PipeStage {
    fn apply(&self, input: &str, ctx: &LoadContext) -> Result<String, LoadError> {
        let mut current = input.to_string();
        for stage in &self.stages {
            current = stage.apply(&current, ctx)?;
        }
        Ok(current)
    }
}

/// The template phase's full ordered pipeline (§4.C): comment-escape,
/// env-substitution, input-substitution.
pub fn full_pipeline() -> PipeStage {
    PipeStage::new(vec![
        Box::new(CommentStage),
        Box::new(EnvStage),
        Box::new(TemplateStage),
    ])
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
