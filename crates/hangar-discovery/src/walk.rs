// SPDX-License-Identifier: MIT

//! Bounded-channel walker + parser-thread pool (§4.F/§5), grounded on the
//! teacher's `collect_runbook_files` stack-based directory walk
//! (`crates/runbook/src/find.rs`), generalized into a producer/consumer
//! pipeline since this spec calls out parallel parsing explicitly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use hangar_core::{Action, DefinitionError, IdError};
use thiserror::Error;

use crate::skip::should_skip_dir;
use crate::strategy::DiscoveryStrategy;

const CHANNEL_CAPACITY: usize = 64;
const PARSER_POOL_SIZE: usize = 4;
const LONG_WALK_WARN: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("action ids '{id}' collide between {first} and {second}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Id(#[from] IdError),
}

/// Cooperative cancellation handle shared between the caller and the
/// walker thread (§4.F: "context cancellation... return `fs.SkipAll`").
#[derive(Clone)]
pub struct Cancellation(Arc<AtomicBool>);

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Walk `root`, pushing every path the strategy accepts through a bounded
/// channel to a fixed parser-thread pool, then sort the resulting actions
/// by id (§4.F). The first fatal error encountered (by a parser or the
/// walker) short-circuits the result; duplicate ids are also fatal
/// (§ supplemented feature: stricter than the original's silent overwrite).
pub fn discover(
    root: &Path,
    strategy: &(dyn DiscoveryStrategy + Sync),
    cancel: &Cancellation,
) -> Result<Vec<Action>, DiscoveryError> {
    let started = Instant::now();
    let root_is_absolute = root.is_absolute();
    let (path_tx, path_rx) = bounded::<Result<PathBuf, DiscoveryError>>(CHANNEL_CAPACITY);
    let (result_tx, result_rx) = bounded::<Result<Action, DiscoveryError>>(CHANNEL_CAPACITY);

    let outcome = std::thread::scope(|scope| {
        let walk_cancel = cancel.clone();
        scope.spawn(move || {
            walk(root, root_is_absolute, strategy, &path_tx, &walk_cancel);
        });

        for _ in 0..PARSER_POOL_SIZE {
            let rx = path_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for item in rx {
                    let result = match item {
                        Ok(path) => parse_one(path, strategy),
                        Err(e) => Err(e),
                    };
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut actions = Vec::new();
        let mut by_id: HashMap<String, PathBuf> = HashMap::new();
        let mut first_err = None;
        for res in result_rx {
            match res {
                Ok(action) => {
                    if let Some(prev) = by_id.get(&action.id) {
                        if first_err.is_none() {
                            first_err = Some(DiscoveryError::DuplicateId {
                                id: action.id.clone(),
                                first: prev.clone(),
                                second: action.fpath.clone(),
                            });
                        }
                        continue;
                    }
                    by_id.insert(action.id.clone(), action.fpath.clone());
                    actions.push(action);
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => {
                actions.sort_by(|a, b| a.id.cmp(&b.id));
                Ok(actions)
            }
        }
    });

    let elapsed = started.elapsed();
    if elapsed >= LONG_WALK_WARN {
        tracing::warn!(?elapsed, path = %root.display(), "discovery walk exceeded 5s");
    }
    outcome
}

fn walk(
    root: &Path,
    root_is_absolute: bool,
    strategy: &(dyn DiscoveryStrategy + Sync),
    tx: &Sender<Result<PathBuf, DiscoveryError>>,
    cancel: &Cancellation,
) {
    let mut stack = vec![(root.to_path_buf(), 0usize)];
    while let Some((dir, depth)) = stack.pop() {
        if cancel.is_cancelled() {
            return;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                tracing::warn!(path = %dir.display(), "skipping unreadable directory");
                continue;
            }
            Err(e) => {
                let _ = tx.send(Err(DiscoveryError::Io { path: dir, source: e }));
                return;
            }
        };
        for entry in entries.flatten() {
            if cancel.is_cancelled() {
                return;
            }
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                let name = entry.file_name().to_string_lossy().into_owned();
                if should_skip_dir(&name, depth, root_is_absolute) {
                    continue;
                }
                stack.push((path, depth + 1));
            } else if strategy.is_valid(&path) && tx.send(Ok(path)).is_err() {
                return;
            }
        }
    }
}

fn parse_one(
    path: PathBuf,
    strategy: &(dyn DiscoveryStrategy + Sync),
) -> Result<Action, DiscoveryError> {
    let content = std::fs::read_to_string(&path).map_err(|e| DiscoveryError::Io {
        path: path.clone(),
        source: e,
    })?;
    let definition = hangar_loader::parse_definition(&content)?;
    let id = strategy.derive_id(&path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    Ok(Action::new(id, dir, path, definition))
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
