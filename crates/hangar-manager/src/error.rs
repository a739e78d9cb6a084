// SPDX-License-Identifier: MIT

//! Manager-level errors (§4.J). Grounded on `crates/engine/src/error.rs`'s
//! `RuntimeError` enum shape (not-found variants per missing-entity kind,
//! plus a wraps-the-lower-error variant).

use thiserror::Error;

use hangar_core::RuntimeError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("no action registered with id {id:?}")]
    NotFound { id: String },

    #[error("no runtime could be bound for action {id:?}")]
    NoRuntime { id: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
