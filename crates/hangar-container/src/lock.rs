// SPDX-License-Identifier: MIT

//! Advisory file locking (§4.A), grounded on the teacher's daemon pidfile
//! lock (`crates/daemon/src/lifecycle/mod.rs`'s `fs2::FileExt::
//! try_lock_exclusive` over a `std::fs::OpenOptions` handle).

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use hangar_core::LockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Blocking,
    NonBlocking,
}

/// Owns an OS file handle and its exclusive advisory lock between `open`
/// and `close` (§3 Ownership: "locked files own their OS handle").
pub struct LockedFile {
    file: Option<File>,
    path: PathBuf,
    locked: bool,
}

impl LockedFile {
    /// Opens `path` (creating the parent directory and the file itself
    /// when `create` is set) and acquires an exclusive lock in the given
    /// mode (§4.A).
    pub fn open(path: impl Into<PathBuf>, create: bool, mode: LockMode) -> Result<Self, LockError> {
        let path = path.into();
        if create {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| LockError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        if create {
            options.create(true);
        }
        let file = options.open(&path).map_err(|source| LockError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut locked_file = Self {
            file: Some(file),
            path,
            locked: false,
        };
        locked_file.lock(mode)?;
        Ok(locked_file)
    }

    /// A second `lock` call on an already-locked handle is a programming
    /// error (§4.A).
    pub fn lock(&mut self, mode: LockMode) -> Result<(), LockError> {
        if self.locked {
            panic!(
                "LockedFile::lock called on an already-locked handle at {}",
                self.path.display()
            );
        }
        let file = self
            .file
            .as_ref()
            .unwrap_or_else(|| panic!("LockedFile handle already closed at {}", self.path.display()));
        let result = match mode {
            LockMode::Blocking => file.lock_exclusive(),
            LockMode::NonBlocking => file.try_lock_exclusive(),
        };
        result.map_err(|source| {
            if source.kind() == io::ErrorKind::WouldBlock {
                LockError::WouldBlock {
                    path: self.path.display().to_string(),
                }
            } else {
                LockError::Io {
                    path: self.path.display().to_string(),
                    source,
                }
            }
        })?;
        self.locked = true;
        Ok(())
    }

    pub fn file(&self) -> &File {
        self.file
            .as_ref()
            .unwrap_or_else(|| panic!("LockedFile handle already closed at {}", self.path.display()))
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.file
            .as_mut()
            .unwrap_or_else(|| panic!("LockedFile handle already closed at {}", self.path.display()))
    }

    /// Releases the lock and closes the descriptor. Unlocking an unheld
    /// lock is silent (warn-level log only, §4.A).
    pub fn close(mut self) -> Result<(), LockError> {
        self.close_inner()
    }

    fn close_inner(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            if self.locked {
                if let Err(e) = FileExt::unlock(&file) {
                    tracing::warn!(path = %self.path.display(), error = %e, "unlock on an unheld lock");
                }
                self.locked = false;
            }
        }
        Ok(())
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        let _ = self.close_inner();
    }
}

/// Deletes `path`; "not present" is success (§4.A).
pub fn remove(path: &Path) -> Result<(), LockError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LockError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
