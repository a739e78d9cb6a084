// SPDX-License-Identifier: MIT

//! Build cache (§4.B): a persisted `tag -> content-hash` map used to skip
//! image rebuilds when a build context hasn't changed, plus `DirHash`, the
//! content hash of a directory tree.
//!
//! Grounded on `crates/engine/src/runtime/handlers/command.rs`'s
//! `Sha256::digest` content-addressing and, for the locking/rewrite
//! idiom, on [`crate::lock`] (itself grounded on the daemon's pidfile
//! lock).

use std::collections::HashMap;
use std::io::{Seek, SeekFrom, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use hangar_core::BuildCacheError;

use crate::lock::{LockMode, LockedFile};

const DIR_HASH_VERSION: &str = "hangar-dirhash-v1";

/// A persisted `tag -> sum` map with staged, in-memory mutations that
/// only reach disk on `save` (§4.B).
pub struct BuildCache {
    path: PathBuf,
    loaded: bool,
    entries: HashMap<String, String>,
    mutations: HashMap<String, Option<String>>,
    dirty: bool,
}

impl BuildCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: false,
            entries: HashMap::new(),
            mutations: HashMap::new(),
            dirty: false,
        }
    }

    /// Reads and parses the persisted sum file. A no-op once already
    /// loaded. Every other method on this type requires a prior call to
    /// this one (§4.B: "subsequent reads/writes require prior load,
    /// otherwise programming error").
    pub fn ensure_loaded(&mut self) -> Result<(), BuildCacheError> {
        if self.loaded {
            return Ok(());
        }
        self.entries = Self::read_sum_file(&self.path)?;
        self.loaded = true;
        Ok(())
    }

    fn require_loaded(&self) {
        if !self.loaded {
            panic!("BuildCache used before ensure_loaded at {}", self.path.display());
        }
    }

    fn read_sum_file(path: &Path) -> Result<HashMap<String, String>, BuildCacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(BuildCacheError::Io(e)),
        };
        let mut entries = HashMap::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.splitn(2, ' ').collect();
            if fields.len() != 2 {
                return Err(BuildCacheError::MalformedLine {
                    path: path.display().to_string(),
                    line: line.to_string(),
                });
            }
            entries.insert(fields[0].to_string(), fields[1].to_string());
        }
        Ok(entries)
    }

    /// Returns the stored hash for `tag`, or an empty string (§4.B).
    pub fn get_sum(&self, tag: &str) -> String {
        self.require_loaded();
        match self.mutations.get(tag) {
            Some(Some(sum)) => sum.clone(),
            Some(None) => String::new(),
            None => self.entries.get(tag).cloned().unwrap_or_default(),
        }
    }

    /// Stages a mutation; an empty `sum` schedules a deletion (§4.B).
    pub fn set_sum(&mut self, tag: &str, sum: &str) {
        self.require_loaded();
        if sum.is_empty() {
            self.mutations.insert(tag.to_string(), None);
        } else {
            self.mutations.insert(tag.to_string(), Some(sum.to_string()));
        }
        self.dirty = true;
    }

    /// No-op when nothing changed since load; otherwise re-opens under an
    /// exclusive lock, re-reads whatever is currently on disk, merges the
    /// staged mutations over it (tombstones win as deletions), and
    /// rewrites the file truncated from zero with keys sorted (§4.B).
    pub fn save(&mut self) -> Result<(), BuildCacheError> {
        self.require_loaded();
        if !self.dirty {
            return Ok(());
        }

        let mut lock = LockedFile::open(&self.path, true, LockMode::Blocking)?;
        let mut merged = Self::read_sum_file(&self.path)?;
        for (tag, value) in &self.mutations {
            match value {
                Some(sum) => {
                    merged.insert(tag.clone(), sum.clone());
                }
                None => {
                    merged.remove(tag);
                }
            }
        }

        let mut keys: Vec<&String> = merged.keys().collect();
        keys.sort();
        let mut out = String::new();
        for key in keys {
            out.push_str(key);
            out.push(' ');
            out.push_str(&merged[key]);
            out.push('\n');
        }

        let file = lock.file_mut();
        file.set_len(0).map_err(BuildCacheError::Io)?;
        file.seek(SeekFrom::Start(0)).map_err(BuildCacheError::Io)?;
        file.write_all(out.as_bytes()).map_err(BuildCacheError::Io)?;
        lock.close()?;

        self.entries = merged;
        self.mutations.clear();
        self.dirty = false;
        Ok(())
    }
}

/// Hashes a directory tree: per-file `sha256(size\0relpath\0mode\0content)`
/// records (mode included so a permission-only change still produces a
/// different hash, per the §4.B invariant), concatenated in sorted-relpath
/// order and re-hashed under a version tag.
pub fn dir_hash(root: &Path) -> Result<String, BuildCacheError> {
    let mut records: Vec<(String, [u8; 32])> = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) => return Err(BuildCacheError::Io(e)),
        };
        for entry in read_dir {
            let entry = entry.map_err(BuildCacheError::Io)?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(BuildCacheError::Io)?;
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            let metadata = entry.metadata().map_err(BuildCacheError::Io)?;
            let content = std::fs::read(&path).map_err(BuildCacheError::Io)?;
            let relpath = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let mode = metadata.permissions().mode() & 0o777;

            let mut hasher = Sha256::new();
            hasher.update(metadata.len().to_le_bytes());
            hasher.update(b"\0");
            hasher.update(relpath.as_bytes());
            hasher.update(b"\0");
            hasher.update(mode.to_le_bytes());
            hasher.update(b"\0");
            hasher.update(&content);
            records.push((relpath, hasher.finalize().into()));
        }
    }

    records.sort_by(|a, b| a.0.cmp(&b.0));
    let mut final_hasher = Sha256::new();
    final_hasher.update(DIR_HASH_VERSION.as_bytes());
    for (_, record) in &records {
        final_hasher.update(record);
    }
    Ok(format!("{:x}", final_hasher.finalize()))
}

#[cfg(test)]
#[path = "build_cache_tests.rs"]
mod tests;
