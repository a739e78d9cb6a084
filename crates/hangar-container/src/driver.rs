// SPDX-License-Identifier: MIT

//! The container driver boundary (§6): "operations consumed by the
//! container runtime ... pluggable; the core holds no networking code
//! itself." No teacher file implements a container engine, so this is
//! enriched from `examples/containers-containrs`'s adapter-trait shape
//! (the only pack repo that is itself a container runtime library).

use std::path::Path;

use async_trait::async_trait;

use hangar_core::{BuildSpec, RuntimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverInfo {
    /// Forces bind-less (volume) mount semantics and skips local-only
    /// capability checks (§4.H Init).
    pub remote: bool,
}

#[derive(Debug, Clone)]
pub enum MountSource {
    Bind(std::path::PathBuf),
    Volume(String),
}

#[derive(Debug, Clone)]
pub struct Mount {
    pub source: MountSource,
    pub target: String,
    /// SELinux `:z` relabel flag (§4.H, §9: opt-out-able).
    pub selinux_label: bool,
}

#[derive(Debug, Clone)]
pub struct ContainerSpec<'a> {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub entrypoint: Option<&'a str>,
    pub env: Vec<String>,
    pub mounts: Vec<Mount>,
    pub working_dir: &'static str,
    pub tty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEnsureState {
    Exists,
    Pull,
    Build,
}

/// The pluggable backend the container runtime drives (§6). Open set —
/// dynamic dispatch, matching spec.md §9's guidance for drivers.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn info(&self) -> Result<DriverInfo, RuntimeError>;

    /// Lists existing container names matching `name_filter` exactly
    /// (§4.H name-collision check).
    async fn container_list(&self, name_filter: &str) -> Result<Vec<String>, RuntimeError>;

    async fn container_create(&self, spec: &ContainerSpec<'_>) -> Result<String, RuntimeError>;

    async fn container_start(&self, id: &str) -> Result<(), RuntimeError>;

    async fn container_kill(&self, id: &str, signal: i32) -> Result<(), RuntimeError>;

    /// Blocks until the container exits and returns its status code.
    async fn container_wait(&self, id: &str) -> Result<i32, RuntimeError>;

    async fn container_remove(&self, id: &str) -> Result<(), RuntimeError>;

    async fn container_stat_path(&self, id: &str, path: &str) -> Result<bool, RuntimeError>;

    async fn copy_to_container(&self, id: &str, src: &Path, dest: &str) -> Result<(), RuntimeError>;

    async fn copy_from_container(&self, id: &str, src: &str, dest: &Path) -> Result<(), RuntimeError>;

    /// Resolves `image` against the build-info chain, rebuilding when
    /// `force_rebuild` is set (§4.H Image ensure).
    async fn image_ensure(
        &self,
        image: &str,
        build: Option<&BuildSpec>,
        force_rebuild: bool,
    ) -> Result<ImageEnsureState, RuntimeError>;

    async fn image_remove(&self, image: &str) -> Result<(), RuntimeError>;

    async fn is_selinux_supported(&self) -> Result<bool, RuntimeError>;
}

/// A scriptable fake `Driver`, used by this crate's own runtime tests and
/// available to downstream crates that need to exercise
/// `ContainerRuntime` without a real engine.
pub struct NullDriver {
    state: std::sync::Mutex<NullDriverState>,
}

#[derive(Default)]
struct NullDriverState {
    info: DriverInfo,
    existing_names: Vec<String>,
    force_collision: bool,
    created_ids: Vec<String>,
    created_commands: Vec<Vec<String>>,
    created_entrypoints: Vec<Option<String>>,
    next_container_id: String,
    wait_exit_code: i32,
    image_ensure_state: Option<ImageEnsureState>,
    image_ensure_force_rebuild_calls: Vec<bool>,
    selinux_supported: bool,
    removed_containers: Vec<String>,
    removed_images: Vec<String>,
}

impl Default for NullDriver {
    fn default() -> Self {
        Self {
            state: std::sync::Mutex::new(NullDriverState {
                next_container_id: "cid".to_string(),
                image_ensure_state: Some(ImageEnsureState::Exists),
                ..Default::default()
            }),
        }
    }
}

impl NullDriver {
    pub fn with_remote(remote: bool) -> Self {
        let driver = Self::default();
        driver.state.lock().unwrap().info.remote = remote;
        driver
    }

    pub fn set_existing_names(&self, names: Vec<String>) {
        self.state.lock().unwrap().existing_names = names;
    }

    pub fn set_force_collision(&self, force: bool) {
        self.state.lock().unwrap().force_collision = force;
    }

    pub fn set_wait_exit_code(&self, code: i32) {
        self.state.lock().unwrap().wait_exit_code = code;
    }

    pub fn set_image_ensure_state(&self, state: ImageEnsureState) {
        self.state.lock().unwrap().image_ensure_state = Some(state);
    }

    pub fn removed_containers(&self) -> Vec<String> {
        self.state.lock().unwrap().removed_containers.clone()
    }

    pub fn removed_images(&self) -> Vec<String> {
        self.state.lock().unwrap().removed_images.clone()
    }

    pub fn created_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().created_ids.clone()
    }

    pub fn created_commands(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().created_commands.clone()
    }

    pub fn created_entrypoints(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().created_entrypoints.clone()
    }

    pub fn image_ensure_force_rebuild_calls(&self) -> Vec<bool> {
        self.state.lock().unwrap().image_ensure_force_rebuild_calls.clone()
    }
}

#[async_trait]
impl Driver for NullDriver {
    async fn info(&self) -> Result<DriverInfo, RuntimeError> {
        Ok(self.state.lock().unwrap().info)
    }

    async fn container_list(&self, name_filter: &str) -> Result<Vec<String>, RuntimeError> {
        let state = self.state.lock().unwrap();
        if state.force_collision {
            return Ok(vec![name_filter.to_string()]);
        }
        Ok(state
            .existing_names
            .iter()
            .filter(|n| n.as_str() == name_filter)
            .cloned()
            .collect())
    }

    async fn container_create(&self, spec: &ContainerSpec<'_>) -> Result<String, RuntimeError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_container_id.clone();
        state.created_ids.push(id.clone());
        state.created_commands.push(spec.command.clone());
        state.created_entrypoints.push(spec.entrypoint.map(str::to_string));
        Ok(id)
    }

    async fn container_start(&self, _id: &str) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn container_kill(&self, _id: &str, _signal: i32) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn container_wait(&self, _id: &str) -> Result<i32, RuntimeError> {
        Ok(self.state.lock().unwrap().wait_exit_code)
    }

    async fn container_remove(&self, id: &str) -> Result<(), RuntimeError> {
        self.state.lock().unwrap().removed_containers.push(id.to_string());
        Ok(())
    }

    async fn container_stat_path(&self, _id: &str, _path: &str) -> Result<bool, RuntimeError> {
        Ok(true)
    }

    async fn copy_to_container(&self, _id: &str, _src: &Path, _dest: &str) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn copy_from_container(&self, _id: &str, _src: &str, _dest: &Path) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn image_ensure(
        &self,
        _image: &str,
        _build: Option<&BuildSpec>,
        force_rebuild: bool,
    ) -> Result<ImageEnsureState, RuntimeError> {
        let mut state = self.state.lock().unwrap();
        state.image_ensure_force_rebuild_calls.push(force_rebuild);
        Ok(state.image_ensure_state.unwrap_or(ImageEnsureState::Exists))
    }

    async fn image_remove(&self, image: &str) -> Result<(), RuntimeError> {
        self.state.lock().unwrap().removed_images.push(image.to_string());
        Ok(())
    }

    async fn is_selinux_supported(&self) -> Result<bool, RuntimeError> {
        Ok(self.state.lock().unwrap().selinux_supported)
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
