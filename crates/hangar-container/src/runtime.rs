// SPDX-License-Identifier: MIT

//! `ContainerRuntime` (§4.H): the container-backed `Runtime` implementation
//! — name generation, image-ensure via the build cache, bind/volume mount
//! policy, create/start/wait/remove lifecycle, remote copy-in/copy-out,
//! and signal forwarding.
//!
//! Enriched from `examples/containers-containrs` (the only pack repo that
//! is itself a container runtime) for the lifecycle shape, and from the
//! teacher's `tokio`/`tracing` idioms for the async plumbing.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use hangar_core::{
    Action, BuildSpec, ContainerSpec as ActionContainerSpec, Input, RuntimeError, RuntimeSpec, ValidationError,
};
use hangar_runtime::{ExecOutcome, Runtime, RuntimeFlags};

use crate::build_cache::{dir_hash, BuildCache};
use crate::driver::{ContainerSpec as DriverContainerSpec, Driver, DriverInfo, Mount, MountSource};

const SIGINT: i32 = 2;
const SIGTERM: i32 = 15;

/// The "runtime" flag group (§4.H).
#[derive(Debug, Clone)]
pub struct ContainerRuntimeFlags {
    pub remote_runtime: bool,
    pub remote_copy_back: bool,
    pub remove_image: bool,
    pub no_cache: bool,
    pub rebuild_image: bool,
    pub entrypoint: Option<String>,
    pub exec: bool,
}

impl Default for ContainerRuntimeFlags {
    fn default() -> Self {
        Self {
            remote_runtime: false,
            remote_copy_back: false,
            remove_image: false,
            no_cache: false,
            rebuild_image: true,
            entrypoint: None,
            exec: false,
        }
    }
}

type BuildResolver = Arc<dyn Fn(&Action) -> Option<BuildSpec> + Send + Sync>;

pub struct ContainerRuntime {
    driver: Arc<dyn Driver>,
    build_cache: Arc<tokio::sync::Mutex<BuildCache>>,
    name_prefix: String,
    image_build_resolvers: Vec<BuildResolver>,
    flags: ContainerRuntimeFlags,
    info: Option<DriverInfo>,
    selinux: bool,
}

impl ContainerRuntime {
    pub fn new(driver: Arc<dyn Driver>, build_cache_path: impl Into<PathBuf>, name_prefix: impl Into<String>) -> Self {
        Self {
            driver,
            build_cache: Arc::new(tokio::sync::Mutex::new(BuildCache::new(build_cache_path))),
            name_prefix: name_prefix.into(),
            image_build_resolvers: Vec::new(),
            flags: ContainerRuntimeFlags::default(),
            info: None,
            selinux: false,
        }
    }

    /// Appends a build-info resolver consulted after the action's own
    /// `build` block (§4.H Image ensure, §9 `ImageBuildResolver` chain).
    pub fn add_image_build_resolver(&mut self, resolver: BuildResolver) {
        self.image_build_resolvers.push(resolver);
    }

    fn resolve_build(&self, action: &Action, container: &ActionContainerSpec) -> Option<BuildSpec> {
        if let Some(build) = &container.build {
            return Some(build.clone());
        }
        self.image_build_resolvers.iter().find_map(|resolver| resolver(action))
    }

    async fn ensure_image(&self, action: &Action, container: &ActionContainerSpec) -> Result<(), RuntimeError> {
        let build = self.resolve_build(action, container);
        let mut force_rebuild = self.flags.no_cache;

        if self.flags.rebuild_image {
            if let Some(build) = &build {
                let context_dir = build
                    .context
                    .as_deref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| action.fsdir.clone());
                let hash = dir_hash(&context_dir).map_err(|e| RuntimeError::ImageEnsure {
                    tag: container.image.clone(),
                    message: e.to_string(),
                })?;
                let tags = if build.tags.is_empty() {
                    vec![container.image.clone()]
                } else {
                    build.tags.clone()
                };

                let mut cache = self.build_cache.lock().await;
                cache.ensure_loaded().map_err(|e| RuntimeError::ImageEnsure {
                    tag: container.image.clone(),
                    message: e.to_string(),
                })?;
                let changed = tags.iter().any(|tag| cache.get_sum(tag) != hash);
                if changed {
                    force_rebuild = true;
                    for tag in &tags {
                        cache.set_sum(tag, &hash);
                    }
                    cache.save().map_err(|e| RuntimeError::ImageEnsure {
                        tag: container.image.clone(),
                        message: e.to_string(),
                    })?;
                }
            }
        }

        self.driver
            .image_ensure(&container.image, build.as_ref(), force_rebuild)
            .await?;
        Ok(())
    }

    async fn run_body(&self, action: &Action, id: &str, remote: bool) -> Result<i32, RuntimeError> {
        let exit_code = wait_with_signal_forwarding(&*self.driver, &action.id, id, action.input.streams.tty).await?;
        if exit_code == 0 && remote && self.flags.remote_copy_back {
            self.driver.copy_from_container(id, "/host", &action.working_dir()).await?;
        }
        Ok(exit_code)
    }
}

#[async_trait]
impl Runtime for ContainerRuntime {
    async fn init(&mut self, _action: &Action) -> Result<(), RuntimeError> {
        let info = self.driver.info().await?;
        self.info = Some(info);
        if !info.remote {
            self.selinux = self.driver.is_selinux_supported().await?;
            if self.selinux {
                tracing::warn!("SELinux detected: bind mounts will be labeled :z, relabeling host files");
            }
        }
        Ok(())
    }

    async fn execute(&mut self, action: &Action) -> Result<ExecOutcome, RuntimeError> {
        if self.info.is_none() {
            self.init(action).await?;
        }
        let container = match &action.definition.runtime {
            RuntimeSpec::Container(c) => c,
            _ => {
                return Err(RuntimeError::Unbound {
                    action_id: action.id.clone(),
                })
            }
        };
        let remote = self.flags.remote_runtime || self.info.map(|i| i.remote).unwrap_or(false);

        let name = generate_name(&self.name_prefix, &action.id);
        let existing = self.driver.container_list(&name).await?;
        if !existing.is_empty() {
            return Err(RuntimeError::NameInUse { name });
        }

        self.ensure_image(action, container).await?;

        let command = if self.flags.exec {
            action.input.args_positional().to_vec()
        } else {
            hangar_loader::render_command(action, &hangar_loader::process_env())?
        };
        let mounts = build_mounts(&name, action, remote, self.selinux);
        let spec = DriverContainerSpec {
            name: name.clone(),
            image: container.image.clone(),
            command,
            entrypoint: self.flags.entrypoint.as_deref(),
            env: container.env.normalized(),
            mounts,
            working_dir: "/host",
            tty: action.input.streams.tty,
        };

        let id = self.driver.container_create(&spec).await?;

        if remote {
            self.driver.copy_to_container(&id, &action.working_dir(), "/host").await?;
            self.driver.copy_to_container(&id, &action.fsdir, "/action").await?;
        }

        self.driver.container_start(&id).await?;

        let body_result = self.run_body(action, &id, remote).await;

        if let Err(e) = self.driver.container_remove(&id).await {
            tracing::warn!(container = %id, error = %e, "container remove failed");
        }
        if self.flags.remove_image {
            if let Err(e) = self.driver.image_remove(&container.image).await {
                tracing::warn!(image = %container.image, error = %e, "image remove failed");
            }
        }

        let exit_code = body_result?;
        if exit_code != 0 {
            return Err(RuntimeError::ExitCode {
                action_id: action.id.clone(),
                code: exit_code,
            });
        }
        Ok(ExecOutcome { exit_code: 0 })
    }

    async fn close(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Runtime> {
        Box::new(ContainerRuntime {
            driver: Arc::clone(&self.driver),
            build_cache: Arc::clone(&self.build_cache),
            name_prefix: self.name_prefix.clone(),
            image_build_resolvers: self.image_build_resolvers.clone(),
            flags: ContainerRuntimeFlags::default(),
            info: None,
            selinux: false,
        })
    }

    fn as_flags_mut(&mut self) -> Option<&mut dyn RuntimeFlags> {
        Some(self)
    }
}

impl RuntimeFlags for ContainerRuntime {
    fn flag_group(&self) -> &'static str {
        "runtime"
    }

    fn set_flags(&mut self, input: &Input) {
        let Some(flags) = input.group_flags("runtime") else {
            return;
        };
        let get_bool = |k: &str, default: bool| flags.get(k).and_then(Value::as_bool).unwrap_or(default);
        self.flags = ContainerRuntimeFlags {
            remote_runtime: get_bool("remote-runtime", false),
            remote_copy_back: get_bool("remote-copy-back", false),
            remove_image: get_bool("remove-image", false),
            no_cache: get_bool("no-cache", false),
            rebuild_image: get_bool("rebuild-image", true),
            entrypoint: flags.get("entrypoint").and_then(Value::as_str).map(str::to_string),
            exec: get_bool("exec", false),
        };
    }

    /// `--exec` skips argument validation (§4.H, S4); all other cases defer
    /// to normal action-level validation.
    fn validate_input(&self, _input: &Input) -> Option<Result<(), ValidationError>> {
        if self.flags.exec {
            Some(Ok(()))
        } else {
            None
        }
    }
}

/// `prefix + sanitised(action-id) + "_" + random4suffix`, sanitisation
/// replacing `_ : .` with `-` (§4.H Name generation).
fn generate_name(prefix: &str, action_id: &str) -> String {
    let sanitized: String = action_id
        .chars()
        .map(|c| if c == '_' || c == ':' || c == '.' { '-' } else { c })
        .collect();
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..4];
    format!("{prefix}{sanitized}_{suffix}")
}

fn build_mounts(name: &str, action: &Action, remote: bool, selinux: bool) -> Vec<Mount> {
    if remote {
        vec![
            Mount {
                source: MountSource::Volume(format!("{name}-host")),
                target: "/host".to_string(),
                selinux_label: false,
            },
            Mount {
                source: MountSource::Volume(format!("{name}-action")),
                target: "/action".to_string(),
                selinux_label: false,
            },
        ]
    } else {
        vec![
            Mount {
                source: MountSource::Bind(action.working_dir()),
                target: "/host".to_string(),
                selinux_label: selinux,
            },
            Mount {
                source: MountSource::Bind(action.fsdir.clone()),
                target: "/action".to_string(),
                selinux_label: selinux,
            },
        ]
    }
}

/// Races the container's wait against `SIGINT`/`SIGTERM` delivered to this
/// process, forwarding each to the container via `ContainerKill` (§4.H
/// Signals: "when there is no TTY"). A TTY leaves signal handling to the
/// container's own TTY.
async fn wait_with_signal_forwarding(
    driver: &dyn Driver,
    action_id: &str,
    id: &str,
    tty: bool,
) -> Result<i32, RuntimeError> {
    let to_wait_failed = |e: RuntimeError| RuntimeError::WaitFailed {
        action_id: action_id.to_string(),
        message: e.to_string(),
    };

    if tty {
        return driver.container_wait(id).await.map_err(to_wait_failed);
    }

    use tokio::signal::unix::{signal, SignalKind};
    let mut sigint = signal(SignalKind::interrupt()).map_err(RuntimeError::Io)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(RuntimeError::Io)?;

    let wait_fut = driver.container_wait(id);
    tokio::pin!(wait_fut);
    loop {
        tokio::select! {
            result = &mut wait_fut => return result.map_err(to_wait_failed),
            _ = sigint.recv() => { let _ = driver.container_kill(id, SIGINT).await; }
            _ = sigterm.recv() => { let _ = driver.container_kill(id, SIGTERM).await; }
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
