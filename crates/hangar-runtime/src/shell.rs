// SPDX-License-Identifier: MIT

//! Shell runtime (§4.I): resolves a bash interpreter, materialises the
//! action's script into a temp file, spawns it with a merged environment,
//! forwards signals to the child, and maps its exit into a `RuntimeError`.
//!
//! Grounded on the teacher's `crates/adapters/src/subprocess.rs`
//! (`tokio::process::Command` usage, named-duration conventions) and
//! `crates/engine/src/spawn.rs` (env-building/shell-escaping shape); the
//! domain content of those files (agent sessions) is not carried over,
//! only the process-spawning idiom.

use std::collections::HashMap;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempPath;

use hangar_core::{Action, RuntimeError, RuntimeSpec};

use crate::runtime::{ExecOutcome, Runtime};

/// Env var that overrides interpreter resolution (§6).
const BASH_OVERRIDE_ENV: &str = "runtime_shell_bash";

/// Checked after `PATH` search comes up empty.
const WELL_KNOWN_BASH_LOCATIONS: &[&str] = &["/bin/bash", "/usr/bin/bash", "/usr/local/bin/bash"];

/// Interrupted child exit is mapped to 130, matching a shell's own SIGINT
/// convention (§4.I, §8.8).
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn resolve_bash() -> Result<PathBuf, RuntimeError> {
    if let Ok(path) = std::env::var(BASH_OVERRIDE_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Ok(path_var) = std::env::var("PATH") {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join("bash");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    for loc in WELL_KNOWN_BASH_LOCATIONS {
        let candidate = PathBuf::from(loc);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(RuntimeError::Driver(
        "no bash interpreter found (set runtime_shell_bash to override)".to_string(),
    ))
}

fn materialize_script(script: &str) -> Result<TempPath, RuntimeError> {
    let mut file = tempfile::NamedTempFile::new().map_err(RuntimeError::Io)?;
    file.write_all(script.as_bytes()).map_err(RuntimeError::Io)?;
    file.flush().map_err(RuntimeError::Io)?;
    let path = file.into_temp_path();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).map_err(RuntimeError::Io)?;
    Ok(path)
}

/// Resolves a bash interpreter (env-var override, then `PATH`, then
/// well-known locations), materialises the script into a temp file (mode
/// `0755`), builds an environment (process env + template-variable env +
/// runtime-declared env), spawns `bash <script>`, streams stdout/stderr,
/// forwards signals, and maps the exit (§4.I).
pub struct ShellRuntime {
    env: HashMap<String, String>,
}

impl ShellRuntime {
    pub fn new(env: HashMap<String, String>) -> Self {
        Self { env }
    }
}

#[async_trait]
impl Runtime for ShellRuntime {
    async fn init(&mut self, _action: &Action) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn execute(&mut self, action: &Action) -> Result<ExecOutcome, RuntimeError> {
        let shell = match &action.definition.runtime {
            RuntimeSpec::Shell(s) => s,
            _ => {
                return Err(RuntimeError::Unbound {
                    action_id: action.id.clone(),
                })
            }
        };

        let bash = resolve_bash()?;
        let mut rendered = hangar_loader::render_command(action, &self.env)?;
        let script = rendered.pop().unwrap_or_default();
        let script_path = materialize_script(&script)?;

        let mut command = tokio::process::Command::new(&bash);
        command
            .arg(&script_path)
            .current_dir(action.working_dir())
            .envs(&self.env)
            .envs(shell.env.normalized().iter().filter_map(|kv| kv.split_once('=')))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = command.spawn().map_err(RuntimeError::Io)?;
        let status = run_with_signal_forwarding(child).await.map_err(RuntimeError::Io)?;

        match status.code() {
            Some(0) => Ok(ExecOutcome { exit_code: 0 }),
            Some(code) => Err(RuntimeError::ExitCode {
                action_id: action.id.clone(),
                code,
            }),
            None => Err(RuntimeError::ExitCode {
                action_id: action.id.clone(),
                code: INTERRUPTED_EXIT_CODE,
            }),
        }
    }

    async fn close(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Runtime> {
        Box::new(ShellRuntime {
            env: self.env.clone(),
        })
    }
}

/// Waits on the child while forwarding `SIGINT`/`SIGTERM` received by this
/// process, so an interactive interrupt reaches the grandchild shell the
/// way a foreground subprocess naturally would (§4.H: "the runtime
/// registers for OS signals and forwards each to the container/child").
async fn run_with_signal_forwarding(
    mut child: tokio::process::Child,
) -> std::io::Result<std::process::ExitStatus> {
    use tokio::signal::unix::{signal, SignalKind};

    let Some(pid) = child.id() else {
        return child.wait().await;
    };
    let pid = pid as libc::pid_t;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            status = child.wait() => return status,
            _ = sigint.recv() => forward_signal(pid, libc::SIGINT),
            _ = sigterm.recv() => forward_signal(pid, libc::SIGTERM),
        }
    }
}

#[allow(unsafe_code)]
fn forward_signal(pid: libc::pid_t, signal: libc::c_int) {
    // SAFETY: `pid` names a child this process spawned and still owns;
    // `kill` with a valid pid and signal number has no memory-safety
    // implications, only process-control ones.
    unsafe {
        libc::kill(pid, signal);
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
