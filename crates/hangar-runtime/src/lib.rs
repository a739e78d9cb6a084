// SPDX-License-Identifier: MIT

//! Runtime abstraction (§4.G) plus the in-process function and shell
//! runtimes (§4.I). The container runtime lives in `hangar-container`.

mod function;
mod runtime;
mod shell;

pub use function::FunctionRuntime;
pub use runtime::{ExecOutcome, Runtime, RuntimeFlags};
pub use shell::ShellRuntime;
