// SPDX-License-Identifier: MIT

//! The container-backed runtime (§4.A, §4.B, §4.H): advisory file
//! locking, the image build cache, the pluggable driver boundary, and
//! `ContainerRuntime` itself.

mod build_cache;
mod driver;
mod lock;
mod runtime;

pub use build_cache::{dir_hash, BuildCache};
pub use driver::{ContainerSpec, Driver, DriverInfo, ImageEnsureState, Mount, MountSource, NullDriver};
pub use lock::{remove as remove_lock_file, LockMode, LockedFile};
pub use runtime::{ContainerRuntime, ContainerRuntimeFlags};
