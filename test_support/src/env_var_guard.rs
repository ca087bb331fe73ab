//! Scoped overrides of `KENSA_*` and other environment variables.
//!
//! `std::env::set_var` and `remove_var` are `unsafe` in Rust 2024. Hold an
//! [`EnvLock`](crate::env_lock::EnvLock) while any [`EnvVarGuard`] is alive.
//!
//! ```rust,ignore
//! use kensa_env::ENGINE_ENV;
//! use test_support::{env_lock::EnvLock, env_var_guard::EnvVarGuard};
//!
//! let _lock = EnvLock::acquire();
//! let _engine = EnvVarGuard::set(ENGINE_ENV, "/opt/fake-engine");
//! ```

use std::ffi::{OsStr, OsString};

/// Restores a variable's previous value (or absence) when dropped.
#[derive(Debug)]
pub struct EnvVarGuard {
    name: &'static str,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    /// Set `name` to `value` until the guard drops.
    #[must_use]
    pub fn set(name: &'static str, value: impl AsRef<OsStr>) -> Self {
        let prev = std::env::var_os(name);
        // SAFETY: callers hold `EnvLock`.
        unsafe { std::env::set_var(name, value) };
        Self { name, prev }
    }

    /// Remove `name` until the guard drops.
    #[must_use]
    pub fn remove(name: &'static str) -> Self {
        let prev = std::env::var_os(name);
        // SAFETY: callers hold `EnvLock`.
        unsafe { std::env::remove_var(name) };
        Self { name, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: callers hold `EnvLock` for the guard's whole lifetime.
        unsafe {
            match &self.prev {
                Some(value) => std::env::set_var(self.name, value),
                None => std::env::remove_var(self.name),
            }
        }
    }
}
