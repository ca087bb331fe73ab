//! Error types for the runner module.
//!
//! Kept apart so the derive-macro lint suppression stays narrowly scoped.

// FIXME(rust-lang/rust#130021): the unused_assignments lint fires in some
// Rust versions due to miette/thiserror derive expansion. `#[expect]` fails
// when the lint does not fire, so `#[allow]` is required here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// An explicitly named manifest does not exist.
    #[error("manifest {path} not found")]
    #[diagnostic(
        code(kensa::runner::manifest_not_found),
        help("check the -f/--file path, or omit it to use the built-in entry points")
    )]
    ManifestNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },
    /// One or more entry points failed.
    #[error("{failed} of {total} entry point(s) failed")]
    #[diagnostic(code(kensa::runner::entries_failed))]
    EntriesFailed {
        /// Number of failed entry points.
        failed: usize,
        /// Number of entry points in the report.
        total: usize,
    },
}
