//! Error types for engine execution.
//!
//! Module-level suppression for version-dependent lint false positives from
//! miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use itertools::Itertools;
use miette::Diagnostic;
use std::{fmt, io};
use thiserror::Error;

/// A single feature the engine reported as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFailure {
    /// Path of the feature handed to the engine.
    pub feature: Utf8PathBuf,
    /// Exit code of the engine run, or `None` when it was terminated by a
    /// signal.
    pub code: Option<i32>,
}

impl fmt::Display for FeatureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (exit code {code})", self.feature),
            None => write!(f, "{} (terminated by signal)", self.feature),
        }
    }
}

/// Errors raised while an engine runs an entry point's features.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    /// The engine program could not be started.
    #[error("failed to start engine {program}")]
    #[diagnostic(
        code(kensa::engine::spawn),
        help("install the engine or point KENSA_ENGINE at it")
    )]
    Spawn {
        /// Program that failed to start.
        program: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The engine started but its output or exit status could not be
    /// collected.
    #[error("lost contact with engine {program}")]
    #[diagnostic(code(kensa::engine::io))]
    Io {
        /// Program being run.
        program: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// One or more features failed.
    #[error("{glue}: {} feature(s) failed: {}", .failures.len(), .failures.iter().join(", "))]
    #[diagnostic(code(kensa::engine::features_failed))]
    FeaturesFailed {
        /// Entry point whose features were run.
        glue: String,
        /// Failing features in run order.
        failures: Vec<FeatureFailure>,
    },
    /// Any other failure reported by an in-process engine.
    #[error("{message}")]
    #[diagnostic(code(kensa::engine::failed))]
    Failed {
        /// Engine-supplied description.
        message: String,
    },
}

impl EngineError {
    /// Convenience constructor for [`EngineError::Failed`].
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
