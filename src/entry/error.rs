//! Error types for entry point declaration and execution.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly. The `unused_assignments` lint fires in some Rust versions due to
//! thiserror/miette derive macro expansion.

// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::engine::EngineError;
use crate::feature::{FeatureRef, GroupTag, InvalidGroupTag, ResolveError};
use crate::harness::InvalidCapability;
use miette::Diagnostic;
use thiserror::Error;

/// Configuration problems detected before any feature runs.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The entry point name is empty or contains whitespace.
    #[error("invalid entry point name {name:?}")]
    #[diagnostic(
        code(kensa::config::invalid_name),
        help("names must be non-empty and contain no whitespace")
    )]
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// The entry point declares no feature references.
    #[error("entry point {entry} declares no features")]
    #[diagnostic(
        code(kensa::config::empty_features),
        help("list at least one feature file under `features`")
    )]
    EmptyFeatures {
        /// Entry point name.
        entry: String,
    },
    /// The same feature reference appears twice in one entry point.
    #[error("entry point {entry} declares feature {feature} more than once")]
    #[diagnostic(code(kensa::config::duplicate_feature))]
    DuplicateFeature {
        /// Entry point name.
        entry: String,
        /// The repeated reference.
        feature: FeatureRef,
    },
    /// A feature reference does not resolve to a file.
    #[error("entry point {entry}: cannot resolve feature {feature}: {source}")]
    #[diagnostic(code(kensa::config::unresolved_feature))]
    UnresolvedFeature {
        /// Entry point name.
        entry: String,
        /// The unresolvable reference.
        feature: FeatureRef,
        /// Why resolution failed.
        #[source]
        source: ResolveError,
    },
    /// Two entry points share a name.
    #[error("entry point {name} is registered more than once")]
    #[diagnostic(code(kensa::config::duplicate_entry))]
    DuplicateEntry {
        /// The repeated name.
        name: String,
    },
    /// A selection names an entry point that is not registered.
    #[error("no entry point named {name}")]
    #[diagnostic(
        code(kensa::config::unknown_entry),
        help("run `kensa list` to see registered entry points")
    )]
    UnknownEntry {
        /// The requested name.
        name: String,
    },
    /// A selection names a group no registered entry point belongs to.
    #[error("no entry point belongs to group {group}")]
    #[diagnostic(
        code(kensa::config::unknown_group),
        help("run `kensa list` to see each entry point's groups")
    )]
    UnknownGroup {
        /// The requested group.
        group: GroupTag,
    },
    /// A group tag failed validation.
    #[error(transparent)]
    #[diagnostic(code(kensa::config::invalid_group))]
    InvalidGroup(#[from] InvalidGroupTag),
    /// A capability key failed validation.
    #[error(transparent)]
    #[diagnostic(code(kensa::config::invalid_capability))]
    InvalidCapability(#[from] InvalidCapability),
}

/// Failure of [`EntryPoint::execute_features`](super::EntryPoint::execute_features).
#[derive(Debug, Error, Diagnostic)]
pub enum ExecutionError {
    /// The bound features could not be resolved; the engine was not invoked.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    /// The engine reported a failure, surfaced unchanged.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}
