//! Translates manifest loading failures into actionable diagnostics.
//!
//! [`ManifestSource`] retains the YAML content and [`ManifestName`] labels its
//! origin. [`map_yaml_error`] and [`map_data_error`] convert parser and
//! deserialisation failures into [`miette`] diagnostics with stable codes.
//
// FIXME(rust-lang/rust#130021): the unused_assignments lint fires in some
// Rust versions due to miette/thiserror derive expansion. `#[expect]` fails
// when the lint does not fire, so `#[allow]` is required here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use semver::Version;
use thiserror::Error;

mod yaml;

pub use yaml::map_yaml_error;

/// YAML source content for a manifest.
///
/// # Examples
/// ```rust
/// use kensa::manifest::ManifestSource;
/// let source = ManifestSource::from("kensa_version: 1.0.0");
/// assert_eq!(source.as_str(), "kensa_version: 1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestSource(String);

impl ManifestSource {
    /// Wrap owned source text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// View the source text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestSource {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name for a manifest used in diagnostics, usually its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestName(String);

impl ManifestName {
    /// Label a manifest.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The label as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ManifestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Error raised when a manifest cannot be loaded.
///
/// # Examples
/// ```rust
/// use kensa::manifest::ManifestError;
/// use miette::MietteDiagnostic;
///
/// let err = ManifestError::Parse {
///     source: Box::new(MietteDiagnostic::new("bad manifest")),
///     name: "kensa.yml".into(),
/// };
/// assert_eq!(err.to_string(), "failed to parse manifest kensa.yml");
/// ```
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// Parsing or structural validation failed with the supplied diagnostic.
    #[error("failed to parse manifest {name}")]
    #[diagnostic(code(kensa::manifest::parse))]
    Parse {
        /// Underlying diagnostic reported by the parser.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
        /// Manifest label.
        name: String,
    },
    /// The manifest targets a schema major version this build cannot read.
    #[error("manifest {name} declares kensa_version {found}; supported major version is {supported}")]
    #[diagnostic(
        code(kensa::manifest::version),
        help("set kensa_version to a {supported}.x release")
    )]
    UnsupportedVersion {
        /// Manifest label.
        name: String,
        /// Declared version.
        found: Version,
        /// Supported major version.
        supported: u64,
    },
    /// `engine.args` is not a valid shell-style argument string.
    #[error("manifest {name}: cannot split engine arguments {args:?}")]
    #[diagnostic(
        code(kensa::manifest::engine_args),
        help("check for an unbalanced quote")
    )]
    EngineArgs {
        /// Manifest label.
        name: String,
        /// The offending string.
        args: String,
    },
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(kensa::manifest::structure))]
struct DataDiagnostic {
    #[source]
    source: serde_json::Error,
    message: String,
}

/// Map a [`serde_json`] structural error into a diagnostic.
///
/// `serde_json` does not report byte offsets for data validation failures,
/// so the diagnostic carries only the manifest name and error message.
#[must_use]
pub fn map_data_error(
    err: serde_json::Error,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let message = format!("manifest structure error in {name}: {err}");
    Box::new(DataDiagnostic {
        source: err,
        message,
    })
}
