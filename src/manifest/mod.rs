//! Manifest loading helpers.
//!
//! A `kensa.yml` is parsed into a JSON value with `serde_saphyr` first, then
//! deserialised into a [`KensaManifest`]. Splitting the steps keeps YAML
//! syntax errors (which carry a location) apart from structural errors
//! (unknown keys, wrong types). Both are reported as [`ManifestError::Parse`]
//! wrapping a [`miette`] diagnostic.
//!
//! [`harness_for`] and [`build_suite`] turn a loaded manifest into the
//! runtime [`Harness`] and [`Suite`].

use crate::{
    ast::KensaManifest,
    engine::FeatureEngine,
    entry::{ConfigError, EntryPoint},
    harness::{Capabilities, Harness},
    suite::Suite,
};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, path::Path, sync::Arc};
use tracing::debug;

mod diagnostics;
mod hints;

/// JSON representation of a manifest after YAML parsing.
pub type ManifestValue = serde_json::Value;

pub use diagnostics::{
    ManifestError, ManifestName, ManifestSource, map_data_error, map_yaml_error,
};

/// Manifest file looked up when none is named.
pub const DEFAULT_MANIFEST: &str = "kensa.yml";

/// Major schema version this build understands.
pub const SUPPORTED_MAJOR: u64 = 1;

fn from_str_named(yaml: &str, name: &ManifestName) -> Result<KensaManifest> {
    let doc: ManifestValue = serde_saphyr::from_str(yaml).map_err(|e| ManifestError::Parse {
        source: map_yaml_error(e, &ManifestSource::from(yaml), name),
        name: name.to_string(),
    })?;

    let manifest: KensaManifest =
        serde_json::from_value(doc).map_err(|e| ManifestError::Parse {
            source: map_data_error(e, name),
            name: name.to_string(),
        })?;

    if manifest.kensa_version.major != SUPPORTED_MAJOR {
        return Err(ManifestError::UnsupportedVersion {
            name: name.to_string(),
            found: manifest.kensa_version,
            supported: SUPPORTED_MAJOR,
        }
        .into());
    }
    engine_args(&manifest, name)?;
    Ok(manifest)
}

/// Parse a manifest string.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, the structure does not match
/// the schema, the version is unsupported, or `engine.args` cannot be split.
pub fn from_str(yaml: &str) -> Result<KensaManifest> {
    from_str_named(yaml, &ManifestName::new(DEFAULT_MANIFEST))
}

/// Load a [`KensaManifest`] from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn from_path(path: impl AsRef<Path>) -> Result<KensaManifest> {
    let path_ref = path.as_ref();
    let data = fs::read_to_string(path_ref)
        .with_context(|| format!("failed to read manifest {}", path_ref.display()))?;
    let name = ManifestName::new(path_ref.display().to_string());
    from_str_named(&data, &name)
}

fn engine_args(manifest: &KensaManifest, name: &ManifestName) -> Result<Vec<String>, ManifestError> {
    let Some(raw) = manifest.engine.args.as_deref() else {
        return Ok(Vec::new());
    };
    shlex::split(raw).ok_or_else(|| ManifestError::EngineArgs {
        name: name.to_string(),
        args: raw.to_owned(),
    })
}

/// Split the manifest's `engine.args` into individual arguments.
///
/// # Errors
///
/// Returns [`ManifestError::EngineArgs`] when the string has an unbalanced
/// quote. Manifests produced by [`from_str`] or [`from_path`] have already
/// been checked.
///
/// # Examples
/// ```rust
/// let manifest = kensa::manifest::from_str(
///     "kensa_version: 1.0.0\nengine:\n  args: \"--plugin 'pretty html'\"",
/// )
/// .expect("parse");
/// let args = kensa::manifest::split_engine_args(&manifest).expect("split");
/// assert_eq!(args, ["--plugin", "pretty html"]);
/// ```
pub fn split_engine_args(manifest: &KensaManifest) -> Result<Vec<String>, ManifestError> {
    engine_args(manifest, &ManifestName::new(DEFAULT_MANIFEST))
}

/// Directory feature references resolve against.
///
/// A relative `feature_root` is joined to `manifest_dir`; without one the
/// manifest directory itself is used.
#[must_use]
pub fn feature_root(manifest: &KensaManifest, manifest_dir: &Utf8Path) -> Utf8PathBuf {
    match &manifest.feature_root {
        Some(root) if root.is_absolute() => root.clone(),
        Some(root) => manifest_dir.join(root),
        None => manifest_dir.to_owned(),
    }
}

/// Build the [`Harness`] described by `manifest`.
///
/// `overrides` are applied on top of the manifest's capabilities.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCapability`] for a malformed capability key.
pub fn harness_for(
    manifest: &KensaManifest,
    manifest_dir: &Utf8Path,
    engine: Arc<dyn FeatureEngine>,
    overrides: &Capabilities,
) -> Result<Harness, ConfigError> {
    let declared = Capabilities::from_pairs(
        manifest
            .capabilities
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    )?;
    let root = feature_root(manifest, manifest_dir);
    debug!(%root, capabilities = declared.len(), "manifest harness");
    Ok(Harness::new(engine)
        .with_capabilities(declared.merged(overrides))
        .with_feature_root(root))
}

/// Register every entry point declared in `manifest`, bound to `harness`.
///
/// # Errors
///
/// Returns the first [`ConfigError`] raised while validating or registering
/// an entry point.
pub fn build_suite(manifest: &KensaManifest, harness: &Harness) -> Result<Suite, ConfigError> {
    let mut suite = Suite::new();
    for config in &manifest.entry_points {
        suite.register(EntryPoint::new(config.clone(), harness.clone())?)?;
    }
    Ok(suite)
}
