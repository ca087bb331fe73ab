//! Kensa manifest structures.
//!
//! This module defines the data structures used to represent a parsed
//! `kensa.yml`. They mirror the YAML schema and are deserialised through
//! [`crate::manifest`].
//!
//! ```rust
//! use kensa::manifest;
//!
//! let yaml = "kensa_version: \"1.0.0\"\nentry_points:\n  - name: Login_IT\n    features: [login.feature]";
//! let manifest = manifest::from_str(yaml).expect("parse");
//! assert_eq!(manifest.entry_points[0].name, "Login_IT");
//! ```

use crate::entry::EntryPointConfig;
use camino::Utf8PathBuf;
use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Top-level manifest structure parsed from a `kensa.yml`.
///
/// Optional sections default to empty.
///
/// ```yaml
/// kensa_version: "1.0.0"
/// feature_root: features
/// engine:
///   program: cucumber
///   args: "--strict"
/// capabilities:
///   browser: chrome
/// entry_points:
///   - name: Login_IT
///     groups: [smoke]
///     features: [login.feature]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KensaManifest {
    /// Schema version; the major component must be supported.
    pub kensa_version: Version,

    /// Directory feature references resolve against. Relative values are
    /// taken relative to the manifest's directory.
    #[serde(default)]
    pub feature_root: Option<Utf8PathBuf>,

    /// How to launch the external engine.
    #[serde(default)]
    pub engine: EngineSection,

    /// Capabilities handed to every entry point.
    #[serde(default)]
    pub capabilities: IndexMap<String, String>,

    /// Declared entry points, in run order.
    #[serde(default)]
    pub entry_points: Vec<EntryPointConfig>,
}

/// The `engine` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Program to launch. Overridden by `KENSA_ENGINE` and `--engine`.
    #[serde(default)]
    pub program: Option<Utf8PathBuf>,

    /// Extra arguments as a single shell-style string.
    #[serde(default)]
    pub args: Option<String>,
}
