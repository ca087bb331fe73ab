//! Test entry points.
//!
//! An [`EntryPoint`] is a named unit bound at declaration time to a fixed,
//! non-empty list of feature references. Its single operation,
//! [`EntryPoint::execute_features`], resolves those references, hands them to
//! the harness engine together with the entry point's name, blocks until the
//! engine finishes, and returns the engine's verdict unchanged.
//!
//! ```
//! use kensa::engine::DryRunEngine;
//! use kensa::entry::{EntryPoint, EntryPointConfig};
//! use kensa::harness::Harness;
//! use std::sync::Arc;
//!
//! let harness = Harness::new(Arc::new(DryRunEngine));
//! let err = EntryPoint::new(EntryPointConfig::new("Empty_IT"), harness)
//!     .expect_err("an entry point without features is rejected");
//! assert!(err.to_string().contains("declares no features"));
//! ```

mod error;

pub use error::{ConfigError, ExecutionError};

use crate::engine::RunRequest;
use crate::feature::{FeatureRef, GroupTag, ResolvedFeature};
use crate::harness::Harness;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

const fn enabled_by_default() -> bool {
    true
}

/// Declaration of an entry point: its identity, features and groups.
///
/// This is the explicit configuration an entry point is constructed from. It
/// is also the shape of an entry in a `kensa.yml` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPointConfig {
    /// Identity handed to the engine as the glue name.
    pub name: String,
    /// Feature references, in run order.
    #[serde(default)]
    pub features: Vec<FeatureRef>,
    /// Groups the entry point belongs to.
    #[serde(default)]
    pub groups: Vec<GroupTag>,
    /// Disabled entry points are registered but never executed by a suite.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl EntryPointConfig {
    /// Start a declaration with no features or groups, enabled.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
            groups: Vec::new(),
            enabled: true,
        }
    }

    /// Append a feature reference.
    #[must_use]
    pub fn feature(mut self, feature: impl Into<FeatureRef>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Append a group tag.
    #[must_use]
    pub fn group(mut self, group: GroupTag) -> Self {
        self.groups.push(group);
        self
    }

    /// Mark the entry point as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A named unit that runs its bound features through the harness engine.
#[derive(Debug, Clone)]
pub struct EntryPoint {
    name: String,
    features: Vec<FeatureRef>,
    groups: Vec<GroupTag>,
    enabled: bool,
    harness: Harness,
}

impl EntryPoint {
    /// Validate `config` and bind it to `harness`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] for an empty or whitespace-bearing
    /// name, [`ConfigError::EmptyFeatures`] when no features are declared, and
    /// [`ConfigError::DuplicateFeature`] when a reference repeats.
    pub fn new(config: EntryPointConfig, harness: Harness) -> Result<Self, ConfigError> {
        let EntryPointConfig {
            name,
            features,
            groups,
            enabled,
        } = config;
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidName { name });
        }
        if features.is_empty() {
            return Err(ConfigError::EmptyFeatures { entry: name });
        }
        let mut seen = HashSet::new();
        for feature in &features {
            if !seen.insert(feature.normalised()) {
                return Err(ConfigError::DuplicateFeature {
                    entry: name,
                    feature: feature.clone(),
                });
            }
        }
        Ok(Self {
            name,
            features,
            groups,
            enabled,
            harness,
        })
    }

    /// The entry point's identity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared feature references, in run order. Never empty.
    #[must_use]
    pub fn features(&self) -> &[FeatureRef] {
        &self.features
    }

    /// Groups the entry point belongs to.
    #[must_use]
    pub fn groups(&self) -> &[GroupTag] {
        &self.groups
    }

    /// Whether a suite should execute this entry point.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the entry point belongs to any of `groups`.
    #[must_use]
    pub fn in_any_group(&self, groups: &[GroupTag]) -> bool {
        groups.iter().any(|group| self.groups.contains(group))
    }

    /// Resolve every declared reference against the harness feature root.
    ///
    /// A file matched by more than one reference, such as a glob overlapping
    /// a plain path, is listed once at its first position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnresolvedFeature`] for the first reference that
    /// does not resolve.
    pub fn resolve_features(&self) -> Result<Vec<ResolvedFeature>, ConfigError> {
        let root = self.harness.feature_root();
        let mut resolved = Vec::with_capacity(self.features.len());
        let mut seen = HashSet::new();
        for feature in &self.features {
            let matches =
                feature
                    .resolve(root)
                    .map_err(|source| ConfigError::UnresolvedFeature {
                        entry: self.name.clone(),
                        feature: feature.clone(),
                        source,
                    })?;
            resolved.extend(
                matches
                    .into_iter()
                    .filter(|found| seen.insert(found.path().to_owned())),
            );
        }
        Ok(resolved)
    }

    /// Run the bound features through the harness engine.
    ///
    /// Resolves the references, invokes the engine exactly once with this
    /// entry point's name as glue, and blocks until it returns.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Config`] when a reference does not resolve,
    /// in which case the engine is not invoked, and [`ExecutionError::Engine`]
    /// carrying the engine's error unchanged when the run fails.
    pub fn execute_features(&self) -> Result<(), ExecutionError> {
        let features = self.resolve_features()?;
        debug!(
            entry = %self.name,
            features = features.len(),
            root = %self.harness.feature_root(),
            "resolved features"
        );
        let request = RunRequest::new(
            self.name.clone(),
            features,
            self.harness.capabilities().clone(),
        );
        info!(entry = %self.name, "executing features");
        self.harness.engine().run(&request)?;
        info!(entry = %self.name, "features passed");
        Ok(())
    }
}
