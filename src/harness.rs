//! Shared base-test state handed to every entry point.
//!
//! A [`Harness`] bundles the engine handle, the capability set supplied by
//! the orchestrator, and the directory feature references resolve against.
//! Entry points hold a clone; nothing inside is mutated after construction.

use crate::engine::FeatureEngine;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Ordered capability set supplied by the orchestrator.
///
/// Keys are stored lower-case and must consist of ASCII letters, digits and
/// `_`. Each key therefore maps to exactly one `KENSA_CAPABILITY_*` variable.
///
/// # Examples
/// ```
/// use kensa::harness::Capabilities;
/// let mut caps = Capabilities::new();
/// caps.insert("Browser", "chrome").expect("valid key");
/// assert_eq!(caps.get("browser"), Some("chrome"));
/// assert_eq!(caps.browser(), Some("chrome"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(IndexMap<String, String>);

impl Capabilities {
    /// Create an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a capability set from key/value pairs, later pairs winning.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapability`] for the first malformed key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, InvalidCapability>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut caps = Self::new();
        for (key, value) in pairs {
            caps.insert(key, value)?;
        }
        Ok(caps)
    }

    /// Insert or replace a capability, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapability`] when `key` is empty or contains
    /// characters outside the accepted set.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, InvalidCapability> {
        let key = normalise_key(key.into())?;
        Ok(self.0.insert(key, value.into()))
    }

    /// Look up a capability by key (case-insensitive).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    /// The browser the engine should drive, when one was supplied.
    #[must_use]
    pub fn browser(&self) -> Option<&str> {
        self.get("browser")
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    /// Iterate over capabilities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no capabilities were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalise_key(key: String) -> Result<String, InvalidCapability> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(key.to_ascii_lowercase())
    } else {
        Err(InvalidCapability { key })
    }
}

/// Error returned for malformed capability keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid capability key {key:?}: use ASCII letters, digits and '_'")]
pub struct InvalidCapability {
    /// The rejected key.
    pub key: String,
}

/// Engine handle, capabilities and feature root shared by entry points.
#[derive(Clone)]
pub struct Harness {
    engine: Arc<dyn FeatureEngine>,
    capabilities: Capabilities,
    feature_root: Utf8PathBuf,
}

impl Harness {
    /// Create a harness around `engine`, rooted at the current directory
    /// with no capabilities.
    #[must_use]
    pub fn new(engine: Arc<dyn FeatureEngine>) -> Self {
        Self {
            engine,
            capabilities: Capabilities::new(),
            feature_root: Utf8PathBuf::from("."),
        }
    }

    /// Replace the capability set.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Replace the directory relative feature references resolve against.
    #[must_use]
    pub fn with_feature_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.feature_root = root.into();
        self
    }

    /// The engine entry points delegate to.
    #[must_use]
    pub fn engine(&self) -> &dyn FeatureEngine {
        self.engine.as_ref()
    }

    /// Capabilities forwarded with every run.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Directory relative feature references resolve against.
    #[must_use]
    pub fn feature_root(&self) -> &Utf8Path {
        &self.feature_root
    }
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("engine", &"<engine>")
            .field("capabilities", &self.capabilities)
            .field("feature_root", &self.feature_root)
            .finish()
    }
}
