//! Feature references, group tags and their resolution.
//!
//! A [`FeatureRef`] is the declared identifier of a feature file: a relative
//! path, an absolute path, or a glob pattern. References are resolved against
//! a feature root when an entry point is about to run. Relative references are
//! looked up through a [`cap_std`] directory handle so they cannot reach
//! outside the root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use glob::{MatchOptions, Pattern, glob_with};
use serde::{Deserialize, Serialize};
use std::{fmt, io};
use thiserror::Error;
use tracing::debug;

const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

/// Declared identifier of a feature file.
///
/// # Examples
/// ```
/// use kensa::feature::FeatureRef;
/// let reference = FeatureRef::new("features/login.feature");
/// assert_eq!(reference.as_path().as_str(), "features/login.feature");
/// assert!(!reference.is_pattern());
/// assert!(FeatureRef::new("features/*.feature").is_pattern());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeatureRef(Utf8PathBuf);

impl FeatureRef {
    /// Wrap a path or pattern as a feature reference.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self(path.into())
    }

    /// Borrow the declared path or pattern.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }

    /// The declared path with `.` components removed.
    ///
    /// Two references naming the same file through `A.feature` and
    /// `./A.feature` normalise to the same path.
    #[must_use]
    pub fn normalised(&self) -> Utf8PathBuf {
        self.0
            .components()
            .filter(|component| !matches!(component, Utf8Component::CurDir))
            .collect()
    }

    /// Indicate whether the reference contains glob metacharacters.
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        self.0.as_str().contains(GLOB_METACHARACTERS)
    }

    /// Resolve the reference to concrete feature files below `root`.
    ///
    /// Plain references yield exactly one file. Patterns yield every matching
    /// file, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the file is missing, is not a regular
    /// file, lies outside `root`, or when a pattern is invalid or matches
    /// nothing.
    pub fn resolve(&self, root: &Utf8Path) -> Result<Vec<ResolvedFeature>, ResolveError> {
        if self.as_path().is_relative() && escapes_root(self.as_path()) {
            return Err(ResolveError::EscapesRoot);
        }
        let resolved = if self.is_pattern() {
            self.expand_pattern(root)?
        } else if self.as_path().is_absolute() {
            vec![self.check_absolute()?]
        } else {
            vec![self.check_relative(root)?]
        };
        debug!(
            reference = %self,
            matches = resolved.len(),
            "resolved feature reference"
        );
        Ok(resolved)
    }

    fn check_absolute(&self) -> Result<ResolvedFeature, ResolveError> {
        let metadata = std::fs::metadata(self.as_path()).map_err(classify_io)?;
        if !metadata.is_file() {
            return Err(ResolveError::NotAFile);
        }
        Ok(ResolvedFeature::new(self.clone(), self.normalised()))
    }

    fn check_relative(&self, root: &Utf8Path) -> Result<ResolvedFeature, ResolveError> {
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(|source| {
            ResolveError::Root {
                root: root.to_owned(),
                source,
            }
        })?;
        let metadata = dir.metadata(self.as_path()).map_err(classify_io)?;
        if !metadata.is_file() {
            return Err(ResolveError::NotAFile);
        }
        Ok(ResolvedFeature::new(self.clone(), root.join(self.normalised())))
    }

    fn expand_pattern(&self, root: &Utf8Path) -> Result<Vec<ResolvedFeature>, ResolveError> {
        let pattern = if self.as_path().is_absolute() {
            self.normalised()
        } else {
            Utf8PathBuf::from(Pattern::escape(root.as_str())).join(self.normalised())
        };
        let opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };
        let entries = glob_with(pattern.as_str(), opts).map_err(|err| {
            ResolveError::InvalidPattern {
                detail: err.to_string(),
            }
        })?;
        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| ResolveError::Io(err.into_error()))?;
            if !path.is_file() {
                continue;
            }
            let utf8 = Utf8PathBuf::from_path_buf(path).map_err(|path| {
                ResolveError::NonUtf8 {
                    path: path.to_string_lossy().into_owned(),
                }
            })?;
            matches.push(ResolvedFeature::new(self.clone(), utf8));
        }
        if matches.is_empty() {
            return Err(ResolveError::NoMatches);
        }
        matches.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(matches)
    }
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for FeatureRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FeatureRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Utf8PathBuf> for FeatureRef {
    fn from(value: Utf8PathBuf) -> Self {
        Self(value)
    }
}

/// Return `true` when a relative path climbs above its starting directory.
fn escapes_root(path: &Utf8Path) -> bool {
    let mut depth: usize = 0;
    for component in path.components() {
        match component {
            Utf8Component::ParentDir => {
                let Some(next) = depth.checked_sub(1) else {
                    return true;
                };
                depth = next;
            }
            Utf8Component::Normal(_) => depth += 1,
            Utf8Component::CurDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {}
        }
    }
    false
}

fn classify_io(err: io::Error) -> ResolveError {
    match err.kind() {
        io::ErrorKind::NotFound => ResolveError::NotFound,
        _ => ResolveError::Io(err),
    }
}

/// A concrete feature file produced by resolving a [`FeatureRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFeature {
    reference: FeatureRef,
    path: Utf8PathBuf,
}

impl ResolvedFeature {
    /// Pair a declared reference with the file it resolved to.
    #[must_use]
    pub const fn new(reference: FeatureRef, path: Utf8PathBuf) -> Self {
        Self { reference, path }
    }

    /// The reference as declared by the entry point.
    #[must_use]
    pub const fn reference(&self) -> &FeatureRef {
        &self.reference
    }

    /// Path handed to the engine.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// Reasons a feature reference fails to resolve.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No file exists at the referenced path.
    #[error("file not found")]
    NotFound,
    /// The referenced path exists but is not a regular file.
    #[error("not a regular file")]
    NotAFile,
    /// A relative reference climbs above the feature root.
    #[error("path escapes the feature root")]
    EscapesRoot,
    /// The glob pattern is malformed.
    #[error("invalid pattern: {detail}")]
    InvalidPattern {
        /// Parser message describing the problem.
        detail: String,
    },
    /// The glob pattern matched no regular files.
    #[error("pattern matched no files")]
    NoMatches,
    /// A pattern matched a path that is not valid UTF-8.
    #[error("matched path is not valid UTF-8: {path}")]
    NonUtf8 {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// The feature root could not be opened.
    #[error("cannot open feature root {root}")]
    Root {
        /// Root directory that failed to open.
        root: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Any other I/O failure while inspecting the reference.
    #[error(transparent)]
    Io(io::Error),
}

/// Label used to select subsets of entry points.
///
/// # Examples
/// ```
/// use kensa::feature::GroupTag;
/// let tag = GroupTag::new("dcos_centralLoggin").expect("valid tag");
/// assert_eq!(tag.as_str(), "dcos_centralLoggin");
/// assert!(GroupTag::new("two words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupTag(String);

impl GroupTag {
    /// Validate and wrap a group label.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGroupTag`] when the label is empty or contains
    /// whitespace.
    pub fn new(tag: impl Into<String>) -> Result<Self, InvalidGroupTag> {
        let tag = tag.into();
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(InvalidGroupTag { tag });
        }
        Ok(Self(tag))
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupTag {
    type Error = InvalidGroupTag;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupTag> for String {
    fn from(value: GroupTag) -> Self {
        value.0
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for empty or whitespace-bearing group labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid group tag {tag:?}: tags must be non-empty and contain no whitespace")]
pub struct InvalidGroupTag {
    /// The rejected label.
    pub tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(files: &[&str]) -> Result<(TempDir, Utf8PathBuf)> {
        let temp = TempDir::new().context("create feature workspace")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|_| anyhow::anyhow!("temp dir is not valid UTF-8"))?;
        for file in files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("create feature dir")?;
            }
            fs::write(&path, "Feature: stub\n").context("write feature")?;
        }
        Ok((temp, root))
    }

    #[rstest]
    #[case("a.feature", false)]
    #[case("dir/../a.feature", false)]
    #[case("../a.feature", true)]
    #[case("dir/../../a.feature", true)]
    #[case("./a.feature", false)]
    fn detects_escaping_paths(#[case] path: &str, #[case] escapes: bool) {
        assert_eq!(escapes_root(Utf8Path::new(path)), escapes);
    }

    #[test]
    fn resolves_relative_file_under_root() -> Result<()> {
        let (_temp, root) = workspace(&["features/A.feature"])?;
        let resolved = FeatureRef::new("features/A.feature").resolve(&root)?;
        ensure!(resolved.len() == 1, "expected a single match");
        let first = resolved.first().context("resolved feature")?;
        ensure!(first.path() == root.join("features/A.feature"));
        Ok(())
    }

    #[test]
    fn missing_file_is_not_found() -> Result<()> {
        let (_temp, root) = workspace(&[])?;
        let err = FeatureRef::new("missing.feature")
            .resolve(&root)
            .expect_err("missing feature should fail");
        ensure!(matches!(err, ResolveError::NotFound), "got {err:?}");
        Ok(())
    }

    #[test]
    fn directory_is_not_a_file() -> Result<()> {
        let (_temp, root) = workspace(&["features/A.feature"])?;
        let err = FeatureRef::new("features")
            .resolve(&root)
            .expect_err("directory should fail");
        ensure!(matches!(err, ResolveError::NotAFile), "got {err:?}");
        Ok(())
    }

    #[test]
    fn parent_reference_is_rejected() -> Result<()> {
        let (_temp, root) = workspace(&["A.feature"])?;
        let err = FeatureRef::new("../A.feature")
            .resolve(&root)
            .expect_err("escaping reference should fail");
        ensure!(matches!(err, ResolveError::EscapesRoot), "got {err:?}");
        Ok(())
    }

    #[test]
    fn pattern_expands_sorted_matches() -> Result<()> {
        let (_temp, root) = workspace(&["f/B.feature", "f/A.feature", "f/notes.txt"])?;
        let resolved = FeatureRef::new("f/*.feature").resolve(&root)?;
        let names: Vec<_> = resolved
            .iter()
            .filter_map(|feature| feature.path().file_name())
            .collect();
        ensure!(names == ["A.feature", "B.feature"], "got {names:?}");
        Ok(())
    }

    #[test]
    fn pattern_under_root_with_metacharacters() -> Result<()> {
        let (_temp, base) = workspace(&["run[1]/A.feature", "run[1]/B.feature", "run1/C.feature"])?;
        let root = base.join("run[1]");
        let resolved = FeatureRef::new("*.feature").resolve(&root)?;
        let paths: Vec<Utf8PathBuf> = resolved.iter().map(|f| f.path().to_owned()).collect();
        ensure!(
            paths == vec![root.join("A.feature"), root.join("B.feature")],
            "got {paths:?}"
        );
        Ok(())
    }

    #[rstest]
    #[case("./A.feature", "A.feature")]
    #[case("f/./A.feature", "f/A.feature")]
    #[case("f/*.feature", "f/*.feature")]
    fn normalised_drops_current_dir(#[case] declared: &str, #[case] expected: &str) {
        assert_eq!(FeatureRef::new(declared).normalised(), Utf8PathBuf::from(expected));
    }

    #[test]
    fn current_dir_prefix_resolves_to_clean_path() -> Result<()> {
        let (_temp, root) = workspace(&["A.feature"])?;
        let resolved = FeatureRef::new("./A.feature").resolve(&root)?;
        let first = resolved.first().context("resolved feature")?;
        ensure!(first.path() == root.join("A.feature"), "got {}", first.path());
        Ok(())
    }

    #[test]
    fn pattern_without_matches_fails() -> Result<()> {
        let (_temp, root) = workspace(&["f/A.feature"])?;
        let err = FeatureRef::new("g/*.feature")
            .resolve(&root)
            .expect_err("empty glob should fail");
        ensure!(matches!(err, ResolveError::NoMatches), "got {err:?}");
        Ok(())
    }

    #[test]
    fn absolute_reference_is_checked_directly() -> Result<()> {
        let (_temp, root) = workspace(&["A.feature"])?;
        let absolute = root.join("A.feature");
        let resolved = FeatureRef::new(absolute.clone()).resolve(Utf8Path::new("/nonexistent"))?;
        let first = resolved.first().context("resolved feature")?;
        ensure!(first.path() == absolute);
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    #[case("tab\there")]
    fn group_tag_rejects_invalid_labels(#[case] tag: &str) {
        assert!(GroupTag::new(tag).is_err());
    }

    #[test]
    fn group_tag_deserialises_through_validation() {
        let ok: Result<Vec<GroupTag>, _> = serde_json::from_str(r#"["smoke","dcos"]"#);
        assert!(ok.is_ok());
        let bad: Result<Vec<GroupTag>, _> = serde_json::from_str(r#"["bad tag"]"#);
        assert!(bad.is_err());
    }
}
