//! Temporary directories populated with feature files and manifests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A temporary workspace that feature references resolve against.
#[derive(Debug)]
pub struct FeatureWorkspace {
    dir: TempDir,
    root: Utf8PathBuf,
}

impl FeatureWorkspace {
    /// Create an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp dir is valid UTF-8");
        Self { dir, root }
    }

    /// Absolute path of the workspace.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write a stub feature file at `relative`, creating parent directories.
    pub fn write_feature(&self, relative: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create feature dir");
        }
        fs::write(&path, format!("Feature: {relative}\n")).expect("write feature");
        path
    }

    /// Write `yaml` as `kensa.yml` in the workspace root.
    pub fn write_manifest(&self, yaml: &str) -> Utf8PathBuf {
        let path = self.root.join("kensa.yml");
        fs::write(&path, yaml).expect("write manifest");
        path
    }

    /// Keep the underlying directory handle alive as long as the workspace.
    #[must_use]
    pub const fn temp_dir(&self) -> &TempDir {
        &self.dir
    }
}

impl Default for FeatureWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
