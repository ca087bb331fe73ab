//! Scenario state for the BDD suite.
//!
//! Each scenario receives a fresh [`TestWorld`] through the `world` fixture.
//! Non-`Clone` values live in `RefCell<Option<T>>`; `Clone` values use
//! [`Slot`].

#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use kensa::entry::EntryPointConfig;
use kensa::suite::Suite;
use rstest::fixture;
use rstest_bdd::Slot;
use std::cell::RefCell;
use std::path::PathBuf;
use tempfile::TempDir;
use test_support::{FeatureWorkspace, RecordingEngine};

/// State shared by the steps of one scenario.
#[derive(Default)]
pub struct TestWorld {
    /// Directory feature references resolve against.
    pub workspace: RefCell<Option<FeatureWorkspace>>,
    /// Keeps a fake engine script alive for the scenario.
    pub engine_dir: RefCell<Option<TempDir>>,
    /// Program the process engine launches.
    pub engine_program: Slot<PathBuf>,
    /// Engine that logs each invocation, when the scenario inspects calls.
    pub recording: RefCell<Option<RecordingEngine>>,
    /// Entry point declarations, in registration order.
    pub declarations: RefCell<Vec<EntryPointConfig>>,
    /// Suite built from the built-in catalog.
    pub suite: RefCell<Option<Suite>>,
    /// Names chosen by the last selection.
    pub selected: Slot<Vec<String>>,
    /// Error text from the last selection.
    pub selection_error: Slot<String>,
    /// Error text from declaring an entry point.
    pub declaration_error: Slot<String>,
    /// Outcome of the last execution: `Ok(())` or the error chain as text.
    pub outcome: Slot<Result<(), String>>,
    /// Rendered suite report.
    pub report: Slot<String>,
}

/// Fixture providing a fresh `TestWorld` for each scenario.
#[fixture]
pub fn world() -> TestWorld {
    TestWorld::default()
}

/// Strip surrounding double quotes from a captured step parameter.
#[must_use]
pub fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .unwrap_or(s)
}
