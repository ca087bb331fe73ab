//! Explicit registration and sequential execution of entry points.
//!
//! Entry points are registered into a [`Suite`] at program start instead of
//! being discovered by scanning. A [`Selection`] narrows a run to particular
//! groups or names; [`Suite::run`] resolves every selected entry point before
//! executing any of them, then runs them one after another.

mod report;

pub use report::{EntryOutcome, Outcome, SkipReason, SuiteReport};

use crate::entry::{ConfigError, EntryPoint};
use crate::feature::GroupTag;
use indexmap::IndexMap;
use tracing::{error, info};

/// Filter applied when choosing which entry points to run.
///
/// An empty group list matches every group; an empty name list matches every
/// name. When both are given an entry point must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    groups: Vec<GroupTag>,
    names: Vec<String>,
}

impl Selection {
    /// Select every registered entry point.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to entry points in any of `groups`.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<GroupTag>) -> Self {
        self.groups = groups;
        self
    }

    /// Restrict to the named entry points.
    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Build a selection from raw command-line values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGroup`] for a malformed group label.
    pub fn from_args(groups: &[String], names: &[String]) -> Result<Self, ConfigError> {
        let groups = groups
            .iter()
            .map(|group| GroupTag::new(group.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::all().with_groups(groups).with_names(names.to_vec()))
    }

    fn matches(&self, entry: &EntryPoint) -> bool {
        let group_ok = self.groups.is_empty() || entry.in_any_group(&self.groups);
        let name_ok = self.names.is_empty() || self.names.iter().any(|n| n == entry.name());
        group_ok && name_ok
    }
}

/// Registry of entry points, kept in registration order.
#[derive(Debug, Default)]
pub struct Suite {
    entries: IndexMap<String, EntryPoint>,
}

impl Suite {
    /// Create an empty suite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry point.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateEntry`] when the name is taken.
    pub fn register(&mut self, entry: EntryPoint) -> Result<(), ConfigError> {
        if self.entries.contains_key(entry.name()) {
            return Err(ConfigError::DuplicateEntry {
                name: entry.name().to_owned(),
            });
        }
        self.entries.insert(entry.name().to_owned(), entry);
        Ok(())
    }

    /// Look up a registered entry point.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntryPoint> {
        self.entries.get(name)
    }

    /// Iterate over entry points in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryPoint> {
        self.entries.values()
    }

    /// Number of registered entry points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry points matching `selection`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEntry`] when the selection names an
    /// entry point that is not registered, and [`ConfigError::UnknownGroup`]
    /// when it names a group no registered entry point belongs to.
    pub fn select(&self, selection: &Selection) -> Result<Vec<&EntryPoint>, ConfigError> {
        if let Some(missing) = selection
            .names
            .iter()
            .find(|name| !self.entries.contains_key(name.as_str()))
        {
            return Err(ConfigError::UnknownEntry {
                name: missing.clone(),
            });
        }
        if let Some(missing) = selection.groups.iter().find(|group| {
            !self
                .entries
                .values()
                .any(|entry| entry.groups().contains(group))
        }) {
            return Err(ConfigError::UnknownGroup {
                group: missing.clone(),
            });
        }
        Ok(self
            .entries
            .values()
            .filter(|entry| selection.matches(entry))
            .collect())
    }

    /// Resolve the features of every selected entry point without running
    /// anything, returning the number of feature files found.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn check(&self, selection: &Selection) -> Result<usize, ConfigError> {
        let mut total = 0;
        for entry in self.select(selection)? {
            total += entry.resolve_features()?.len();
        }
        Ok(total)
    }

    /// Execute the selected entry points sequentially.
    ///
    /// Features of every enabled, selected entry point are resolved before
    /// the first one runs. Disabled entry points are reported as skipped.
    /// With `fail_fast`, entry points after the first failure are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the selection is invalid or any
    /// feature does not resolve; in that case nothing is executed. Execution
    /// failures are recorded in the returned [`SuiteReport`].
    pub fn run(&self, selection: &Selection, fail_fast: bool) -> Result<SuiteReport, ConfigError> {
        let selected = self.select(selection)?;
        for entry in selected.iter().filter(|entry| entry.is_enabled()) {
            entry.resolve_features()?;
        }
        info!(selected = selected.len(), "running entry points");

        let mut report = SuiteReport::default();
        let mut halted = false;
        for entry in selected {
            let outcome = if !entry.is_enabled() {
                Outcome::Skipped(SkipReason::Disabled)
            } else if halted {
                Outcome::Skipped(SkipReason::FailFast)
            } else {
                match entry.execute_features() {
                    Ok(()) => Outcome::Passed,
                    Err(err) => {
                        error!(entry = entry.name(), error = %err, "entry point failed");
                        halted = fail_fast;
                        Outcome::Failed(err)
                    }
                }
            };
            report.push(entry.name(), outcome);
        }
        Ok(report)
    }
}
