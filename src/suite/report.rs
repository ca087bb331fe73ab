//! Per-entry outcomes of a suite run.

use crate::entry::ExecutionError;
use std::fmt;

/// Why an entry point was not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry point is declared disabled.
    Disabled,
    /// An earlier entry point failed and the run stops at the first failure.
    FailFast,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("disabled"),
            Self::FailFast => f.write_str("not run after earlier failure"),
        }
    }
}

/// Verdict for a single entry point.
#[derive(Debug)]
pub enum Outcome {
    /// The engine reported success.
    Passed,
    /// Execution raised an error.
    Failed(ExecutionError),
    /// The entry point was not executed.
    Skipped(SkipReason),
}

/// Outcome paired with the entry point it belongs to.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Entry point name.
    pub name: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Ordered outcomes of a suite run.
#[derive(Debug, Default)]
pub struct SuiteReport {
    outcomes: Vec<EntryOutcome>,
}

impl SuiteReport {
    pub(crate) fn push(&mut self, name: &str, outcome: Outcome) {
        self.outcomes.push(EntryOutcome {
            name: name.to_owned(),
            outcome,
        });
    }

    /// All outcomes in run order.
    #[must_use]
    pub fn outcomes(&self) -> &[EntryOutcome] {
        &self.outcomes
    }

    /// Look up the outcome for `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.outcome)
    }

    /// Number of entry points that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    /// Number of entry points that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// Number of entry points that were skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// `true` when no entry point failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|entry| pred(&entry.outcome)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.outcomes {
            match &entry.outcome {
                Outcome::Passed => writeln!(f, "PASS  {}", entry.name)?,
                Outcome::Failed(err) => writeln!(f, "FAIL  {}: {err}", entry.name)?,
                Outcome::Skipped(reason) => writeln!(f, "SKIP  {} ({reason})", entry.name)?,
            }
        }
        write!(
            f,
            "{} entry point(s): {} passed, {} failed, {} skipped",
            self.outcomes.len(),
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    #[test]
    fn renders_one_line_per_entry_and_summary() {
        let mut report = SuiteReport::default();
        report.push("A_IT", Outcome::Passed);
        report.push(
            "B_IT",
            Outcome::Failed(ExecutionError::Engine(EngineError::failed("boom"))),
        );
        report.push("C_IT", Outcome::Skipped(SkipReason::Disabled));
        assert_eq!(
            report.to_string(),
            "PASS  A_IT\nFAIL  B_IT: boom\nSKIP  C_IT (disabled)\n\
             3 entry point(s): 1 passed, 1 failed, 1 skipped"
        );
        assert!(!report.is_success());
    }

    #[test]
    fn empty_report_is_success() {
        assert!(SuiteReport::default().is_success());
    }
}
