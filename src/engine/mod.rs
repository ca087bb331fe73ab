//! The seam between entry points and the external BDD engine.
//!
//! Entry points never parse or execute feature files themselves. They build a
//! [`RunRequest`] and hand it to a [`FeatureEngine`], which blocks until every
//! feature has run and reports the outcome. [`ProcessEngine`] drives an
//! external runner program; [`DryRunEngine`] only logs what would run.

mod dry_run;
mod error;
mod process;

pub use dry_run::DryRunEngine;
pub use error::{EngineError, FeatureFailure};
pub use process::{DEFAULT_ENGINE_PROGRAM, ProcessEngine, resolve_engine_program};

use crate::feature::ResolvedFeature;
use crate::harness::Capabilities;

/// Everything an engine needs to run one entry point's features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    glue: String,
    features: Vec<ResolvedFeature>,
    capabilities: Capabilities,
}

impl RunRequest {
    /// Assemble a request for the entry point identified by `glue`.
    #[must_use]
    pub const fn new(
        glue: String,
        features: Vec<ResolvedFeature>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            glue,
            features,
            capabilities,
        }
    }

    /// Identity of the entry point; engines use it to locate step
    /// definitions scoped to that entry point.
    #[must_use]
    pub fn glue(&self) -> &str {
        &self.glue
    }

    /// Resolved feature files in declaration order.
    #[must_use]
    pub fn features(&self) -> &[ResolvedFeature] {
        &self.features
    }

    /// Capabilities supplied by the orchestrator.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

/// An external engine able to execute feature files.
///
/// Implementations block until all features in the request have run, and
/// return an error when any of them failed or the engine itself could not
/// run. Any session the engine opens (a browser, a connection pool) is its
/// own to manage.
#[cfg_attr(test, mockall::automock)]
pub trait FeatureEngine: Send + Sync {
    /// Run the features named by `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot start or any feature
    /// fails.
    fn run(&self, request: &RunRequest) -> Result<(), EngineError>;
}
