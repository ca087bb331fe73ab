//! Engine that records intent without running anything.

use super::{EngineError, FeatureEngine, RunRequest};
use tracing::info;

/// Logs each feature it would hand to a real engine and reports success.
///
/// # Examples
/// ```
/// use kensa::engine::{DryRunEngine, FeatureEngine, RunRequest};
/// use kensa::harness::Capabilities;
/// let request = RunRequest::new("Smoke_IT".into(), Vec::new(), Capabilities::new());
/// assert!(DryRunEngine.run(&request).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunEngine;

impl FeatureEngine for DryRunEngine {
    fn run(&self, request: &RunRequest) -> Result<(), EngineError> {
        for feature in request.features() {
            info!(glue = request.glue(), feature = %feature.path(), "dry run: would execute");
        }
        Ok(())
    }
}
