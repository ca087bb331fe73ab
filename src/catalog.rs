//! Entry points shipped with the crate.
//!
//! These are registered explicitly at start-up when no manifest is present.

use crate::entry::{ConfigError, EntryPoint, EntryPointConfig};
use crate::feature::GroupTag;
use crate::harness::Harness;
use crate::suite::Suite;

/// Name of the centralized-logging entry point.
pub const CENTRALIZED_LOGGING_ENTRY: &str = "SPARTA_1678_Centralized_Loggin_IT";

/// Group the centralized-logging entry point belongs to.
pub const CENTRALIZED_LOGGING_GROUP: &str = "dcos_centralLoggin";

/// Feature covering centralized logging of application executions.
pub const CENTRALIZED_LOGGING_APP_FEATURE: &str = "src/test/resources/features/automated/dcos/02_executions/SPARTA_1678_Centralized_Logging_App_IT.feature";

/// Feature covering centralized logging of workflow executions.
pub const CENTRALIZED_LOGGING_WORKFLOW_FEATURE: &str = "src/test/resources/features/automated/dcos/02_executions/SPARTA_1678_Centralized_Logging_Workflow_IT.feature";

/// Declarations of every built-in entry point.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidGroup`] if a built-in group label is
/// malformed.
pub fn builtin_configs() -> Result<Vec<EntryPointConfig>, ConfigError> {
    let centralized_logging = EntryPointConfig::new(CENTRALIZED_LOGGING_ENTRY)
        .feature(CENTRALIZED_LOGGING_APP_FEATURE)
        .feature(CENTRALIZED_LOGGING_WORKFLOW_FEATURE)
        .group(GroupTag::new(CENTRALIZED_LOGGING_GROUP)?);
    Ok(vec![centralized_logging])
}

/// Register the built-in entry points into `suite`, bound to `harness`.
///
/// # Errors
///
/// Returns a [`ConfigError`] when a built-in declaration is invalid or its
/// name is already registered.
pub fn register_builtin(suite: &mut Suite, harness: &Harness) -> Result<(), ConfigError> {
    for config in builtin_configs()? {
        suite.register(EntryPoint::new(config, harness.clone())?)?;
    }
    Ok(())
}
