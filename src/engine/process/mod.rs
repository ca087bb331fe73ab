//! Subprocess engine: runs an external BDD runner once per feature file.
//! Internal to `engine`; public API is re-exported from `engine`.

use super::{EngineError, FeatureEngine, FeatureFailure, RunRequest};
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use kensa_env::{ENGINE_ENV, ENTRY_POINT_ENV, capability_var};
use std::{
    env,
    ffi::OsString,
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};
use tracing::{debug, info, warn};

mod redaction;
mod stream;

use redaction::{CommandArg, redact_capability, redact_sensitive_args};
use stream::wait_relaying;

/// Engine program used when nothing else is configured.
pub const DEFAULT_ENGINE_PROGRAM: &str = "cucumber";

fn resolve_engine_program_with<F>(
    explicit: Option<&Utf8Path>,
    configured: Option<&Utf8Path>,
    mut read_env: F,
) -> Utf8PathBuf
where
    F: FnMut(&str) -> Option<OsString>,
{
    if let Some(program) = explicit {
        return program.to_owned();
    }
    read_env(ENGINE_ENV)
        .and_then(|value| Utf8PathBuf::from_path_buf(PathBuf::from(value)).ok())
        .filter(|path| !path.as_str().is_empty())
        .or_else(|| configured.map(Utf8Path::to_owned))
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ENGINE_PROGRAM))
}

/// Choose the engine program.
///
/// An `explicit` program (from the command line) wins, then the
/// `KENSA_ENGINE` environment variable, then the `configured` program from
/// the manifest, then [`DEFAULT_ENGINE_PROGRAM`].
#[must_use]
pub fn resolve_engine_program(
    explicit: Option<&Utf8Path>,
    configured: Option<&Utf8Path>,
) -> Utf8PathBuf {
    resolve_engine_program_with(explicit, configured, |key| env::var_os(key))
}

/// Runs `<program> <args...> --glue <entry> <feature>` for each feature.
///
/// Features run sequentially in declaration order. Capabilities are exported
/// to the child as `KENSA_CAPABILITY_<KEY>` and the entry identity as
/// `KENSA_ENTRY_POINT`. Child output is streamed to the parent's stdout and
/// stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEngine {
    program: Utf8PathBuf,
    args: Vec<String>,
    working_dir: Option<Utf8PathBuf>,
    fail_fast: bool,
}

impl ProcessEngine {
    /// Create an engine that launches `program`.
    #[must_use]
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            fail_fast: false,
        }
    }

    /// Arguments inserted before `--glue` on every invocation.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Directory the engine process starts in.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Stop after the first failing feature instead of running the rest.
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// The program this engine launches.
    #[must_use]
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Extra arguments passed on every invocation.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command_for(&self, request: &RunRequest, feature: &Utf8Path) -> Command {
        let mut cmd = Command::new(self.program.as_std_path());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir.as_std_path());
        }
        cmd.args(&self.args);
        cmd.arg("--glue").arg(request.glue());
        cmd.arg(feature.as_std_path());
        cmd.env(ENTRY_POINT_ENV, request.glue());
        for (key, value) in request.capabilities().iter() {
            cmd.env(capability_var(key), value);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    fn run_feature(
        &self,
        request: &RunRequest,
        feature: &Utf8Path,
    ) -> Result<ExitStatus, EngineError> {
        let mut cmd = self.command_for(request, feature);
        log_invocation(&cmd, request);
        let child = cmd.spawn().map_err(|source| EngineError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        wait_relaying(child).map_err(|source| EngineError::Io {
            program: self.program.clone(),
            source,
        })
    }
}

impl FeatureEngine for ProcessEngine {
    fn run(&self, request: &RunRequest) -> Result<(), EngineError> {
        let mut failures = Vec::new();
        for feature in request.features() {
            let status = self.run_feature(request, feature.path())?;
            if status.success() {
                debug!(glue = request.glue(), feature = %feature.path(), "feature passed");
                continue;
            }
            warn!(
                glue = request.glue(),
                feature = %feature.path(),
                %status,
                "feature failed"
            );
            failures.push(FeatureFailure {
                feature: feature.path().to_owned(),
                code: status.code(),
            });
            if self.fail_fast {
                break;
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(EngineError::FeaturesFailed {
                glue: request.glue().to_owned(),
                failures,
            })
        }
    }
}

fn log_invocation(cmd: &Command, request: &RunRequest) {
    let args: Vec<CommandArg> = cmd
        .get_args()
        .map(|arg| CommandArg::new(arg.to_string_lossy().into_owned()))
        .collect();
    let shown = redact_sensitive_args(&args)
        .iter()
        .map(CommandArg::as_str)
        .join(" ");
    info!(
        entry = request.glue(),
        "running {} {shown}",
        cmd.get_program().to_string_lossy()
    );
    for (key, value) in request.capabilities().iter() {
        debug!(
            var = %capability_var(key),
            value = redact_capability(key, value),
            "exporting capability"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_program_wins_over_everything() {
        let resolved = resolve_engine_program_with(
            Some(Utf8Path::new("/opt/cli-engine")),
            Some(Utf8Path::new("manifest-engine")),
            |_| Some(OsString::from("/opt/env-engine")),
        );
        assert_eq!(resolved, Utf8PathBuf::from("/opt/cli-engine"));
    }

    #[test]
    fn environment_override_beats_manifest() {
        let resolved = resolve_engine_program_with(
            None,
            Some(Utf8Path::new("manifest-engine")),
            |_| Some(OsString::from("/opt/env-engine")),
        );
        assert_eq!(resolved, Utf8PathBuf::from("/opt/env-engine"));
    }

    #[test]
    fn manifest_program_used_without_override() {
        let resolved =
            resolve_engine_program_with(None, Some(Utf8Path::new("manifest-engine")), |_| None);
        assert_eq!(resolved, Utf8PathBuf::from("manifest-engine"));
    }

    #[test]
    fn empty_environment_override_is_ignored() {
        let resolved = resolve_engine_program_with(None, None, |_| Some(OsString::new()));
        assert_eq!(resolved, Utf8PathBuf::from(DEFAULT_ENGINE_PROGRAM));
    }

    #[test]
    fn command_line_places_glue_before_feature() {
        let engine = ProcessEngine::new("runner").with_args(vec!["--strict".into()]);
        let request = RunRequest::new(
            "Login_IT".into(),
            Vec::new(),
            crate::harness::Capabilities::new(),
        );
        let cmd = engine.command_for(&request, Utf8Path::new("f/A.feature"));
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, ["--strict", "--glue", "Login_IT", "f/A.feature"]);
    }
}
