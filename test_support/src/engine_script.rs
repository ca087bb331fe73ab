//! Shell scripts standing in for an external BDD engine.
//!
//! The process engine invokes `<program> [args...] --glue <entry> <feature>`,
//! so the feature path is always the last argument.

use kensa_env::{CAPABILITY_ENV_PREFIX, ENTRY_POINT_ENV};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_script(body: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("engine");
    let mut file = File::create(&path).expect("script");
    writeln!(file, "#!/bin/sh\n{body}").expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).expect("meta").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("perms");
    }
    (dir, path)
}

/// Create a fake engine that exits with `exit_code` for every feature.
///
/// Returns the temporary directory and the path to the executable.
pub fn fake_engine(exit_code: i32) -> (TempDir, PathBuf) {
    write_script(&format!("exit {exit_code}"))
}

/// Create a fake engine that fails only for features whose path contains
/// `needle`.
pub fn fake_engine_failing_on(needle: &str) -> (TempDir, PathBuf) {
    write_script(&format!(
        "for arg in \"$@\"; do last=\"$arg\"; done\n\
         case \"$last\" in *{needle}*) echo \"failing $last\" >&2; exit 1;; esac\n\
         exit 0"
    ))
}

/// A fake engine that appends one line per invocation to a log file.
///
/// Each line has the form `<entry>|<browser capability>|<arguments>`.
#[derive(Debug)]
pub struct RecordingEngine {
    dir: TempDir,
    program: PathBuf,
}

impl RecordingEngine {
    /// Create the script; it exits with `exit_code` after recording.
    #[must_use]
    pub fn new(exit_code: i32) -> Self {
        let log = "\"$(dirname \"$0\")/invocations.log\"";
        let (dir, program) = write_script(&format!(
            "echo \"${ENTRY_POINT_ENV}|${CAPABILITY_ENV_PREFIX}BROWSER|$*\" >> {log}\n\
             exit {exit_code}"
        ));
        Self { dir, program }
    }

    /// Path of the executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Recorded invocations in order; empty when the engine never ran.
    #[must_use]
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("invocations.log"))
            .map(|log| log.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}
