//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the manifest (or falls back to the built-in catalog), builds the
//! suite, and dispatches to `run`, `list` or `check`.

mod error;

pub use error::RunnerError;

use crate::cli::{Cli, Commands, RunArgs, SelectionArgs};
use crate::engine::{DryRunEngine, FeatureEngine, ProcessEngine, resolve_engine_program};
use crate::harness::{Capabilities, Harness};
use crate::suite::{Selection, Suite};
use crate::{ast::KensaManifest, catalog, manifest};
use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use std::{
    env,
    io::{self, Write},
    path::Path,
    sync::Arc,
};
use tracing::{debug, info};

/// Where the entry points come from.
enum Source {
    Manifest {
        manifest: Box<KensaManifest>,
        dir: Utf8PathBuf,
    },
    Builtin {
        dir: Utf8PathBuf,
    },
}

/// Execute the parsed [`Cli`], writing command output to stdout.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any entry point fails.
pub fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    run_with_output(cli, &mut lock)
}

/// Execute the parsed [`Cli`], writing command output to `out`.
///
/// Engine output still streams to the process's own stdout and stderr.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any entry point fails.
pub fn run_with_output<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));
    let source = load_source(cli)?;
    let overrides = Capabilities::from_pairs(cli.capabilities.iter().cloned())
        .context("invalid --capability")?;

    match command {
        Commands::Run(args) => {
            let engine = build_engine(cli, &source, &args)?;
            let suite = build_suite(&source, engine, &overrides)?;
            handle_run(&suite, &args, out)
        }
        Commands::List { groups } => {
            let suite = build_suite(&source, Arc::new(DryRunEngine), &overrides)?;
            let selection = Selection::from_args(&groups, &[])?;
            handle_list(&suite, &selection, out)
        }
        Commands::Check(args) => {
            let suite = build_suite(&source, Arc::new(DryRunEngine), &overrides)?;
            handle_check(&suite, &selection_for(&args)?, out)
        }
    }
}

fn selection_for(args: &SelectionArgs) -> Result<Selection> {
    Ok(Selection::from_args(&args.groups, &args.entries)?)
}

fn handle_run<W: Write>(suite: &Suite, args: &RunArgs, out: &mut W) -> Result<()> {
    let selection = selection_for(&args.selection)?;
    let report = suite.run(&selection, args.fail_fast)?;
    writeln!(out, "{report}").context("write run report")?;
    if report.is_success() {
        info!(passed = report.passed(), "all entry points passed");
        Ok(())
    } else {
        Err(RunnerError::EntriesFailed {
            failed: report.failed(),
            total: report.outcomes().len(),
        }
        .into())
    }
}

fn handle_list<W: Write>(suite: &Suite, selection: &Selection, out: &mut W) -> Result<()> {
    for entry in suite.select(selection)? {
        let groups = entry.groups().iter().join(", ");
        let disabled = if entry.is_enabled() { "" } else { " disabled" };
        writeln!(
            out,
            "{} [{groups}] ({} features){disabled}",
            entry.name(),
            entry.features().len()
        )
        .context("write entry listing")?;
    }
    Ok(())
}

fn handle_check<W: Write>(suite: &Suite, selection: &Selection, out: &mut W) -> Result<()> {
    let entries = suite.select(selection)?.len();
    let features = suite.check(selection)?;
    writeln!(
        out,
        "{entries} entry point(s) OK, {features} feature file(s) resolved"
    )
    .context("write check summary")?;
    Ok(())
}

fn build_suite(
    source: &Source,
    engine: Arc<dyn FeatureEngine>,
    overrides: &Capabilities,
) -> Result<Suite> {
    let suite = match source {
        Source::Manifest { manifest, dir } => {
            let harness = manifest::harness_for(manifest, dir, engine, overrides)?;
            manifest::build_suite(manifest, &harness)?
        }
        Source::Builtin { dir } => {
            let harness = Harness::new(engine)
                .with_capabilities(overrides.clone())
                .with_feature_root(dir.clone());
            let mut suite = Suite::new();
            catalog::register_builtin(&mut suite, &harness)?;
            suite
        }
    };
    debug!(entries = suite.len(), "suite ready");
    Ok(suite)
}

fn build_engine(cli: &Cli, source: &Source, args: &RunArgs) -> Result<Arc<dyn FeatureEngine>> {
    if args.dry_run {
        return Ok(Arc::new(DryRunEngine));
    }
    let explicit = cli.engine.as_deref().map(utf8_path).transpose()?;
    let (configured, engine_args) = match source {
        Source::Manifest { manifest, .. } => (
            manifest.engine.program.clone(),
            manifest::split_engine_args(manifest)?,
        ),
        Source::Builtin { .. } => (None, Vec::new()),
    };
    let program = resolve_engine_program(explicit, configured.as_deref());
    debug!(%program, "selected engine program");
    let mut engine = ProcessEngine::new(program)
        .with_args(engine_args)
        .with_fail_fast(args.fail_fast);
    if let Some(dir) = &cli.directory {
        engine = engine.with_working_dir(utf8_path(dir)?.to_owned());
    }
    Ok(Arc::new(engine))
}

fn load_source(cli: &Cli) -> Result<Source> {
    let base = match &cli.directory {
        Some(dir) => absolute(utf8_path(dir)?)?,
        None => absolute(Utf8Path::new("."))?,
    };
    let file = utf8_path(&cli.file)?;
    let path = base.join(file);
    if path.is_file() {
        info!(manifest = %path, "loading manifest");
        let manifest = manifest::from_path(&path)
            .with_context(|| format!("loading manifest {path}"))?;
        let dir = path.parent().map_or_else(|| base.clone(), Utf8Path::to_owned);
        return Ok(Source::Manifest {
            manifest: Box::new(manifest),
            dir,
        });
    }
    if file == Utf8Path::new(manifest::DEFAULT_MANIFEST) {
        info!("no {} found; using built-in entry points", manifest::DEFAULT_MANIFEST);
        return Ok(Source::Builtin { dir: base });
    }
    Err(RunnerError::ManifestNotFound { path }.into())
}

fn utf8_path(path: &Path) -> Result<&Utf8Path> {
    Utf8Path::from_path(path).ok_or_else(|| anyhow!("path {} is not valid UTF-8", path.display()))
}

/// Make `path` absolute against the current directory so feature paths
/// stay valid when the engine runs elsewhere.
fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let cwd = env::current_dir().context("resolve current directory")?;
    let joined = cwd.join(path.as_std_path());
    Utf8PathBuf::from_path_buf(joined)
        .map_err(|invalid| anyhow!("path {} is not valid UTF-8", invalid.display()))
}
