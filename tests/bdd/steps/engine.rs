//! Steps that choose the engine and inspect its invocations.

use crate::bdd::fixtures::{TestWorld, strip_quotes};
use anyhow::{Context, Result, anyhow, ensure};
use camino::Utf8PathBuf;
use kensa::engine::ProcessEngine;
use kensa::harness::Harness;
use rstest_bdd_macros::{given, then};
use std::sync::Arc;
use test_support::{FeatureWorkspace, RecordingEngine, fake_engine, fake_engine_failing_on};

/// Build a harness around the scenario's engine and workspace.
pub(crate) fn harness(world: &TestWorld, fail_fast: bool) -> Result<Harness> {
    let program = world
        .engine_program
        .get()
        .context("no engine has been configured")?;
    let program = Utf8PathBuf::from_path_buf(program)
        .map_err(|path| anyhow!("engine path {} is not UTF-8", path.display()))?;
    let engine = ProcessEngine::new(program).with_fail_fast(fail_fast);
    let root = world
        .workspace
        .borrow()
        .as_ref()
        .map_or_else(|| Utf8PathBuf::from("."), |ws| ws.root().to_owned());
    Ok(Harness::new(Arc::new(engine)).with_feature_root(root))
}

#[given("a feature workspace containing {first:string} and {second:string}")]
fn feature_workspace(world: &TestWorld, first: String, second: String) -> Result<()> {
    let workspace = FeatureWorkspace::new();
    workspace.write_feature(strip_quotes(&first));
    workspace.write_feature(strip_quotes(&second));
    *world.workspace.borrow_mut() = Some(workspace);
    Ok(())
}

#[given("an engine that exits with {code:i32}")]
fn engine_exiting_with(world: &TestWorld, code: i32) -> Result<()> {
    let (dir, program) = fake_engine(code);
    world.engine_program.set(program);
    *world.engine_dir.borrow_mut() = Some(dir);
    Ok(())
}

#[given("an engine that fails on {needle:string}")]
fn engine_failing_on(world: &TestWorld, needle: String) -> Result<()> {
    let (dir, program) = fake_engine_failing_on(strip_quotes(&needle));
    world.engine_program.set(program);
    *world.engine_dir.borrow_mut() = Some(dir);
    Ok(())
}

#[given("a recording engine")]
fn recording_engine(world: &TestWorld) -> Result<()> {
    let recording = RecordingEngine::new(0);
    world.engine_program.set(recording.program().to_path_buf());
    *world.recording.borrow_mut() = Some(recording);
    Ok(())
}

fn invocations(world: &TestWorld) -> Result<Vec<String>> {
    world
        .recording
        .borrow()
        .as_ref()
        .map(RecordingEngine::invocations)
        .context("scenario has no recording engine")
}

#[then("the engine ran {count:usize} times for {name:string}")]
fn engine_ran_for(world: &TestWorld, count: usize, name: String) -> Result<()> {
    let prefix = format!("{}|", strip_quotes(&name));
    let calls = invocations(world)?;
    let matching = calls.iter().filter(|line| line.starts_with(&prefix)).count();
    ensure!(matching == count, "expected {count} runs, got {calls:?}");
    Ok(())
}

#[then("the engine was never invoked")]
fn engine_never_invoked(world: &TestWorld) -> Result<()> {
    let calls = invocations(world)?;
    ensure!(calls.is_empty(), "unexpected invocations: {calls:?}");
    Ok(())
}
