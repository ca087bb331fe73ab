//! Steps that run several entry points as a suite.

use super::engine::harness;
use crate::bdd::fixtures::{TestWorld, strip_quotes};
use anyhow::{Context, Result, ensure};
use kensa::entry::EntryPoint;
use kensa::suite::{Selection, Suite};
use rstest_bdd_macros::{then, when};

fn run_suite(world: &TestWorld, fail_fast: bool) -> Result<()> {
    let harness = harness(world, fail_fast)?;
    let mut suite = Suite::new();
    for config in world.declarations.borrow().iter().cloned() {
        suite.register(EntryPoint::new(config, harness.clone())?)?;
    }
    let report = suite.run(&Selection::all(), fail_fast)?;
    world.report.set(report.to_string());
    Ok(())
}

#[when("the suite runs")]
fn suite_runs(world: &TestWorld) -> Result<()> {
    run_suite(world, false)
}

#[when("the suite runs with fail-fast")]
fn suite_runs_fail_fast(world: &TestWorld) -> Result<()> {
    run_suite(world, true)
}

#[then("the report shows {text:string}")]
fn report_shows(world: &TestWorld, text: String) -> Result<()> {
    let text = strip_quotes(&text);
    let report = world.report.get().context("suite has not run")?;
    ensure!(report.contains(text), "report {report:?} does not show {text:?}");
    Ok(())
}
