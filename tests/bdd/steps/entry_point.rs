//! Steps for declaring entry points and executing their features.

use super::engine::harness;
use crate::bdd::fixtures::{TestWorld, strip_quotes};
use anyhow::{Context, Result, ensure};
use kensa::engine::DryRunEngine;
use kensa::entry::{EntryPoint, EntryPointConfig};
use kensa::harness::Harness;
use rstest_bdd_macros::{given, then, when};
use std::sync::Arc;

fn declare(world: &TestWorld, name: &str, features: [&str; 2], enabled: bool) {
    let mut config = EntryPointConfig::new(strip_quotes(name))
        .feature(strip_quotes(features[0]))
        .feature(strip_quotes(features[1]));
    if !enabled {
        config = config.disabled();
    }
    world.declarations.borrow_mut().push(config);
}

#[given("an entry point {name:string} bound to {first:string} and {second:string}")]
fn entry_point(world: &TestWorld, name: String, first: String, second: String) -> Result<()> {
    declare(world, &name, [first.as_str(), second.as_str()], true);
    Ok(())
}

#[given("a disabled entry point {name:string} bound to {first:string} and {second:string}")]
fn disabled_entry_point(
    world: &TestWorld,
    name: String,
    first: String,
    second: String,
) -> Result<()> {
    declare(world, &name, [first.as_str(), second.as_str()], false);
    Ok(())
}

#[when("an entry point {name:string} is declared with no features")]
fn declare_without_features(world: &TestWorld, name: String) -> Result<()> {
    let harness = Harness::new(Arc::new(DryRunEngine));
    match EntryPoint::new(EntryPointConfig::new(strip_quotes(&name)), harness) {
        Ok(_) => world.declaration_error.clear(),
        Err(err) => world.declaration_error.set(err.to_string()),
    }
    Ok(())
}

#[when("the entry point executes its features")]
fn execute(world: &TestWorld) -> Result<()> {
    let config = world
        .declarations
        .borrow()
        .first()
        .cloned()
        .context("no entry point declared")?;
    let entry = EntryPoint::new(config, harness(world, false)?)?;
    let outcome = entry
        .execute_features()
        .map_err(|err| format!("{:#}", anyhow::Error::new(err)));
    world.outcome.set(outcome);
    Ok(())
}

#[then("execution succeeds")]
fn execution_succeeds(world: &TestWorld) -> Result<()> {
    let outcome = world.outcome.get().context("nothing was executed")?;
    ensure!(outcome.is_ok(), "execution failed: {outcome:?}");
    Ok(())
}

#[then("execution fails mentioning {text:string}")]
fn execution_fails_with(world: &TestWorld, text: String) -> Result<()> {
    let text = strip_quotes(&text);
    let outcome = world.outcome.get().context("nothing was executed")?;
    let Err(message) = outcome else {
        anyhow::bail!("execution unexpectedly succeeded");
    };
    ensure!(message.contains(text), "error {message:?} does not mention {text:?}");
    Ok(())
}

#[then("declaration fails mentioning {text:string}")]
fn declaration_fails_with(world: &TestWorld, text: String) -> Result<()> {
    let text = strip_quotes(&text);
    let message = world
        .declaration_error
        .get()
        .context("declaration unexpectedly succeeded")?;
    ensure!(message.contains(text), "error {message:?} does not mention {text:?}");
    Ok(())
}
