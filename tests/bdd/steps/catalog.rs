//! Steps that inspect the built-in entry point catalog.

use crate::bdd::fixtures::{TestWorld, strip_quotes};
use anyhow::{Context, Result, ensure};
use kensa::catalog;
use kensa::engine::DryRunEngine;
use kensa::harness::Harness;
use kensa::suite::{Selection, Suite};
use rstest_bdd_macros::{given, then, when};
use std::sync::Arc;

#[given("the built-in catalog")]
fn builtin_catalog(world: &TestWorld) -> Result<()> {
    let mut suite = Suite::new();
    catalog::register_builtin(&mut suite, &Harness::new(Arc::new(DryRunEngine)))?;
    *world.suite.borrow_mut() = Some(suite);
    Ok(())
}

#[when("entry points in group {group:string} are selected")]
fn select_group(world: &TestWorld, group: String) -> Result<()> {
    let selection = Selection::from_args(&[strip_quotes(&group).to_owned()], &[])?;
    let suite = world.suite.borrow();
    let suite = suite.as_ref().context("no suite loaded")?;
    match suite.select(&selection) {
        Ok(entries) => {
            world.selection_error.clear();
            world
                .selected
                .set(entries.iter().map(|entry| entry.name().to_owned()).collect());
        }
        Err(err) => {
            world.selected.clear();
            world.selection_error.set(err.to_string());
        }
    }
    Ok(())
}

#[then("selection fails mentioning {text:string}")]
fn selection_fails_with(world: &TestWorld, text: String) -> Result<()> {
    let text = strip_quotes(&text);
    let message = world
        .selection_error
        .get()
        .context("selection unexpectedly succeeded")?;
    ensure!(message.contains(text), "error {message:?} does not mention {text:?}");
    Ok(())
}

#[then("the selection size is {count:usize}")]
fn selection_size(world: &TestWorld, count: usize) -> Result<()> {
    let selected = world.selected.get().context("nothing selected")?;
    ensure!(selected.len() == count, "selected {selected:?}");
    Ok(())
}

#[then("the selected entry point {name:string} declares {count:usize} features")]
fn selected_entry_features(world: &TestWorld, name: String, count: usize) -> Result<()> {
    let name = strip_quotes(&name);
    let selected = world.selected.get().context("nothing selected")?;
    ensure!(selected.iter().any(|n| n == name), "{name} not in {selected:?}");
    let suite = world.suite.borrow();
    let entry = suite
        .as_ref()
        .and_then(|suite| suite.get(name))
        .context("entry point missing from suite")?;
    ensure!(
        entry.features().len() == count,
        "{name} declares {} features",
        entry.features().len()
    );
    Ok(())
}
