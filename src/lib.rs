//! Kensa core library.
//!
//! Acceptance-test entry points bound to feature files and executed through
//! an external BDD engine. An [`entry::EntryPoint`] declares its features up
//! front and runs them with [`entry::EntryPoint::execute_features`]; a
//! [`suite::Suite`] registers entry points explicitly and runs a selection of
//! them. The command line front end lives in [`cli`] and [`runner`].

pub mod ast;
pub mod catalog;
pub mod cli;
pub mod engine;
pub mod entry;
pub mod feature;
pub mod harness;
pub mod manifest;
pub mod runner;
pub mod suite;
