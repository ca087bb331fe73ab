//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. It depends
//! only on `clap` and `std` so `build.rs` can include it to render the man
//! page.

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Parse a `KEY=VALUE` capability override.
fn parse_capability(s: &str) -> Result<(String, String), String> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(format!("capability '{s}' must have the form KEY=VALUE"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("capability '{s}' has an empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Run acceptance-test entry points through an external BDD engine.
#[derive(Debug, Parser, PartialEq, Eq, Clone)]
#[command(name = "kensa", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the kensa manifest. Without one, the built-in entry points
    /// are used.
    #[arg(short, long, value_name = "FILE", default_value = "kensa.yml")]
    pub file: PathBuf,

    /// Change to this directory before doing anything.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Engine program to launch; overrides `KENSA_ENGINE` and the manifest.
    #[arg(long, value_name = "PROGRAM")]
    pub engine: Option<PathBuf>,

    /// Capability passed to every entry point, e.g. `browser=chrome`.
    ///
    /// May be repeated. Overrides capabilities declared in the manifest.
    #[arg(short = 'c', long = "capability", value_name = "KEY=VALUE", value_parser = parse_capability)]
    pub capabilities: Vec<(String, String)>,

    /// Optional subcommand to execute; defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `run` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Run(RunArgs::default()));
        }
        self
    }
}

/// Filters shared by the commands that act on a subset of entry points.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct SelectionArgs {
    /// Only entry points in this group. May be repeated.
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Only the named entry point. May be repeated.
    #[arg(short = 'e', long = "entry", value_name = "NAME")]
    pub entries: Vec<String>,
}

/// Arguments accepted by the `run` command.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct RunArgs {
    /// Which entry points to run.
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Stop at the first failing feature or entry point.
    #[arg(long)]
    pub fail_fast: bool,

    /// Log the features that would run without launching the engine.
    #[arg(long)]
    pub dry_run: bool,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Execute entry points (the default).
    Run(RunArgs),

    /// List registered entry points with their groups and feature counts.
    List {
        /// Only entry points in this group. May be repeated.
        #[arg(short = 'g', long = "group", value_name = "GROUP")]
        groups: Vec<String>,
    },

    /// Validate entry points and resolve their features without running them.
    Check(SelectionArgs),
}
