//! Test utilities for kensa.
//!
//! Fake engine executables, feature workspaces and helpers that serialise
//! environment mutation across tests.

pub mod engine_script;
pub mod env_lock;
pub mod env_var_guard;
pub mod workspace;

pub use engine_script::{RecordingEngine, fake_engine, fake_engine_failing_on};
pub use workspace::FeatureWorkspace;
