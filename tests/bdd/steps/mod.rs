//! Step definition modules for BDD scenarios.
//!
//! Steps are registered via `#[given]`, `#[when]` and `#[then]` attribute
//! macros, so nothing needs re-exporting from here.
//!
//! The `rstest-bdd` macros generate wrapper code for each step function that
//! trips several Clippy lints, so the suppressions live here once:
//! - `shadow_reuse`: parameters are re-bound after stripping quotes
//! - `unnecessary_wraps`: the macros require `Result` returns for all steps
//! - `needless_pass_by_value`: captured parameters arrive as owned strings

#![expect(
    clippy::shadow_reuse,
    reason = "rstest-bdd step parameters are re-bound after quote stripping"
)]
#![expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd macros require Result returns for step functions"
)]
#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step signatures take captured parameters by value"
)]

mod catalog;
mod engine;
mod entry_point;
mod suite;
