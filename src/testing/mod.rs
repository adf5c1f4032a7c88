//! Fixture-driven test runner
//!
//! Feeds `<name>-input.txt` files to a command's stdin and compares its
//! stdout with the matching `<name>-output.txt`.

pub mod diff;
pub mod engine;
pub mod fixtures;
pub mod report;
mod runner;

pub use engine::{execute, TestOutcome};
pub use fixtures::FixturePair;
pub use runner::{run_all, run_test, RunSummary};
