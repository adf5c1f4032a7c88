//! iotest - black-box stdin/stdout test harness
//!
//! This library locates input/expected-output fixture pairs, runs a
//! command against each one with a timeout, and reports pass/fail with a
//! line diff on mismatch.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::config::{CommandLine, RunConfig};
pub use common::{Error, Result};
pub use testing::{FixturePair, RunSummary, TestOutcome};
