//! Batch runner
//!
//! Runs fixtures one at a time, in input-path order, and folds each
//! outcome into a `RunSummary`.

use std::path::Path;
use std::time::Duration;

use crate::common::config::CommandLine;
use crate::common::Result;

use super::engine::{self, TestOutcome};
use super::{fixtures, report};

/// Totals for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    /// Sum of elapsed time over passing tests only
    pub elapsed: Duration,
}

impl RunSummary {
    /// Fold one outcome into the totals
    pub fn record(self, outcome: &TestOutcome) -> Self {
        match outcome.elapsed() {
            Some(elapsed) => Self {
                total: self.total + 1,
                passed: self.passed + 1,
                elapsed: self.elapsed + elapsed,
            },
            None => Self {
                total: self.total + 1,
                ..self
            },
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Run every fixture in `folder` and print a summary
///
/// Fixture problems (missing folder, unpaired files) are reported before
/// any test runs.
pub async fn run_all(
    command: &CommandLine,
    folder: Option<&Path>,
    timeout: Duration,
) -> Result<RunSummary> {
    let folder = fixtures::resolve_folder(folder)?;
    let pairs = fixtures::locate(&folder)?;

    tracing::info!(
        folder = %folder.display(),
        count = pairs.len(),
        "running fixtures"
    );

    let mut summary = RunSummary::default();
    for pair in &pairs {
        let outcome = engine::execute(command, pair, timeout).await?;
        summary = summary.record(&outcome);
    }

    report::summary(&summary);
    Ok(summary)
}

/// Run the single fixture whose stem is `name`
pub async fn run_test(
    command: &CommandLine,
    folder: Option<&Path>,
    name: &str,
    timeout: Duration,
) -> Result<TestOutcome> {
    let folder = fixtures::resolve_folder(folder)?;
    let pair = fixtures::find(&folder, name)?;

    engine::execute(command, &pair, timeout).await
}
