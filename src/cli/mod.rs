//! CLI command handling
//!
//! Turns parsed arguments into a run configuration and hands it to the
//! runner.

use crate::commands::RunArgs;
use crate::common::config::RunConfig;
use crate::common::Result;
use crate::testing;

/// Exit status when every test passed
pub const EXIT_PASSED: i32 = 0;
/// Exit status when at least one test failed
pub const EXIT_FAILED: i32 = 1;
/// Exit status for configuration or environment errors
pub const EXIT_ERROR: i32 = 2;

/// Run the tests described by `args`, returning the process exit code
pub async fn dispatch(args: RunArgs) -> Result<i32> {
    let config = RunConfig::new(&args.command, args.folder, args.timeout, args.test)?;

    tracing::debug!(command = %config.command, ?config.timeout, "starting run");

    let passed = match &config.test {
        Some(name) => {
            testing::run_test(&config.command, config.folder.as_deref(), name, config.timeout)
                .await?
                .is_pass()
        }
        None => testing::run_all(&config.command, config.folder.as_deref(), config.timeout)
            .await?
            .all_passed(),
    };

    Ok(if passed { EXIT_PASSED } else { EXIT_FAILED })
}
