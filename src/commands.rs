//! CLI argument definitions

use clap::Args;
use std::path::PathBuf;

use crate::common::config::DEFAULT_TIMEOUT_SECS;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command to be tested (quoted as one argument, e.g. "python3 main.py")
    pub command: String,

    /// Path to folder containing tests (default: ./tests, else the current folder)
    #[arg(long, short = 'f')]
    pub folder: Option<PathBuf>,

    /// Maximum time for a test to run, in seconds
    #[arg(long, short = 't', default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Run only the test with this name (<NAME>-input.txt / <NAME>-output.txt)
    #[arg(long)]
    pub test: Option<String>,

    /// Log debug details to stderr
    #[arg(long, short)]
    pub verbose: bool,
}
