//! Run configuration
//!
//! Everything comes from command-line flags; there is no config file.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::{Error, Result};

/// Default per-test timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Folder searched for fixtures when none is given
pub const DEFAULT_TESTS_DIR: &str = "./tests";

/// The command under test, tokenized once with shell-style quoting rules
///
/// Quotes and backslash escapes are resolved. Pipes, redirections and
/// variables are passed through as literal tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Tokenize a command string
    pub fn parse(command: &str) -> Result<Self> {
        let tokens = shlex::split(command).ok_or_else(|| {
            Error::Config(format!("Unbalanced quoting in command '{}'", command))
        })?;

        if tokens.is_empty() {
            return Err(Error::Config("Command must not be empty".to_string()));
        }

        Ok(Self { tokens })
    }

    /// Program path or name (first token)
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.tokens.iter().map(String::as_str)) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => f.write_str(&self.tokens.join(" ")),
        }
    }
}

/// Fully resolved settings for one harness invocation
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Program under test
    pub command: CommandLine,

    /// Fixtures folder; `None` means the default lookup
    pub folder: Option<PathBuf>,

    /// Wall-clock budget per test
    pub timeout: Duration,

    /// Run only the fixture with this stem
    pub test: Option<String>,
}

impl RunConfig {
    /// Build a configuration from raw flag values
    pub fn new(
        command: &str,
        folder: Option<PathBuf>,
        timeout_secs: u64,
        test: Option<String>,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(Error::Config(
                "Timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            command: CommandLine::parse(command)?,
            folder,
            timeout: Duration::from_secs(timeout_secs),
            test,
        })
    }
}
