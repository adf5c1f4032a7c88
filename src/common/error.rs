//! Error types for the test harness
//!
//! Only configuration and environment problems are errors. A test that
//! fails, times out or writes to stderr is a `TestOutcome`, not an `Error`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Tests folder '{0}' is not an existing folder")]
    NotAFolder(String),

    #[error("Mismatched fixture counts: {inputs} input file(s) but {outputs} output file(s)")]
    FixtureCountMismatch { inputs: usize, outputs: usize },

    #[error("Fixture names do not pair up: '{input}' is matched with '{expected}'")]
    FixtureNameMismatch { input: String, expected: String },

    #[error("Test '{name}' not found in '{folder}' (expected {name}-input.txt and {name}-output.txt)")]
    TestNotFound { name: String, folder: String },

    #[error("Configuration error: {0}")]
    Config(String),

    // === Environment Errors ===
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a spawn error for a program
    pub fn spawn(program: &str, source: io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            source,
        }
    }

    /// Whether this error was caused by bad configuration rather than the
    /// environment
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::NotAFolder(_)
                | Error::FixtureCountMismatch { .. }
                | Error::FixtureNameMismatch { .. }
                | Error::TestNotFound { .. }
                | Error::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mismatch_message() {
        let err = Error::FixtureCountMismatch {
            inputs: 3,
            outputs: 2,
        };
        assert_eq!(
            err.to_string(),
            "Mismatched fixture counts: 3 input file(s) but 2 output file(s)"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_spawn_is_not_configuration() {
        let err = Error::spawn(
            "missing-binary",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(!err.is_configuration());
        assert!(err.to_string().starts_with("Failed to start 'missing-binary'"));
    }
}
