//! Execution and comparison engine
//!
//! Runs the command under test against one fixture and classifies the
//! result. Classification order is fixed: timeout, then stderr output,
//! then stdout mismatch.

use std::fs::File;
use std::io::Read;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command as TokioCommand};

use crate::common::config::CommandLine;
use crate::common::{Error, Result};

use super::diff::LineDiff;
use super::fixtures::FixturePair;
use super::report;

/// Result of running one fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Stdout matched and stderr was empty
    Passed { elapsed: Duration },
    /// The command did not finish within the timeout and was killed
    TimedOut,
    /// The command wrote to stderr
    ErroredOnStderr { stderr: String },
    /// Stdout differed from the expected output
    OutputMismatch { diff: LineDiff },
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Passed { .. })
    }

    /// Elapsed time, only recorded for passing tests
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            TestOutcome::Passed { elapsed } => Some(*elapsed),
            _ => None,
        }
    }
}

/// Run `command` with the fixture's input on stdin, report and return the
/// outcome
///
/// Failing to start the command is an error, not an outcome.
pub async fn execute(
    command: &CommandLine,
    pair: &FixturePair,
    timeout: Duration,
) -> Result<TestOutcome> {
    let outcome = evaluate(command, pair, timeout).await?;
    report::outcome(pair, &outcome);
    Ok(outcome)
}

async fn evaluate(
    command: &CommandLine,
    pair: &FixturePair,
    timeout: Duration,
) -> Result<TestOutcome> {
    // Both handles are closed when this function returns, on every path
    let input = File::open(&pair.input).map_err(|e| Error::file_read(&pair.input, &e))?;
    let mut expected_file =
        File::open(&pair.expected).map_err(|e| Error::file_read(&pair.expected, &e))?;

    let start = Instant::now();

    let mut cmd = TokioCommand::new(command.program());
    cmd.args(command.args())
        .stdin(Stdio::from(input))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so a timeout also takes down anything it forked
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::spawn(command.program(), e))?;

    tracing::debug!(
        test = %pair.name,
        pid = ?child.id(),
        command = %command,
        "spawned command"
    );

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let waited = tokio::time::timeout(timeout, async {
        // Drain both pipes while waiting so a chatty child cannot block
        let (status, out, err) =
            tokio::join!(child.wait(), read_stream(stdout), read_stream(stderr));
        Ok::<_, std::io::Error>((status?, out?, err?))
    })
    .await;

    let (status, out, err) = match waited {
        Ok(result) => result?,
        Err(_) => {
            tracing::debug!(test = %pair.name, ?timeout, "timed out, killing");
            terminate(&mut child).await;
            return Ok(TestOutcome::TimedOut);
        }
    };

    let elapsed = start.elapsed();
    tracing::debug!(test = %pair.name, ?status, ?elapsed, "command finished");

    let output = split_lines(&out);
    let mut expected_bytes = Vec::new();
    expected_file
        .read_to_end(&mut expected_bytes)
        .map_err(|e| Error::file_read(&pair.expected, &e))?;
    let expected = split_lines(&expected_bytes);

    let errors = normalize_newlines(&String::from_utf8_lossy(&err));
    if !errors.is_empty() {
        return Ok(TestOutcome::ErroredOnStderr { stderr: errors });
    }

    if output != expected {
        return Ok(TestOutcome::OutputMismatch {
            diff: LineDiff::compute(&expected, &output),
        });
    }

    Ok(TestOutcome::Passed { elapsed })
}

async fn read_stream<R>(stream: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the child (and its process group on Unix) and reap it
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // Negative pid targets the whole process group
        let result = unsafe { libc::kill(-(pid as i32), libc::SIGKILL) };
        if result != 0 {
            tracing::trace!(pid, "process group already gone");
        }
    }

    // Fails only if the child already exited while its pipes stayed open
    if let Err(e) = child.kill().await {
        tracing::debug!("Failed to kill timed out command: {}", e);
    }
}

/// Decode captured bytes as text and split into lines that keep their
/// terminator
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    normalize_newlines(&String::from_utf8_lossy(bytes))
        .split_inclusive('\n')
        .map(str::to_string)
        .collect()
}

/// Translate `\r\n` and lone `\r` to `\n`
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn fixture(dir: &Path, name: &str, input: &str, output: &str) -> FixturePair {
        let input_path = dir.join(format!("{}-input.txt", name));
        let expected_path = dir.join(format!("{}-output.txt", name));
        fs::write(&input_path, input).unwrap();
        fs::write(&expected_path, output).unwrap();
        FixturePair {
            name: name.to_string(),
            input: input_path,
            expected: expected_path,
        }
    }

    fn cmd(s: &str) -> CommandLine {
        CommandLine::parse(s).unwrap()
    }

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(split_lines(b"a\nb"), ["a\n", "b"]);
        assert_eq!(split_lines(b"a\r\nb\r\n"), ["a\n", "b\n"]);
        assert_eq!(split_lines(b"a\rb\n"), ["a\n", "b\n"]);
        assert!(split_lines(b"").is_empty());
    }

    #[tokio::test]
    async fn test_echo_identical_passes() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "echo", "hello\nworld\n", "hello\nworld\n");

        let outcome = execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap();
        assert!(outcome.is_pass(), "got {:?}", outcome);
        assert!(outcome.elapsed().is_some());
    }

    #[tokio::test]
    async fn test_crlf_expected_matches_lf_output() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "crlf", "one\ntwo\n", "one\r\ntwo\r\n");

        let outcome = execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap();
        assert!(outcome.is_pass(), "got {:?}", outcome);
    }

    #[tokio::test]
    async fn test_one_line_differs() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "diff", "1\n2\n3\n", "1\nX\n3\n");

        match execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap() {
            TestOutcome::OutputMismatch { diff } => {
                let changes: Vec<String> = diff.changes().map(|l| l.to_string()).collect();
                assert_eq!(changes.len(), 2);
                assert!(changes.contains(&"- X".to_string()));
                assert!(changes.contains(&"+ 2".to_string()));
            }
            other => panic!("Expected OutputMismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trailing_newline_matters() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "nl", "abc", "abc\n");

        let outcome = execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap();
        assert!(matches!(outcome, TestOutcome::OutputMismatch { .. }));
    }

    #[tokio::test]
    async fn test_stderr_fails_even_if_stdout_matches() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "warn", "data\n", "data\n");

        let outcome = execute(&cmd("sh -c 'cat; echo oops >&2'"), &pair, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TestOutcome::ErroredOnStderr {
                stderr: "oops\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_stderr_takes_priority_over_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "both", "data\n", "other\n");

        let outcome = execute(&cmd("sh -c 'cat; echo oops >&2'"), &pair, TIMEOUT)
            .await
            .unwrap();
        assert!(matches!(outcome, TestOutcome::ErroredOnStderr { .. }));
    }

    #[tokio::test]
    async fn test_exit_status_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "exit", "x\n", "x\n");

        let outcome = execute(&cmd("sh -c 'cat; exit 3'"), &pair, TIMEOUT)
            .await
            .unwrap();
        assert!(outcome.is_pass());
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "slow", "", "done\n");
        let pid_file = dir.path().join("pid");

        // exec keeps the recorded pid for the sleeping process
        let command = cmd(&format!(
            "sh -c 'echo $$ > \"{}\"; exec sleep 10'",
            pid_file.display()
        ));

        let start = Instant::now();
        let outcome = execute(&command, &pair, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(outcome, TestOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(5));

        let pid: i32 = fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
        // Signal 0 tests process existence
        let alive = unsafe { libc::kill(pid, 0) } == 0;
        assert!(!alive, "timed out command {} is still running", pid);
    }

    #[tokio::test]
    async fn test_large_output_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let line = "0123456789abcdef\n";
        let body = line.repeat(20_000);
        let pair = fixture(dir.path(), "big", &body, &body);

        let outcome = execute(&cmd("cat"), &pair, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(outcome.is_pass(), "got {:?}", outcome);
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "nope", "", "");

        let result = execute(&cmd("definitely-not-a-real-program-xyz"), &pair, TIMEOUT).await;
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_same_classification_twice() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fixture(dir.path(), "again", "a\n", "b\n");

        let first = execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap();
        let second = execute(&cmd("cat"), &pair, TIMEOUT).await.unwrap();
        assert_eq!(first, second);
    }
}
