//! Human-readable progress output
//!
//! Everything here goes to stdout as each test finishes, so a long batch
//! shows live progress.

use colored::Colorize;

use super::diff::{DiffKind, LineDiff};
use super::engine::TestOutcome;
use super::fixtures::FixturePair;
use super::runner::RunSummary;

/// Print the result of a single fixture
pub fn outcome(pair: &FixturePair, outcome: &TestOutcome) {
    let input = pair.input.display();

    match outcome {
        TestOutcome::Passed { elapsed } => {
            println!(
                "{} {} {}",
                "✓".green(),
                pair.name,
                format!("({:.2}s)", elapsed.as_secs_f64()).dimmed()
            );
        }
        TestOutcome::TimedOut => {
            println!("{} Input file \"{}\" timed out\n", "✗".red(), input);
        }
        TestOutcome::ErroredOnStderr { stderr } => {
            println!(
                "{} Input file \"{}\" caused one or more errors:\n",
                "✗".red(),
                input
            );
            println!("{}", indent(stderr, "    "));
        }
        TestOutcome::OutputMismatch { diff } => {
            println!(
                "{} Input file \"{}\" gave incorrect output:\n",
                "✗".red(),
                input
            );
            print_diff(diff);
            println!();
        }
    }
}

/// Print the closing summary line
pub fn summary(summary: &RunSummary) {
    let line = summary_line(summary);
    if summary.all_passed() {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.red().bold());
    }
}

/// `<passed>/<total> tests passed in <seconds> seconds`
pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "{}/{} tests passed in {:.1} seconds",
        summary.passed,
        summary.total,
        summary.elapsed.as_secs_f64()
    )
}

fn print_diff(diff: &LineDiff) {
    for line in diff.lines() {
        let text = line.to_string();
        match line.kind {
            DiffKind::Same => println!("{}", text),
            DiffKind::Removed => println!("{}", text.red()),
            DiffKind::Added => println!("{}", text.green()),
        }
    }
}

/// Prefix every line that is not whitespace-only
fn indent(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect()
}
