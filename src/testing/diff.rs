//! Line diff between expected and actual output

use std::fmt;

use difference::{Changeset, Difference};

/// Shown after a final line that has no trailing newline
const NO_NEWLINE_MARKER: &str = " (no newline at end)";

/// Leading tag on every line handed to the changeset. It keeps items
/// non-empty and makes a missing newline a difference of its own.
const TERMINATED_TAG: char = '|';
const UNTERMINATED_TAG: char = '~';

/// Which side(s) of the comparison a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Present in both
    Same,
    /// Only in the expected output
    Removed,
    /// Only in the actual output
    Added,
}

impl DiffKind {
    fn prefix(self) -> &'static str {
        match self {
            DiffKind::Same => "  ",
            DiffKind::Removed => "- ",
            DiffKind::Added => "+ ",
        }
    }
}

/// One line of a diff, without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub text: String,
    /// The line was the last one and had no trailing newline
    pub missing_newline: bool,
}

impl DiffLine {
    fn parse(kind: DiffKind, tagged: &str) -> Self {
        let mut chars = tagged.chars();
        let missing_newline = chars.next() == Some(UNTERMINATED_TAG);
        Self {
            kind,
            text: chars.as_str().to_string(),
            missing_newline,
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.text)?;
        if self.missing_newline {
            f.write_str(NO_NEWLINE_MARKER)?;
        }
        Ok(())
    }
}

/// Line-level diff in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDiff {
    lines: Vec<DiffLine>,
}

impl LineDiff {
    /// Diff two line sequences (each line keeping its terminator)
    pub fn compute(expected: &[String], actual: &[String]) -> Self {
        let expected = tagged_lines(expected);
        let actual = tagged_lines(actual);

        // An empty side would split into a single phantom empty line
        if expected.is_empty() || actual.is_empty() {
            let lines = expected
                .iter()
                .map(|line| DiffLine::parse(DiffKind::Removed, line))
                .chain(actual.iter().map(|line| DiffLine::parse(DiffKind::Added, line)))
                .collect();
            return Self { lines };
        }

        let changeset = Changeset::new(&expected.join("\n"), &actual.join("\n"), "\n");

        let mut lines = Vec::new();
        for chunk in &changeset.diffs {
            let (kind, text) = match chunk {
                Difference::Same(text) => (DiffKind::Same, text),
                Difference::Rem(text) => (DiffKind::Removed, text),
                Difference::Add(text) => (DiffKind::Added, text),
            };
            lines.extend(text.split('\n').map(|line| DiffLine::parse(kind, line)));
        }

        Self { lines }
    }

    /// All lines in order
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Lines that differ between the two sides
    pub fn changes(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.kind != DiffKind::Same)
    }
}

impl fmt::Display for LineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Strip each terminator and replace it with a leading tag
fn tagged_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| match line.strip_suffix('\n') {
            Some(text) => format!("{}{}", TERMINATED_TAG, text),
            None => format!("{}{}", UNTERMINATED_TAG, line),
        })
        .collect()
}
