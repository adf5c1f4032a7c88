//! Fixture discovery
//!
//! A fixture is a `<name>-input.txt` file paired with a
//! `<name>-output.txt` file in the same folder.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::common::config::DEFAULT_TESTS_DIR;
use crate::common::{Error, Result};

/// Suffix of files fed to the command's stdin
pub const INPUT_SUFFIX: &str = "-input.txt";

/// Suffix of files holding the expected stdout
pub const OUTPUT_SUFFIX: &str = "-output.txt";

/// One test case: an input file and the output it should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePair {
    /// Shared stem of the two files
    pub name: String,
    /// File streamed to stdin
    pub input: PathBuf,
    /// File holding the expected stdout
    pub expected: PathBuf,
}

/// Resolve the folder fixtures are read from
///
/// With no folder given, `./tests` is used if it exists, otherwise the
/// current directory. An explicit folder must exist.
pub fn resolve_folder(folder: Option<&Path>) -> Result<PathBuf> {
    match folder {
        Some(path) => {
            if !path.is_dir() {
                return Err(Error::NotAFolder(path.display().to_string()));
            }
            Ok(path.to_path_buf())
        }
        None => {
            let default = PathBuf::from(DEFAULT_TESTS_DIR);
            if default.is_dir() {
                Ok(default)
            } else {
                tracing::debug!("{} not found, using current directory", DEFAULT_TESTS_DIR);
                Ok(PathBuf::from("."))
            }
        }
    }
}

/// List every fixture pair in `folder`, ordered by input path
pub fn locate(folder: &Path) -> Result<Vec<FixturePair>> {
    let inputs = list_with_suffix(folder, INPUT_SUFFIX)?;
    let outputs = list_with_suffix(folder, OUTPUT_SUFFIX)?;

    if inputs.len() != outputs.len() {
        return Err(Error::FixtureCountMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, expected)| {
            if stem_bytes(&input, INPUT_SUFFIX) != stem_bytes(&expected, OUTPUT_SUFFIX) {
                return Err(Error::FixtureNameMismatch {
                    input: input.display().to_string(),
                    expected: expected.display().to_string(),
                });
            }
            Ok(FixturePair {
                name: stem(&input, INPUT_SUFFIX),
                input,
                expected,
            })
        })
        .collect()
}

/// Look up a single fixture by its exact stem
///
/// The name must be a plain file-name stem; anything that would resolve
/// outside `folder` is rejected.
pub fn find(folder: &Path, name: &str) -> Result<FixturePair> {
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain {
        return Err(Error::Config(format!(
            "Invalid test name '{}': expected a plain name without path separators",
            name
        )));
    }

    let input = folder.join(format!("{}{}", name, INPUT_SUFFIX));
    let expected = folder.join(format!("{}{}", name, OUTPUT_SUFFIX));

    if !input.is_file() || !expected.is_file() {
        return Err(Error::TestNotFound {
            name: name.to_string(),
            folder: folder.display().to_string(),
        });
    }

    Ok(FixturePair {
        name: name.to_string(),
        input,
        expected,
    })
}

/// Regular files directly inside `folder` whose name ends in `suffix`,
/// sorted by path
///
/// Names are matched on raw bytes, so non-UTF-8 fixture names are kept.
fn list_with_suffix(folder: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| Error::FileRead {
            path: folder.display().to_string(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(suffix.as_bytes())
        {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    tracing::trace!(count = paths.len(), suffix, "listed fixtures");
    Ok(paths)
}

fn stem_bytes<'a>(path: &'a Path, suffix: &str) -> &'a [u8] {
    let file_name = path
        .file_name()
        .map(|n| n.as_encoded_bytes())
        .unwrap_or_default();
    file_name
        .strip_suffix(suffix.as_bytes())
        .unwrap_or(file_name)
}

/// Display name of a fixture; non-UTF-8 bytes are replaced
fn stem(path: &Path, suffix: &str) -> String {
    String::from_utf8_lossy(stem_bytes(path, suffix)).into_owned()
}
