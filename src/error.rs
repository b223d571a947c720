//! Error kinds for generation, tree insertion and disk synchronization.
//!
//! A single [`GenError`] describes one problem. Recoverable problems from one run are
//! collected into a [`MultiError`] so the caller sees all of them at once; fatal I/O
//! errors are returned alone.

use std::fmt;
use std::path::PathBuf;

/// One problem found while generating, inserting or synchronizing files.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A generator returned an error for its input.
    #[error("{generator}: {source:#}")]
    Generator {
        generator: String,
        #[source]
        source: anyhow::Error,
    },

    /// A generator's own output failed validation (duplicate or nonexistent paths).
    #[error("{generator} returned invalid files: {source}")]
    InvalidOutput {
        generator: String,
        #[source]
        source: MultiError,
    },

    #[error(r#"nonexistent file (empty relative path) not allowed within a file set"#)]
    NonexistentFile,

    /// More than one file in a set claims the same path. `stacks` holds every producer.
    #[error("multiple files at path {path} from generators: {}", quoted(.stacks))]
    DuplicatePath { path: String, stacks: Vec<String> },

    #[error("files added to a file tree must have relative paths, got {path} from {owner:?}")]
    AbsolutePath { path: String, owner: String },

    /// Path already present in the tree under another owner.
    #[error("file tree cannot create {path} for {owner:?}, already created for {existing:?}")]
    Conflict {
        path: String,
        owner: String,
        existing: String,
    },

    #[error("postprocessing of {path} from {stack} failed: {source:#}")]
    Postprocess {
        path: String,
        stack: String,
        #[source]
        source: anyhow::Error,
    },

    /// Wraps another error with the name of the input that caused it.
    #[error("{source} for input {input:?}")]
    ForInput {
        input: String,
        #[source]
        source: Box<GenError>,
    },

    #[error("{}: {action}: {source}", .path.display())]
    Io {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("sync worker thread panicked")]
    WorkerPanicked,

    #[error("{}: generated file should exist, but does not", .path.display())]
    ShouldExist { path: PathBuf },

    #[error("{} would have changed:\n\n{diff}", .path.display())]
    ContentsDiffer { path: PathBuf, diff: String },
}

impl GenError {
    /// Disk I/O failure for `path` while performing `action`.
    pub fn io(path: impl Into<PathBuf>, action: &'static str, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            action,
            source,
        }
    }

    /// True for verification findings (missing file or content drift).
    pub fn is_finding(&self) -> bool {
        matches!(
            self,
            GenError::ShouldExist { .. } | GenError::ContentsDiffer { .. }
        )
    }

    /// The output path this error is about, when it names one.
    pub fn path(&self) -> Option<String> {
        match self {
            GenError::DuplicatePath { path, .. }
            | GenError::AbsolutePath { path, .. }
            | GenError::Conflict { path, .. }
            | GenError::Postprocess { path, .. } => Some(path.clone()),
            GenError::Io { path, .. }
            | GenError::ShouldExist { path }
            | GenError::ContentsDiffer { path, .. } => Some(path.display().to_string()),
            GenError::ForInput { source, .. } => source.path(),
            _ => None,
        }
    }
}

fn quoted(stacks: &[String]) -> String {
    stacks
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered aggregate of [`GenError`]s.
///
/// Pushing another aggregate (via [`MultiError::extend`]) flattens it, so the result is
/// always a single level of errors in the order they were recorded.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<GenError>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: GenError) {
        self.errors.push(err);
    }

    pub fn extend(&mut self, other: MultiError) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[GenError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<GenError> for MultiError {
    fn from(err: GenError) -> Self {
        MultiError { errors: vec![err] }
    }
}

impl FromIterator<GenError> for MultiError {
    fn from_iter<T: IntoIterator<Item = GenError>>(iter: T) -> Self {
        MultiError {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MultiError {
    type Item = GenError;
    type IntoIter = std::vec::IntoIter<GenError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [only] => write!(f, "1 error occurred:\n\t* {only}"),
            errors => {
                write!(f, "{} errors occurred:", errors.len())?;
                for err in errors {
                    write!(f, "\n\t* {err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MultiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_path_lists_every_stack() {
        let err = GenError::DuplicatePath {
            path: "x.txt".into(),
            stacks: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "multiple files at path x.txt from generators: 'a', 'b'"
        );
    }

    #[test]
    fn test_multi_error_display_counts() {
        let mut all = MultiError::new();
        assert_eq!(all.to_string(), "no errors");
        all.push(GenError::NonexistentFile);
        assert!(all.to_string().starts_with("1 error occurred"));
        all.push(GenError::Cancelled);
        assert!(all.to_string().starts_with("2 errors occurred"));
    }

    #[test]
    fn test_extend_flattens() {
        let mut outer = MultiError::from(GenError::Cancelled);
        let inner: MultiError = [GenError::NonexistentFile, GenError::WorkerPanicked]
            .into_iter()
            .collect();
        outer.extend(inner);
        assert_eq!(outer.len(), 3);
    }

    #[test]
    fn test_for_input_reports_inner_path() {
        let err = GenError::ForInput {
            input: "user".into(),
            source: Box::new(GenError::Conflict {
                path: "a.rs".into(),
                owner: "x".into(),
                existing: "y".into(),
            }),
        };
        assert_eq!(err.path().as_deref(), Some("a.rs"));
        assert!(err.to_string().ends_with(r#"for input "user""#));
    }
}
