//! Verify: compare a tree against what is already on disk, without modifying anything.

use log::{debug, warn};
use similar::TextDiff;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{GenError, MultiError};
use crate::tree::FileTree;
use crate::utils::Colors;

use super::SyncOpts;
use super::cancel::CancelToken;
use super::context::{SyncJob, SyncOutcome};
use super::workers::run_jobs;

/// Outcome of a verification that completed without a fatal I/O error.
#[derive(Debug, Default)]
pub struct Verification {
    /// Number of tree files checked.
    pub checked: usize,
    /// Missing files and content drift, sorted by path.
    pub findings: Vec<GenError>,
}

impl Verification {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings for files that should exist but do not.
    pub fn missing(&self) -> impl Iterator<Item = &GenError> {
        self.findings
            .iter()
            .filter(|f| matches!(f, GenError::ShouldExist { .. }))
    }

    /// Findings for files whose contents differ from the tree.
    pub fn changed(&self) -> impl Iterator<Item = &GenError> {
        self.findings
            .iter()
            .filter(|f| matches!(f, GenError::ContentsDiffer { .. }))
    }

    /// Fold findings into one aggregate error.
    pub fn into_result(self) -> Result<(), MultiError> {
        self.findings.into_iter().collect::<MultiError>().into_result()
    }
}

/// Unified line diff from what is on disk to what would be generated.
///
/// Contents that only differ in bytes lost to UTF-8 replacement get a size note instead.
pub fn content_diff(on_disk: &[u8], generated: &[u8]) -> String {
    let old = String::from_utf8_lossy(on_disk);
    let new = String::from_utf8_lossy(generated);
    if old == new {
        return format!(
            "binary contents differ ({} bytes on disk, {} bytes generated)\n",
            on_disk.len(),
            generated.len()
        );
    }
    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    format!("{}", diff.unified_diff().header("on disk", "generated"))
}

fn verify_one(job: &SyncJob, cancel: &CancelToken) -> SyncOutcome {
    if let Err(e) = fs::metadata(&job.target) {
        if e.kind() == ErrorKind::NotFound {
            return SyncOutcome::Finding(GenError::ShouldExist {
                path: job.target.clone(),
            });
        }
        return SyncOutcome::Fatal(GenError::io(&job.target, "could not stat generated file", e));
    }
    if cancel.is_cancelled() {
        return SyncOutcome::Cancelled;
    }
    let on_disk = match fs::read(&job.target) {
        Ok(b) => b,
        Err(e) => return SyncOutcome::Fatal(GenError::io(&job.target, "error reading file", e)),
    };
    if on_disk == job.contents {
        return SyncOutcome::Done;
    }
    SyncOutcome::Finding(GenError::ContentsDiffer {
        path: job.target.clone(),
        diff: content_diff(&on_disk, &job.contents),
    })
}

/// Check every file in `tree` against `prefix`-joined paths on disk.
///
/// Missing files and content drift are collected as findings; any other I/O error aborts
/// the verification and is returned alone.
pub fn verify(tree: &FileTree, prefix: &Path, opts: &SyncOpts) -> Result<Verification, GenError> {
    let jobs = tree.snapshot(prefix);
    let checked = jobs.len();
    let findings = run_jobs(jobs, opts, "Verifying", verify_one)?;
    let verification = Verification { checked, findings };
    print_verification(&verification);
    Ok(verification)
}

/// Log a verification summary.
fn print_verification(v: &Verification) {
    if v.is_clean() {
        debug!("All {} generated files are up to date.", v.checked);
        return;
    }
    warn!(
        "{} | {} | {}",
        Colors::colorize(Colors::CHECKED, &format!("Checked: {}", v.checked)),
        Colors::colorize(Colors::MISSING, &format!("Missing: {}", v.missing().count())),
        Colors::colorize(Colors::CHANGED, &format!("Changed: {}", v.changed().count()))
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_diff_marks_changed_line() {
        let d = content_diff(b"a\nb\n", b"a\nc\n");
        assert!(d.contains("-b"));
        assert!(d.contains("+c"));
        assert!(d.contains("--- on disk"));
    }

    #[test]
    fn test_content_diff_invalid_utf8() {
        let d = content_diff(&[b'a', 0xff], &[b'a', 0xfe]);
        assert_eq!(d, "binary contents differ (2 bytes on disk, 2 bytes generated)\n");
    }
}
