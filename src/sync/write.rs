//! Write: materialize a tree onto the filesystem.

use log::debug;
use std::fs;
use std::path::Path;

use crate::error::GenError;
use crate::tree::FileTree;

use super::SyncOpts;
use super::cancel::CancelToken;
use super::context::{SyncJob, SyncOutcome};
use super::workers::run_jobs;

fn write_one(job: &SyncJob, cancel: &CancelToken) -> SyncOutcome {
    if let Some(parent) = job.target.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return SyncOutcome::Fatal(GenError::io(
            &job.target,
            "failed to ensure parent directory exists",
            e,
        ));
    }
    if cancel.is_cancelled() {
        return SyncOutcome::Cancelled;
    }
    match fs::write(&job.target, &job.contents) {
        Ok(()) => SyncOutcome::Done,
        Err(e) => SyncOutcome::Fatal(GenError::io(&job.target, "error while writing file", e)),
    }
}

/// Write every file in `tree` to `prefix`-joined paths, creating parent directories.
///
/// The first I/O error aborts the batch and is returned alone. Files written before the
/// error stay on disk; there is no rollback.
pub fn write(tree: &FileTree, prefix: &Path, opts: &SyncOpts) -> Result<(), GenError> {
    let jobs = tree.snapshot(prefix);
    let total = jobs.len();
    run_jobs(jobs, opts, "Writing", write_one)?;
    debug!("Wrote {} files under {}", total, prefix.display());
    Ok(())
}
