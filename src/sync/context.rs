//! Shared state for one Write or Verify batch.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::GenError;

use super::cancel::CancelToken;

/// One file to write or check: tree path, prefix-joined target and expected contents.
#[derive(Clone, Debug)]
pub struct SyncJob {
    pub relative_path: String,
    pub target: PathBuf,
    pub contents: Vec<u8>,
}

/// Result of one job.
pub enum SyncOutcome {
    Done,
    /// Expected, non-fatal result (missing file, content drift).
    Finding(GenError),
    /// Unrecoverable I/O error; aborts the batch.
    Fatal(GenError),
    /// Stopped before finishing because the batch was cancelled.
    Cancelled,
}

/// State shared by all workers: first fatal error, abort flag, findings and progress count.
#[derive(Default)]
pub struct SyncState {
    first_error: Mutex<Option<GenError>>,
    aborted: AtomicBool,
    findings: Mutex<Vec<GenError>>,
    completed: AtomicUsize,
}

impl SyncState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Keep the first fatal error only, and stop every worker.
    pub fn set_first_error(&self, err: GenError) {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(err);
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn push_finding(&self, finding: GenError) {
        self.findings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(finding);
    }

    pub fn mark_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Fatal error if any, then cancellation if the batch was cut short, otherwise the
    /// findings sorted by path.
    pub fn finish(&self, total: usize, cancel: &CancelToken) -> Result<Vec<GenError>, GenError> {
        if let Some(err) = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(err);
        }
        if self.completed() < total && cancel.is_cancelled() {
            return Err(GenError::Cancelled);
        }
        let mut findings =
            std::mem::take(&mut *self.findings.lock().unwrap_or_else(PoisonError::into_inner));
        findings.sort_by_key(|f| f.path());
        Ok(findings)
    }
}
