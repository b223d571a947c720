//! Bounded worker pool for Write and Verify.
//!
//! Jobs go into a channel sized to the job count (so feeding never blocks), then
//! `min(concurrency, jobs)` threads drain it. The first fatal error aborts the batch;
//! workers stop taking new jobs once it is set or the caller cancels.

use crossbeam_channel::{Receiver, bounded};
use kdam::Animation;
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::progress::{
    ProgressBar, ProgressBarConfig, create_progress_bar, update_progress_bar,
};
use crate::error::GenError;

use super::SyncOpts;
use super::cancel::CancelToken;
use super::context::{SyncJob, SyncOutcome, SyncState};

/// Operation run for each job.
pub type SyncOp = fn(&SyncJob, &CancelToken) -> SyncOutcome;

fn sync_worker_loop(
    job_rx: Receiver<SyncJob>,
    state: Arc<SyncState>,
    cancel: CancelToken,
    op: SyncOp,
    bar: Option<ProgressBar>,
) {
    while let Ok(job) = job_rx.recv() {
        if state.is_aborted() || cancel.is_cancelled() {
            break;
        }
        match op(&job, &cancel) {
            SyncOutcome::Done => {}
            SyncOutcome::Finding(finding) => state.push_finding(finding),
            SyncOutcome::Fatal(err) => {
                state.set_first_error(err);
                break;
            }
            SyncOutcome::Cancelled => break,
        }
        state.mark_completed();
        if let Some(bar) = &bar {
            update_progress_bar(bar, 1);
        }
    }
}

/// Spawn sync workers reading from `job_rx`. Caller must have dropped its sender.
pub fn spawn_sync_workers(
    job_rx: Receiver<SyncJob>,
    state: &Arc<SyncState>,
    cancel: &CancelToken,
    num_workers: usize,
    op: SyncOp,
    bar: Option<ProgressBar>,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let job_rx = job_rx.clone();
            let state = Arc::clone(state);
            let cancel = cancel.clone();
            let bar = bar.clone();
            thread::spawn(move || sync_worker_loop(job_rx, state, cancel, op, bar))
        })
        .collect()
}

/// Run `op` over every job with bounded parallelism. Returns the findings, or the first
/// fatal error, or [`GenError::Cancelled`] when the caller cancelled before all jobs ran.
pub fn run_jobs(
    jobs: Vec<SyncJob>,
    opts: &SyncOpts,
    desc: &'static str,
    op: SyncOp,
) -> Result<Vec<GenError>, GenError> {
    let total = jobs.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let cancel = opts.cancel.clone().unwrap_or_default();
    let num_workers = opts.effective_concurrency().min(total);
    debug!("{}: {} files on {} workers", desc, total, num_workers);

    let (job_tx, job_rx) = bounded::<SyncJob>(total);
    for job in jobs {
        let _ = job_tx.send(job);
    }
    // Closing the channel lets workers exit once it is drained.
    drop(job_tx);

    let bar = opts
        .progress
        .then(|| create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic)));
    let state = SyncState::new();
    let handles = spawn_sync_workers(job_rx, &state, &cancel, num_workers, op, bar);

    let mut panicked = false;
    for h in handles {
        panicked |= h.join().is_err();
    }
    if panicked {
        return Err(GenError::WorkerPanicked);
    }
    state.finish(total, &cancel)
}
