//! Disk synchronization: Write and Verify over a [`FileTree`](crate::tree::FileTree).

pub mod cancel;
pub mod context;
pub mod verify;
pub mod workers;
pub mod write;

pub use cancel::CancelToken;
pub use context::{SyncJob, SyncOutcome, SyncState};
pub use verify::{Verification, content_diff, verify};
pub use workers::{SyncOp, run_jobs, spawn_sync_workers};
pub use write::write;

use crate::utils::config::SyncConsts;

/// Options for Write and Verify.
#[derive(Clone, Debug)]
pub struct SyncOpts {
    /// Worker count. Clamped to `1..=`[`SyncConsts::CONCURRENCY`].
    pub concurrency: usize,
    /// Caller cancellation (e.g. Ctrl+C or a deadline).
    pub cancel: Option<CancelToken>,
    /// Show a progress bar.
    pub progress: bool,
}

impl Default for SyncOpts {
    fn default() -> Self {
        SyncOpts {
            concurrency: SyncConsts::CONCURRENCY,
            cancel: None,
            progress: false,
        }
    }
}

impl SyncOpts {
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, SyncConsts::CONCURRENCY)
    }
}
