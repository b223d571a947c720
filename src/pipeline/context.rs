//! Run context: the run-scoped tree and the error aggregate shared by every generator.

use log::debug;

use crate::error::{GenError, MultiError};
use crate::tree::FileTree;
use crate::types::Files;

/// State for one `Pipeline::generate` call. Starts empty; nothing carries over between runs.
#[derive(Default)]
pub struct RunContext {
    pub tree: FileTree,
    pub errors: MultiError,
    /// Files accepted into the tree so far.
    pub accepted: usize,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; generation continues.
    pub fn record(&mut self, err: GenError) {
        self.errors.push(err);
    }

    pub fn record_all(&mut self, errs: MultiError) {
        self.errors.extend(errs);
    }

    /// Insert processed files. Files that do not conflict stay in the run tree even when
    /// others in the same batch do, so later generators are checked against them too.
    pub fn accept(&mut self, files: Files) -> Result<(), MultiError> {
        self.accepted += self.tree.add_owned_by_stack(files)?;
        Ok(())
    }

    /// The tree when no error was recorded, otherwise every recorded error.
    pub fn finish(self, label: &str) -> Result<FileTree, MultiError> {
        debug!(
            "{}: {} files accepted, {} errors",
            label,
            self.accepted,
            self.errors.len()
        );
        if self.errors.is_empty() {
            Ok(self.tree)
        } else {
            Err(self.errors)
        }
    }
}
