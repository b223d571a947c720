//! Virtual file tree: path-keyed, insert-only, conflict-checked.
//!
//! A [`FileTree`] collects generated content before any disk interaction. Paths are always
//! relative; once a path is present it can be neither overwritten nor removed. Write and
//! Verify live in [`crate::sync`] and operate on a sorted snapshot of the tree.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{GenError, MultiError};
use crate::sync::{self, SyncJob, SyncOpts, Verification};
use crate::types::{File, Files};

#[derive(Clone, Debug)]
struct TreeEntry {
    data: Vec<u8>,
    owner: String,
    from: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FileTree {
    entries: Mutex<BTreeMap<String, TreeEntry>>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, TreeEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.lock().contains_key(relative_path)
    }

    /// Contents stored at `relative_path`.
    pub fn get(&self, relative_path: &str) -> Option<Vec<u8>> {
        self.lock().get(relative_path).map(|e| e.data.clone())
    }

    /// Owner recorded for `relative_path`.
    pub fn owner(&self, relative_path: &str) -> Option<String> {
        self.lock().get(relative_path).map(|e| e.owner.clone())
    }

    /// Sorted list of paths in the tree.
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Add files under `owner`. Either every file is inserted or none is: all conflicts
    /// (against the tree and within `files`), absolute paths and nonexistent files are
    /// reported together.
    pub fn add(&self, owner: &str, files: impl IntoIterator<Item = File>) -> Result<(), MultiError> {
        let mut entries = self.lock();
        add_locked(&mut entries, files.into_iter().map(|f| (owner.to_string(), f)))
    }

    /// Add already-validated files, each owned by its own provenance stack.
    ///
    /// Unlike [`FileTree::add`] this is per file: every file that does not conflict is
    /// inserted, so later producers of the same path are still reported against it.
    pub(crate) fn add_owned_by_stack(&self, files: Files) -> Result<usize, MultiError> {
        let mut entries = self.lock();
        let mut result = MultiError::new();
        let mut inserted = 0;
        for f in files {
            let owner = f.stack().to_string();
            match check_entry(&entries, &owner, &f) {
                Some(err) => result.push(err),
                None => {
                    insert_entry(&mut entries, owner, f);
                    inserted += 1;
                }
            }
        }
        result.into_result().map(|()| inserted)
    }

    /// Merge every entry of `other` into this tree, keeping each entry's owner.
    ///
    /// Conflicting paths produce one error each and leave this tree untouched.
    pub fn merge(&self, other: &FileTree) -> Result<(), MultiError> {
        // Snapshot first so merging a tree into itself reports conflicts instead of deadlocking.
        let incoming: Vec<(String, File)> = other
            .lock()
            .iter()
            .map(|(path, e)| {
                (
                    e.owner.clone(),
                    File {
                        relative_path: path.clone(),
                        data: e.data.clone(),
                        from: e.from.clone(),
                    },
                )
            })
            .collect();
        let mut entries = self.lock();
        add_locked(&mut entries, incoming)
    }

    /// Flatten into a file list sorted by path.
    pub fn to_files(&self) -> Files {
        self.lock()
            .iter()
            .map(|(path, e)| File {
                relative_path: path.clone(),
                data: e.data.clone(),
                from: e.from.clone(),
            })
            .collect()
    }

    /// Sorted `(path, contents)` jobs joined onto `prefix`, for Write and Verify.
    pub(crate) fn snapshot(&self, prefix: &Path) -> Vec<SyncJob> {
        self.lock()
            .iter()
            .map(|(path, e)| SyncJob {
                relative_path: path.clone(),
                target: prefix.join(path),
                contents: e.data.clone(),
            })
            .collect()
    }

    /// Write every file under `prefix` with default options.
    pub fn write(&self, prefix: impl AsRef<Path>) -> Result<(), GenError> {
        sync::write(self, prefix.as_ref(), &SyncOpts::default())
    }

    pub fn write_with(&self, prefix: impl AsRef<Path>, opts: &SyncOpts) -> Result<(), GenError> {
        sync::write(self, prefix.as_ref(), opts)
    }

    /// Compare every file under `prefix` against the tree with default options.
    pub fn verify(&self, prefix: impl AsRef<Path>) -> Result<Verification, GenError> {
        sync::verify(self, prefix.as_ref(), &SyncOpts::default())
    }

    pub fn verify_with(
        &self,
        prefix: impl AsRef<Path>,
        opts: &SyncOpts,
    ) -> Result<Verification, GenError> {
        sync::verify(self, prefix.as_ref(), opts)
    }
}

/// First problem keeping `f` out of the tree, if any.
fn check_entry(entries: &BTreeMap<String, TreeEntry>, owner: &str, f: &File) -> Option<GenError> {
    if !f.exists() {
        return Some(GenError::NonexistentFile);
    }
    if Path::new(&f.relative_path).is_absolute() {
        return Some(GenError::AbsolutePath {
            path: f.relative_path.clone(),
            owner: owner.to_string(),
        });
    }
    entries.get(&f.relative_path).map(|e| GenError::Conflict {
        path: f.relative_path.clone(),
        owner: owner.to_string(),
        existing: e.owner.clone(),
    })
}

fn insert_entry(entries: &mut BTreeMap<String, TreeEntry>, owner: String, f: File) {
    entries.insert(
        f.relative_path,
        TreeEntry {
            data: f.data,
            owner,
            from: f.from,
        },
    );
}

/// All-or-nothing insert: every problem is reported and the tree is left unchanged.
fn add_locked(
    entries: &mut BTreeMap<String, TreeEntry>,
    files: impl IntoIterator<Item = (String, File)>,
) -> Result<(), MultiError> {
    let mut result = MultiError::new();
    let mut pending: Vec<(String, File)> = Vec::new();
    let mut batch: HashMap<String, String> = HashMap::new();

    for (owner, f) in files {
        if let Some(err) = check_entry(entries, &owner, &f) {
            result.push(err);
            continue;
        }
        if let Some(existing) = batch.get(&f.relative_path) {
            result.push(GenError::Conflict {
                path: f.relative_path.clone(),
                owner: owner.clone(),
                existing: existing.clone(),
            });
            continue;
        }
        batch.insert(f.relative_path.clone(), owner.clone());
        pending.push((owner, f));
    }
    if !result.is_empty() {
        return Err(result);
    }

    for (owner, f) in pending {
        insert_entry(entries, owner, f);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_add_rejects_absolute_path() {
        let tree = FileTree::new();
        let err = tree.add("gen", [File::new("/etc/passwd", "x")]).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(matches!(err.errors()[0], GenError::AbsolutePath { .. }));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let tree = FileTree::new();
        tree.add("first", [File::new("a.txt", "a")]).unwrap();
        let err = tree
            .add("second", [File::new("b.txt", "b"), File::new("a.txt", "again")])
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(tree.paths(), vec!["a.txt".to_string()]);
        assert_eq!(tree.get("a.txt").unwrap(), b"a");
    }

    #[test]
    fn test_add_catches_duplicates_within_batch() {
        let tree = FileTree::new();
        let err = tree
            .add("gen", [File::new("a.txt", "1"), File::new("a.txt", "2")])
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_stack_owned_add_keeps_non_conflicting_files() {
        let tree = FileTree::new();
        tree.add("a", [File::new("x.txt", "a")]).unwrap();
        let files = Files(vec![
            File::new("x.txt", "b").from_generator("b"),
            File::new("y.txt", "b").from_generator("b"),
        ]);
        let err = tree.add_owned_by_stack(files).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(tree.owner("y.txt").as_deref(), Some("b"));
        assert_eq!(tree.get("x.txt").unwrap(), b"a");
    }

    #[test]
    fn test_empty_prefix_keeps_relative_target() {
        let tree = FileTree::new();
        tree.add("gen", [File::new("dir/a.txt", "1")]).unwrap();
        let jobs = tree.snapshot(Path::new(""));
        assert_eq!(jobs[0].target, PathBuf::from("dir/a.txt"));
    }
}
