//! Public types: a single generated [`File`] and the [`Files`] set.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GenError, MultiError};
use crate::tree::FileTree;

/// One candidate output file.
///
/// A `File` with an empty `relative_path` does not [exist](File::exists), whatever its
/// `data`. The default value is therefore the "nothing to emit" sentinel a generator
/// returns when it has no output for an input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct File {
    /// Path the file is written to, relative to the sync prefix.
    pub relative_path: String,
    /// File contents.
    pub data: Vec<u8>,
    /// Names of the generators that produced this file. Wrapping generators come first,
    /// the innermost generator last.
    pub from: Vec<String>,
}

impl File {
    pub fn new(relative_path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        File {
            relative_path: relative_path.into(),
            data: data.into(),
            from: Vec::new(),
        }
    }

    /// Sentinel for "no output".
    pub fn none() -> Self {
        File::default()
    }

    pub fn exists(&self) -> bool {
        !self.relative_path.is_empty()
    }

    /// Builder-style provenance: `name` becomes the outermost entry of the stack.
    pub fn from_generator(mut self, name: impl Into<String>) -> Self {
        self.from.insert(0, name.into());
        self
    }

    /// Provenance stack rendered for diagnostics.
    pub fn stack(&self) -> Stack<'_> {
        Stack(&self.from)
    }

    /// A tree holding only this file, owned by `owner`.
    ///
    /// Fails only when the path is absolute or empty.
    pub fn to_tree(&self, owner: &str) -> Result<FileTree, MultiError> {
        let tree = FileTree::new();
        tree.add(owner, [self.clone()])?;
        Ok(tree)
    }
}

/// Displays a provenance stack as `outer:inner`, or `<unknown>` when empty.
pub struct Stack<'a>(pub &'a [String]);

impl fmt::Display for Stack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<unknown>");
        }
        write!(f, "{}", self.0.join(":"))
    }
}

/// A set of files meant to live in one path namespace.
///
/// The set is valid when every member exists and no two members share a path. Trees
/// enforce this on insertion; [`Files::validate`] checks it up front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Files(pub Vec<File>);

impl Files {
    pub fn new() -> Self {
        Files(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, file: File) {
        self.0.push(file);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, File> {
        self.0.iter()
    }

    /// Find a file by path.
    pub fn get(&self, relative_path: &str) -> Option<&File> {
        self.0.iter().find(|f| f.relative_path == relative_path)
    }

    /// Sort in place by path.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    }

    /// One error per nonexistent member, then one error per duplicated path naming every
    /// provenance stack that produced it. Duplicates are reported in path order.
    pub fn validate(&self) -> Result<(), MultiError> {
        let mut result = MultiError::new();
        let mut paths: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for f in &self.0 {
            if !f.exists() {
                result.push(GenError::NonexistentFile);
            } else {
                paths
                    .entry(f.relative_path.as_str())
                    .or_default()
                    .push(f.stack().to_string());
            }
        }
        for (path, stacks) in paths {
            if stacks.len() > 1 {
                result.push(GenError::DuplicatePath {
                    path: path.to_string(),
                    stacks,
                });
            }
        }
        result.into_result()
    }
}

impl From<Vec<File>> for Files {
    fn from(v: Vec<File>) -> Self {
        Files(v)
    }
}

impl FromIterator<File> for Files {
    fn from_iter<T: IntoIterator<Item = File>>(iter: T) -> Self {
        Files(iter.into_iter().collect())
    }
}

impl IntoIterator for Files {
    type Item = File;
    type IntoIter = std::vec::IntoIter<File>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a File;
    type IntoIter = std::slice::Iter<'a, File>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
