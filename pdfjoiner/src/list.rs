//! The ordered collection of files to join.
//!
//! The order of a [`SourceList`] is the page order of the joined PDF. The same
//! file may appear more than once.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::convert::DocumentType;

/// A document selected for joining.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    /// Wrap a path. The file is not touched until a join is validated.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Type declared by the file name.
    pub fn document_type(&self) -> DocumentType {
        DocumentType::from_path(&self.path)
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl From<PathBuf> for SourceFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for SourceFile {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&PathBuf> for SourceFile {
    fn from(path: &PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Direction of a single-step move within the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the start of the list.
    Up,
    /// Toward the end of the list.
    Down,
}

/// Ordered, duplicate-tolerant list of source files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    files: Vec<SourceFile>,
}

impl SourceList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add files to the end, keeping their given order.
    pub fn append<I, F>(&mut self, files: I)
    where
        I: IntoIterator<Item = F>,
        F: Into<SourceFile>,
    {
        self.files.extend(files.into_iter().map(Into::into));
    }

    /// Remove every entry whose path equals `path`.
    ///
    /// Returns how many entries were removed; removing an absent path is a
    /// no-op.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let before = self.files.len();
        self.files.retain(|file| file.path() != path);
        before - self.files.len()
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// Returns `false` and leaves the list unchanged when `index` is out of
    /// bounds or there is no neighbour on that side.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfjoiner::list::{Direction, SourceList};
    ///
    /// let mut list = SourceList::new();
    /// list.append(["a.pdf", "b.pdf", "c.pdf"]);
    ///
    /// assert!(list.reorder(2, Direction::Up));
    /// assert!(!list.reorder(0, Direction::Up));
    /// assert_eq!(list.get(1).unwrap().path().to_str(), Some("c.pdf"));
    /// ```
    pub fn reorder(&mut self, index: usize, direction: Direction) -> bool {
        if index >= self.files.len() {
            return false;
        }

        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&n| n < self.files.len()),
        };

        match neighbour {
            Some(other) => {
                self.files.swap(index, other);
                true
            }
            None => false,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index)
    }

    /// Iterate entries in join order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceFile> {
        self.files.iter()
    }

    /// Paths of all entries in join order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// Borrow the entries as a slice.
    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.files.clear();
    }
}

impl<'a> IntoIterator for &'a SourceList {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl<F: Into<SourceFile>> FromIterator<F> for SourceList {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut list = Self::new();
        list.append(iter);
        list
    }
}
