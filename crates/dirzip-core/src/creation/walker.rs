//! Depth-first directory traversal.
//!
//! The walker is backed by `walkdir`, which keeps an explicit stack of open
//! directory handles instead of recursing, so tree depth never grows the call
//! stack. Entries are yielded lazily in pre-order: a directory appears before
//! anything it contains. Siblings are sorted by file name, which makes the
//! order deterministic for a given filesystem snapshot.

use crate::ArchiveError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of a visited filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (only reported when links are not followed).
    Symlink,
    /// Anything else: sockets, FIFOs, devices.
    Other,
}

/// One visited filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path as reached from the root (root joined with the relative path).
    pub path: PathBuf,

    /// Path relative to the traversal root. Empty for the root itself.
    pub relative_path: PathBuf,

    /// Entry kind.
    pub kind: EntryKind,

    /// Size in bytes (0 for anything that is not a regular file).
    pub size: u64,

    /// Depth below the root (root is 0).
    pub depth: usize,
}

impl WalkEntry {
    /// Returns `true` for regular files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` for zero-length entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Walks a directory tree in depth-first pre-order.
///
/// # Examples
///
/// ```no_run
/// use dirzip_core::creation::walker::TreeWalker;
/// use std::path::Path;
///
/// let walker = TreeWalker::new(Path::new("./site"), false);
/// for entry in walker.walk() {
///     let entry = entry?;
///     println!("{} ({} bytes)", entry.relative_path.display(), entry.size);
/// }
/// # Ok::<(), dirzip_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct TreeWalker<'a> {
    root: &'a Path,
    follow_symlinks: bool,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: &'a Path, follow_symlinks: bool) -> Self {
        Self {
            root,
            follow_symlinks,
        }
    }

    /// Returns the traversal root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root
    }

    /// Returns a one-shot iterator over every entry below the root.
    ///
    /// # Errors
    ///
    /// Items are errors when a directory cannot be read, metadata cannot be
    /// read, or a symlink loop is found while following links.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkEntry>> + '_ {
        WalkDir::new(self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .map(move |entry| match entry {
                Ok(entry) => self.build_entry(&entry),
                Err(e) => Err(walk_error(self.root, &e)),
            })
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<WalkEntry> {
        let path = entry.path().to_path_buf();
        let file_type = entry.file_type();

        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        let size = if kind == EntryKind::File {
            entry
                .metadata()
                .map_err(|e| ArchiveError::Walk {
                    path: path.clone(),
                    reason: format!("cannot read metadata: {e}"),
                })?
                .len()
        } else {
            0
        };

        let relative_path = path
            .strip_prefix(self.root)
            .map_err(|_| ArchiveError::PathOutsideRoot {
                path: path.clone(),
                root: self.root.to_path_buf(),
            })?
            .to_path_buf();

        Ok(WalkEntry {
            path,
            relative_path,
            kind,
            size,
            depth: entry.depth(),
        })
    }
}

fn walk_error(root: &Path, err: &walkdir::Error) -> ArchiveError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let reason = if err.loop_ancestor().is_some() {
        format!("filesystem loop: {err}")
    } else {
        err.to_string()
    };
    ArchiveError::Walk { path, reason }
}
