use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a visited node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A filesystem node visited during traversal.
#[derive(Debug, Clone)]
pub struct PathEntry {
    /// Absolute (root-joined) path.
    pub path: PathBuf,
    /// Path relative to the traversal root.
    pub relative: PathBuf,
    pub kind: EntryKind,
    /// Depth below the root; direct children of the root are at depth 1.
    pub depth: usize,
}

impl PathEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Why an entry was admitted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterReason {
    VcsIgnored,
    SecondaryIgnored,
    HardExcluded,
    NotInAllowList,
    Admitted,
}

/// The outcome of evaluating every rule against one [`PathEntry`].
///
/// Computed once per entry and shared by the tree and the content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDecision {
    pub admitted: bool,
    pub reason: FilterReason,
}

impl FilterDecision {
    pub fn admit() -> Self {
        Self {
            admitted: true,
            reason: FilterReason::Admitted,
        }
    }

    pub fn reject(reason: FilterReason) -> Self {
        Self {
            admitted: false,
            reason,
        }
    }

    /// Ignored entries may still be listed in the tree with a marker.
    pub fn is_ignored(&self) -> bool {
        matches!(
            self.reason,
            FilterReason::VcsIgnored | FilterReason::SecondaryIgnored
        )
    }
}

/// One admitted text file, read and measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the root, used for display.
    pub path: PathBuf,
    /// Size in bytes of what was read.
    pub size: u64,
    /// Number of newline characters in the content.
    pub lines: usize,
    /// File content, with undecodable sequences replaced.
    pub content: String,
    /// Read error, if the file could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The complete result of a catgit run.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatgitResult {
    /// A visual tree of the directory structure, newline-joined.
    ///
    /// Empty when the run was configured without the tree.
    pub tree: String,
    /// Every file block, joined in traversal order.
    pub content: String,
    /// The records behind `content`, in the same order.
    pub files: Vec<FileRecord>,
}
