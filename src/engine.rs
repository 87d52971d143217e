use crate::classify::{FileKind, sniff};
use crate::content::{concat_blocks, read_record};
use crate::error::CatgitError;
use crate::filter::{AllowList, RuleSet};
use crate::options::{BinaryDetection, CatgitOptions};
use crate::tree::{BINARY_MARKER, TreeText, child_prefix, label};
use crate::types::{CatgitResult, EntryKind, FileRecord, FilterDecision, FilterReason, PathEntry};
use crate::vcs::VcsIgnored;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "parallel")]
use std::sync::mpsc;
use tracing::{debug, warn};

/// Fans file jobs out to a bounded pool and joins them back by submission index.
#[cfg(feature = "parallel")]
struct Dispatcher {
    pool: rayon::ThreadPool,
    submitted: usize,
    tx: mpsc::Sender<(usize, FileRecord)>,
    rx: mpsc::Receiver<(usize, FileRecord)>,
}

#[cfg(feature = "parallel")]
impl Dispatcher {
    fn new(workers: usize) -> Result<Self, CatgitError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("catgit-reader-{}", i))
            .build()
            .map_err(|e| CatgitError::WorkerPool(e.to_string()))?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            pool,
            submitted: 0,
            tx,
            rx,
        })
    }

    fn submit(&mut self, path: PathBuf, relative: PathBuf) {
        let index = self.submitted;
        self.submitted += 1;
        let tx = self.tx.clone();
        self.pool.spawn(move || {
            let done = read_record(&path, &relative);
            // the receiver outlives every job; a failed send means drain already gave up
            let _ = tx.send((index, done));
        });
    }

    /// Blocks until every submitted job has reported, then orders by index.
    fn drain(self) -> Vec<FileRecord> {
        let Self {
            pool,
            submitted,
            tx,
            rx,
        } = self;
        drop(tx);
        let mut slots: Vec<Option<FileRecord>> =
            std::iter::repeat_with(|| None).take(submitted).collect();
        for (index, done) in rx {
            slots[index] = Some(done);
        }
        drop(pool);
        let missing = slots.iter().filter(|s| s.is_none()).count();
        if missing > 0 {
            warn!(missing, "some file jobs never reported");
        }
        slots.into_iter().flatten().collect()
    }
}

/// Sequential stand-in: jobs queue during the walk and run at drain time.
#[cfg(not(feature = "parallel"))]
struct Dispatcher {
    queue: Vec<(PathBuf, PathBuf)>,
}

#[cfg(not(feature = "parallel"))]
impl Dispatcher {
    fn new(_workers: usize) -> Result<Self, CatgitError> {
        Ok(Self { queue: Vec::new() })
    }

    fn submit(&mut self, path: PathBuf, relative: PathBuf) {
        self.queue.push((path, relative));
    }

    fn drain(self) -> Vec<FileRecord> {
        self.queue
            .iter()
            .map(|(path, relative)| read_record(path, relative))
            .collect()
    }
}

/// A listed child of the directory being visited.
struct Listed {
    entry: PathEntry,
    decision: FilterDecision,
    descend: bool,
}

/// State threaded through the recursive walk.
struct Traversal<'a> {
    rules: &'a RuleSet,
    display_ignored: bool,
    ignored_marker: Option<&'a str>,
    detection: BinaryDetection,
    tree: TreeText,
    dispatcher: Dispatcher,
}

impl Traversal<'_> {
    fn is_listed(&self, decision: &FilterDecision) -> bool {
        match decision.reason {
            FilterReason::Admitted => true,
            FilterReason::VcsIgnored | FilterReason::SecondaryIgnored => self.display_ignored,
            FilterReason::HardExcluded | FilterReason::NotInAllowList => false,
        }
    }

    fn visit_dir(&mut self, dir: &Path, relative: &Path, depth: usize, prefix: &str) {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "cannot list directory, skipping");
                return;
            }
        };
        let mut children: Vec<_> = read
            .filter_map(|child| match child {
                Ok(child) => Some(child),
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "unreadable directory entry");
                    None
                }
            })
            .collect();
        children.sort_by_key(|child| child.file_name());

        let mut listed = Vec::with_capacity(children.len());
        for child in children {
            let path = child.path();
            let is_symlink = child.file_type().is_ok_and(|t| t.is_symlink());
            let kind = if path.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let entry = PathEntry {
                relative: relative.join(child.file_name()),
                path,
                kind,
                depth: depth + 1,
            };
            let decision = self.rules.decide(&entry);
            if self.is_listed(&decision) {
                listed.push(Listed {
                    entry,
                    decision,
                    descend: !is_symlink,
                });
            } else {
                debug!(path = %entry.relative.display(), reason = ?decision.reason, "skipped");
            }
        }

        let count = listed.len();
        for (i, item) in listed.into_iter().enumerate() {
            self.visit_entry(item, prefix, i + 1 == count);
        }
    }

    fn visit_entry(&mut self, item: Listed, prefix: &str, is_last: bool) {
        let Listed {
            entry,
            decision,
            descend,
        } = item;
        let name = entry
            .relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if decision.is_ignored() {
            debug!(path = %entry.relative.display(), reason = ?decision.reason, "ignored");
            self.tree
                .push(prefix, is_last, &label(&name, entry.is_dir(), self.ignored_marker));
            return;
        }

        if entry.is_dir() {
            self.tree.push(prefix, is_last, &label(&name, true, None));
            if descend {
                let prefix = child_prefix(prefix, is_last);
                self.visit_dir(&entry.path, &entry.relative, entry.depth, &prefix);
            }
            return;
        }

        let (kind, error) = sniff(&entry.path, self.detection);
        if let Some(e) = error {
            warn!(error = %e, "treating unreadable file as binary");
        }
        match kind {
            FileKind::Binary => {
                self.tree
                    .push(prefix, is_last, &label(&name, false, Some(BINARY_MARKER)));
            }
            FileKind::Text => {
                self.tree.push(prefix, is_last, &label(&name, false, None));
                self.dispatcher.submit(entry.path, entry.relative);
            }
        }
    }
}

fn resolve_vcs(root: &Path, respect: bool, supplied: Option<VcsIgnored>) -> VcsIgnored {
    if !respect {
        return VcsIgnored::default();
    }
    if let Some(supplied) = supplied {
        return supplied;
    }
    match VcsIgnored::query(root) {
        Ok(ignored) => {
            if ignored.is_empty() {
                debug!("git reports nothing ignored");
            }
            ignored
        }
        Err(e) => {
            warn!(error = %e, "git ignore rules unavailable, continuing without them");
            VcsIgnored::default()
        }
    }
}

/// Walks `options.root` once and returns the tree and the concatenated content.
///
/// The tree is always built; with `include_tree` off it is dropped from the result.
///
/// # Errors
///
/// Fails before any traversal when the root is not a readable directory,
/// when include-only mode resolves no patterns, or when the worker pool
/// cannot be started. Every per-entry problem is reported inline instead.
pub fn catgit(options: CatgitOptions) -> Result<CatgitResult, CatgitError> {
    let CatgitOptions {
        root,
        respect_vcs_ignore,
        vcs_ignored,
        ignore_patterns,
        include_only,
        excluded_dirs,
        display_ignored,
        markup_ignored,
        ignored_marker,
        include_tree,
        delimiter,
        binary_detection,
        workers,
    } = options;
    debug!(root = %root.display(), "starting catgit");

    if fs::read_dir(&root).is_err() {
        return Err(CatgitError::InvalidRoot(root));
    }
    let allow = include_only
        .as_ref()
        .map(|patterns| AllowList::scan(&root, patterns, &excluded_dirs))
        .transpose()?;
    if let Some(allow) = &allow {
        debug!(files = allow.file_count(), "include-only mode");
    }
    let vcs = resolve_vcs(&root, respect_vcs_ignore, vcs_ignored);
    let rules = RuleSet::new(&excluded_dirs, vcs, ignore_patterns, allow);

    let mut walk = Traversal {
        rules: &rules,
        display_ignored,
        ignored_marker: markup_ignored.then_some(ignored_marker.as_str()),
        detection: binary_detection,
        tree: TreeText::new(&root),
        dispatcher: Dispatcher::new(workers)?,
    };
    walk.visit_dir(&root, Path::new(""), 0, "");

    let Traversal {
        tree, dispatcher, ..
    } = walk;
    let tree = if include_tree {
        tree.finish()
    } else {
        String::new()
    };
    let files = dispatcher.drain();
    debug!(files = files.len(), "catgit finished");
    Ok(CatgitResult {
        tree,
        content: concat_blocks(&files, &delimiter),
        files,
    })
}
