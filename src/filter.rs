//! Inclusion and exclusion rules, composed into a single decision per entry.

use crate::error::CatgitError;
use crate::patterns::PatternSet;
use crate::types::{FilterDecision, FilterReason, PathEntry};
use crate::vcs::VcsIgnored;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files matched by include-only patterns, plus every ancestor directory.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl AllowList {
    /// Pre-scans every file under `root` once and records the matches.
    ///
    /// Hard-excluded directories are pruned from the scan. Fails when
    /// `patterns` is empty: include-only mode with nothing to include is
    /// a caller error, not an empty snapshot.
    pub fn scan(
        root: &Path,
        patterns: &PatternSet,
        excluded_dirs: &[String],
    ) -> Result<Self, CatgitError> {
        if patterns.is_empty() {
            let source = patterns
                .origin()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the allow-list".to_string());
            return Err(CatgitError::EmptyAllowList(source));
        }

        let excluded: HashSet<String> = excluded_dirs.iter().cloned().collect();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && excluded.contains(entry.file_name().to_string_lossy().as_ref()))
            });

        let mut allow = Self::default();
        allow.dirs.insert(PathBuf::new());
        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "allow-list scan skipped an entry");
                    continue;
                }
            };
            if entry.file_type().is_none_or(|t| t.is_dir()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if patterns.is_match(relative, false) {
                for ancestor in relative.ancestors().skip(1) {
                    allow.dirs.insert(ancestor.to_path_buf());
                }
                allow.files.insert(relative.to_path_buf());
            }
        }
        debug!(
            files = allow.files.len(),
            dirs = allow.dirs.len(),
            "allow-list resolved"
        );
        Ok(allow)
    }

    pub fn allows(&self, entry: &PathEntry) -> bool {
        if entry.is_dir() {
            self.dirs.contains(&entry.relative)
        } else {
            self.files.contains(&entry.relative)
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Every rule source, evaluated in a fixed short-circuit order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    excluded_dirs: HashSet<String>,
    vcs: VcsIgnored,
    secondary: PatternSet,
    allow: Option<AllowList>,
}

impl RuleSet {
    pub fn new(
        excluded_dirs: &[String],
        vcs: VcsIgnored,
        secondary: PatternSet,
        allow: Option<AllowList>,
    ) -> Self {
        Self {
            excluded_dirs: excluded_dirs.iter().cloned().collect(),
            vcs,
            secondary,
            allow,
        }
    }

    /// Hard exclusion, then the allow-list, then git, then the secondary list.
    pub fn decide(&self, entry: &PathEntry) -> FilterDecision {
        if entry.is_dir() && self.is_hard_excluded(&entry.relative) {
            return FilterDecision::reject(FilterReason::HardExcluded);
        }
        if let Some(allow) = &self.allow {
            if !allow.allows(entry) {
                return FilterDecision::reject(FilterReason::NotInAllowList);
            }
        }
        if self.vcs.is_ignored(&entry.relative) {
            return FilterDecision::reject(FilterReason::VcsIgnored);
        }
        if self.secondary.is_match(&entry.relative, entry.is_dir()) {
            return FilterDecision::reject(FilterReason::SecondaryIgnored);
        }
        FilterDecision::admit()
    }

    fn is_hard_excluded(&self, relative: &Path) -> bool {
        relative
            .file_name()
            .is_some_and(|name| self.excluded_dirs.contains(name.to_string_lossy().as_ref()))
    }
}
