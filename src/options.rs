use crate::error::CatgitError;
use crate::patterns::PatternSet;
use crate::vcs::VcsIgnored;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory names pruned from every walk unless overridden.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "venv",
    ".venv",
    "env",
    "__pycache__",
    "node_modules",
    "build",
    "dist",
    "target",
];
pub const DEFAULT_DELIMITER: &str = "```";
pub const DEFAULT_IGNORED_MARKER: &str = "[Ignored]";
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryDetection {
    Ratio,
    Inspector,
    Disabled,
}
#[derive(Debug, Clone)]
pub struct CatgitOptions {
    pub root: PathBuf,
    pub respect_vcs_ignore: bool,
    pub vcs_ignored: Option<VcsIgnored>,
    pub ignore_patterns: PatternSet,
    pub include_only: Option<PatternSet>,
    pub excluded_dirs: Vec<String>,
    pub display_ignored: bool,
    pub markup_ignored: bool,
    pub ignored_marker: String,
    pub include_tree: bool,
    pub delimiter: String,
    pub binary_detection: BinaryDetection,
    pub workers: usize,
}
impl Default for CatgitOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            respect_vcs_ignore: true,
            vcs_ignored: None,
            ignore_patterns: PatternSet::default(),
            include_only: None,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            display_ignored: true,
            markup_ignored: true,
            ignored_marker: DEFAULT_IGNORED_MARKER.to_string(),
            include_tree: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
            binary_detection: BinaryDetection::Ratio,
            workers: 0,
        }
    }
}
#[derive(Debug, Default)]
pub struct CatgitBuilder {
    options: CatgitOptions,
}
impl CatgitBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: CatgitOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn respect_vcs_ignore(mut self, yes: bool) -> Self {
        self.options.respect_vcs_ignore = yes;
        self
    }
    /// Supplies a precomputed ignored set instead of querying git.
    pub fn vcs_ignored(mut self, ignored: VcsIgnored) -> Self {
        self.options.vcs_ignored = Some(ignored);
        self
    }
    pub fn ignore_patterns(mut self, patterns: PatternSet) -> Self {
        self.options.ignore_patterns = patterns;
        self
    }
    pub fn ignore_file(self, path: impl AsRef<Path>) -> Result<Self, CatgitError> {
        Ok(self.ignore_patterns(PatternSet::from_file(path)?))
    }
    pub fn include_only(mut self, patterns: PatternSet) -> Self {
        self.options.include_only = Some(patterns);
        self
    }
    pub fn include_only_file(self, path: impl AsRef<Path>) -> Result<Self, CatgitError> {
        Ok(self.include_only(PatternSet::from_file(path)?))
    }
    pub fn excluded_dirs(mut self, names: Vec<String>) -> Self {
        self.options.excluded_dirs = names;
        self
    }
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.options.excluded_dirs.push(name.into());
        self
    }
    pub fn display_ignored(mut self, yes: bool) -> Self {
        self.options.display_ignored = yes;
        self
    }
    pub fn markup_ignored(mut self, yes: bool) -> Self {
        self.options.markup_ignored = yes;
        self
    }
    pub fn ignored_marker(mut self, marker: impl Into<String>) -> Self {
        self.options.ignored_marker = marker.into();
        self
    }
    pub fn include_tree(mut self, yes: bool) -> Self {
        self.options.include_tree = yes;
        self
    }
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.options.delimiter = delimiter.into();
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.options.binary_detection = method;
        self
    }
    /// Size of the file-reading pool; `0` lets rayon pick.
    pub fn workers(mut self, workers: usize) -> Self {
        self.options.workers = workers;
        self
    }
    pub fn build(self) -> CatgitOptions {
        self.options
    }
}
