//! Glob pattern lists for the secondary ignore file and the allow-list.
//!
//! Patterns follow `.gitignore` conventions on top of [`globset`]:
//!
//! - blank lines and lines starting with `#` are skipped (`\#` escapes the hash);
//! - `*` and `?` never cross a `/`, while `**` does;
//! - a trailing `/` restricts the pattern to directories;
//! - a pattern without an inner `/` matches a basename at any depth;
//! - a pattern with an inner `/` is anchored at the root (a leading `/` is dropped).
//!
//! Negated patterns (`!pattern`) are not supported: any match wins, so there is
//! nothing to negate. They are skipped with a warning like any malformed line.

use crate::error::CatgitError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An ordered list of compiled patterns. Order never affects matching.
#[derive(Debug, Clone)]
pub struct PatternSet {
    origin: Option<PathBuf>,
    patterns: Vec<String>,
    dir_only: Vec<bool>,
    set: GlobSet,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            origin: None,
            patterns: Vec::new(),
            dir_only: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl PatternSet {
    /// Compiles every usable line; malformed lines are logged and skipped.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, CatgitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();
        let mut dir_only = Vec::new();
        for line in lines {
            let Some(line) = significant(line.as_ref()) else {
                continue;
            };
            match compile(line) {
                Ok((glob, only_dirs)) => {
                    builder.add(glob);
                    patterns.push(line.to_string());
                    dir_only.push(only_dirs);
                }
                Err(reason) => warn!(pattern = line, %reason, "skipping malformed pattern"),
            }
        }
        let set = builder
            .build()
            .map_err(|e| CatgitError::Pattern(format!("Failed to build glob set: {}", e)))?;
        Ok(Self {
            origin: None,
            patterns,
            dir_only,
            set,
        })
    }

    /// Loads and compiles a pattern file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatgitError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CatgitError::io(path, e))?;
        let mut set = Self::from_lines(text.lines())?;
        set.origin = Some(path.to_path_buf());
        Ok(set)
    }

    /// The file the patterns were loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The pattern lines that compiled, in file order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Tests a root-relative path. Directory-only patterns need `is_dir`.
    pub fn is_match(&self, relative: &Path, is_dir: bool) -> bool {
        if self.is_empty() {
            return false;
        }
        self.set
            .matches(relative)
            .into_iter()
            .any(|i| is_dir || !self.dir_only[i])
    }
}

fn significant(raw: &str) -> Option<&str> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

fn compile(line: &str) -> Result<(globset::Glob, bool), String> {
    if line.starts_with('!') {
        return Err("negated patterns are not supported".to_string());
    }
    let line = line
        .strip_prefix("\\#")
        .map(|rest| format!("#{}", rest))
        .or_else(|| line.strip_prefix("\\!").map(|rest| format!("!{}", rest)))
        .unwrap_or_else(|| line.to_string());
    let dir_only = line.ends_with('/');
    let body = line.trim_end_matches('/');
    let anchored = body.contains('/');
    let body = body.trim_start_matches('/');
    if body.is_empty() {
        return Err("empty pattern".to_string());
    }
    let glob = if anchored {
        body.to_string()
    } else {
        format!("**/{}", body)
    };
    let compiled = GlobBuilder::new(&glob)
        .literal_separator(true)
        .build()
        .map_err(|e| e.to_string())?;
    Ok((compiled, dir_only))
}
