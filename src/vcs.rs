//! Git integration: the ignored-path set and a few repository queries.

use crate::error::CatgitError;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Every path git reports as ignored below a root, relative to that root.
///
/// An ignored directory covers all of its descendants.
#[derive(Debug, Clone, Default)]
pub struct VcsIgnored {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl VcsIgnored {
    /// Asks git for the complete ignored set under `root`.
    ///
    /// `ls-files --directory` folds an untracked directory into `dir/` as soon
    /// as everything inside it is ignored, even when the directory itself is
    /// not. Folded directories are confirmed with one `check-ignore` batch;
    /// the rest are listed file by file and their subdirectories confirmed
    /// the same way.
    pub fn query(root: &Path) -> Result<Self, CatgitError> {
        let listed = Self::from_paths(ls_ignored(root, true, &[])?);
        let confirmed = check_ignore(root, &listed.dirs)?;
        let folded: Vec<PathBuf> = listed
            .dirs
            .iter()
            .filter(|dir| !confirmed.contains(*dir))
            .cloned()
            .collect();

        let mut ignored = Self {
            files: listed.files,
            dirs: confirmed,
        };
        if !folded.is_empty() {
            debug!(count = folded.len(), "re-listing directories git folded but does not ignore");
            let expanded = Self::from_paths(ls_ignored(root, false, &folded)?);
            let subdirs: HashSet<PathBuf> = expanded
                .files
                .iter()
                .flat_map(|file| {
                    file.ancestors()
                        .skip(1)
                        .take_while(|a| !folded.iter().any(|dir| dir.as_path() == *a))
                        .map(Path::to_path_buf)
                        .collect::<Vec<_>>()
                })
                .filter(|a| !a.as_os_str().is_empty())
                .collect();
            ignored.dirs.extend(check_ignore(root, &subdirs)?);
            ignored.files.extend(expanded.files);
        }
        debug!(
            files = ignored.files.len(),
            dirs = ignored.dirs.len(),
            "loaded git ignored set"
        );
        Ok(ignored)
    }

    /// Builds a set from root-relative paths; directories carry a trailing `/`.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ignored = Self::default();
        for path in paths {
            let path = path.as_ref();
            match path.strip_suffix('/') {
                Some(dir) => ignored.dirs.insert(PathBuf::from(dir)),
                None => ignored.files.insert(PathBuf::from(path)),
            };
        }
        ignored
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        if self.files.contains(relative) || self.dirs.contains(relative) {
            return true;
        }
        relative
            .ancestors()
            .skip(1)
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| self.dirs.contains(a))
    }
}

fn git(root: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("--literal-pathspecs").arg("-C").arg(root);
    cmd
}

fn vcs_error(e: std::io::Error) -> CatgitError {
    CatgitError::Vcs(format!("failed to run git: {}", e))
}

fn split_nul(raw: &[u8]) -> impl Iterator<Item = String> + '_ {
    raw.split(|&b| b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
}

/// Untracked ignored paths, optionally folded into directories and limited to `within`.
fn ls_ignored(root: &Path, fold: bool, within: &[PathBuf]) -> Result<Vec<String>, CatgitError> {
    let mut cmd = git(root);
    cmd.args(["ls-files", "--others", "--ignored", "--exclude-standard", "-z"]);
    if fold {
        cmd.arg("--directory");
    }
    if !within.is_empty() {
        cmd.arg("--").args(within);
    }
    let output = cmd.output().map_err(vcs_error)?;
    if !output.status.success() {
        return Err(CatgitError::Vcs(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(split_nul(&output.stdout).collect())
}

/// The subset of `paths` git itself reports as ignored.
fn check_ignore(root: &Path, paths: &HashSet<PathBuf>) -> Result<HashSet<PathBuf>, CatgitError> {
    if paths.is_empty() {
        return Ok(HashSet::new());
    }
    let mut input = Vec::new();
    for path in paths {
        input.extend_from_slice(path.to_string_lossy().as_bytes());
        input.push(0);
    }

    let mut child = git(root)
        .args(["check-ignore", "--stdin", "-z"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(vcs_error)?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| CatgitError::Vcs("git check-ignore has no stdin".to_string()))?;
    let writer = thread::spawn(move || stdin.write_all(&input));
    let output = child.wait_with_output().map_err(vcs_error)?;
    match writer.join() {
        Ok(written) => written.map_err(vcs_error)?,
        Err(_) => return Err(CatgitError::Vcs("git check-ignore writer panicked".to_string())),
    }

    // exit status 1 only means nothing matched
    if !output.status.success() && output.status.code() != Some(1) {
        return Err(CatgitError::Vcs(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(split_nul(&output.stdout)
        .map(|path| PathBuf::from(path.trim_end_matches('/')))
        .collect())
}

/// Whether `root` lies inside a git work tree.
pub fn is_repository(root: &Path) -> bool {
    git(root)
        .args(["rev-parse", "--is-inside-work-tree"])
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "true")
        .unwrap_or(false)
}

/// The `origin` remote URL, if one is configured.
pub fn remote_url(root: &Path) -> Option<String> {
    let out = git(root)
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .ok()?;
    let url = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (out.status.success() && !url.is_empty()).then_some(url)
}
