use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum CatgitError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a readable directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("Include-only mode requested but {0} yielded no patterns")]
    EmptyAllowList(String),
    #[error("Pattern error: {0}")]
    Pattern(String),
    #[error("VCS query failed: {0}")]
    Vcs(String),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}
impl CatgitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatgitError::Io {
            path: path.into(),
            source,
        }
    }
}
