//! Output formatting for catgit results.
//!
//! Provides functions to format a [`CatgitResult`] into plain text or JSON.
//! All formatting preserves the exact tree and file blocks produced by the walk.

use crate::{CatgitError, CatgitResult};
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Banner placed above text output: the catgit version and, when known, the project URL.
pub fn project_header(url: Option<&str>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    match url {
        Some(url) => format!("[ catgit v{} | Project URL: {} ]", version, url),
        None => format!("[ catgit v{} ]", version),
    }
}

/// Formats the catgit result into a string.
///
/// `header` is emitted first in text output (see [`project_header`]).
/// An empty tree (the walk ran with the tree left out) is skipped.
pub fn format_result(
    result: &CatgitResult,
    format: OutputFormat,
    header: Option<&str>,
) -> Result<String, CatgitError> {
    match format {
        OutputFormat::Text => Ok(format_text(result, header)),
        OutputFormat::Json => format_json(result),
    }
}

/// Writes the formatted result to a file.
pub fn write_result_to_file(
    result: &CatgitResult,
    format: OutputFormat,
    header: Option<&str>,
    path: impl AsRef<Path>,
) -> Result<(), CatgitError> {
    let content = format_result(result, format, header)?;
    fs::write(&path, content).map_err(|e| CatgitError::io(path.as_ref(), e))?;
    Ok(())
}

// ----------------------- Internal formatting -----------------------

fn format_text(result: &CatgitResult, header: Option<&str>) -> String {
    let mut out = String::with_capacity(result.tree.len() + result.content.len() + 64);
    if let Some(header) = header {
        out.push_str(header);
        out.push_str("\n\n");
    }
    if !result.tree.is_empty() {
        out.push_str(&result.tree);
        out.push_str("\n\n");
    }
    out.push_str(&result.content);
    out
}

fn format_json(result: &CatgitResult) -> Result<String, CatgitError> {
    Ok(serde_json::to_string_pretty(result)?)
}
