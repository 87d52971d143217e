//! Reading admitted text files and formatting them into content blocks.

use crate::types::FileRecord;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Loads one file into a [`FileRecord`].
///
/// Never fails: a read error is kept on the record and the content is empty.
pub fn read_record(path: &Path, relative: &Path) -> FileRecord {
    match fs::read(path) {
        Ok(bytes) => FileRecord {
            path: relative.to_path_buf(),
            size: bytes.len() as u64,
            lines: bytes.iter().filter(|&&b| b == b'\n').count(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            error: None,
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file");
            FileRecord {
                path: relative.to_path_buf(),
                size: 0,
                lines: 0,
                content: String::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Formats a record as a header line followed by its (optionally fenced) content.
///
/// An empty `delimiter` disables fencing. Records carrying an error render
/// as a header-only block with the message.
pub fn format_block(record: &FileRecord, delimiter: &str) -> String {
    let path = record.path.display();
    if let Some(error) = &record.error {
        return format!("==== [ {} ] ==== ERROR: {}\n", path, error);
    }

    let mut out = String::with_capacity(record.content.len() + 64);
    out.push_str(&format!(
        "==== [ {} ] ==== ({} bytes, {} lines)\n",
        path, record.size, record.lines
    ));
    if !delimiter.is_empty() {
        let tag = record
            .path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(language_from_extension)
            .unwrap_or("");
        out.push_str(delimiter);
        out.push_str(tag);
        out.push('\n');
    }
    out.push_str(&record.content);
    if !record.content.is_empty() && !record.content.ends_with('\n') {
        out.push('\n');
    }
    if !delimiter.is_empty() {
        out.push_str(delimiter);
        out.push('\n');
    }
    out
}

/// Formats every record in order, with a blank line between consecutive blocks.
pub(crate) fn concat_blocks(records: &[FileRecord], delimiter: &str) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format_block(record, delimiter));
    }
    out
}

/// Fence language tag for a file extension; `None` for unknown extensions.
pub fn language_from_extension(ext: &str) -> Option<&'static str> {
    let tag = match ext.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "toml" => "toml",
        "json" => "json",
        "md" | "markdown" => "markdown",
        "txt" => "text",
        "html" | "htm" => "html",
        "css" => "css",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "py" | "pyi" => "python",
        "sh" | "bash" => "bash",
        "zsh" => "zsh",
        "yml" | "yaml" => "yaml",
        "xml" => "xml",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "dart" => "dart",
        "java" => "java",
        "cs" => "csharp",
        "lua" => "lua",
        "sql" => "sql",
        "r" => "r",
        "ini" | "cfg" => "ini",
        "dockerfile" => "dockerfile",
        "mk" => "makefile",
        _ => return None,
    };
    Some(tag)
}
