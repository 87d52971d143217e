//! Internal module for building the ASCII tree alongside the walk.

use std::path::Path;

pub(crate) const BINARY_MARKER: &str = "[Binary/Non-text]";

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Tree lines accumulated in walk order.
///
/// The first line is the root directory name with a trailing `/`; each
/// following line is one rendered entry under its ancestors' guides.
#[derive(Debug)]
pub(crate) struct TreeText {
    lines: Vec<String>,
}

impl TreeText {
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            lines: vec![format!("{}/", root_name(root))],
        }
    }

    pub(crate) fn push(&mut self, prefix: &str, is_last: bool, label: &str) {
        let connector = if is_last { CORNER } else { TEE };
        self.lines.push(format!("{}{}{}", prefix, connector, label));
    }

    pub(crate) fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Prefix for the children of an entry drawn with `prefix`.
pub(crate) fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { BLANK } else { PIPE })
}

/// An entry name, with `/` for directories and an optional trailing marker.
pub(crate) fn label(name: &str, is_dir: bool, marker: Option<&str>) -> String {
    let mut out = String::with_capacity(name.len() + 24);
    out.push_str(name);
    if is_dir {
        out.push('/');
    }
    if let Some(marker) = marker {
        out.push(' ');
        out.push_str(marker);
    }
    out
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}
