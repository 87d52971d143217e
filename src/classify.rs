//! Text/binary sniffing over the first kilobyte of a file.

use crate::error::CatgitError;
use crate::options::BinaryDetection;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many leading bytes are inspected.
pub const SNIFF_LEN: usize = 1024;

/// Share of text bytes a sample must strictly exceed, in percent.
const TEXT_THRESHOLD_PERCENT: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Binary,
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 0x20..=0x7e | 0x07 | 0x08 | 0x09 | 0x0a | 0x0c | 0x0d | 0x1b)
}

/// Classifies a sample by its ratio of printable bytes.
///
/// A sample is text when strictly more than 70% of its bytes are printable
/// ASCII or one of BEL, BS, TAB, LF, FF, CR, ESC. An empty sample is text.
pub fn classify(sample: &[u8]) -> FileKind {
    if sample.is_empty() {
        return FileKind::Text;
    }
    let text = sample.iter().filter(|&&b| is_text_byte(b)).count();
    // integer form of 100 * text / len > 70
    if text * 100 > sample.len() * TEXT_THRESHOLD_PERCENT {
        FileKind::Text
    } else {
        FileKind::Binary
    }
}

/// Classifies a sample with the configured strategy.
pub fn classify_with(sample: &[u8], detection: BinaryDetection) -> FileKind {
    match detection {
        BinaryDetection::Ratio => classify(sample),
        BinaryDetection::Inspector => {
            if content_inspector::inspect(sample).is_binary() {
                FileKind::Binary
            } else {
                FileKind::Text
            }
        }
        BinaryDetection::Disabled => FileKind::Text,
    }
}

fn read_head(path: &Path) -> Result<Vec<u8>, CatgitError> {
    let file = File::open(path).map_err(|e| CatgitError::io(path, e))?;
    let mut sample = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut sample)
        .map_err(|e| CatgitError::io(path, e))?;
    Ok(sample)
}

/// Reads the head of `path` and classifies it.
///
/// An unreadable file is reported as binary together with the read error.
pub fn sniff(path: &Path, detection: BinaryDetection) -> (FileKind, Option<CatgitError>) {
    if detection == BinaryDetection::Disabled {
        return (FileKind::Text, None);
    }
    match read_head(path) {
        Ok(sample) => (classify_with(&sample, detection), None),
        Err(e) => (FileKind::Binary, Some(e)),
    }
}
