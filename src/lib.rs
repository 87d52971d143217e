//! # Catgit
//!
//! `catgit` flattens a project into one text snapshot: a filtered directory tree
//! followed by the concatenated contents of every admitted text file.
//!
//! A single sorted walk applies hard-coded directory exclusions, an optional
//! include-only allow-list, git's own ignore rules and a secondary ignore list.
//! Each surviving file is sniffed as text or binary; text files are read on a
//! bounded worker pool and joined back in walk order.
//!
//! # Features
//!
//! - `parallel` (default): Reads files on a Rayon thread pool while the walk continues.
//!
//! # Example
//!
//! ```no_run
//! use catgit::{CatgitBuilder, BinaryDetection, PatternSet, catgit};
//!
//! let options = CatgitBuilder::new(".")
//!     .ignore_patterns(PatternSet::from_lines(["*.log", "fixtures/"]).expect("patterns"))
//!     .binary_detection(BinaryDetection::Ratio)
//!     .workers(8)
//!     .build();
//!
//! let result = catgit(options).expect("Failed to scan directory");
//!
//! println!("{}", result.tree);
//! for file in &result.files {
//!     println!("{} ({} bytes, {} lines)", file.path.display(), file.size, file.lines);
//! }
//! ```

mod classify;
mod content;
mod engine;
mod error;
mod filter;
mod options;
pub mod output;
mod patterns;
mod tree;
mod types;
pub mod vcs;

pub use classify::{FileKind, SNIFF_LEN, classify, classify_with, sniff};
pub use content::{format_block, language_from_extension, read_record};
pub use engine::catgit;
pub use error::CatgitError;
pub use filter::{AllowList, RuleSet};
pub use options::{
    BinaryDetection, CatgitBuilder, CatgitOptions, DEFAULT_DELIMITER, DEFAULT_EXCLUDED_DIRS,
    DEFAULT_IGNORED_MARKER,
};
pub use patterns::PatternSet;
pub use types::{CatgitResult, EntryKind, FileRecord, FilterDecision, FilterReason, PathEntry};
pub use vcs::VcsIgnored;
