//! DOCX Translate
//!
//! Replaces the visible text of DOCX documents while keeping every other
//! byte of the package (markup, attributes, media, archive layout) as it was.
//!
//! This library provides:
//! - `text_runs`: pattern-based locating and rewriting of `<w:t>` runs
//! - `resolver`: substitution policies (table lookup, placeholder, identity)
//! - `table`: ordered translation tables loaded from JSON, CSV or text maps
//! - `parts`: selection of the text-bearing parts of a package
//! - `package`: in-memory zip container I/O
//! - `translate`: the end-to-end pipeline over a package or file
//!
//! Binaries:
//! - `docx-translate`: translate a document or extract its texts

pub mod config;
pub mod error;
pub mod package;
pub mod parts;
pub mod resolver;
pub mod table;
pub mod text_runs;
pub mod translate;

pub use config::TranslateConfig;
pub use error::{DocxError, Result};
pub use package::DocxPackage;
pub use parts::{select_parts, PartKind, MAIN_PART};
pub use resolver::{DictionaryResolver, IdentityResolver, PlaceholderResolver, Resolver};
pub use table::TranslationTable;
pub use text_runs::{rewrite_runs, RunRewriter, RunStats, TextRun, DEFAULT_TAG};
pub use translate::{
    collect_texts, process, translate_bytes, translate_file, PartOutcome, ProcessReport,
};
