//! Which parts of a DOCX package carry translatable text.
//!
//! The main body is mandatory. Headers, footers, footnotes, endnotes and
//! comments are picked up by their naming convention, so `header7.xml` is
//! found without listing it anywhere.

use crate::error::{DocxError, Result};

/// Main body part; every WordprocessingML package has one.
pub const MAIN_PART: &str = "word/document.xml";

const PART_DIR: &str = "word/";
const PART_EXT: &str = ".xml";

/// Kinds of text-bearing parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Main,
    Header(u32),
    Footer(u32),
    Footnotes,
    Endnotes,
    Comments,
}

impl PartKind {
    /// Classify a part name, `None` for parts that are never rewritten.
    pub fn classify(name: &str) -> Option<PartKind> {
        if name == MAIN_PART {
            return Some(PartKind::Main);
        }
        let stem = name.strip_prefix(PART_DIR)?.strip_suffix(PART_EXT)?;
        match stem {
            "footnotes" => Some(PartKind::Footnotes),
            "endnotes" => Some(PartKind::Endnotes),
            "comments" => Some(PartKind::Comments),
            _ => numbered(stem, "header")
                .map(PartKind::Header)
                .or_else(|| numbered(stem, "footer").map(PartKind::Footer)),
        }
    }

    pub fn is_optional(self) -> bool {
        self != PartKind::Main
    }
}

/// `prefix` followed by one or more ASCII digits.
fn numbered(stem: &str, prefix: &str) -> Option<u32> {
    let digits = stem.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Absurdly long numbers still match the convention; saturate.
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// A part picked for rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPart {
    pub name: String,
    pub kind: PartKind,
}

/// Pick the parts to rewrite: the main body first, then optional parts in
/// archive order. Fails if the main body is missing.
pub fn select_parts<'a, I>(names: I) -> Result<Vec<SelectedPart>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut has_main = false;
    let mut optional = Vec::new();
    for name in names {
        match PartKind::classify(name) {
            Some(PartKind::Main) => has_main = true,
            Some(kind) => optional.push(SelectedPart {
                name: name.to_string(),
                kind,
            }),
            None => {}
        }
    }
    if !has_main {
        return Err(DocxError::MissingMainPart(MAIN_PART.to_string()));
    }

    let mut selected = Vec::with_capacity(optional.len() + 1);
    selected.push(SelectedPart {
        name: MAIN_PART.to_string(),
        kind: PartKind::Main,
    });
    selected.extend(optional);
    Ok(selected)
}
