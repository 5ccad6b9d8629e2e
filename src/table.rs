//! Translation tables: ordered source -> replacement mappings.
//!
//! A table keeps insertion order because the partial-match rule of
//! [`DictionaryResolver`](crate::resolver::DictionaryResolver) returns the
//! first entry that matches. Tables load from three formats:
//!
//! - JSON: an object whose values (or an array whose items) are
//!   `{"originalText": ..., "translatedText": ...}` records
//! - CSV: `originalText` and `translatedText` columns, or the first two
//!   columns when those headers are absent (the first row is always a header)
//! - text map: one `old=new` pair per line, `#` comments and blank lines ignored

use crate::error::{DocxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One record of a JSON table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub original_text: String,
    pub translated_text: String,
}

/// Ordered mapping from trimmed source text to replacement text.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<(String, String)>,
    /// Lowercased keys, parallel to `entries`, for the partial-match scan
    folded: Vec<String>,
    index: HashMap<String, usize>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. The key is trimmed; an empty key is ignored and
    /// `false` returned. Re-inserting a key replaces its value but keeps its
    /// original position.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        let value = value.into();
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.folded.push(key.to_lowercase());
                self.entries.push((key.to_string(), value));
            }
        }
        true
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    /// Value of the first entry (in insertion order) whose key occurs in
    /// `text`, both sides lowercased.
    pub fn first_contained_in(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.folded
            .iter()
            .position(|key| haystack.contains(key.as_str()))
            .map(|pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Load a table, choosing the format from the file extension
    /// (`.json`, `.csv`, `.txt`/`.map`).
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let format = match ext.as_deref() {
            Some("json") => TableFormat::Json,
            Some("csv") => TableFormat::Csv,
            Some("txt") | Some("map") => TableFormat::TextMap,
            _ => return Err(DocxError::UnsupportedTableFormat(path.to_path_buf())),
        };
        let content = std::fs::read_to_string(path).map_err(|e| DocxError::io(path, e))?;
        let table = format.parse(&content, path)?;
        log::info!(
            "Loaded {} translation entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        TableFormat::Json.parse(content, Path::new(INLINE_SOURCE))
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        TableFormat::Csv.parse(content, Path::new(INLINE_SOURCE))
    }

    pub fn from_text_map_str(content: &str) -> Result<Self> {
        TableFormat::TextMap.parse(content, Path::new(INLINE_SOURCE))
    }

    /// Records in the JSON shape accepted by [`TranslationTable::load`].
    pub fn to_records(&self) -> Vec<TableRecord> {
        self.entries
            .iter()
            .map(|(k, v)| TableRecord {
                original_text: k.clone(),
                translated_text: v.clone(),
            })
            .collect()
    }

    fn insert_record(&mut self, key: &str, value: &str, source: &Path, line: usize) {
        if !self.insert(key, value) {
            log::warn!(
                "{}: record {} has an empty source text, skipped",
                source.display(),
                line
            );
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = TranslationTable::new();
        for (k, v) in iter {
            table.insert(k.as_ref(), v);
        }
        table
    }
}

const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Clone, Copy)]
enum TableFormat {
    Json,
    Csv,
    TextMap,
}

impl TableFormat {
    fn parse(self, content: &str, source: &Path) -> Result<TranslationTable> {
        match self {
            TableFormat::Json => parse_json(content, source),
            TableFormat::Csv => parse_csv(content, source),
            TableFormat::TextMap => Ok(parse_text_map(content, source)),
        }
    }
}

fn format_error(source: &Path, reason: impl Into<String>) -> DocxError {
    DocxError::TableFormat {
        path: source.to_path_buf(),
        reason: reason.into(),
    }
}

fn parse_json(content: &str, source: &Path) -> Result<TranslationTable> {
    let json_error = |e| DocxError::TableJson {
        path: source.to_path_buf(),
        source: e,
    };
    let value: serde_json::Value = serde_json::from_str(content).map_err(json_error)?;
    let items: Vec<serde_json::Value> = match value {
        serde_json::Value::Object(map) => {
            let pairs: Vec<(String, serde_json::Value)> = map.into_iter().collect();
            object_values_in_property_order(pairs)
        }
        serde_json::Value::Array(items) => items,
        _ => return Err(format_error(source, "expected a JSON object or array")),
    };

    let mut table = TranslationTable::new();
    for (i, item) in items.into_iter().enumerate() {
        let record: TableRecord = serde_json::from_value(item).map_err(json_error)?;
        table.insert_record(&record.original_text, &record.translated_text, source, i + 1);
    }
    Ok(table)
}

/// Object values with array-index keys first (ascending), then all other
/// keys in document order. Exported tables keyed `"0"`, `"1"`, ... `"10"`
/// keep their numeric order even if a tool wrote them out of order.
fn object_values_in_property_order(
    pairs: Vec<(String, serde_json::Value)>,
) -> Vec<serde_json::Value> {
    let (mut indexed, named): (Vec<_>, Vec<_>) = pairs
        .into_iter()
        .map(|(k, v)| (array_index(&k), v))
        .partition(|(idx, _)| idx.is_some());
    indexed.sort_by_key(|(idx, _)| *idx);
    indexed
        .into_iter()
        .chain(named)
        .map(|(_, v)| v)
        .collect()
}

/// Canonical array index: no sign, no leading zeros, below 2^32 - 1.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

fn parse_csv(content: &str, source: &Path) -> Result<TranslationTable> {
    let csv_error = |e| DocxError::TableCsv {
        path: source.to_path_buf(),
        source: e,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (key_idx, value_idx) = match (column("originalText"), column("translatedText")) {
        (Some(k), Some(v)) => (k, v),
        (None, None) => (0, 1),
        (Some(_), None) => {
            return Err(format_error(source, "header has originalText but no translatedText"))
        }
        (None, Some(_)) => {
            return Err(format_error(source, "header has translatedText but no originalText"))
        }
    };

    let mut table = TranslationTable::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let key = record.get(key_idx).unwrap_or("");
        let value = record.get(value_idx).ok_or_else(|| {
            format_error(source, format!("row {} has no column {}", i + 2, value_idx + 1))
        })?;
        table.insert_record(key, value, source, i + 2);
    }
    Ok(table)
}

fn parse_text_map(content: &str, source: &Path) -> TranslationTable {
    let mut table = TranslationTable::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => table.insert_record(key, value, source, i + 1),
            None => log::warn!(
                "{}: line {} has no '=' separator, skipped",
                source.display(),
                i + 1
            ),
        }
    }
    table
}
