//! Locating and rewriting text runs inside raw WordprocessingML.
//!
//! A text run is one `<w:t ...>...</w:t>` element. The markup is never parsed
//! into a tree: a non-greedy pattern finds each run, the resolver decides the
//! new inner text, and everything outside the inner text (tag name, attribute
//! string, surrounding markup) is copied through byte for byte.

use crate::error::{DocxError, Result};
use crate::resolver::Resolver;
use regex::{Captures, Regex};

/// Element that carries visible text in WordprocessingML.
pub const DEFAULT_TAG: &str = "w:t";

lazy_static::lazy_static! {
    static ref DEFAULT_REWRITER: RunRewriter =
        RunRewriter::new(DEFAULT_TAG).expect("invalid default run pattern");
}

/// One occurrence of the target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRun<'a> {
    /// Raw attribute substring of the opening tag, including its leading
    /// whitespace. Empty when the tag has no attributes.
    pub attributes: &'a str,
    /// Raw character data between the tags (entities are left escaped).
    pub text: &'a str,
    /// Byte offset of the opening `<` within the part.
    pub offset: usize,
}

/// Counts gathered while rewriting one part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Runs found
    pub runs: usize,
    /// Runs whose inner text came back different from the original
    pub changed: usize,
}

impl RunStats {
    pub fn merge(&mut self, other: RunStats) {
        self.runs += other.runs;
        self.changed += other.changed;
    }
}

/// Finds and rewrites runs of a single element name.
#[derive(Debug, Clone)]
pub struct RunRewriter {
    tag: String,
    open_prefix: String,
    close_tag: String,
    pattern: Regex,
}

impl RunRewriter {
    /// Build a rewriter for `tag` (e.g. `w:t`, or `a:t` for DrawingML text).
    ///
    /// The opening tag must be followed by whitespace or `>`, so `<w:tab/>`
    /// and `<w:tbl>` never match `w:t`. Self-closing `<w:t/>` carries no text
    /// and is skipped.
    pub fn new(tag: &str) -> Result<Self> {
        if !is_element_name(tag) {
            return Err(DocxError::InvalidTag(tag.to_string()));
        }
        let escaped = regex::escape(tag);
        let pattern = Regex::new(&format!(
            r"<{escaped}(\s(?:[^>]*[^/>])?)?>((?s:.*?))</{escaped}>"
        ))?;
        Ok(Self {
            tag: tag.to_string(),
            open_prefix: format!("<{tag}"),
            close_tag: format!("</{tag}>"),
            pattern,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Literal prefix of the opening tag, used as a cheap pre-check.
    pub fn open_prefix(&self) -> &str {
        &self.open_prefix
    }

    /// True if `markup` might contain a run. May report false positives
    /// (`<w:tab/>` shares the prefix), never false negatives.
    pub fn has_candidate(&self, markup: &str) -> bool {
        markup.contains(&self.open_prefix)
    }

    /// All runs in document order.
    pub fn runs<'a>(&self, markup: &'a str) -> Vec<TextRun<'a>> {
        self.pattern
            .captures_iter(markup)
            .map(|caps| split_run(&caps))
            .collect()
    }

    /// Replace the inner text of every run with `resolver`'s answer.
    ///
    /// Empty and whitespace-only runs are passed to the resolver like any
    /// other; it is the resolver that decides to leave them alone.
    pub fn rewrite<R: Resolver + ?Sized>(&self, markup: &str, resolver: &R) -> (String, RunStats) {
        let mut stats = RunStats::default();
        let result = self.pattern.replace_all(markup, |caps: &Captures| {
            let run = split_run(caps);
            let replacement = resolver.resolve(run.text);
            stats.runs += 1;
            if replacement != run.text {
                stats.changed += 1;
            }
            format!(
                "{}{}>{}{}",
                self.open_prefix, run.attributes, replacement, self.close_tag
            )
        });
        (result.into_owned(), stats)
    }
}

impl Default for RunRewriter {
    fn default() -> Self {
        DEFAULT_REWRITER.clone()
    }
}

fn is_element_name(tag: &str) -> bool {
    !tag.is_empty()
        && !tag
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '=' | '"' | '\''))
}

fn split_run<'a>(caps: &Captures<'a>) -> TextRun<'a> {
    let whole = caps.get(0).expect("group 0 always present");
    TextRun {
        attributes: caps.get(1).map_or("", |m| m.as_str()),
        text: caps.get(2).map_or("", |m| m.as_str()),
        offset: whole.start(),
    }
}

/// Rewrite `<w:t>` runs in `markup` with `resolver`.
pub fn rewrite_runs<R: Resolver + ?Sized>(markup: &str, resolver: &R) -> String {
    DEFAULT_REWRITER.rewrite(markup, resolver).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(text: &str) -> String {
        text.to_uppercase()
    }

    #[test]
    fn test_rewrite_keeps_attributes() {
        let xml = r#"<w:r><w:t xml:space="preserve">hello </w:t></w:r>"#;
        let out = rewrite_runs(xml, &upper);
        assert_eq!(out, r#"<w:r><w:t xml:space="preserve">HELLO </w:t></w:r>"#);
    }

    #[test]
    fn test_rewrite_is_non_greedy() {
        let xml = "<w:p><w:r><w:t>one</w:t></w:r><w:r><w:t>two</w:t></w:r></w:p>";
        let rewriter = RunRewriter::default();
        let runs = rewriter.runs(xml);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "one");
        assert_eq!(runs[1].text, "two");
        assert_eq!(runs[1].offset, xml.find("<w:t>two").unwrap());

        let (out, stats) = rewriter.rewrite(xml, &upper);
        assert_eq!(
            out,
            "<w:p><w:r><w:t>ONE</w:t></w:r><w:r><w:t>TWO</w:t></w:r></w:p>"
        );
        assert_eq!(stats, RunStats { runs: 2, changed: 2 });
    }

    #[test]
    fn test_similar_tags_are_not_runs() {
        let xml = "<w:tbl><w:tc><w:r><w:tab/><w:t>x</w:t></w:r></w:tc></w:tbl>";
        let runs = RunRewriter::default().runs(xml);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "x");
        assert_eq!(runs[0].attributes, "");
    }

    #[test]
    fn test_self_closing_run_is_skipped() {
        let xml = r#"<w:t xml:space="preserve"/><w:t>a</w:t>"#;
        let runs = RunRewriter::default().runs(xml);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "a");
        assert_eq!(runs[0].offset, xml.find("<w:t>").unwrap());
    }

    #[test]
    fn test_empty_and_multiline_runs_reach_resolver() {
        let xml = "<w:t></w:t><w:t>line\nbreak</w:t>";
        let seen = std::sync::Mutex::new(Vec::new());
        let record = |text: &str| {
            seen.lock().unwrap().push(text.to_string());
            text.to_string()
        };
        let (out, stats) = RunRewriter::default().rewrite(xml, &record);
        assert_eq!(out, xml);
        assert_eq!(stats, RunStats { runs: 2, changed: 0 });
        assert_eq!(*seen.lock().unwrap(), vec!["".to_string(), "line\nbreak".to_string()]);
    }

    #[test]
    fn test_markup_without_runs_is_unchanged() {
        let xml = "<w:hdr><w:p><w:pPr/></w:p></w:hdr>";
        assert_eq!(rewrite_runs(xml, &upper), xml);
    }

    #[test]
    fn test_custom_tag() {
        let rewriter = RunRewriter::new("a:t").unwrap();
        assert_eq!(rewriter.open_prefix(), "<a:t");
        let xml = "<a:r><a:t>chart</a:t></a:r><w:t>doc</w:t>";
        let (out, stats) = rewriter.rewrite(xml, &upper);
        assert_eq!(out, "<a:r><a:t>CHART</a:t></a:r><w:t>doc</w:t>");
        assert_eq!(stats.runs, 1);
    }

    #[test]
    fn test_invalid_tags() {
        for tag in ["", "w t", "w:t>", "</w:t"] {
            assert!(matches!(
                RunRewriter::new(tag),
                Err(DocxError::InvalidTag(_))
            ));
        }
    }

    #[test]
    fn test_has_candidate() {
        let rewriter = RunRewriter::default();
        assert!(rewriter.has_candidate("<w:p><w:r><w:t>x</w:t></w:r></w:p>"));
        assert!(!rewriter.has_candidate("<w:p><w:r><w:drawing/></w:r></w:p>"));
    }
}
