//! Substitution policies: what a text run becomes.
//!
//! Every resolver is a pure function of its input and the state it was built
//! with, so one instance can be shared across worker threads.

use crate::table::TranslationTable;
use std::borrow::Cow;

/// Maps the raw inner text of a run to its replacement.
pub trait Resolver: Send + Sync {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Leaves every run as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl Resolver for IdentityResolver {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Table lookup: exact match on the trimmed text first, then the first
/// table entry (in insertion order) contained in the text, ignoring case.
///
/// The partial fallback is first-match, not longest-match. With entries
/// `cat` then `category`, the text `category page` resolves through `cat`.
/// Order the table accordingly.
#[derive(Debug, Clone)]
pub struct DictionaryResolver {
    table: TranslationTable,
}

impl DictionaryResolver {
    pub fn new(table: TranslationTable) -> Self {
        Self { table }
    }
}

impl Resolver for DictionaryResolver {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if is_blank(text) {
            return Cow::Borrowed(text);
        }
        let key = text.trim();
        if let Some(value) = self.table.get(key) {
            return Cow::Owned(value.to_string());
        }
        match self.table.first_contained_in(key) {
            Some(value) => Cow::Owned(value.to_string()),
            None => Cow::Borrowed(text),
        }
    }
}

/// Filler words used by [`PlaceholderResolver::default`].
pub const LOREM_IPSUM: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
];

/// Replaces text with filler words, keeping the word count.
///
/// Word `i` of the output is `vocabulary[i % vocabulary.len()]`, so the
/// result depends only on how many words the input has.
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    vocabulary: Vec<String>,
}

impl PlaceholderResolver {
    /// Returns `None` for an empty vocabulary.
    pub fn new<I, S>(vocabulary: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary: Vec<String> = vocabulary.into_iter().map(Into::into).collect();
        if vocabulary.is_empty() {
            None
        } else {
            Some(Self { vocabulary })
        }
    }
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self {
            vocabulary: LOREM_IPSUM.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Resolver for PlaceholderResolver {
    fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if is_blank(text) {
            return Cow::Borrowed(text);
        }
        let word_count = text.split_whitespace().count().max(1);
        let words: Vec<&str> = self
            .vocabulary
            .iter()
            .cycle()
            .take(word_count)
            .map(String::as_str)
            .collect();
        Cow::Owned(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> TranslationTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_exact_match_beats_earlier_partial() {
        let resolver = DictionaryResolver::new(table(&[("He", "Z"), ("Hello", "Xin chào")]));
        assert_eq!(resolver.resolve("Hello"), "Xin chào");
        assert_eq!(resolver.resolve("  Hello\t"), "Xin chào");
    }

    #[test]
    fn test_partial_match_is_first_inserted() {
        let resolver =
            DictionaryResolver::new(table(&[("cat", "mèo"), ("category", "phân loại")]));
        assert_eq!(resolver.resolve("category page"), "mèo");

        let reordered =
            DictionaryResolver::new(table(&[("category", "phân loại"), ("cat", "mèo")]));
        assert_eq!(reordered.resolve("category page"), "phân loại");
    }

    #[test]
    fn test_partial_match_ignores_case() {
        let resolver = DictionaryResolver::new(table(&[("total", "Tổng")]));
        assert_eq!(resolver.resolve("Grand TOTAL:"), "Tổng");
    }

    #[test]
    fn test_exact_match_is_case_sensitive_but_partial_catches_it() {
        let resolver = DictionaryResolver::new(table(&[("Yes", "Có")]));
        // No exact hit for "yes", the case-insensitive partial rule still applies.
        assert_eq!(resolver.resolve("yes"), "Có");
    }

    #[test]
    fn test_unmatched_text_passes_through_untrimmed() {
        let resolver = DictionaryResolver::new(table(&[("cat", "mèo")]));
        assert_eq!(resolver.resolve(" dog "), " dog ");
        assert!(matches!(resolver.resolve(" dog "), Cow::Borrowed(_)));
    }

    #[test]
    fn test_blank_text_is_untouched_by_every_policy() {
        let dictionary = DictionaryResolver::new(table(&[("", "never"), ("x", "y")]));
        let placeholder = PlaceholderResolver::default();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(dictionary.resolve(text), text);
            assert_eq!(placeholder.resolve(text), text);
            assert_eq!(IdentityResolver.resolve(text), text);
        }
    }

    #[test]
    fn test_placeholder_word_count() {
        let resolver = PlaceholderResolver::default();
        assert_eq!(resolver.resolve("one two three"), "lorem ipsum dolor");
        assert_eq!(resolver.resolve("  single  "), "lorem");
        assert_eq!(resolver.resolve("a\tb\nc  d"), "lorem ipsum dolor sit");
    }

    #[test]
    fn test_placeholder_cycles_vocabulary() {
        let resolver = PlaceholderResolver::new(["x", "y"]).unwrap();
        assert_eq!(resolver.resolve("1 2 3 4 5"), "x y x y x");
        assert_eq!(resolver.resolve("1 2 3 4 5"), resolver.resolve("a b c d e"));
    }

    #[test]
    fn test_placeholder_rejects_empty_vocabulary() {
        assert!(PlaceholderResolver::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let shout = |text: &str| format!("{}!", text);
        assert_eq!(shout.resolve("hi"), "hi!");
        let boxed: Box<dyn Resolver> = Box::new(IdentityResolver);
        assert_eq!(boxed.as_ref().resolve("same"), "same");
    }
}
