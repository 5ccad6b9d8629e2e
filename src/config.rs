//! Processing options.

use crate::text_runs::DEFAULT_TAG;

/// Configuration for translating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Element whose inner text is rewritten (e.g. "w:t")
    pub tag: String,
    /// Rewrite optional parts (headers, footers, notes) on worker threads
    pub parallel: bool,
    /// Worker count when parallel; `None` lets rayon decide
    pub threads: Option<usize>,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            parallel: true,
            threads: None,
        }
    }
}

impl TranslateConfig {
    /// Create config that processes every part on the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Rewrite a different text-bearing element
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Fix the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }
}
