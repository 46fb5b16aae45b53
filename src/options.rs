//! Replacement options
//!
//! All knobs are plain values handed to the processor at construction. Nothing
//! here is global, so concurrent passes over different parts can share one
//! `Options` by reference.

use serde::Deserialize;

use crate::core::DEFAULT_LOOKAHEAD;
use crate::error::{Error, Result};

/// Placeholder start and end markers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Delimiters {
    pub start: String,
    pub end: String,
}

impl Delimiters {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Delimiters {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Both markers must be non-empty for scanning to make progress
    pub fn validate(&self) -> Result<()> {
        if self.start.is_empty() {
            return Err(Error::InvalidDelimiters("start delimiter is empty".into()));
        }
        if self.end.is_empty() {
            return Err(Error::InvalidDelimiters("end delimiter is empty".into()));
        }
        Ok(())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new("{{", "}}")
    }
}

/// Tag names of the paragraph, run, text and run-properties elements
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Vocabulary {
    pub paragraph: String,
    pub run: String,
    pub text: String,
    #[serde(default = "default_properties")]
    pub properties: String,
}

fn default_properties() -> String {
    "w:rPr".into()
}

impl Default for Vocabulary {
    /// WordprocessingML names
    fn default() -> Self {
        Vocabulary {
            paragraph: "w:p".into(),
            run: "w:r".into(),
            text: "w:t".into(),
            properties: default_properties(),
        }
    }
}

/// What to do with paragraphs that follow a non-paragraph sibling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiblingPolicy {
    /// Only the leading paragraphs of a container are processed; the rest
    /// of the container is left untouched
    #[default]
    Truncate,
    /// Every run of consecutive paragraphs is processed on its own and the
    /// elements between them are walked as well
    Split,
}

/// Everything a replacement pass is configured with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub delimiters: Delimiters,
    pub vocabulary: Vocabulary,
    pub sibling_policy: SiblingPolicy,
    /// Start-tag lookahead window in bytes
    pub lookahead: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            delimiters: Delimiters::default(),
            vocabulary: Vocabulary::default(),
            sibling_policy: SiblingPolicy::default(),
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_sibling_policy(mut self, policy: SiblingPolicy) -> Self {
        self.sibling_policy = policy;
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }
}
