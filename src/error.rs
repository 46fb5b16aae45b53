//! Error types shared by the parser and the replacement pipeline

use std::str::Utf8Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort processing of one document part
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The part is not valid UTF-8
    #[error("document part is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),

    /// No token matches at the given byte offset
    #[error("malformed markup at byte {position}: {message}")]
    Malformed { message: String, position: usize },

    /// An end tag closed a different element than the one open
    #[error("mismatched end tag at byte {position}: <{expected}> closed by </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        position: usize,
    },

    /// Input ended while a nested element was still open
    #[error("unexpected end of input inside <{name}>")]
    UnexpectedEof { name: String },

    /// The input holds no element at all
    #[error("no root element found")]
    NoRootElement,

    /// A start delimiter with no end delimiter after it
    #[error("unterminated placeholder at text offset {offset}: {excerpt:?}")]
    UnterminatedPlaceholder { offset: usize, excerpt: String },

    /// Delimiter configuration cannot be used for scanning
    #[error("invalid delimiters: {0}")]
    InvalidDelimiters(String),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>, position: usize) -> Self {
        Error::Malformed {
            message: message.into(),
            position,
        }
    }
}
