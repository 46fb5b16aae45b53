//! Core markup parsing primitives
//!
//! This module contains the fundamental building blocks for parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: pull scanner for start tags, end tags and character data
//! - Attributes: verbatim `name="value"` extraction

pub mod attributes;
pub mod scanner;
pub mod tokenizer;

pub use attributes::Attribute;
pub use tokenizer::{StartTag, Token, Tokenizer, DEFAULT_LOOKAHEAD};
