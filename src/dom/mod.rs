//! DOM Module - owned element tree
//!
//! - Element: schema-less node with ordered attributes and owned children
//! - Document: root element plus verbatim prolog/epilogue, and the tree builder
//! - Writer: byte-exact serializer

pub mod document;
pub mod element;
pub mod writer;

pub use document::Document;
pub use element::{Attribute, Element};
pub use writer::{escape_text, XmlWriter};
