//! Markup serializer
//!
//! Emits an element tree depth-first exactly as stored: attribute order,
//! child order and character data are written back untouched, with no
//! indentation. Character data is kept in its escaped form, so plain text
//! entering the tree goes through [`escape_text`] first.

use std::borrow::Cow;

use super::document::Document;
use super::element::Element;

/// Byte buffer writer for element trees
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: Vec<u8>,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write prolog, root element and epilogue
    pub fn write_document(&mut self, doc: &Document) {
        self.write_raw(&doc.prolog);
        self.write_element(&doc.root);
        self.write_raw(&doc.epilogue);
    }

    /// Write one element and its subtree
    pub fn write_element(&mut self, element: &Element) {
        self.write_start_tag(element);
        if element.self_closing && element.children.is_empty() && element.data.is_empty() {
            self.buf.extend_from_slice(b"/>");
            return;
        }
        self.buf.push(b'>');

        if !element.data.is_empty() {
            self.write_raw(&element.data);
        }
        for child in &element.children {
            self.write_element(child);
        }

        self.write_end_tag(&element.name);
    }

    /// Write `<name attr="value"...` without the closing '>'
    fn write_start_tag(&mut self, element: &Element) {
        self.buf.push(b'<');
        self.write_raw(&element.name);
        for attr in &element.attributes {
            self.buf.push(b' ');
            self.write_raw(&attr.name);
            self.buf.extend_from_slice(b"=\"");
            self.write_raw(&attr.value);
            self.buf.push(b'"');
        }
    }

    fn write_end_tag(&mut self, name: &str) {
        self.buf.extend_from_slice(b"</");
        self.write_raw(name);
        self.buf.push(b'>');
    }

    #[inline]
    fn write_raw(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Escape plain text for use as character data
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut buf = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            _ => buf.push(c),
        }
    }
    Cow::Owned(buf)
}

impl Element {
    /// Serialize this element and its subtree
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = XmlWriter::new();
        writer.write_element(self);
        writer.into_bytes()
    }
}
