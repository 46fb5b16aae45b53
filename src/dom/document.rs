//! Document - owned element tree for one package part
//!
//! Parsing keeps the text before the root start tag (the XML declaration)
//! and after the root end tag verbatim, so writing an unedited document back
//! reproduces its bytes.

use super::element::Element;
use super::writer::XmlWriter;
use crate::core::tokenizer::{StartTag, Token, Tokenizer, DEFAULT_LOOKAHEAD};
use crate::error::{Error, Result};

/// A parsed document part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Everything before the root start tag
    pub prolog: String,
    pub root: Element,
    /// Everything after the root end tag
    pub epilogue: String,
}

impl Document {
    /// Wrap a synthetic root element
    pub fn new(root: Element) -> Self {
        Document {
            prolog: String::new(),
            root,
            epilogue: String::new(),
        }
    }

    /// Parse a document part with the default lookahead window
    pub fn parse(input: &[u8]) -> Result<Self> {
        Self::parse_with_lookahead(input, DEFAULT_LOOKAHEAD)
    }

    /// Parse a document part, matching start tags within `lookahead` bytes
    pub fn parse_with_lookahead(input: &[u8], lookahead: usize) -> Result<Self> {
        let text = std::str::from_utf8(input)?;
        let mut tokenizer = Tokenizer::with_lookahead(text, lookahead);
        let (prolog, start) = tokenizer.first_start_tag()?;
        let root = build_element(&mut tokenizer, start, true)?;

        Ok(Document {
            prolog: prolog.to_owned(),
            root,
            epilogue: tokenizer.rest().to_owned(),
        })
    }

    /// Serialize back to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = XmlWriter::new();
        writer.write_document(self);
        writer.into_bytes()
    }
}

/// Build an element from its already consumed start tag
///
/// Consumes tokens up to the matching end tag. Running out of input is only
/// accepted for the outermost element, which tolerates a missing root close.
pub fn build_element<'a>(
    tokenizer: &mut Tokenizer<'a>,
    start: StartTag<'a>,
    outermost: bool,
) -> Result<Element> {
    let mut element = Element::from(start);

    loop {
        let position = tokenizer.byte_offset();
        match tokenizer.next_token()? {
            Some(Token::StartTag(tag)) => {
                let child = build_element(tokenizer, tag, false)?;
                element.children.push(child);
            }
            Some(Token::CharData(text)) => element.data.push_str(text),
            Some(Token::EndTag(name)) => {
                if name != element.name {
                    return Err(Error::MismatchedTag {
                        expected: element.name,
                        found: name.to_owned(),
                        position,
                    });
                }
                return Ok(element);
            }
            None if outermost => return Ok(element),
            None => return Err(Error::UnexpectedEof { name: element.name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &str) -> String {
        let doc = Document::parse(input.as_bytes()).unwrap();
        String::from_utf8(doc.to_bytes()).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let doc = Document::parse(b"<root>hello</root>").unwrap();
        assert_eq!(doc.root.name, "root");
        assert_eq!(doc.root.data, "hello");
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_parse_nested() {
        let doc = Document::parse(b"<a><b><c/></b><d x=\"1\">t</d></a>").unwrap();
        assert_eq!(doc.root.children.len(), 2);
        let b = &doc.root.children[0];
        assert_eq!(b.children[0].name, "c");
        assert!(b.children[0].self_closing);
        assert_eq!(doc.root.children[1].attribute("x"), Some("1"));
    }

    #[test]
    fn test_char_data_concatenates() {
        let doc = Document::parse(b"<a>one<b/>two</a>").unwrap();
        assert_eq!(doc.root.data, "onetwo");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn test_round_trip_with_prolog() {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<w:document xmlns:w=\"urn:w\"><w:body><w:p w:rsidR=\"001\"><w:pPr><w:bidi w:val=\"1\"/></w:pPr>\
<w:r><w:t xml:space=\"preserve\">hi </w:t></w:r></w:p><w:sectPr/></w:body></w:document>";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn test_epilogue_preserved() {
        assert_eq!(round_trip("<a></a>\n"), "<a></a>\n");
    }

    #[test]
    fn test_missing_root_close_tolerated() {
        let doc = Document::parse(b"<a><b>x</b>").unwrap();
        assert_eq!(doc.root.children[0].data, "x");
    }

    #[test]
    fn test_missing_nested_close_fails() {
        let err = Document::parse(b"<a><b>x").unwrap_err();
        assert_eq!(err, Error::UnexpectedEof { name: "b".into() });
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = Document::parse(b"<a><b></a>").unwrap_err();
        assert!(matches!(err, Error::MismatchedTag { ref expected, ref found, .. }
            if expected == "b" && found == "a"));
    }

    #[test]
    fn test_mismatch_reports_end_tag_offset() {
        let err = Document::parse(b"<a><b>x</a>").unwrap_err();
        assert!(matches!(err, Error::MismatchedTag { position: 7, .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(Document::parse(b"<a>\xff</a>"), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_no_root() {
        assert_eq!(Document::parse(b"   "), Err(Error::NoRootElement));
    }
}
