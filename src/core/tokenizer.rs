//! Markup Tokenizer - forward-only pull scanner
//!
//! Extracts the three token kinds the document parts are made of:
//! - Element start tags (with attributes, possibly self-closing)
//! - Element end tags
//! - Character data
//!
//! Start tags are only matched inside a bounded lookahead window from the
//! current position, so a stray `<` deep inside a large part fails fast
//! instead of scanning the rest of the buffer.

use super::attributes::{read_attribute, Attribute};
use super::scanner::{is_name_start_char, Scanner};
use crate::error::{Error, Result};

/// Default size of the start-tag lookahead window in bytes
pub const DEFAULT_LOOKAHEAD: usize = 8096;

/// Current scanning state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Between tokens
    Content,
    /// Right after an end tag; whitespace is skipped before the next token
    AfterEndTag,
    /// End of input reached or an error was returned
    Done,
}

/// An element start tag: `<name attr="value" ...>` or `<name .../>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    /// Written as `<name/>`; an implicit end tag follows
    pub self_closing: bool,
}

/// A token borrowed from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    StartTag(StartTag<'a>),
    EndTag(&'a str),
    CharData(&'a str),
}

/// Markup tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    lookahead: usize,
    state: ParseState,
    /// End tag owed to the caller after a self-closing start tag
    pending_end: Option<&'a str>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with the default lookahead window
    pub fn new(input: &'a str) -> Self {
        Self::with_lookahead(input, DEFAULT_LOOKAHEAD)
    }

    /// Create a tokenizer matching start tags within `lookahead` bytes
    pub fn with_lookahead(input: &'a str, lookahead: usize) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            lookahead: lookahead.max(1),
            state: ParseState::Content,
            pending_end: None,
        }
    }

    /// Byte offset of the next unread input
    ///
    /// Not named `position`, which `Iterator` already provides.
    pub fn byte_offset(&self) -> usize {
        self.scanner.position()
    }

    /// Input not consumed yet, verbatim
    pub fn rest(&self) -> &'a str {
        self.scanner.remaining()
    }

    /// Scan past any leading content to the first element start tag
    ///
    /// Returns the skipped text (XML declaration, BOM, whitespace) together
    /// with the start tag. Used once to seed the tree builder at the root.
    pub fn first_start_tag(&mut self) -> Result<(&'a str, StartTag<'a>)> {
        let prolog_start = self.scanner.position();
        loop {
            let Some(lt) = self.scanner.find_tag_start() else {
                self.state = ParseState::Done;
                return Err(Error::NoRootElement);
            };
            self.scanner.set_position(lt);
            if self.scanner.peek_at(1).is_some_and(is_name_start_char) {
                let prolog = self.scanner.slice(prolog_start, lt);
                let tag = self.read_start_tag()?;
                return Ok((prolog, tag));
            }
            self.scanner.advance(1);
        }
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        if self.state == ParseState::Done {
            return Ok(None);
        }

        if let Some(name) = self.pending_end.take() {
            self.state = ParseState::AfterEndTag;
            return Ok(Some(Token::EndTag(name)));
        }

        if self.state == ParseState::AfterEndTag {
            self.scanner.skip_whitespace();
            self.state = ParseState::Content;
        }

        if self.scanner.is_eof() {
            self.state = ParseState::Done;
            return Ok(None);
        }

        // Start tags tolerate leading indentation
        let mark = self.scanner.position();
        self.scanner.skip_whitespace();
        if self.scanner.peek() == Some(b'<') && self.scanner.peek_at(1).is_some_and(is_name_start_char) {
            return self.read_start_tag().map(|tag| Some(Token::StartTag(tag)));
        }
        self.scanner.set_position(mark);

        if self.scanner.starts_with(b"</") {
            return self.read_end_tag().map(|name| Some(Token::EndTag(name)));
        }

        if self.scanner.peek() == Some(b'<') {
            return Err(self.fail("unsupported markup construct"));
        }

        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(mark + self.scanner.remaining().len());
        let text = self.scanner.slice(mark, end);
        self.scanner.set_position(end);
        Ok(Some(Token::CharData(text)))
    }

    /// Read a start tag; the scanner sits on its '<'
    fn read_start_tag(&mut self) -> Result<StartTag<'a>> {
        let mut tag = self.scanner.bounded(self.lookahead);
        tag.advance(1);

        let Some(name) = tag.read_name() else {
            return Err(self.fail_at("expected element name", tag.position()));
        };

        let mut attributes = Vec::new();
        let self_closing = loop {
            tag.skip_whitespace();
            match tag.peek() {
                Some(b'>') => {
                    tag.advance(1);
                    break false;
                }
                Some(b'/') if tag.peek_at(1) == Some(b'>') => {
                    tag.advance(2);
                    break true;
                }
                Some(_) => match read_attribute(&mut tag) {
                    Ok(attribute) => attributes.push(attribute),
                    Err(message) => return Err(self.fail_at(message, tag.position())),
                },
                None => {
                    return Err(self.fail_at(
                        "start tag not closed within the lookahead window",
                        tag.position(),
                    ))
                }
            }
        };

        self.scanner.set_position(tag.position());
        self.state = ParseState::Content;
        if self_closing {
            self.pending_end = Some(name);
        }

        Ok(StartTag {
            name,
            attributes,
            self_closing,
        })
    }

    /// Read an end tag; the scanner sits on its "</"
    fn read_end_tag(&mut self) -> Result<&'a str> {
        self.scanner.advance(2);
        let Some(name) = self.scanner.read_name() else {
            return Err(self.fail("expected element name in end tag"));
        };
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(self.fail("expected '>' to close end tag"));
        }
        self.scanner.advance(1);
        self.state = ParseState::AfterEndTag;
        Ok(name)
    }

    fn fail(&mut self, message: &str) -> Error {
        let position = self.scanner.position();
        self.fail_at(message, position)
    }

    fn fail_at(&mut self, message: &str, position: usize) -> Error {
        self.state = ParseState::Done;
        Error::malformed(message, position)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).collect::<Result<Vec<_>>>().unwrap()
    }

    fn start<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> Token<'a> {
        Token::StartTag(StartTag {
            name,
            attributes: attrs.iter().map(|&(n, v)| Attribute::new(n, v)).collect(),
            self_closing: false,
        })
    }

    #[test]
    fn test_paragraph_tokens() {
        let data = r#"
<w:p w:rsidR="00000000" w:rsidDel="00000000" w14:paraId="0000000D" flex-direction="row">
<w:pPr>
<w:bidi w:val="1"/>
</w:pPr>
<w:r><w:t>hello</w:t></w:r>
</w:p>
"#;
        let mut tokenizer = Tokenizer::new(data);
        assert_eq!(
            tokenizer.next_token().unwrap(),
            Some(start(
                "w:p",
                &[
                    ("w:rsidR", "00000000"),
                    ("w:rsidDel", "00000000"),
                    ("w14:paraId", "0000000D"),
                    ("flex-direction", "row"),
                ]
            ))
        );
        assert_eq!(tokenizer.next_token().unwrap(), Some(start("w:pPr", &[])));
        assert_eq!(
            tokenizer.next_token().unwrap(),
            Some(Token::StartTag(StartTag {
                name: "w:bidi",
                attributes: vec![Attribute::new("w:val", "1")],
                self_closing: true,
            }))
        );
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:bidi")));
        // whitespace after the implicit end tag is skipped
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:pPr")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(start("w:r", &[])));
        assert_eq!(tokenizer.next_token().unwrap(), Some(start("w:t", &[])));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::CharData("hello")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:t")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:r")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:p")));
        assert_eq!(tokenizer.next_token().unwrap(), None);
        assert_eq!(tokenizer.state, ParseState::Done);
    }

    #[test]
    fn test_byte_offset_tracks_consumed_input() {
        let mut tokenizer = Tokenizer::new("<a>xy</a>");
        assert_eq!(tokenizer.byte_offset(), 0);
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.byte_offset(), 3);
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.byte_offset(), 5);
    }

    #[test]
    fn test_char_data_keeps_spaces() {
        assert_eq!(
            tokens("<w:t> a b </w:t>"),
            vec![start("w:t", &[]), Token::CharData(" a b "), Token::EndTag("w:t")]
        );
    }

    #[test]
    fn test_whitespace_before_end_tag_is_data() {
        assert_eq!(
            tokens("<a>\n</a>"),
            vec![start("a", &[]), Token::CharData("\n"), Token::EndTag("a")]
        );
    }

    #[test]
    fn test_trailing_char_data_without_tag() {
        assert_eq!(tokens("<a>tail"), vec![start("a", &[]), Token::CharData("tail")]);
    }

    #[test]
    fn test_comment_is_malformed() {
        let mut tokenizer = Tokenizer::new("<a><!-- note --></a>");
        tokenizer.next_token().unwrap();
        let err = tokenizer.next_token().unwrap_err();
        assert!(matches!(err, Error::Malformed { position: 3, .. }));
        // fused after an error
        assert_eq!(tokenizer.next_token().unwrap(), None);
    }

    #[test]
    fn test_start_tag_outside_window() {
        let long_value = "x".repeat(64);
        let input = format!("<a v=\"{long_value}\"><b/></a>");
        let mut tokenizer = Tokenizer::with_lookahead(&input, 16);
        assert!(matches!(tokenizer.next_token(), Err(Error::Malformed { .. })));

        let mut wide = Tokenizer::with_lookahead(&input, 128);
        assert!(matches!(wide.next_token(), Ok(Some(Token::StartTag(_)))));
    }

    #[test]
    fn test_char_data_longer_than_window() {
        let text = "y".repeat(100);
        let input = format!("<t>{text}</t>");
        let found: Vec<_> = Tokenizer::with_lookahead(&input, 8)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(found[1], Token::CharData(text.as_str()));
    }

    #[test]
    fn test_first_start_tag_skips_declaration() {
        let input = "<?xml version=\"1.0\" standalone=\"yes\"?>\r\n<w:document x=\"1\"></w:document>";
        let mut tokenizer = Tokenizer::new(input);
        let (prolog, tag) = tokenizer.first_start_tag().unwrap();
        assert_eq!(prolog, "<?xml version=\"1.0\" standalone=\"yes\"?>\r\n");
        assert_eq!(tag.name, "w:document");
        assert_eq!(tag.attributes, vec![Attribute::new("x", "1")]);
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::EndTag("w:document")));
    }

    #[test]
    fn test_first_start_tag_without_element() {
        let mut tokenizer = Tokenizer::new("just text <?pi?>");
        assert_eq!(tokenizer.first_start_tag(), Err(Error::NoRootElement));
    }

    #[test]
    fn test_broken_end_tag() {
        let mut tokenizer = Tokenizer::new("</a");
        assert!(matches!(tokenizer.next_token(), Err(Error::Malformed { .. })));
    }
}
