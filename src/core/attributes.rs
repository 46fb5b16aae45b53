//! Attribute Parsing
//!
//! Reads `name="value"` pairs from inside a start tag. Values are kept
//! verbatim: entity references are not decoded, so the serializer can write
//! them back unchanged.

use super::scanner::Scanner;

/// A parsed attribute borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a str,
    /// Raw attribute value, without the quotes
    pub value: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Attribute { name, value }
    }

    /// Namespace prefix (before colon), if any
    pub fn prefix(&self) -> Option<&'a str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// Read one attribute at the scanner position
///
/// On failure the scanner is left where the problem was found and a short
/// description is returned.
pub fn read_attribute<'a>(scanner: &mut Scanner<'a>) -> Result<Attribute<'a>, &'static str> {
    let name = scanner
        .read_name()
        .ok_or("attribute name must start with letter, underscore, or colon")?;

    scanner.skip_whitespace();
    if scanner.peek() != Some(b'=') {
        return Err("attribute value required");
    }
    scanner.advance(1);
    scanner.skip_whitespace();

    if scanner.peek() != Some(b'"') {
        return Err("attribute value must be double-quoted");
    }
    scanner.advance(1);

    let value_start = scanner.position();
    let value_end = scanner
        .find_byte(b'"')
        .ok_or("attribute value is not closed within the lookahead window")?;
    let value = scanner.slice(value_start, value_end);
    scanner.set_position(value_end + 1);

    Ok(Attribute::new(name, value))
}
