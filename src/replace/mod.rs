//! Replace Module - the fill pipeline for one document part
//!
//! bytes → [`Document`] → [`Walker`] (cursor, replacer, rebuild per paragraph
//! group) → bytes. A [`Processor`] owns the validated options and can be
//! shared across threads; each call works on its own tree.

pub mod placeholder;
pub mod walker;

use std::ops::AddAssign;

use serde::Serialize;
use tracing::debug;

use crate::dom::Document;
use crate::error::Result;
use crate::options::Options;
use crate::resolve::Resolve;

pub use placeholder::{Outcome, Replacer};
pub use walker::Walker;

/// Counters for one or more filled parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Paragraph groups that held any run
    pub containers: usize,
    pub replaced: usize,
    pub unresolved: usize,
    /// Paragraphs left alone because a non-paragraph sibling preceded them
    pub truncated_paragraphs: usize,
}

impl AddAssign for Report {
    fn add_assign(&mut self, other: Report) {
        self.containers += other.containers;
        self.replaced += other.replaced;
        self.unresolved += other.unresolved;
        self.truncated_paragraphs += other.truncated_paragraphs;
    }
}

/// Rewritten part bytes plus what was done to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub bytes: Vec<u8>,
    pub report: Report,
}

/// Fills placeholders in document parts
#[derive(Debug, Clone, Default)]
pub struct Processor {
    options: Options,
    replacer: Replacer,
}

impl Processor {
    /// Fails if the delimiters cannot be scanned for
    pub fn new(options: Options) -> Result<Self> {
        let replacer = Replacer::new(&options.delimiters)?;
        Ok(Processor { options, replacer })
    }

    pub fn walker(&self) -> Walker<'_> {
        Walker::new(
            &self.replacer,
            &self.options.vocabulary,
            self.options.sibling_policy,
        )
    }

    /// Fill a parsed document in place
    pub fn replace_document<R: Resolve + ?Sized>(
        &self,
        document: &mut Document,
        resolver: &R,
    ) -> Result<Report> {
        self.walker().walk(&mut document.root, resolver)
    }

    /// Parse, fill and serialize one part
    pub fn replace_part<R: Resolve + ?Sized>(&self, input: &[u8], resolver: &R) -> Result<Replaced> {
        let mut document = Document::parse_with_lookahead(input, self.options.lookahead)?;
        let report = self.replace_document(&mut document, resolver)?;
        debug!(
            root = %document.root.name,
            containers = report.containers,
            replaced = report.replaced,
            unresolved = report.unresolved,
            "part filled"
        );
        Ok(Replaced {
            bytes: document.to_bytes(),
            report,
        })
    }

    pub fn load_and_replace<R: Resolve + ?Sized>(&self, input: &[u8], resolver: &R) -> Result<Vec<u8>> {
        self.replace_part(input, resolver).map(|r| r.bytes)
    }
}

/// Fill one part with the default options
pub fn load_and_replace<R: Resolve + ?Sized>(input: &[u8], resolver: &R) -> Result<Vec<u8>> {
    Processor::default().load_and_replace(input, resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::options::Delimiters;

    const PART: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<w:document xmlns:w=\"urn:w\"><w:body><w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
<w:r><w:rPr><w:b/></w:rPr><w:t>Dear {{</w:t></w:r><w:r><w:t>name}},</w:t></w:r></w:p>\
<w:sectPr/></w:body></w:document>";

    fn name(path: &str) -> Option<String> {
        (path == "name").then(|| "Ada".to_string())
    }

    #[test]
    fn test_load_and_replace() {
        let out = load_and_replace(PART.as_bytes(), &name).unwrap();
        let expected = PART.replace("Dear {{", "Dear ").replace("name}},", "Ada,");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_report() {
        let replaced = Processor::default().replace_part(PART.as_bytes(), &name).unwrap();
        assert_eq!(
            replaced.report,
            Report {
                containers: 1,
                replaced: 1,
                unresolved: 0,
                truncated_paragraphs: 0
            }
        );
    }

    #[test]
    fn test_untouched_when_unresolved() {
        let out = load_and_replace(PART.as_bytes(), &|_: &str| -> Option<String> { None }).unwrap();
        assert_eq!(out, PART.as_bytes());
    }

    #[test]
    fn test_invalid_delimiters() {
        let options = Options::new().with_delimiters(Delimiters::new("", "}"));
        assert!(matches!(Processor::new(options), Err(Error::InvalidDelimiters(_))));
    }

    #[test]
    fn test_report_add_assign() {
        let mut total = Report::default();
        total += Report { containers: 1, replaced: 2, unresolved: 3, truncated_paragraphs: 0 };
        total += Report { containers: 1, replaced: 0, unresolved: 1, truncated_paragraphs: 4 };
        assert_eq!(total, Report { containers: 2, replaced: 2, unresolved: 4, truncated_paragraphs: 4 });
    }
}
