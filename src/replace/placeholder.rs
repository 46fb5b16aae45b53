//! Placeholder Replacer - find and substitute delimited paths in a cursor
//!
//! Delimiters are matched unit by unit, so a placeholder split over any
//! number of runs is found the same way as one inside a single run.

use tracing::debug;

use crate::dom::escape_text;
use crate::error::{Error, Result};
use crate::options::Delimiters;
use crate::resolve::Resolve;
use crate::runs::{RunCursor, TextUnit};

/// Units of trailing context kept in an unterminated-placeholder error
const EXCERPT_UNITS: usize = 32;

/// What one pass over a cursor did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub replaced: usize,
    pub unresolved: usize,
}

/// Scans a cursor for placeholders and splices in resolved values
#[derive(Debug, Clone)]
pub struct Replacer {
    start: String,
    end: String,
    start_len: usize,
    end_len: usize,
}

impl Replacer {
    pub fn new(delimiters: &Delimiters) -> Result<Self> {
        delimiters.validate()?;
        Ok(Replacer {
            start: delimiters.start.clone(),
            end: delimiters.end.clone(),
            start_len: delimiters.start.chars().count(),
            end_len: delimiters.end.chars().count(),
        })
    }

    /// Replace every resolvable placeholder, scanning from the anchor
    ///
    /// Unresolved placeholders stay in the sequence verbatim and scanning
    /// resumes right after them. Inserted text is never rescanned.
    pub fn replace<R: Resolve + ?Sized>(
        &self,
        cursor: &mut RunCursor,
        resolver: &R,
    ) -> Result<Outcome> {
        let mut outcome = Outcome::default();
        cursor.rewind();

        loop {
            if !self.seek_start(cursor) {
                return Ok(outcome);
            }

            // onto the last unit of the start delimiter
            cursor.seek(self.start_len as isize);
            let Some(found) = cursor.peek_until(&self.end) else {
                let offset = cursor.offset() + 1 - self.start_len;
                let excerpt = format!("{}{}", self.start, cursor.peek(EXCERPT_UNITS));
                return Err(Error::UnterminatedPlaceholder { offset, excerpt });
            };

            let path = found.text.trim();
            let Some(value) = resolver.resolve(path) else {
                debug!(path, "placeholder left unresolved");
                outcome.unresolved += 1;
                cursor.seek((found.units + self.end_len) as isize);
                continue;
            };

            let span = self.start_len + found.units + self.end_len;
            cursor.seek(-(self.start_len as isize));
            let Some(template) = template_for(cursor, span) else {
                return Ok(outcome);
            };

            cursor.remove_range(span);
            for ch in escape_text(&value).chars() {
                cursor.insert_after(TextUnit::inheriting(ch, &template));
                cursor.advance();
            }
            outcome.replaced += 1;
        }
    }

    /// Walk forward until the start delimiter is next; false at the end
    fn seek_start(&self, cursor: &mut RunCursor) -> bool {
        while cursor.peek(self.start_len) != self.start {
            if cursor.advance().is_none() {
                return false;
            }
        }
        true
    }
}

impl Default for Replacer {
    fn default() -> Self {
        Replacer {
            start: "{{".into(),
            end: "}}".into(),
            start_len: 2,
            end_len: 2,
        }
    }
}

/// Formatting context for a value replacing the `span` units after the cursor
///
/// The unit after the span wins, then the unit before it, then the span's
/// own first unit. A neighbour is only taken if it holds text, shares the
/// span's paragraph and touches the span inside one text element or across
/// a run boundary with no other run content in between. Otherwise the value
/// would be written on the far side of a break, tab or drawing.
fn template_for(cursor: &RunCursor, span: usize) -> Option<TextUnit> {
    let first = *cursor.ahead(1)?;
    let last = *cursor.ahead(span)?;
    let usable = |unit: &TextUnit| unit.ch.is_some() && unit.origin.paragraph == first.origin.paragraph;

    let after = cursor
        .ahead(span + 1)
        .filter(|u| usable(u) && (u.origin == last.origin || (u.opens_run && last.closes_run)));
    let before = cursor
        .current()
        .filter(|u| usable(u) && (u.origin == first.origin || (u.closes_run && first.opens_run)));
    Some(after.or(before).copied().unwrap_or(first))
}
