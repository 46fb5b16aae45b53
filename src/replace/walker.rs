//! Walker - locate paragraph groups and run the replacement pass on each
//!
//! Every group gets its own cursor, so a placeholder never spans two groups.
//! A group is rebuilt and spliced back only after its pass succeeded.

use std::ops::Range;

use tracing::warn;

use super::placeholder::Replacer;
use super::Report;
use crate::dom::Element;
use crate::error::Result;
use crate::options::{SiblingPolicy, Vocabulary};
use crate::resolve::Resolve;
use crate::runs::{rebuild, RunCursor};

pub struct Walker<'a> {
    replacer: &'a Replacer,
    vocabulary: &'a Vocabulary,
    policy: SiblingPolicy,
}

impl<'a> Walker<'a> {
    pub fn new(replacer: &'a Replacer, vocabulary: &'a Vocabulary, policy: SiblingPolicy) -> Self {
        Walker {
            replacer,
            vocabulary,
            policy,
        }
    }

    /// Replace placeholders in every paragraph group below `element`
    ///
    /// `element` itself counts as a container too, so a header or footer
    /// root holding paragraphs directly is filled as well.
    pub fn walk<R: Resolve + ?Sized>(&self, element: &mut Element, resolver: &R) -> Result<Report> {
        let mut report = Report::default();
        match self.policy {
            SiblingPolicy::Truncate => self.walk_truncate(element, resolver, &mut report)?,
            SiblingPolicy::Split => self.walk_split(element, resolver, &mut report)?,
        }
        Ok(report)
    }

    fn walk_truncate<R: Resolve + ?Sized>(
        &self,
        element: &mut Element,
        resolver: &R,
        report: &mut Report,
    ) -> Result<()> {
        if !element.first_child().is_some_and(|c| self.is_paragraph(c)) {
            for child in &mut element.children {
                self.walk_truncate(child, resolver, report)?;
            }
            return Ok(());
        }

        let leading = self.leading_paragraphs(&element.children);
        self.fill_group(&mut element.children, 0..leading, resolver, report)?;

        let skipped = element.children[leading..]
            .iter()
            .filter(|c| self.is_paragraph(c))
            .count();
        if skipped > 0 {
            warn!(
                container = %element.name,
                skipped,
                "paragraphs after a non-paragraph sibling were not filled"
            );
            report.truncated_paragraphs += skipped;
        }
        Ok(())
    }

    fn walk_split<R: Resolve + ?Sized>(
        &self,
        element: &mut Element,
        resolver: &R,
        report: &mut Report,
    ) -> Result<()> {
        let mut i = 0;
        while i < element.children.len() {
            if self.is_paragraph(&element.children[i]) {
                let end = i + self.leading_paragraphs(&element.children[i..]);
                self.fill_group(&mut element.children, i..end, resolver, report)?;
                i = end;
            } else {
                self.walk_split(&mut element.children[i], resolver, report)?;
                i += 1;
            }
        }
        Ok(())
    }

    /// Flatten, replace and rebuild `children[group]`
    fn fill_group<R: Resolve + ?Sized>(
        &self,
        children: &mut Vec<Element>,
        group: Range<usize>,
        resolver: &R,
        report: &mut Report,
    ) -> Result<()> {
        let paragraphs = &children[group.clone()];
        let mut cursor = RunCursor::from_paragraphs(paragraphs, self.vocabulary);
        if cursor.is_empty() {
            return Ok(());
        }

        report.containers += 1;
        let outcome = self.replacer.replace(&mut cursor, resolver)?;
        report.replaced += outcome.replaced;
        report.unresolved += outcome.unresolved;

        // nothing spliced means the rebuild would be the identity
        if outcome.replaced > 0 {
            let rebuilt = rebuild(&mut cursor, paragraphs, self.vocabulary);
            children.splice(group, rebuilt);
        }
        Ok(())
    }

    fn leading_paragraphs(&self, children: &[Element]) -> usize {
        children.iter().take_while(|c| self.is_paragraph(c)).count()
    }

    #[inline]
    fn is_paragraph(&self, element: &Element) -> bool {
        element.is(&self.vocabulary.paragraph)
    }
}
