//! Run Cursor - flattened, character-addressable view of a paragraph group
//!
//! The run text of consecutive paragraphs is laid out as one doubly-linked
//! sequence of [`TextUnit`]s. Links are indices into a slot arena, so removal
//! and insertion at the cursor are O(1) and seeking by k is O(k).
//!
//! Positions: the cursor either sits on a live unit or on the anchor, a head
//! position before the first unit. Peeking always looks at the units *after*
//! the cursor, so from the anchor the first unit is visible too.

use std::fmt;

use crate::dom::Element;
use crate::options::Vocabulary;

/// Where a unit came from, as indices into the borrowed paragraph group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Index of the paragraph in the group
    pub paragraph: usize,
    /// Index of the run among the paragraph's children
    pub run: usize,
    /// Index of the text element among the run's children
    pub text: Option<usize>,
}

/// One code point of run text plus its origin
///
/// `ch == None` marks a run without text content. Such a unit keeps the run
/// alive through the rebuild but never produces text and never matches a
/// delimiter character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextUnit {
    pub ch: Option<char>,
    pub origin: Origin,
    /// First code point of its run, with only run properties before the text
    pub opens_run: bool,
    /// Last code point of its run, with nothing after the text
    pub closes_run: bool,
}

impl TextUnit {
    pub fn new(ch: Option<char>, origin: Origin) -> Self {
        TextUnit {
            ch,
            origin,
            opens_run: false,
            closes_run: false,
        }
    }

    /// A unit that adopts the formatting context of `template`
    pub fn inheriting(ch: char, template: &TextUnit) -> Self {
        TextUnit::new(Some(ch), template.origin)
    }

    #[inline]
    pub fn is_empty_run(&self) -> bool {
        self.ch.is_none()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    unit: TextUnit,
    /// `None` links back to the anchor
    prev: Option<usize>,
    next: Option<usize>,
}

/// Text between the cursor and a delimiter, see [`RunCursor::peek_until`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookahead {
    pub text: String,
    /// Units spanned, empty runs included
    pub units: usize,
}

/// Flattened sequence with a movable cursor
#[derive(Debug, Clone, Default)]
pub struct RunCursor {
    slots: Vec<Slot>,
    first: Option<usize>,
    last: Option<usize>,
    /// `None` is the anchor
    current: Option<usize>,
    len: usize,
    paragraphs: usize,
}

impl RunCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten the leading paragraphs of a container
    pub fn load(container: &Element, vocabulary: &Vocabulary) -> Self {
        Self::from_paragraphs(&container.children, vocabulary)
    }

    /// Flatten consecutive paragraph elements
    ///
    /// Stops at the first element that is not a paragraph; everything from
    /// there on is excluded. Each run contributes one unit per code point of
    /// its first text child, or a single empty-run unit if it has no text.
    pub fn from_paragraphs(paragraphs: &[Element], vocabulary: &Vocabulary) -> Self {
        let mut cursor = RunCursor::new();

        for (p, paragraph) in paragraphs.iter().enumerate() {
            if !paragraph.is(&vocabulary.paragraph) {
                break;
            }
            cursor.paragraphs += 1;

            for (r, run) in paragraph.children.iter().enumerate() {
                if !run.is(&vocabulary.run) {
                    continue;
                }
                let text = run.child_position(&vocabulary.text);
                let origin = Origin {
                    paragraph: p,
                    run: r,
                    text,
                };
                match text {
                    Some(t) if !run.children[t].data.is_empty() => {
                        let opens = run.children[..t].iter().all(|c| c.is(&vocabulary.properties));
                        let closes = t + 1 == run.children.len();
                        let mut chars = run.children[t].data.chars().peekable();
                        let mut first = true;
                        while let Some(ch) = chars.next() {
                            let mut unit = TextUnit::new(Some(ch), origin);
                            unit.opens_run = first && opens;
                            unit.closes_run = chars.peek().is_none() && closes;
                            cursor.push(unit);
                            first = false;
                        }
                    }
                    _ => cursor.push(TextUnit::new(None, origin)),
                }
            }
        }

        cursor
    }

    /// Number of paragraphs the sequence was flattened from
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs
    }

    /// Number of live units
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a unit at the end, leaving the cursor where it is
    pub fn push(&mut self, unit: TextUnit) {
        let index = self.alloc(unit, self.last, None);
        match self.last {
            Some(last) => self.slots[last].next = Some(index),
            None => self.first = Some(index),
        }
        self.last = Some(index);
    }

    /// Unit under the cursor; `None` on the anchor
    pub fn current(&self) -> Option<&TextUnit> {
        self.current.map(|i| &self.slots[i].unit)
    }

    /// Move the cursor back to the anchor
    pub fn rewind(&mut self) {
        self.current = None;
    }

    /// Move one unit forward; `None` (and no move) at the end
    pub fn advance(&mut self) -> Option<&TextUnit> {
        let next = self.next_of(self.current)?;
        self.current = Some(next);
        Some(&self.slots[next].unit)
    }

    /// Move one unit back
    ///
    /// Returns the unit moved onto, or `None` when the cursor reaches (or
    /// already is on) the anchor.
    pub fn retreat(&mut self) -> Option<&TextUnit> {
        let at = self.current?;
        self.current = self.slots[at].prev;
        self.current()
    }

    /// Move `n` units forward, or `-n` units back, clamped at both ends
    pub fn seek(&mut self, n: isize) {
        if n >= 0 {
            for _ in 0..n {
                if self.advance().is_none() {
                    break;
                }
            }
        } else {
            for _ in 0..n.unsigned_abs() {
                if self.current.is_none() {
                    break;
                }
                self.retreat();
            }
        }
    }

    /// Unit `k` positions after the cursor (`k == 1` is the next unit)
    pub fn ahead(&self, k: usize) -> Option<&TextUnit> {
        if k == 0 {
            return self.current();
        }
        let mut pos = self.next_of(self.current);
        for _ in 1..k {
            pos = self.next_of(Some(pos?));
        }
        pos.map(|i| &self.slots[i].unit)
    }

    /// Text of the next `k` units, without moving
    pub fn peek(&self, k: usize) -> String {
        let mut out = String::with_capacity(k);
        let mut pos = self.next_of(self.current);
        for _ in 0..k {
            let Some(i) = pos else { break };
            if let Some(ch) = self.slots[i].unit.ch {
                out.push(ch);
            }
            pos = self.slots[i].next;
        }
        out
    }

    /// Text strictly between the cursor and the first match of `delimiter`
    ///
    /// Consumes nothing. `None` if the delimiter never occurs.
    pub fn peek_until(&self, delimiter: &str) -> Option<Lookahead> {
        let mut text = String::new();
        let mut units = 0;
        let mut pos = self.next_of(self.current);

        while let Some(i) = pos {
            if self.matches_at(i, delimiter) {
                return Some(Lookahead { text, units });
            }
            if let Some(ch) = self.slots[i].unit.ch {
                text.push(ch);
            }
            units += 1;
            pos = self.slots[i].next;
        }
        None
    }

    /// Remove the `n` units after the cursor
    ///
    /// The cursor stays on the unit before the removed range. Returns how
    /// many units were removed, which is less than `n` if the sequence ends.
    pub fn remove_range(&mut self, n: usize) -> usize {
        let mut removed = 0;
        let mut end = self.current;
        while removed < n {
            let Some(next) = self.next_of(end) else { break };
            end = Some(next);
            removed += 1;
        }
        if removed == 0 {
            return 0;
        }

        let after = self.next_of(end);
        self.set_next(self.current, after);
        match after {
            Some(a) => self.slots[a].prev = self.current,
            None => self.last = self.current,
        }
        self.len -= removed;
        removed
    }

    /// Insert `unit` right before the cursor; the cursor does not move
    ///
    /// On the anchor the unit becomes the first unit.
    pub fn insert_before(&mut self, unit: TextUnit) {
        let Some(at) = self.current else {
            self.insert_after(unit);
            return;
        };
        let prev = self.slots[at].prev;
        let index = self.alloc(unit, prev, Some(at));
        self.set_next(prev, Some(index));
        self.slots[at].prev = Some(index);
    }

    /// Insert `unit` right after the cursor; the cursor does not move
    pub fn insert_after(&mut self, unit: TextUnit) {
        let next = self.next_of(self.current);
        let index = self.alloc(unit, self.current, next);
        self.set_next(self.current, Some(index));
        match next {
            Some(n) => self.slots[n].prev = Some(index),
            None => self.last = Some(index),
        }
    }

    /// Ordinal of the cursor's unit, 1-based; 0 on the anchor
    pub fn offset(&self) -> usize {
        let mut count = 0;
        let mut pos = self.current;
        while let Some(i) = pos {
            count += 1;
            pos = self.slots[i].prev;
        }
        count
    }

    /// Live units in order, independent of the cursor
    pub fn iter(&self) -> Units<'_> {
        Units {
            cursor: self,
            next: self.first,
        }
    }

    /// Concatenated text of all live units
    pub fn text(&self) -> String {
        self.iter().filter_map(|u| u.ch).collect()
    }

    fn alloc(&mut self, unit: TextUnit, prev: Option<usize>, next: Option<usize>) -> usize {
        self.slots.push(Slot { unit, prev, next });
        self.len += 1;
        self.slots.len() - 1
    }

    #[inline]
    fn next_of(&self, pos: Option<usize>) -> Option<usize> {
        match pos {
            Some(i) => self.slots[i].next,
            None => self.first,
        }
    }

    #[inline]
    fn set_next(&mut self, pos: Option<usize>, next: Option<usize>) {
        match pos {
            Some(i) => self.slots[i].next = next,
            None => self.first = next,
        }
    }

    /// Does `delimiter` start at slot `i`?
    fn matches_at(&self, i: usize, delimiter: &str) -> bool {
        let mut pos = Some(i);
        for expected in delimiter.chars() {
            let Some(at) = pos else { return false };
            if self.slots[at].unit.ch != Some(expected) {
                return false;
            }
            pos = self.slots[at].next;
        }
        true
    }
}

impl fmt::Display for RunCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.iter().filter_map(|u| u.ch) {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Iterator over live units
pub struct Units<'a> {
    cursor: &'a RunCursor,
    next: Option<usize>,
}

impl<'a> Iterator for Units<'a> {
    type Item = &'a TextUnit;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next?;
        let slot = &self.cursor.slots[i];
        self.next = slot.next;
        Some(&slot.unit)
    }
}
