//! Paragraph Rebuilder - regroup an edited sequence into paragraphs and runs
//!
//! Units carry the indices of the paragraph and run they came from. Walking
//! the sequence in order, a change of paragraph index closes the paragraph
//! being built and a change of run index closes the run being built. Each
//! rebuilt run is a copy of its source run with the text child replaced, so
//! run properties, tabs, breaks and drawings survive. Paragraph children
//! that are not runs keep their place between the surviving runs.

use super::cursor::{RunCursor, TextUnit};
use crate::dom::Element;
use crate::options::Vocabulary;

/// Rebuild the paragraphs a cursor was flattened from
///
/// `paragraphs` must be the slice the cursor was loaded from. One element is
/// returned per flattened paragraph, in order. Paragraphs left without units
/// keep only their non-run children.
pub fn rebuild(cursor: &mut RunCursor, paragraphs: &[Element], vocabulary: &Vocabulary) -> Vec<Element> {
    let count = cursor.paragraph_count();
    let mut out = Vec::with_capacity(count);
    let mut open: Option<ParagraphBuilder<'_>> = None;

    cursor.rewind();
    while let Some(unit) = cursor.advance().copied() {
        let index = unit.origin.paragraph;
        if open.as_ref().map(|p| p.index) != Some(index) {
            if let Some(done) = open.take() {
                out.push(done.finish());
            }
            while out.len() < index {
                out.push(strip_runs(&paragraphs[out.len()], vocabulary));
            }
            open = Some(ParagraphBuilder::new(index, &paragraphs[index], vocabulary));
        }
        if let Some(builder) = open.as_mut() {
            builder.push(&unit);
        }
    }

    if let Some(done) = open {
        out.push(done.finish());
    }
    while out.len() < count {
        out.push(strip_runs(&paragraphs[out.len()], vocabulary));
    }

    out
}

/// A paragraph with its runs removed
fn strip_runs(paragraph: &Element, vocabulary: &Vocabulary) -> Element {
    let mut element = paragraph.shallow_clone();
    element.data = paragraph.data.clone();
    element.children = paragraph
        .children
        .iter()
        .filter(|c| !c.is(&vocabulary.run))
        .cloned()
        .collect();
    element
}

struct ParagraphBuilder<'a> {
    index: usize,
    source: &'a Element,
    vocabulary: &'a Vocabulary,
    element: Element,
    /// Next source child not yet accounted for
    next_child: usize,
    run: Option<RunBuilder<'a>>,
}

impl<'a> ParagraphBuilder<'a> {
    fn new(index: usize, source: &'a Element, vocabulary: &'a Vocabulary) -> Self {
        let mut element = source.shallow_clone();
        element.data = source.data.clone();
        ParagraphBuilder {
            index,
            source,
            vocabulary,
            element,
            next_child: 0,
            run: None,
        }
    }

    fn push(&mut self, unit: &TextUnit) {
        let run_index = unit.origin.run;
        if self.run.as_ref().map(|r| r.index) != Some(run_index) {
            self.close_run();
            self.copy_non_runs(run_index);
            self.next_child = run_index + 1;
            self.run = Some(RunBuilder::new(
                run_index,
                &self.source.children[run_index],
                unit.origin.text,
            ));
        }
        if let (Some(ch), Some(run)) = (unit.ch, self.run.as_mut()) {
            run.text.push(ch);
        }
    }

    /// Copy the non-run children that precede source child `until`
    fn copy_non_runs(&mut self, until: usize) {
        let until = until.min(self.source.children.len());
        for child in &self.source.children[self.next_child.min(until)..until] {
            if !child.is(&self.vocabulary.run) {
                self.element.children.push(child.clone());
            }
        }
    }

    fn close_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.element.children.push(run.finish(&self.vocabulary.text));
        }
    }

    fn finish(mut self) -> Element {
        self.close_run();
        self.copy_non_runs(self.source.children.len());
        self.element
    }
}

struct RunBuilder<'a> {
    index: usize,
    source: &'a Element,
    text_index: Option<usize>,
    text: String,
}

impl<'a> RunBuilder<'a> {
    fn new(index: usize, source: &'a Element, text_index: Option<usize>) -> Self {
        RunBuilder {
            index,
            source,
            text_index,
            text: String::new(),
        }
    }

    fn finish(self, text_tag: &str) -> Element {
        let mut element = self.source.shallow_clone();
        element.data = self.source.data.clone();

        for (i, child) in self.source.children.iter().enumerate() {
            if Some(i) == self.text_index {
                let mut text = child.shallow_clone();
                text.data = self.text.clone();
                element.children.push(text);
            } else {
                element.children.push(child.clone());
            }
        }

        if self.text_index.is_none() && !self.text.is_empty() {
            element.children.push(Element::new(text_tag).with_data(self.text));
        }

        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::cursor::Origin;

    fn run(text: &str) -> Element {
        Element::new("w:r")
            .with_attribute("w:rsidR", "00000000")
            .with_child(Element::new("w:rPr").with_child(Element::new("w:b").self_closed()))
            .with_child(Element::new("w:t").with_data(text))
    }

    fn paragraph(texts: &[&str]) -> Element {
        texts.iter().fold(
            Element::new("w:p")
                .with_attribute("w14:paraId", "000000107")
                .with_child(Element::new("w:pPr")),
            |p, t| p.with_child(run(t)),
        )
    }

    fn rebuild_all(group: &[Element]) -> Vec<Element> {
        let vocab = Vocabulary::default();
        let mut cursor = RunCursor::from_paragraphs(group, &vocab);
        rebuild(&mut cursor, group, &vocab)
    }

    #[test]
    fn test_identity_without_edits() {
        let group = vec![
            paragraph(&["hi ", "I'm ", "your ", "friends ", "doctor "]),
            paragraph(&["oh ", "I ", "", "lied "]),
        ];
        let rebuilt = rebuild_all(&group);
        assert_eq!(rebuilt, group);
        assert_eq!(rebuilt[0].children.len(), 6);
    }

    #[test]
    fn test_non_run_children_keep_position() {
        let p = Element::new("w:p")
            .with_child(Element::new("w:pPr"))
            .with_child(run("a"))
            .with_child(Element::new("w:bookmarkStart").self_closed())
            .with_child(run("b"))
            .with_child(Element::new("w:hyperlink").with_child(run("link")))
            .with_child(Element::new("w:bookmarkEnd").self_closed());
        let group = vec![p];
        assert_eq!(rebuild_all(&group), group);
    }

    #[test]
    fn test_paragraph_without_runs_survives() {
        let group = vec![
            paragraph(&["a"]),
            Element::new("w:p").with_child(Element::new("w:pPr")),
            paragraph(&["b"]),
        ];
        assert_eq!(rebuild_all(&group), group);
    }

    #[test]
    fn test_drawing_run_kept() {
        let drawing = Element::new("w:r")
            .with_child(Element::new("w:rPr"))
            .with_child(Element::new("w:drawing").with_data("<wp:inline/>"));
        let group = vec![Element::new("w:p").with_child(run("x")).with_child(drawing)];
        assert_eq!(rebuild_all(&group), group);
    }

    #[test]
    fn test_inserted_text_adopts_run() {
        let vocab = Vocabulary::default();
        let group = vec![paragraph(&["ab", "cd"])];
        let mut cursor = RunCursor::from_paragraphs(&group, &vocab);
        // drop "bc" and insert "XY" before 'd', inheriting its run
        cursor.seek(1);
        cursor.remove_range(2);
        cursor.advance();
        let template = *cursor.current().unwrap();
        cursor.insert_before(TextUnit::inheriting('X', &template));
        cursor.insert_before(TextUnit::inheriting('Y', &template));

        let rebuilt = rebuild(&mut cursor, &group, &vocab);
        let texts: Vec<_> = rebuilt[0].descendants("w:t").map(|t| t.data.as_str()).collect();
        assert_eq!(texts, vec!["a", "XYd"]);
        assert_eq!(rebuilt[0].children[2].attribute("w:rsidR"), Some("00000000"));
    }

    #[test]
    fn test_emptied_run_removed_and_emptied_paragraph_stripped() {
        let vocab = Vocabulary::default();
        let group = vec![paragraph(&["ab"]), paragraph(&["cd", "ef"])];
        let mut cursor = RunCursor::from_paragraphs(&group, &vocab);
        // remove "ab" entirely and "cd"
        cursor.remove_range(4);

        let rebuilt = rebuild(&mut cursor, &group, &vocab);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt[0].children, vec![Element::new("w:pPr")]);
        assert_eq!(rebuilt[1].children.len(), 2);
        assert_eq!(rebuilt[1].text(), "ef");
    }

    #[test]
    fn test_text_element_created_for_empty_run() {
        let vocab = Vocabulary::default();
        let empty = Element::new("w:r").with_child(Element::new("w:rPr"));
        let group = vec![Element::new("w:p").with_child(empty)];
        let mut cursor = RunCursor::from_paragraphs(&group, &vocab);
        let template = *cursor.advance().unwrap();
        cursor.insert_after(TextUnit::inheriting('Z', &template));

        let rebuilt = rebuild(&mut cursor, &group, &vocab);
        let run = &rebuilt[0].children[0];
        assert_eq!(run.children.len(), 2);
        assert_eq!(run.children[1], Element::new("w:t").with_data("Z"));
        assert_eq!(template.origin, Origin { paragraph: 0, run: 0, text: None });
    }
}
