//! Schema-less element tree
//!
//! Every element owns its children outright. Attribute names and values are
//! stored verbatim, in source order, duplicates allowed.

use crate::core::attributes;
use crate::core::tokenizer::StartTag;

/// A stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl From<attributes::Attribute<'_>> for Attribute {
    fn from(attr: attributes::Attribute<'_>) -> Self {
        Attribute::new(attr.name, attr.value)
    }
}

/// An element node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, prefix included
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Concatenated character data
    pub data: String,
    pub children: Vec<Element>,
    /// Written as `<name/>` in the source
    pub self_closing: bool,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: append an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Builder: set character data
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: mark as self-closing
    pub fn self_closed(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Copy of this element without data or children
    pub fn shallow_clone(&self) -> Self {
        Element {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            data: String::new(),
            children: Vec::new(),
            self_closing: self.self_closing,
        }
    }

    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(name))
    }

    /// Index of the first child element with the given name
    pub fn child_position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.is(name))
    }

    pub fn first_child(&self) -> Option<&Element> {
        self.children.first()
    }

    /// Value of the first attribute with the given name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated data of this element and all descendants, depth-first
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.data);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// All descendants with the given name, depth-first
    pub fn descendants<'e>(&'e self, name: &'e str) -> impl Iterator<Item = &'e Element> + 'e {
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.iter().rev());
                if node.is(name) {
                    return Some(node);
                }
            }
            None
        })
    }
}

impl From<StartTag<'_>> for Element {
    fn from(tag: StartTag<'_>) -> Self {
        Element {
            name: tag.name.to_owned(),
            attributes: tag.attributes.into_iter().map(Attribute::from).collect(),
            data: String::new(),
            children: Vec::new(),
            self_closing: tag.self_closing,
        }
    }
}
