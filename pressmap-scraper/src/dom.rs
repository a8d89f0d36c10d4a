//! Owned tree-node abstraction over parsed HTML.
//!
//! The extraction algorithms in this crate walk a tree that mirrors the
//! classic element model: an element owns its leading text, its ordered
//! children, and each child owns the "tail" text that follows its closing
//! tag but still belongs to the parent's text flow. `scraper` represents
//! text as separate sibling nodes, so the conversion below folds those text
//! nodes into `text`/`tail` slots in a single pass.

use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Node categories relevant to extraction, resolved once at construction so
/// the tree walks don't re-compare tag strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Comment,
    Script,
    NoScript,
    Image,
    Time,
    Anchor,
    Other,
}

impl NodeKind {
    fn for_tag(tag: &str) -> Self {
        match tag {
            "script" => NodeKind::Script,
            "noscript" => NodeKind::NoScript,
            "img" => NodeKind::Image,
            "time" => NodeKind::Time,
            "a" => NodeKind::Anchor,
            _ => NodeKind::Other,
        }
    }
}

/// A single element (or comment) in the parsed page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub kind: NodeKind,
    pub tag: String,
    /// Text before the first child element.
    pub text: Option<String>,
    /// Text between this node's closing tag and the next sibling.
    pub tail: Option<String>,
    pub children: Vec<PageNode>,
    pub attrs: HashMap<String, String>,
}

impl PageNode {
    /// Parses an HTML document and converts it into an owned tree rooted at
    /// the `<html>` element. Parsing is lenient and never fails; malformed
    /// markup simply yields whatever tree the parser recovers.
    pub fn parse(html: &str) -> PageNode {
        let document = Html::parse_document(html);
        Self::from_element(document.root_element())
    }

    fn from_element(el: ElementRef<'_>) -> PageNode {
        let tag = el.value().name().to_string();
        let attrs = el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let mut node = PageNode {
            kind: NodeKind::for_tag(&tag),
            tag,
            text: None,
            tail: None,
            children: Vec::new(),
            attrs,
        };

        for child in el.children() {
            match child.value() {
                Node::Text(text) => node.append_text(&text.text),
                Node::Comment(comment) => node.children.push(PageNode {
                    kind: NodeKind::Comment,
                    tag: String::new(),
                    text: Some(comment.comment.to_string()),
                    tail: None,
                    children: Vec::new(),
                    attrs: HashMap::new(),
                }),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        node.children.push(Self::from_element(child_el));
                    }
                }
                _ => {}
            }
        }

        node
    }

    // Text before the first child lands in `text`, everything after a child
    // becomes that child's tail.
    fn append_text(&mut self, chunk: &str) {
        let slot = match self.children.last_mut() {
            Some(last) => last.tail.get_or_insert_with(String::new),
            None => self.text.get_or_insert_with(String::new),
        };
        slot.push_str(chunk);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }
}
