//! Recursive text extraction and structural locators.
//!
//! These walks tolerate irregular trees: nodes without class attributes are
//! treated as non-matching, and absence is always signalled as `None`.

use crate::dom::{NodeKind, PageNode};

/// Site-specific auxiliary navigation marker whose subtrees carry no
/// readable content.
const EXCLUDED_CLASS: &str = "NavFrame searchaux";

fn is_excluded(node: &PageNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Comment | NodeKind::Script | NodeKind::NoScript | NodeKind::Image
    ) || node.class() == Some(EXCLUDED_CLASS)
}

/// Reconstructs the readable text of a sequence of sibling nodes.
///
/// Each node contributes its own leading text, its recursively extracted
/// subtree text and its tail, separated by single spaces; runs of whitespace
/// collapse to one space. Excluded nodes (comments, scripts, images, the
/// auxiliary navigation class) contribute nothing at all -- their tail text
/// is dropped along with them.
pub fn extract_text(nodes: &[PageNode]) -> String {
    collapse_whitespace(&extract_raw(nodes))
}

fn extract_raw(nodes: &[PageNode]) -> String {
    let mut text = String::new();
    for child in nodes {
        if is_excluded(child) {
            continue;
        }
        text.push_str(child.text.as_deref().unwrap_or(""));
        text.push(' ');
        text.push_str(&extract_raw(&child.children));
        text.push(' ');
        text.push_str(child.tail.as_deref().unwrap_or(""));
    }
    text
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// First node in preorder whose class attribute equals `class` exactly.
///
/// Elements carrying several space-separated classes never match; the check
/// is equality, not membership.
pub fn find_by_class<'a>(root: &'a PageNode, class: &str) -> Option<&'a PageNode> {
    if root.class() == Some(class) {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_by_class(child, class))
}

/// First node in preorder whose id attribute equals `id`.
pub fn find_by_id<'a>(root: &'a PageNode, id: &str) -> Option<&'a PageNode> {
    if root.attr("id") == Some(id) {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_by_id(child, id))
}

/// Extracted text of the first node matching `class`, or `None`.
pub fn find_text_by_class(root: &PageNode, class: &str) -> Option<String> {
    find_by_class(root, class).map(|node| extract_text(std::slice::from_ref(node)))
}

/// Preorder search for a time marker; returns its `datetime` attribute.
///
/// A time node without the attribute yields `None` for its subtree, and the
/// search continues with the following siblings.
pub fn find_time_tag(element: &PageNode) -> Option<&str> {
    if element.kind == NodeKind::Time {
        return element.attr("datetime");
    }
    element.children.iter().find_map(find_time_tag)
}

/// Finds an href below `root`, optionally narrowing to a parent class first.
///
/// With `element_class` given, the href of the first node of that class is
/// returned; otherwise the href of the first direct anchor child of the
/// (narrowed) root. Any missing step yields `None`.
pub fn find_url<'a>(
    root: &'a PageNode,
    parent_class: Option<&str>,
    element_class: Option<&str>,
) -> Option<&'a str> {
    let root = match parent_class {
        Some(class) => find_by_class(root, class)?,
        None => root,
    };

    match element_class {
        Some(class) => find_by_class(root, class)?.attr("href"),
        None => root
            .children
            .iter()
            .find(|child| child.kind == NodeKind::Anchor)?
            .attr("href"),
    }
}
