//! Intra-site link harvesting for the page-graph explorer.

use crate::dom::{NodeKind, PageNode};
use crate::extract::find_by_id;
use std::collections::HashSet;

/// Relative path fragment every article link carries.
pub const INTERNAL_PATH_MARKER: &str = "/wiki/";
/// Absolute links to other sites carry a scheme.
const SCHEME_MARKER: &str = "http";
/// File namespace pages (images, media) are not articles.
const FILE_NAMESPACE_MARKER: &str = "Datei:";
/// Only anchors inside this region count as content links.
const CONTENT_REGION_ID: &str = "mw-content-text";

/// Insertion-ordered map from relative page path to the anchor text of its
/// first occurrence. Later occurrences of the same path are ignored, so
/// iteration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    entries: Vec<(String, String)>,
    seen: HashSet<String>,
}

impl LinkMap {
    pub fn insert(&mut self, href: &str, text: &str) {
        if self.seen.insert(href.to_string()) {
            self.entries.push((href.to_string(), text.to_string()));
        }
    }

    pub fn contains(&self, href: &str) -> bool {
        self.seen.contains(href)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(href, text)| (href.as_str(), text.as_str()))
    }
}

/// Collects all article links from the content region of a page.
///
/// A link qualifies when its href contains the internal path marker and
/// contains neither a scheme, the file namespace marker, a period, nor a
/// colon. This drops external links, media pages, special pages and
/// interwiki links in one pass.
pub fn extract_links(root: &PageNode) -> LinkMap {
    let mut links = LinkMap::default();
    if let Some(content) = find_by_id(root, CONTENT_REGION_ID) {
        collect_anchors(content, &mut links);
    }
    links
}

fn collect_anchors(node: &PageNode, links: &mut LinkMap) {
    if node.kind == NodeKind::Anchor
        && let Some(href) = node.attr("href")
        && qualifies(href)
    {
        links.insert(href, node.text.as_deref().unwrap_or(""));
    }
    for child in &node.children {
        collect_anchors(child, links);
    }
}

fn qualifies(href: &str) -> bool {
    href.contains(INTERNAL_PATH_MARKER)
        && !href.contains(SCHEME_MARKER)
        && !href.contains(FILE_NAMESPACE_MARKER)
        && !href.contains('.')
        && !href.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(anchors: &str) -> PageNode {
        PageNode::parse(&format!(
            r#"<html><body><div id="mw-content-text">{anchors}</div><a href="/wiki/Outside">outside</a></body></html>"#
        ))
    }

    #[test]
    fn test_extract_links_filters_non_article_links() {
        let root = page(concat!(
            r#"<a href="/wiki/Berlin">Berlin</a>"#,
            r#"<a href="http://example.com/wiki/External">ext</a>"#,
            r#"<a href="/wiki/Datei:Foo">file</a>"#,
            r#"<a href="/wiki/Main.php">dotted</a>"#,
            r#"<a href="/wiki/Spezial:Suche">special</a>"#,
            r#"<a href="/other/Berlin">wrong path</a>"#,
            r#"<a>no href</a>"#,
        ));
        let links = extract_links(&root);

        assert_eq!(links.len(), 1);
        assert!(links.contains("/wiki/Berlin"));
        for (href, _) in links.iter() {
            assert!(href.contains("/wiki/"));
            assert!(!href.contains("http"));
            assert!(!href.contains('.'));
            assert!(!href.contains(':'));
        }
    }

    #[test]
    fn test_extract_links_outside_content_region_ignored() {
        let root = page(r#"<a href="/wiki/Inside">inside</a>"#);
        let links = extract_links(&root);
        assert!(links.contains("/wiki/Inside"));
        assert!(!links.contains("/wiki/Outside"));
    }

    #[test]
    fn test_extract_links_first_occurrence_wins() {
        let root = page(concat!(
            r#"<a href="/wiki/Berlin">first</a>"#,
            r#"<a href="/wiki/Berlin">second</a>"#,
            r#"<a href="/wiki/Hamburg">port</a>"#,
        ));
        let links = extract_links(&root);

        let entries: Vec<(&str, &str)> = links.iter().collect();
        assert_eq!(
            entries,
            vec![("/wiki/Berlin", "first"), ("/wiki/Hamburg", "port")]
        );
    }

    #[test]
    fn test_extract_links_missing_region_yields_empty_map() {
        let root = PageNode::parse(r#"<html><body><a href="/wiki/Berlin">x</a></body></html>"#);
        assert!(extract_links(&root).is_empty());
    }
}
