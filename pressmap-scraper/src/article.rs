//! Article record building from news search result pages.

use crate::dom::{NodeKind, PageNode};
use crate::error::{Result, ScrapeError};
use crate::extract::{find_by_class, find_text_by_class, find_time_tag, find_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the search result markup.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
/// Label stored in every persisted record.
pub const SOURCE_LABEL: &str = "newswire";

const ENTRY_LIST_CLASS: &str = "search-result-items";
const ENTRY_CLASS: &str = "search-result-story__container";
const HEADLINE_CLASS: &str = "search-result-story__headline";
const TEASER_CLASS: &str = "search-result-story__body";
const PAGE_LINKS_CLASS: &str = "content-page-links";
const NEXT_LINK_CLASS: &str = "content-next-link";

/// One extracted news article excerpt. The url is the deduplication key
/// under which records are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub time: DateTime<Utc>,
    pub headline: Option<String>,
    pub teaser: Option<String>,
    pub url: String,
    pub company: String,
    pub symbol: String,
    pub sector: String,
    pub source: String,
}

/// All result-entry nodes of a search results page, in document order.
/// An empty list means the search is exhausted, not that parsing failed.
///
/// Entries sit at a fixed depth below the items container: a wrapper div,
/// an article element, then the entry div itself. Nodes of the entry class
/// anywhere else on the page are not results.
pub fn result_entries(root: &PageNode) -> Vec<&PageNode> {
    let mut entries = Vec::new();
    if let Some(list) = find_by_class(root, ENTRY_LIST_CLASS) {
        for wrapper in list.children.iter().filter(|node| node.tag == "div") {
            for article in wrapper.children.iter().filter(|node| node.tag == "article") {
                entries.extend(
                    article
                        .children
                        .iter()
                        .filter(|node| node.class() == Some(ENTRY_CLASS)),
                );
            }
        }
    }
    entries
}

fn collect_by_class<'a>(node: &'a PageNode, class: &str, out: &mut Vec<&'a PageNode>) {
    if node.class() == Some(class) {
        out.push(node);
    }
    for child in &node.children {
        collect_by_class(child, class, out);
    }
}

/// True iff the page carries a "next page" navigation link. Checking the
/// marker is cheaper than requesting a page that may not exist. Pages may
/// repeat the pager above and below the results; any of them counts.
pub fn has_next_page(root: &PageNode) -> bool {
    let mut pagers = Vec::new();
    collect_by_class(root, PAGE_LINKS_CLASS, &mut pagers);
    pagers.iter().any(|links| {
        links
            .children
            .iter()
            .any(|child| child.kind == NodeKind::Anchor && child.class() == Some(NEXT_LINK_CLASS))
    })
}

/// Builds one article record from a result-entry node.
///
/// A missing or unparseable timestamp fails the whole page; headline and
/// teaser may legitimately be absent. The url cannot be absent since it is
/// the deduplication key.
pub fn build_article(entry: &PageNode, company: &str, symbol: &str, sector: &str) -> Result<Article> {
    let raw_time = find_time_tag(entry).ok_or(ScrapeError::MissingElement("time tag"))?;
    let time = DateTime::parse_from_str(raw_time, TIME_FORMAT)?.with_timezone(&Utc);

    let url = find_url(entry, Some(HEADLINE_CLASS), None)
        .ok_or(ScrapeError::MissingElement("article link"))?
        .to_string();

    Ok(Article {
        time,
        headline: find_text_by_class(entry, HEADLINE_CLASS),
        teaser: find_text_by_class(entry, TEASER_CLASS),
        url,
        company: company.to_string(),
        symbol: symbol.to_string(),
        sector: sector.to_string(),
        source: SOURCE_LABEL.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"<html><body>
        <div class="search-result-items"><div><article>
            <div class="search-result-story__container">
                <time datetime="2017-03-01T12:00:00+00:00"></time>
                <div class="search-result-story__headline"><a href="/news/articles/abc">Shares <b>rally</b></a></div>
                <div class="search-result-story__body">A strong quarter.</div>
            </div>
        </article></div><div><article>
            <div class="search-result-story__container">
                <time datetime="2017-02-28T08:30:00+00:00"></time>
                <div class="search-result-story__headline"><a href="/news/articles/def">Outlook cut</a></div>
                <div class="search-result-story__body">Guidance lowered.</div>
            </div>
        </article></div></div>
    </body></html>"#;

    #[test]
    fn test_result_entries_found_in_order() {
        let root = PageNode::parse(RESULTS_PAGE);
        let entries = result_entries(&root);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_result_entries_empty_without_container() {
        let root = PageNode::parse("<html><body><div>nothing here</div></body></html>");
        assert!(result_entries(&root).is_empty());
    }

    #[test]
    fn test_result_entries_require_fixed_wrapper_path() {
        // Entry-class nodes outside the div/article wrappers are not results.
        let html = r#"<html><body><div class="search-result-items">
            <div class="search-result-story__container"><time datetime="2017-03-01T12:00:00+00:00"></time></div>
            <div><div class="search-result-story__container"></div></div>
            <div><article><div><div class="search-result-story__container"></div></div></article></div>
            <div><article><div class="search-result-story__container"><time datetime="2017-03-01T12:00:00+00:00"></time></div></article></div>
        </div></body></html>"#;
        let root = PageNode::parse(html);
        assert_eq!(result_entries(&root).len(), 1);
    }

    #[test]
    fn test_build_article_from_entry() {
        let root = PageNode::parse(RESULTS_PAGE);
        let entries = result_entries(&root);
        let article = build_article(entries[0], "Example Corp", "EXM", "Technology").unwrap();

        assert_eq!(article.url, "/news/articles/abc");
        assert_eq!(article.headline.as_deref().map(str::trim), Some("Shares rally"));
        assert_eq!(article.teaser.as_deref().map(str::trim), Some("A strong quarter."));
        assert_eq!(article.symbol, "EXM");
        assert_eq!(article.sector, "Technology");
        assert_eq!(article.source, SOURCE_LABEL);
        assert_eq!(
            article.time,
            DateTime::parse_from_rfc3339("2017-03-01T12:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_build_article_missing_time_is_hard_error() {
        let html = r#"<html><body><div class="search-result-items"><div><article>
            <div class="search-result-story__container">
                <div class="search-result-story__headline"><a href="/news/articles/ghi">No time</a></div>
            </div>
        </article></div></div></body></html>"#;
        let root = PageNode::parse(html);
        let entries = result_entries(&root);
        assert_eq!(entries.len(), 1);

        let err = build_article(entries[0], "C", "S", "T").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement("time tag")));
    }

    #[test]
    fn test_build_article_bad_timestamp_is_hard_error() {
        let html = r#"<html><body><div class="search-result-items"><div><article>
            <div class="search-result-story__container">
                <time datetime="yesterday"></time>
                <div class="search-result-story__headline"><a href="/news/articles/x">x</a></div>
            </div>
        </article></div></div></body></html>"#;
        let root = PageNode::parse(html);
        let entries = result_entries(&root);

        let err = build_article(entries[0], "C", "S", "T").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_has_next_page() {
        let with = PageNode::parse(
            r#"<html><body><div class="content-page-links"><a class="content-next-link" href="/search?page=2">next</a></div></body></html>"#,
        );
        assert!(has_next_page(&with));

        let without = PageNode::parse(
            r#"<html><body><div class="content-page-links"><a class="content-prev-link">prev</a></div></body></html>"#,
        );
        assert!(!has_next_page(&without));

        let empty = PageNode::parse("<html><body></body></html>");
        assert!(!has_next_page(&empty));
    }

    #[test]
    fn test_has_next_page_checks_every_pager() {
        // Top pager without the next link, bottom pager with it.
        let root = PageNode::parse(concat!(
            r#"<html><body>"#,
            r#"<div class="content-page-links"><a class="content-prev-link">prev</a></div>"#,
            r#"<div class="results"></div>"#,
            r#"<div class="content-page-links"><a class="content-next-link" href="/search?page=2">next</a></div>"#,
            r#"</body></html>"#,
        ));
        assert!(has_next_page(&root));
    }
}
