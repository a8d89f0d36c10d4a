//! Depth-bounded, backtracking search over the encyclopedia link graph.

use crate::error::Result;
use futures::future::BoxFuture;
use pressmap_scraper::links::extract_links;
use pressmap_scraper::{PageClient, PageNode};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Default base of the explored site; article links on its pages are
/// relative to it.
pub const DEFAULT_BASE_URL: &str = "https://de.wikipedia.org";

/// Explores the implicit page graph looking for a link path from a start
/// page to any page matching a search term.
///
/// The visited set is owned by the explorer and grows monotonically across
/// the whole search, never per branch: a page claimed by one branch is
/// unavailable to its siblings. That trades completeness for a hard bound
/// on runtime -- every reachable page is fetched at most once.
pub struct Explorer {
    base_url: String,
    visited: HashSet<String>,
}

impl Explorer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            visited: HashSet::new(),
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Searches from a relative start path, e.g. `/wiki/Apple`.
    pub async fn find_connection(
        &mut self,
        client: &PageClient,
        start_path: &str,
        term: &str,
        max_depth: usize,
    ) -> Result<(Vec<String>, bool)> {
        let start_url = format!("{}{}", self.base_url, start_path);
        self.search(client, &start_url, term, 0, max_depth).await
    }

    /// Depth-first search step. Returns the trace of fetched pages and
    /// whether the term was found. `([], false)` is a normal "not found"
    /// result, not an error; the search has no failure mode of its own. A
    /// page that cannot be fetched simply has no links, so its branch is
    /// given up and the siblings keep going.
    pub fn search<'a>(
        &'a mut self,
        client: &'a PageClient,
        url: &'a str,
        term: &'a str,
        depth: usize,
        max_depth: usize,
    ) -> BoxFuture<'a, Result<(Vec<String>, bool)>> {
        Box::pin(async move {
            if depth >= max_depth || self.visited.contains(url) {
                return Ok((Vec::new(), false));
            }

            let body = match client.fetch(url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("{url} unreachable, giving up the branch: {e}");
                    self.visited.insert(url.to_string());
                    return Ok((Vec::new(), false));
                }
            };
            self.visited.insert(url.to_string());
            let mut trace = vec![url.to_string()];

            let page = PageNode::parse(&body);
            let links = extract_links(&page);
            debug!("{url}: {} candidate links at depth {depth}", links.len());

            // A matching link ends the search without fetching its target;
            // the link itself is the evidence.
            let needle = term.to_lowercase();
            for (href, text) in links.iter() {
                if href.to_lowercase().contains(&needle) || text.to_lowercase().contains(&needle) {
                    info!("found {term} in {depth} steps");
                    return Ok((trace, true));
                }
            }

            for (href, _) in links.iter() {
                let next = format!("{}{}", self.base_url, href);
                let (child_trace, found) =
                    self.search(client, &next, term, depth + 1, max_depth).await?;
                if found {
                    trace.extend(child_trace);
                    return Ok((trace, true));
                }
            }

            Ok((Vec::new(), false))
        })
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
