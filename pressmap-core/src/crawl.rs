//! Pagination / date-window crawl loop over the news search.
//!
//! The search only serves a bounded number of result pages per query, so
//! the loop walks backwards in time: whenever a window runs out of pages
//! before the page ceiling is reached, the end time shifts back to the
//! oldest article persisted so far and the crawl keeps going.

use crate::companies::Company;
use crate::data::Database;
use crate::error::Result;
use chrono::{DateTime, Utc};
use pressmap_scraper::article::{build_article, has_next_page, result_entries};
use pressmap_scraper::{PageClient, PageNode, ScrapeError};
use std::sync::Arc;
use tracing::{info, warn};

/// Ceiling on result pages requested per company and invocation.
pub const DEFAULT_MAX_PAGES: u32 = 100;

const END_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Per-company crawl result. Network and parse failures are ordinary
/// outcomes reported to the driver; only storage faults surface as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    /// The search was exhausted or the page ceiling was reached.
    Finished { new_articles: usize, pages_fetched: u32 },
    /// A page request failed; identity rotation was already triggered.
    NetworkFailure { page: u32 },
    /// A result entry was missing an expected structural element.
    ParseFailure { message: String },
}

#[derive(Debug, Clone)]
pub struct CompanyReport {
    pub company: Company,
    pub outcome: CrawlOutcome,
}

/// Builds the search request URL for one result page of a company query.
pub fn search_url(base_url: &str, company: &str, end_time: DateTime<Utc>, page: u32) -> String {
    let query = company.replace(' ', "+");
    format!(
        "{}/search?query={}&sort=time:desc&endTime={}&page={}",
        base_url.trim_end_matches('/'),
        query,
        end_time.format(END_TIME_FORMAT),
        page
    )
}

/// Crawls the news search history for one company, persisting every new
/// article excerpt, until the search is exhausted or `max_pages` is hit.
pub async fn crawl_history(
    client: &PageClient,
    db: &Database,
    company: &Company,
    base_url: &str,
    max_pages: u32,
) -> Result<CrawlOutcome> {
    // Resume from the oldest article already on record, or start at now.
    let mut end_time = match db.find_oldest(&company.symbol)? {
        Some(oldest) => oldest.time,
        None => Utc::now(),
    };

    info!("searching news for {} ({})", company.name, company.symbol);

    let mut page: u32 = 1;
    let mut new_articles = 0usize;
    let mut pages_fetched = 0u32;

    while page <= max_pages {
        let url = search_url(base_url, &company.name, end_time, page);
        let body = match client.fetch(&url).await {
            Ok(body) => body,
            Err(e @ (ScrapeError::Http(_) | ScrapeError::BadStatus { .. })) => {
                warn!("search page {page} failed for {}: {e}", company.symbol);
                return Ok(CrawlOutcome::NetworkFailure { page });
            }
            Err(e) => return Err(e.into()),
        };
        pages_fetched += 1;

        let doc = PageNode::parse(&body);
        let entries = result_entries(&doc);
        if entries.is_empty() {
            // The search is exhausted. A normal terminal state.
            return Ok(CrawlOutcome::Finished {
                new_articles,
                pages_fetched,
            });
        }

        for entry in &entries {
            let article =
                match build_article(entry, &company.name, &company.symbol, &company.sector) {
                    Ok(article) => article,
                    Err(e) => {
                        warn!(
                            "failed to extract article on page {page} for {}: {e}",
                            company.symbol
                        );
                        return Ok(CrawlOutcome::ParseFailure {
                            message: e.to_string(),
                        });
                    }
                };

            if !db.article_exists(&article.url)? {
                db.insert_article(&article)?;
                new_articles += 1;
            }
        }

        let more = has_next_page(&doc);
        page += 1;

        if page <= max_pages && !more {
            // Shift the window back to the oldest article on record. The
            // page counter deliberately carries over into the new window,
            // matching the long-standing crawl behavior.
            if let Some(oldest) = db.find_oldest(&company.symbol)? {
                end_time = oldest.time;
            }
        }
    }

    Ok(CrawlOutcome::Finished {
        new_articles,
        pages_fetched,
    })
}

/// Sequential driver over the company list. A failed company is logged and
/// reported, never aborting the rest of the batch; only storage faults
/// propagate as errors.
pub async fn crawl_companies(
    client: &PageClient,
    db: &Database,
    companies: &[Company],
    base_url: &str,
    max_pages: u32,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<CompanyReport>> {
    let mut reports = Vec::with_capacity(companies.len());

    for (idx, company) in companies.iter().enumerate() {
        if let Some(ref callback) = progress_callback {
            callback(format!(
                "{}/{}: {}",
                idx + 1,
                companies.len(),
                company.name
            ));
        }

        let outcome = crawl_history(client, db, company, base_url, max_pages).await?;
        match &outcome {
            CrawlOutcome::Finished {
                new_articles,
                pages_fetched,
            } => info!(
                "{}: {} new articles over {} pages",
                company.symbol, new_articles, pages_fetched
            ),
            CrawlOutcome::NetworkFailure { page } => warn!(
                "error searching for {} ({}): network failure on page {page}",
                company.name, company.symbol
            ),
            CrawlOutcome::ParseFailure { message } => warn!(
                "error searching for {} ({}): {message}",
                company.name, company.symbol
            ),
        }
        reports.push(CompanyReport {
            company: company.clone(),
            outcome,
        });
    }

    Ok(reports)
}

/// Plain-text summary of a finished batch.
pub fn summarize(reports: &[CompanyReport]) -> String {
    let total_new: usize = reports
        .iter()
        .filter_map(|r| match &r.outcome {
            CrawlOutcome::Finished { new_articles, .. } => Some(*new_articles),
            _ => None,
        })
        .sum();
    let failures = reports
        .iter()
        .filter(|r| !matches!(r.outcome, CrawlOutcome::Finished { .. }))
        .count();

    let mut report = String::new();
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Companies crawled: {}\n", reports.len()));
    report.push_str(&format!("  New articles: {}\n", total_new));
    report.push_str(&format!("  Failures: {}\n\n", failures));

    for entry in reports {
        let line = match &entry.outcome {
            CrawlOutcome::Finished {
                new_articles,
                pages_fetched,
            } => format!(
                "  ok   {:<8} {} new articles, {} pages\n",
                entry.company.symbol, new_articles, pages_fetched
            ),
            CrawlOutcome::NetworkFailure { page } => format!(
                "  net  {:<8} failed on page {}\n",
                entry.company.symbol, page
            ),
            CrawlOutcome::ParseFailure { message } => {
                format!("  bad  {:<8} {}\n", entry.company.symbol, message)
            }
        };
        report.push_str(&line);
    }

    report
}
