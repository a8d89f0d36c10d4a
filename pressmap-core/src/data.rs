use chrono::{DateTime, Utc};
use pressmap_scraper::Article;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Article document store. The url column is unique; callers check
/// `article_exists` before inserting. The check-then-insert pair is not
/// atomic, so the store assumes a single writer.
pub struct Database {
    conn: Connection,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

impl Database {
    pub fn drop(path: &Path) {
        fs::remove_file(path).unwrap();
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL UNIQUE,
                time INTEGER NOT NULL,
                headline TEXT,
                teaser TEXT,
                company TEXT NOT NULL,
                symbol TEXT NOT NULL,
                sector TEXT NOT NULL,
                source TEXT NOT NULL,
                inserted_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_symbol ON articles(symbol);
            CREATE INDEX IF NOT EXISTS idx_articles_symbol_time ON articles(symbol, time);
            ",
        )?;
        Ok(())
    }

    pub fn insert_article(&self, article: &Article) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO articles (
                url, time, headline, teaser, company, symbol, sector, source, inserted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &article.url,
                article.time.timestamp(),
                &article.headline,
                &article.teaser,
                &article.company,
                &article.symbol,
                &article.sector,
                &article.source,
                current_timestamp(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn article_exists(&self, url: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM articles WHERE url = ?1")?;
        let found = stmt
            .query_row(params![url], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(found)
    }

    /// Oldest persisted article for a symbol, used to advance the crawl's
    /// date window backwards in time.
    pub fn find_oldest(&self, symbol: &str) -> Result<Option<Article>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, time, headline, teaser, company, symbol, sector, source
             FROM articles WHERE symbol = ?1 ORDER BY time ASC LIMIT 1",
        )?;

        let article = stmt
            .query_row(params![symbol], row_to_article)
            .optional()?;
        Ok(article)
    }

    pub fn find_all(&self, symbol: &str) -> Result<Vec<Article>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, time, headline, teaser, company, symbol, sector, source
             FROM articles WHERE symbol = ?1 ORDER BY time DESC",
        )?;

        let articles = stmt
            .query_map(params![symbol], row_to_article)?
            .collect::<Result<Vec<_>>>()?;
        Ok(articles)
    }

    pub fn count_by_symbol(&self, symbol: &str) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE symbol = ?1",
            params![symbol],
            |row| row.get(0),
        )
    }

    pub fn count_by_url(&self, url: &str) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE url = ?1",
            params![url],
            |row| row.get(0),
        )
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

fn row_to_article(row: &rusqlite::Row<'_>) -> Result<Article> {
    let secs: i64 = row.get(1)?;
    Ok(Article {
        url: row.get(0)?,
        time: DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default(),
        headline: row.get(2)?,
        teaser: row.get(3)?,
        company: row.get(4)?,
        symbol: row.get(5)?,
        sector: row.get(6)?,
        source: row.get(7)?,
    })
}
