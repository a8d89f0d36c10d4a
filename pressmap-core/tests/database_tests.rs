// Tests for the article store

use chrono::{TimeZone, Utc};
use pressmap_core::data::Database;
use pressmap_scraper::Article;
use tempfile::TempDir;

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

fn article(url: &str, symbol: &str, ts: (i32, u32, u32)) -> Article {
    Article {
        time: Utc.with_ymd_and_hms(ts.0, ts.1, ts.2, 12, 0, 0).unwrap(),
        headline: Some("Headline".to_string()),
        teaser: Some("Teaser".to_string()),
        url: url.to_string(),
        company: "Example Corp".to_string(),
        symbol: symbol.to_string(),
        sector: "Technology".to_string(),
        source: "newswire".to_string(),
    }
}

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists_and_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));
    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));

    Database::drop(&db_path);
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_insert_and_exists() {
    let (_temp_dir, db) = create_test_db();

    assert!(!db.article_exists("/news/articles/abc").unwrap());
    db.insert_article(&article("/news/articles/abc", "EXM", (2017, 3, 1)))
        .unwrap();
    assert!(db.article_exists("/news/articles/abc").unwrap());
}

#[test]
fn test_url_is_unique() {
    let (_temp_dir, db) = create_test_db();

    let a = article("/news/articles/abc", "EXM", (2017, 3, 1));
    db.insert_article(&a).unwrap();
    assert!(db.insert_article(&a).is_err());
    assert_eq!(db.count_by_url("/news/articles/abc").unwrap(), 1);
}

#[test]
fn test_find_oldest_orders_by_time() {
    let (_temp_dir, db) = create_test_db();

    db.insert_article(&article("/a", "EXM", (2017, 3, 1))).unwrap();
    db.insert_article(&article("/b", "EXM", (2016, 5, 9))).unwrap();
    db.insert_article(&article("/c", "EXM", (2018, 1, 2))).unwrap();
    db.insert_article(&article("/d", "OTH", (2015, 1, 1))).unwrap();

    let oldest = db.find_oldest("EXM").unwrap().unwrap();
    assert_eq!(oldest.url, "/b");
    assert_eq!(oldest.time, Utc.with_ymd_and_hms(2016, 5, 9, 12, 0, 0).unwrap());
}

#[test]
fn test_find_oldest_none_for_unknown_symbol() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.find_oldest("NONE").unwrap().is_none());
}

#[test]
fn test_find_all_filters_by_symbol() {
    let (_temp_dir, db) = create_test_db();

    db.insert_article(&article("/a", "EXM", (2017, 3, 1))).unwrap();
    db.insert_article(&article("/b", "EXM", (2017, 4, 1))).unwrap();
    db.insert_article(&article("/c", "OTH", (2017, 5, 1))).unwrap();

    let all = db.find_all("EXM").unwrap();
    assert_eq!(all.len(), 2);
    // newest first
    assert_eq!(all[0].url, "/b");
    assert_eq!(all[1].url, "/a");
}

#[test]
fn test_count_by_symbol() {
    let (_temp_dir, db) = create_test_db();

    assert_eq!(db.count_by_symbol("EXM").unwrap(), 0);
    db.insert_article(&article("/a", "EXM", (2017, 3, 1))).unwrap();
    db.insert_article(&article("/b", "EXM", (2017, 4, 1))).unwrap();
    assert_eq!(db.count_by_symbol("EXM").unwrap(), 2);
}

#[test]
fn test_roundtrip_preserves_fields() {
    let (_temp_dir, db) = create_test_db();

    let a = article("/news/articles/abc", "EXM", (2017, 3, 1));
    db.insert_article(&a).unwrap();

    let read_back = db.find_oldest("EXM").unwrap().unwrap();
    assert_eq!(read_back, a);
}
