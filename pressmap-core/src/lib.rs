pub mod companies;
pub mod crawl;
pub mod data;
pub mod dict;
pub mod error;
pub mod explore;

pub use companies::Company;
pub use crawl::{CompanyReport, CrawlOutcome};
pub use data::Database;
pub use dict::Dictionary;
pub use error::{CoreError, Result};
pub use explore::Explorer;
