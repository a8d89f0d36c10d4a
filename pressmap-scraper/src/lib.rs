pub mod article;
pub mod client;
pub mod dom;
pub mod error;
pub mod extract;
pub mod links;
pub mod tor;

pub use article::Article;
pub use client::PageClient;
pub use dom::{NodeKind, PageNode};
pub use error::{Result, ScrapeError};
pub use links::LinkMap;
