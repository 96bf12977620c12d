//! Inverted index module
//!
//! Maps normalized keywords to the ordered list of pages they appeared on.
//! The index is shared by every crawl worker, persisted through
//! [`crate::storage`], and answers ranked keyword queries.

mod inverted;
mod keyword;
mod query;

pub use inverted::{IndexItem, InvertedIndex};
pub use keyword::prep_keyword;
pub use query::{search, SearchHit};
