pub mod collector;
pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{FeedSource, Item};

pub use collector::FeedCollector;
pub use http_fetcher::HttpFetcher;

/// Retrieves the raw bytes of a feed document.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// What one source contributed to a run.
#[derive(Debug)]
pub struct SourceReport {
    pub source: FeedSource,
    /// Items that survived normalization and the recency window, in entry
    /// order, or the `Fetch` error that made the source unusable.
    pub outcome: Result<Vec<Item>>,
    pub warning: Option<String>,
    /// Raw entries read from the document (after the per-feed cap)
    pub entries: usize,
    pub out_of_window: usize,
}

impl SourceReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
