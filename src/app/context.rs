use std::sync::Arc;
use std::time::Duration;

use crate::app::error::Result;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::fetcher::{FeedCollector, Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;
use crate::pipeline::RecencyWindow;
use crate::publish::{NoopPublisher, Publisher};
use crate::store::{FileStore, SnapshotWriter};

/// Everything one run needs, wired together.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub clock: Arc<dyn Clock>,
    pub publisher: Arc<dyn Publisher>,
    pub store: FileStore,
}

impl AppContext {
    pub fn new(config: Config, store: FileStore) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_options(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?);

        Ok(Self {
            config,
            fetcher,
            clock: Arc::new(SystemClock),
            publisher: Arc::new(NoopPublisher),
            store,
        })
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn collector(&self, window: RecencyWindow) -> FeedCollector {
        FeedCollector::new(
            self.fetcher.clone(),
            Normalizer::new(self.clock.clone()),
            window,
        )
        .with_delay(Duration::from_millis(self.config.fetch_delay_ms))
        .with_max_entries(self.config.max_entries_per_feed)
        .with_workers(self.config.concurrency)
    }

    pub fn writer(&self) -> SnapshotWriter<FileStore> {
        SnapshotWriter::new(
            self.store.clone(),
            self.publisher.clone(),
            self.config.max_items,
        )
    }
}
