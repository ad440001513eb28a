use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::app::NewswireError;
use crate::domain::FeedSource;
use crate::fetcher::{Fetcher, SourceReport};
use crate::normalizer::{parse_feed, Normalizer};
use crate::pipeline::RecencyWindow;

pub const DEFAULT_WORKERS: usize = 1;

/// Runs fetch → parse → normalize → filter for every configured source.
///
/// A failing source yields a report carrying its error; it never stops
/// the others. Reports always come back in configured order.
pub struct FeedCollector {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    window: RecencyWindow,
    delay: Duration,
    max_entries: usize,
    workers: usize,
}

impl FeedCollector {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        window: RecencyWindow,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            window,
            delay: Duration::ZERO,
            max_entries: crate::config::DEFAULT_MAX_ENTRIES_PER_FEED,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub async fn collect(&self, sources: &[FeedSource]) -> Vec<SourceReport> {
        if self.workers == 1 {
            self.collect_sequential(sources).await
        } else {
            self.collect_parallel(sources).await
        }
    }

    async fn collect_sequential(&self, sources: &[FeedSource]) -> Vec<SourceReport> {
        let mut reports = Vec::with_capacity(sources.len());

        for (i, source) in sources.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let report = collect_single_feed(
                self.fetcher.as_ref(),
                &self.normalizer,
                self.window,
                self.max_entries,
                source,
            )
            .await;
            reports.push(report);
        }

        reports
    }

    /// Each worker keeps its permit for `delay` after its request, so no
    /// more than `workers` requests start within any `delay` interval.
    async fn collect_parallel(&self, sources: &[FeedSource]) -> Vec<SourceReport> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(sources.len());

        for source in sources {
            let fetcher = self.fetcher.clone();
            let normalizer = self.normalizer.clone();
            let semaphore = semaphore.clone();
            let window = self.window;
            let max_entries = self.max_entries;
            let delay = self.delay;
            let task_source = source.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return failed_report(task_source, e.to_string()),
                };

                let report = collect_single_feed(
                    fetcher.as_ref(),
                    &normalizer,
                    window,
                    max_entries,
                    &task_source,
                )
                .await;

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                report
            });

            handles.push((source.clone(), handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Task join error for {}: {}", source.url, e);
                    reports.push(failed_report(source, e.to_string()));
                }
            }
        }

        reports
    }
}

fn failed_report(source: FeedSource, cause: String) -> SourceReport {
    SourceReport {
        outcome: Err(NewswireError::Fetch {
            feed: source.url.clone(),
            cause,
        }),
        source,
        warning: None,
        entries: 0,
        out_of_window: 0,
    }
}

async fn collect_single_feed(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    window: RecencyWindow,
    max_entries: usize,
    source: &FeedSource,
) -> SourceReport {
    let body = match fetcher.fetch(&source.url).await {
        Ok(body) => body,
        Err(e) => {
            error!("Fetch failed {} -> {}", source.url, e);
            return failed_report(source.clone(), e.to_string());
        }
    };

    let parsed = match parse_feed(&body, max_entries) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("Unreadable feed {} -> {}", source.url, e);
            return failed_report(source.clone(), e.to_string());
        }
    };

    if let Some(warning) = &parsed.warning {
        warn!("Parse warning: {} -> {}", source.url, warning);
    }

    let entries = parsed.entries.len();
    let mut out_of_window = 0;
    let mut items = Vec::with_capacity(entries);

    for entry in &parsed.entries {
        let Some(item) = normalizer.normalize(entry) else {
            continue;
        };
        if window.contains(&item) {
            items.push(item);
        } else {
            out_of_window += 1;
        }
    }

    debug!(
        "{}: {} entries, {} kept, {} outside window",
        source.url,
        entries,
        items.len(),
        out_of_window
    );
    if items.is_empty() && entries > 0 {
        info!("No recent items from {}", source.display_title());
    }

    SourceReport {
        source: source.clone(),
        outcome: Ok(items),
        warning: parsed.warning,
        entries,
        out_of_window,
    }
}
