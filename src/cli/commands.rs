use tracing::info;

use crate::app::{AppContext, Result};
use crate::pipeline::{merge, RecencyWindow};
use crate::store::WriteOutcome;

/// Counts for one completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sources: usize,
    pub failed_sources: usize,
    /// Items inside the recency window across all sources
    pub candidates: usize,
    pub outcome: WriteOutcome,
}

/// One full pass: fetch every source, merge, write, publish on change.
///
/// Only store failures are returned; failing sources and a failing
/// publisher degrade the result instead.
pub async fn run_once(ctx: &AppContext) -> Result<RunSummary> {
    let config = &ctx.config;
    let now = ctx.clock.now();
    let window = RecencyWindow::new(now, config.max_days);

    info!(
        "Sources: {} · window: {} days · cutoff={}",
        config.feeds.len(),
        config.max_days,
        window.cutoff
    );

    let reports = ctx.collector(window).collect(&config.feeds).await;
    let merged = merge(reports);

    let outcome = ctx.writer().write(merged.items, now)?;

    info!(
        "Wrote {} items ({} candidates, {} of {} sources failed, window {} days, max_items={})",
        outcome.item_count,
        merged.candidates,
        merged.failed_sources,
        config.feeds.len(),
        config.max_days,
        config.max_items
    );

    Ok(RunSummary {
        sources: config.feeds.len(),
        failed_sources: merged.failed_sources,
        candidates: merged.candidates,
        outcome,
    })
}
