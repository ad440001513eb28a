pub mod rank;
pub mod window;

pub use rank::dedupe_and_rank;
pub use window::{RecencyWindow, FUTURE_GRACE_SECS};

use crate::domain::Item;
use crate::fetcher::SourceReport;

/// Result of merging every source's surviving items.
#[derive(Debug, Clone)]
pub struct Merged {
    /// Ranked and deduplicated, not yet truncated.
    pub items: Vec<Item>,
    /// Items that passed the window, before dedupe.
    pub candidates: usize,
    pub failed_sources: usize,
}

/// Concatenate per-source items in configured order, then rank.
///
/// Reports may arrive in any order; only `FeedSource::position` decides
/// where a source's items land before the stable sort.
pub fn merge(mut reports: Vec<SourceReport>) -> Merged {
    reports.sort_by_key(|r| r.source.position);

    let mut failed_sources = 0;
    let mut all = Vec::new();
    for report in reports {
        match report.outcome {
            Ok(items) => all.extend(items),
            Err(_) => failed_sources += 1,
        }
    }

    let candidates = all.len();
    let items = dedupe_and_rank(all);

    Merged {
        items,
        candidates,
        failed_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NewswireError;
    use crate::domain::FeedSource;

    fn report(position: usize, items: Vec<Item>) -> SourceReport {
        SourceReport {
            source: FeedSource::new(format!("https://feed{position}.example/rss"), position),
            outcome: Ok(items),
            warning: None,
            entries: 0,
            out_of_window: 0,
        }
    }

    #[test]
    fn test_merge_ignores_completion_order() {
        let a = Item::new(Some("a"), "https://x/a", 100);
        let b = Item::new(Some("b"), "https://x/b", 100);

        let in_order = merge(vec![report(0, vec![a.clone()]), report(1, vec![b.clone()])]);
        let reversed = merge(vec![report(1, vec![b]), report(0, vec![a])]);

        assert_eq!(in_order.items, reversed.items);
        assert_eq!(in_order.items[0].title, "a");
    }

    #[test]
    fn test_merge_dedupes_across_sources() {
        let first = Item::new(Some("first"), "https://x/shared", 100);
        let second = Item::new(Some("second"), "https://x/shared", 100);

        let merged = merge(vec![report(1, vec![second]), report(0, vec![first])]);

        assert_eq!(merged.candidates, 2);
        assert_eq!(merged.items.len(), 1);
        assert_eq!(merged.items[0].title, "first");
    }

    #[test]
    fn test_merge_counts_failed_sources() {
        let mut failed = report(1, Vec::new());
        failed.outcome = Err(NewswireError::Fetch {
            feed: failed.source.url.clone(),
            cause: "connection refused".into(),
        });

        let merged = merge(vec![report(0, vec![Item::new(None, "https://x/1", 1)]), failed]);

        assert_eq!(merged.failed_sources, 1);
        assert_eq!(merged.items.len(), 1);
    }
}
