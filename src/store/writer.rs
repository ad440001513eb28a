use std::sync::Arc;

use tracing::{info, warn};

use crate::app::Result;
use crate::domain::{Item, Snapshot};
use crate::publish::Publisher;
use crate::store::SnapshotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Content hash differs from the previous snapshot's.
    pub changed: bool,
    /// Publisher ran and reported success.
    pub published: bool,
    pub item_count: usize,
    pub content_hash: String,
}

/// Truncates, persists and, when the content changed or has never been
/// published successfully, publishes.
pub struct SnapshotWriter<S: SnapshotStore> {
    store: S,
    publisher: Arc<dyn Publisher>,
    max_items: usize,
}

impl<S: SnapshotStore> SnapshotWriter<S> {
    pub fn new(store: S, publisher: Arc<dyn Publisher>, max_items: usize) -> Self {
        Self {
            store,
            publisher,
            max_items,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `items` must already be ranked and deduplicated.
    ///
    /// Only store failures are returned as errors. A failing publisher is
    /// logged and reflected in `WriteOutcome::published`; the content then
    /// stays pending and the next write publishes it again even if the
    /// items did not change.
    pub fn write(&self, mut items: Vec<Item>, now: i64) -> Result<WriteOutcome> {
        items.truncate(self.max_items);
        let snapshot = Snapshot::new(now, items);

        let previous_hash = self.previous_hash();
        // Without a marker the snapshot on disk is taken as what was published,
        // which holds for a fresh checkout of the publishing repository.
        let published_hash = self.published_hash().or_else(|| previous_hash.clone());

        self.store.write_snapshot(&snapshot.to_json()?)?;
        // The marker is part of what gets published, so it goes first.
        self.store.write_last_run(now)?;
        let content_hash = snapshot.content_hash()?;

        let changed = previous_hash.as_deref() != Some(content_hash.as_str());
        let pending = published_hash.as_deref() != Some(content_hash.as_str());
        let mut published = false;

        if changed || pending {
            if changed {
                info!(
                    "Snapshot changed ({} items, hash {}), publishing",
                    snapshot.items.len(),
                    &content_hash[..12]
                );
            } else {
                info!(
                    "Snapshot unchanged but not yet published (hash {}), retrying",
                    &content_hash[..12]
                );
            }

            match self.publisher.publish(true, &self.store.paths()) {
                Ok(()) => {
                    published = true;
                    if let Err(e) = self.store.write_published_hash(&content_hash) {
                        warn!("Could not record published hash: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Publish failed, will retry next run: {}", e);
                    // Keep a marker on disk so the snapshot just written is
                    // not mistaken for published content next time.
                    let last_good = published_hash.as_deref().unwrap_or_default();
                    if let Err(e) = self.store.write_published_hash(last_good) {
                        warn!("Could not record publish failure: {}", e);
                    }
                }
            }
        } else {
            info!("Snapshot unchanged, skipping publish");
        }

        Ok(WriteOutcome {
            changed,
            published,
            item_count: snapshot.items.len(),
            content_hash,
        })
    }

    fn published_hash(&self) -> Option<String> {
        match self.store.read_published_hash() {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Could not read published hash: {}", e);
                None
            }
        }
    }

    /// `None` when there is no previous snapshot or it cannot be read as one.
    fn previous_hash(&self) -> Option<String> {
        let content = match self.store.read_snapshot() {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read previous snapshot: {}", e);
                return None;
            }
        };

        match Snapshot::from_json(&content).and_then(|s| s.content_hash()) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!("Previous snapshot is not valid, treating as changed: {}", e);
                None
            }
        }
    }
}
