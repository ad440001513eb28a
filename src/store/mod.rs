pub mod file;
pub mod writer;

use std::path::PathBuf;

use crate::app::Result;

pub use file::FileStore;
pub use writer::{SnapshotWriter, WriteOutcome};

/// Durable home of the snapshot, the last-run marker and the hash of the
/// last content a publisher accepted.
pub trait SnapshotStore {
    /// Raw previous snapshot, `None` when there is none yet.
    fn read_snapshot(&self) -> Result<Option<String>>;
    /// Replace the snapshot. Readers must never observe a partial write.
    fn write_snapshot(&self, content: &str) -> Result<()>;
    fn write_last_run(&self, now: i64) -> Result<()>;
    /// `None` when no marker exists. An empty string means a marker exists
    /// but nothing has been published successfully.
    fn read_published_hash(&self) -> Result<Option<String>>;
    fn write_published_hash(&self, hash: &str) -> Result<()>;
    /// Files a publisher should commit.
    fn paths(&self) -> Vec<PathBuf>;
}
