use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::store::SnapshotStore;

pub const DEFAULT_SNAPSHOT_PATH: &str = "news.json";
pub const DEFAULT_LAST_RUN_PATH: &str = ".last_run";
/// Kept next to the last-run marker; never handed to a publisher.
pub const PUBLISHED_MARKER_NAME: &str = ".last_published";

#[derive(Debug, Clone)]
pub struct FileStore {
    snapshot_path: PathBuf,
    last_run_path: PathBuf,
    published_path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(snapshot_path: P, last_run_path: Q) -> Self {
        let last_run_path = last_run_path.as_ref().to_path_buf();
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
            published_path: last_run_path.with_file_name(PUBLISHED_MARKER_NAME),
            last_run_path,
        }
    }

    /// Both files inside `dir`, under their default names.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_SNAPSHOT_PATH), dir.join(DEFAULT_LAST_RUN_PATH))
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn last_run_path(&self) -> &Path {
        &self.last_run_path
    }

    pub fn published_path(&self) -> &Path {
        &self.published_path
    }
}

impl SnapshotStore for FileStore {
    fn read_snapshot(&self) -> Result<Option<String>> {
        read_optional(&self.snapshot_path)
    }

    fn write_snapshot(&self, content: &str) -> Result<()> {
        write_atomic(&self.snapshot_path, content.as_bytes())
    }

    fn write_last_run(&self, now: i64) -> Result<()> {
        write_atomic(&self.last_run_path, now.to_string().as_bytes())
    }

    fn read_published_hash(&self) -> Result<Option<String>> {
        let hash = read_optional(&self.published_path)?;
        Ok(hash.map(|h| h.trim().to_string()))
    }

    fn write_published_hash(&self, hash: &str) -> Result<()> {
        write_atomic(&self.published_path, hash.as_bytes())
    }

    fn paths(&self) -> Vec<PathBuf> {
        vec![self.snapshot_path.clone(), self.last_run_path.clone()]
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_snapshot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(store.read_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        store.write_snapshot("{\"items\": []}\n").unwrap();
        store.write_snapshot("{\"items\": [1]}\n").unwrap();

        assert_eq!(store.read_snapshot().unwrap().unwrap(), "{\"items\": [1]}\n");
        assert!(!dir.path().join("news.json.tmp").exists());
    }

    #[test]
    fn test_last_run_is_plain_epoch_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        store.write_last_run(1_700_000_000).unwrap();

        let marker = fs::read_to_string(store.last_run_path()).unwrap();
        assert_eq!(marker, "1700000000");
    }

    #[test]
    fn test_published_marker_sits_next_to_last_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("news.json"), dir.path().join("state/.last_run"));

        assert!(store.read_published_hash().unwrap().is_none());
        store.write_published_hash("abc123").unwrap();

        assert_eq!(store.published_path(), dir.path().join("state/.last_published"));
        assert_eq!(store.read_published_hash().unwrap().as_deref(), Some("abc123"));
        assert!(!store.paths().contains(&store.published_path().to_path_buf()));
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("out/news.json"), dir.path().join("out/.last_run"));

        store.write_snapshot("{}").unwrap();

        assert!(store.snapshot_path().exists());
        assert_eq!(store.paths().len(), 2);
    }
}
