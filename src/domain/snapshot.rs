use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::app::Result;
use crate::domain::Item;

/// The regenerated-each-run output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub updated: i64,
    pub build_id: i64,
    pub items: Vec<Item>,
}

impl Snapshot {
    pub fn new(now: i64, items: Vec<Item>) -> Self {
        Self {
            updated: now,
            build_id: now,
            items,
        }
    }

    /// Pretty JSON with a trailing newline. Field order follows the structs.
    pub fn to_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Hex SHA-256 over the canonical encoding of `items`.
    ///
    /// `updated` and `build_id` are left out so that an unchanged upstream
    /// hashes the same on every run.
    pub fn content_hash(&self) -> Result<String> {
        let canonical = serde_json::to_vec(&self.items)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}
