use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use url::Url;

pub const UNTITLED: &str = "(untitled)";

const ID_LEN: usize = 12;

/// Canonical aggregated record. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published: i64,
}

impl Item {
    /// `url` must already be trimmed and non-empty.
    pub fn new(title: Option<&str>, url: &str, published: i64) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();

        Self {
            id: Self::generate_id(url),
            title,
            url: url.to_string(),
            source: Self::source_label(url),
            published,
        }
    }

    /// First 12 hex characters of SHA-1 over the URL bytes.
    pub fn generate_id(url: &str) -> String {
        let digest = Sha1::digest(url.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(ID_LEN);
        id
    }

    /// Lower-cased host with a single leading "www." removed.
    pub fn source_label(url: &str) -> String {
        let host = match Url::parse(url) {
            Ok(parsed) => parsed.host_str().unwrap_or("").to_lowercase(),
            Err(_) => return String::new(),
        };

        match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        }
    }
}
