//! Feed list and tunables.
//!
//! Configuration is read from a JSON document (`feeds.json` by default):
//!
//! ```json
//! {
//!   "feeds": [
//!     "https://blog.rust-lang.org/feed.xml",
//!     { "url": "https://lobste.rs/rss", "group": "tech" }
//!   ],
//!   "max_items": 200,
//!   "max_days": 30
//! }
//! ```
//!
//! Feed entries may be plain URL strings or objects carrying a `url`; both
//! shapes can be mixed in one list. They are resolved here into a flat list
//! of [`FeedSource`] so nothing downstream sees the difference.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::error::Category;
use serde_json::Value;
use tracing::warn;

use crate::app::{NewswireError, Result};
use crate::domain::FeedSource;

pub const DEFAULT_MAX_ITEMS: usize = 200;
pub const DEFAULT_MAX_DAYS: u32 = 30;
pub const DEFAULT_FETCH_DELAY_MS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_ENTRIES_PER_FEED: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Bytes of context shown on each side of a parse error.
const EXCERPT_RADIUS: usize = 40;

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub feeds: Vec<FeedSource>,
    /// Hard cap on snapshot size
    pub max_items: usize,
    /// Recency window in days
    pub max_days: u32,
    /// Pause between consecutive requests
    pub fetch_delay_ms: u64,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
    pub max_entries_per_feed: usize,
    /// In-flight request cap; 1 fetches sources strictly one at a time
    pub concurrency: usize,
    pub user_agent: String,
}

/// Document shape before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    feeds: Option<Value>,
    max_items: Option<i64>,
    max_days: Option<i64>,
    fetch_delay_ms: Option<u64>,
    timeout_secs: Option<u64>,
    max_entries_per_feed: Option<i64>,
    concurrency: Option<i64>,
    user_agent: Option<String>,
}

/// One element of the `feeds` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedEntry {
    Url(String),
    Detailed {
        url: Option<String>,
        /// Only a string is used as a label; other shapes are ignored.
        group: Option<Value>,
    },
    Other(serde::de::IgnoredAny),
}

pub fn default_user_agent() -> String {
    format!(
        "newswire/{} (+https://github.com/newswire/newswire)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a JSON string (useful for testing)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(content).map_err(|e| classify_error(e, content))?;

        let feeds = resolve_feeds(raw.feeds)?;

        Ok(Self {
            feeds,
            max_items: at_least_one("max_items", raw.max_items, DEFAULT_MAX_ITEMS as i64) as usize,
            max_days: at_least_one("max_days", raw.max_days, DEFAULT_MAX_DAYS as i64)
                .min(u32::MAX as i64) as u32,
            fetch_delay_ms: raw.fetch_delay_ms.unwrap_or(DEFAULT_FETCH_DELAY_MS),
            timeout_secs: raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1),
            max_entries_per_feed: at_least_one(
                "max_entries_per_feed",
                raw.max_entries_per_feed,
                DEFAULT_MAX_ENTRIES_PER_FEED as i64,
            ) as usize,
            concurrency: at_least_one(
                "concurrency",
                raw.concurrency,
                DEFAULT_CONCURRENCY as i64,
            ) as usize,
            user_agent: raw
                .user_agent
                .map(|ua| ua.trim().to_string())
                .filter(|ua| !ua.is_empty())
                .unwrap_or_else(default_user_agent),
        })
    }
}

fn resolve_feeds(feeds: Option<Value>) -> Result<Vec<FeedSource>> {
    let entries = match feeds {
        None | Some(Value::Null) => {
            return Err(NewswireError::ConfigValidation(
                "`feeds` is missing".to_string(),
            ))
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(NewswireError::ConfigValidation(format!(
                "`feeds` must be a list, found {}",
                json_kind(&other)
            )))
        }
    };

    if entries.is_empty() {
        return Err(NewswireError::ConfigValidation(
            "`feeds` must be a non-empty list".to_string(),
        ));
    }

    let mut sources = Vec::with_capacity(entries.len());
    for entry in entries {
        let (url, group) = match serde_json::from_value::<FeedEntry>(entry) {
            Ok(FeedEntry::Url(url)) => (url, None),
            Ok(FeedEntry::Detailed { url, group }) => (
                url.unwrap_or_default(),
                group.and_then(|g| g.as_str().map(str::to_string)),
            ),
            Ok(FeedEntry::Other(_)) | Err(_) => continue,
        };

        let url = url.trim();
        if url.is_empty() {
            continue;
        }
        let position = sources.len();
        sources.push(FeedSource::new(url, position).with_group(group));
    }

    if sources.is_empty() {
        return Err(NewswireError::ConfigValidation(
            "`feeds` contains no valid feed URL".to_string(),
        ));
    }

    Ok(sources)
}

fn at_least_one(field: &str, value: Option<i64>, default: i64) -> i64 {
    match value {
        None => default,
        Some(v) if v < 1 => {
            warn!("{} = {} is out of range, using 1", field, v);
            1
        }
        Some(v) => v,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Syntax errors become `ConfigParse`; type mismatches are validation errors.
fn classify_error(err: serde_json::Error, content: &str) -> NewswireError {
    match err.classify() {
        Category::Syntax | Category::Eof => {
            let offset = byte_offset(content, err.line(), err.column());
            NewswireError::ConfigParse {
                line: err.line(),
                column: err.column(),
                offset,
                message: err.to_string(),
                excerpt: excerpt(content, offset),
            }
        }
        Category::Data => NewswireError::ConfigValidation(err.to_string()),
        Category::Io => NewswireError::Json(err),
    }
}

/// serde_json reports 1-based lines and columns; columns count bytes.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}

fn excerpt(content: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(EXCERPT_RADIUS);
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + EXCERPT_RADIUS).min(content.len());
    while !content.is_char_boundary(end) {
        end += 1;
    }
    content[start..end].replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_plain_url_list() {
        let content = r#"{ "feeds": ["https://a.example/rss", "https://b.example/atom"] }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].url, "https://a.example/rss");
        assert_eq!(config.feeds[1].position, 1);
        assert_eq!(config.max_items, DEFAULT_MAX_ITEMS);
        assert_eq!(config.max_days, DEFAULT_MAX_DAYS);
        assert_eq!(config.fetch_delay_ms, DEFAULT_FETCH_DELAY_MS);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_mixed_shapes() {
        let content = r#"{
            "feeds": [
                "  https://a.example/rss  ",
                { "url": "https://b.example/rss", "group": "tech" },
                { "group": "no url" },
                42,
                "   ",
                { "url": 7 },
                { "url": "https://c.example/rss", "group": 1 }
            ],
            "max_items": 10,
            "max_days": 7
        }"#;

        let config = Config::from_str(content).unwrap();

        assert_eq!(config.feeds.len(), 3);
        assert_eq!(config.feeds[0].url, "https://a.example/rss");
        assert_eq!(config.feeds[0].group, None);
        assert_eq!(config.feeds[1].url, "https://b.example/rss");
        assert_eq!(config.feeds[1].group.as_deref(), Some("tech"));
        assert_eq!(config.feeds[1].position, 1);
        assert_eq!(config.feeds[2].url, "https://c.example/rss");
        assert_eq!(config.feeds[2].group, None);
        assert_eq!(config.feeds[2].position, 2);
        assert_eq!(config.max_items, 10);
        assert_eq!(config.max_days, 7);
    }

    #[test]
    fn test_duplicate_feeds_are_kept() {
        let content = r#"{ "feeds": ["https://a.example/rss", "https://a.example/rss"] }"#;
        let config = Config::from_str(content).unwrap();
        assert_eq!(config.feeds.len(), 2);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/feeds.json");
        assert!(matches!(result, Err(NewswireError::Io(_))));
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let content = "{\n  \"feeds\": [\"https://a.example/rss\",,]\n}";

        let err = Config::from_str(content).unwrap_err();
        assert!(err.is_config());
        match err {
            NewswireError::ConfigParse {
                line,
                column,
                offset,
                ref excerpt,
                ..
            } => {
                assert_eq!(line, 2);
                assert!(column > 0);
                assert_eq!(&content[offset..offset + 1], ",");
                assert!(excerpt.contains("\\n"));
                assert!(excerpt.contains("a.example"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_document_is_parse_error() {
        let err = Config::from_str(r#"{ "feeds": ["https://a"#).unwrap_err();
        assert!(matches!(err, NewswireError::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_feeds() {
        let err = Config::from_str(r#"{ "max_items": 5 }"#).unwrap_err();
        assert!(matches!(err, NewswireError::ConfigValidation(_)));
    }

    #[test]
    fn test_feeds_not_a_list() {
        let err = Config::from_str(r#"{ "feeds": "https://a.example/rss" }"#).unwrap_err();
        match err {
            NewswireError::ConfigValidation(msg) => assert!(msg.contains("a string")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_feeds_list() {
        let err = Config::from_str(r#"{ "feeds": [] }"#).unwrap_err();
        assert!(matches!(err, NewswireError::ConfigValidation(_)));
    }

    #[test]
    fn test_no_valid_urls() {
        let err = Config::from_str(r#"{ "feeds": ["  ", {"url": ""}, null] }"#).unwrap_err();
        match err {
            NewswireError::ConfigValidation(msg) => assert!(msg.contains("no valid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_type_is_validation_error() {
        let err = Config::from_str(r#"{ "feeds": ["https://a"], "max_items": "many" }"#)
            .unwrap_err();
        assert!(matches!(err, NewswireError::ConfigValidation(_)));
    }

    #[test]
    fn test_top_level_not_an_object() {
        let err = Config::from_str(r#"["https://a"]"#).unwrap_err();
        assert!(matches!(err, NewswireError::ConfigValidation(_)));
    }

    #[test]
    fn test_non_positive_values_are_clamped() {
        let config =
            Config::from_str(r#"{ "feeds": ["https://a"], "max_items": 0, "max_days": -3 }"#)
                .unwrap();
        assert_eq!(config.max_items, 1);
        assert_eq!(config.max_days, 1);
    }

    #[test]
    fn test_optional_tunables() {
        let config = Config::from_str(
            r#"{
                "feeds": ["https://a"],
                "fetch_delay_ms": 0,
                "timeout_secs": 5,
                "max_entries_per_feed": 20,
                "concurrency": 4,
                "user_agent": "TestBot/1.0"
            }"#,
        )
        .unwrap();
        assert_eq!(config.fetch_delay_ms, 0);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_entries_per_feed, 20);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.user_agent, "TestBot/1.0");
    }

    #[test]
    fn test_default_user_agent() {
        let config = Config::from_str(r#"{ "feeds": ["https://a"] }"#).unwrap();
        assert!(config.user_agent.starts_with("newswire/"));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let content = "新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻新闻";
        let text = excerpt(content, 31);
        assert!(!text.is_empty());
    }
}
