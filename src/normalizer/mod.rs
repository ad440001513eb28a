use std::sync::Arc;

use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{NewswireError, Result};
use crate::clock::Clock;
use crate::domain::Item;

/// One entry as it came out of the feed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        // Prefer the alternate link, which is the article itself.
        let link = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone());

        Self {
            title: entry.title.map(|t| decode_html_entities(&t.content).to_string()),
            link,
            published: entry.published,
            updated: entry.updated,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub entries: Vec<RawEntry>,
    /// Set when the document was malformed but partially recovered.
    pub warning: Option<String>,
}

/// Parse a feed document, keeping at most `limit` entries.
///
/// A document that fails strict parsing is retried with everything after
/// its last complete `<item>`/`<entry>` cut off. If that recovers entries
/// they are returned together with the original error as a warning.
pub fn parse_feed(body: &[u8], limit: usize) -> Result<ParsedFeed> {
    match parser::parse(body) {
        Ok(feed) => Ok(ParsedFeed {
            entries: take_entries(feed.entries, limit),
            warning: None,
        }),
        Err(e) => {
            let recovered = repair_truncated(body)
                .and_then(|fixed| parser::parse(fixed.as_bytes()).ok())
                .filter(|feed| !feed.entries.is_empty());

            match recovered {
                Some(feed) => Ok(ParsedFeed {
                    entries: take_entries(feed.entries, limit),
                    warning: Some(e.to_string()),
                }),
                None => Err(NewswireError::FeedParse(e.to_string())),
            }
        }
    }
}

fn take_entries(entries: Vec<Entry>, limit: usize) -> Vec<RawEntry> {
    entries.into_iter().take(limit).map(RawEntry::from).collect()
}

/// Cut the document after its last complete entry and close the root.
fn repair_truncated(body: &[u8]) -> Option<String> {
    let xml = std::str::from_utf8(body).ok()?;

    let rss_end = xml.rfind("</item>").map(|i| i + "</item>".len());
    let atom_end = xml.rfind("</entry>").map(|i| i + "</entry>".len());

    match (rss_end, atom_end) {
        (Some(end), _) if xml.contains("<rss") => {
            Some(format!("{}</channel></rss>", &xml[..end]))
        }
        (Some(end), _) if xml.contains("<rdf:RDF") => Some(format!("{}</rdf:RDF>", &xml[..end])),
        (_, Some(end)) if xml.contains("<feed") => Some(format!("{}</feed>", &xml[..end])),
        _ => None,
    }
}

/// Maps raw entries to canonical items.
#[derive(Clone)]
pub struct Normalizer {
    clock: Arc<dyn Clock>,
}

impl Normalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// `None` when the entry has no usable link.
    pub fn normalize(&self, entry: &RawEntry) -> Option<Item> {
        let url = entry.link.as_deref().map(str::trim).filter(|l| !l.is_empty())?;

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.timestamp())
            .unwrap_or_else(|| self.clock.now());

        Some(Item::new(entry.title.as_deref(), url, published))
    }
}
