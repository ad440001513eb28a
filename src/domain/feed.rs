use serde::{Deserialize, Serialize};

/// One configured feed. Identity is the URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub group: Option<String>,
    /// Index in the configured feed list; the merge tie-break.
    pub position: usize,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, position: usize) -> Self {
        Self {
            url: url.into(),
            group: None,
            position,
        }
    }

    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    pub fn display_title(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_prefers_group() {
        let feed = FeedSource::new("https://a.example/rss", 0).with_group(Some("tech".into()));
        assert_eq!(feed.display_title(), "tech");
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let feed = FeedSource::new("https://a.example/rss", 3);
        assert_eq!(feed.display_title(), "https://a.example/rss");
        assert_eq!(feed.position, 3);
    }
}
