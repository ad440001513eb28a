use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewswireError {
    #[error("Config parse error at line {line}, column {column} (byte {offset}): {message}. Near: ...{excerpt}...")]
    ConfigParse {
        line: usize,
        column: usize,
        offset: usize,
        message: String,
        excerpt: String,
    },

    #[error("Invalid config: {0}")]
    ConfigValidation(String),

    #[error("Fetch failed for {feed}: {cause}")]
    Fetch { feed: String, cause: String },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NewswireError {
    /// Failures caused by the config document rather than the run itself.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            NewswireError::ConfigParse { .. } | NewswireError::ConfigValidation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NewswireError>;
