use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhpError {
    #[error("error getting {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("error getting columns for project {0}: zero columns")]
    EmptyBoard(i64),

    #[error("cannot classify card {url}: {reason}")]
    Classification { url: String, reason: String },

    #[error("board resolution timed out after {0}s")]
    Timeout(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GhpError {
    /// Shorthand for a failed fetch of `url`.
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        GhpError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GhpError>;
