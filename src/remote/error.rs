//! Conversion of octocrab errors into board fetch errors.

use crate::error::GhpError;

/// Build a readable message from an octocrab error.
pub fn build_github_error_message(error: &octocrab::Error) -> String {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code;
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            format!(
                "GitHub API error ({} {}): {}",
                status.as_u16(),
                status_text,
                source.message
            )
        }
        octocrab::Error::Http { source, .. } => format!("HTTP error: {source}"),
        octocrab::Error::Service { source, .. } => format!("Service error: {source}"),
        octocrab::Error::Serde { source, .. } => format!("Serialization error: {source}"),
        octocrab::Error::Json { source, .. } => {
            format!("JSON error in {}: {}", source.path(), source.inner())
        }
        _ => format!("GitHub API error: {error}"),
    }
}

/// True for 401 responses, which mean the token is missing or revoked.
pub fn is_github_unauthorized(error: &octocrab::Error) -> bool {
    matches!(error, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 401)
}

/// Wrap an octocrab error raised while fetching `url`.
pub fn fetch_error(url: &str, error: &octocrab::Error) -> GhpError {
    GhpError::fetch(url, build_github_error_message(error))
}
