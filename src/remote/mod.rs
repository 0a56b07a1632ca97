//! Remote project board access.
//!
//! This module defines the wire shapes returned by the GitHub REST API for
//! classic projects and the [`BoardApi`] trait the resolver is written
//! against. [`github::GitHubClient`] is the production implementation.

pub mod error;
pub mod github;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use github::GitHubClient;

/// A project column as listed by `GET /projects/{id}/columns`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnRef {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// A raw project card as listed by `GET /projects/columns/{id}/cards`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CardRef {
    /// API URL of the card itself
    pub url: String,
    /// Free text for note cards
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// API URL of the referenced issue, for issue cards
    #[serde(default)]
    pub content_url: Option<String>,
    pub created_at: jiff::Timestamp,
}

/// Issue state on the remote platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelRef {
    pub name: String,
}

/// Issue resource fetched from a card's `content_url`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueResource {
    pub url: String,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    /// The issue payload does not embed the repository, only its URL
    pub repository_url: String,
}

/// Repository resource, shared by every issue of the same repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryResource {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub url: String,
}

/// A classic project owned by an organization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// An organization the authenticated user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrgRef {
    pub login: String,
}

/// Read-only access to a project board.
///
/// Implementations return [`crate::error::GhpError::Fetch`] for network
/// failures and non-success responses.
pub trait BoardApi: Send + Sync {
    /// List the columns of a project, in board order
    fn list_columns(
        &self,
        project_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ColumnRef>>> + Send;

    /// List every card of a column, archived ones included
    fn list_cards(
        &self,
        column_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<CardRef>>> + Send;

    /// Fetch an issue by its API URL
    fn get_issue(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<IssueResource>> + Send;

    /// Fetch a repository by its API URL
    fn get_repository(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<RepositoryResource>> + Send;
}
