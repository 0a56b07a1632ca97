//! GitHub classic projects client.

use octocrab::{FromResponse, Octocrab, Page};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{GhpError, Result};

use super::error::{build_github_error_message, fetch_error, is_github_unauthorized};
use super::{
    BoardApi, CardRef, ColumnRef, IssueResource, OrgRef, ProjectRef, RepositoryResource, UserRef,
};

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Classic projects endpoints still require the preview media type
const PROJECTS_PREVIEW: &str = "application/vnd.github.inertia-preview+json";

/// Largest page size GitHub accepts for list endpoints
const PER_PAGE: usize = 100;

/// Read-only GitHub client for project boards
pub struct GitHubClient {
    client: Octocrab,
    api_base: Url,
}

impl GitHubClient {
    /// Create a client from configuration, failing if no token is available
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.github_token().ok_or_else(|| {
            GhpError::Auth(
                "GitHub token not configured. Set GITHUB_TOKEN environment variable or run: ghp auth <token>".to_string()
            )
        })?;
        let client = Self::new(&token)?;
        match config.api_url.as_deref() {
            Some(base) => client.with_api_base(base),
            None => Ok(client),
        }
    }

    /// Create a client with a personal access token
    pub fn new(token: &SecretString) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.expose_secret().to_string())
            .add_header(http::header::ACCEPT, PROJECTS_PREVIEW.to_string())
            .build()
            .map_err(|e| {
                GhpError::Other(format!(
                    "Failed to create GitHub client: {}",
                    build_github_error_message(&e)
                ))
            })?;

        let api_base = Url::parse(GITHUB_API_URL)
            .map_err(|e| GhpError::Config(format!("invalid API URL: {e}")))?;

        Ok(Self { client, api_base })
    }

    /// Point list endpoints at a different API root (GitHub Enterprise)
    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        // Without a trailing slash `Url::join` would replace the last path segment
        let base = format!("{}/", base.trim_end_matches('/'));
        self.api_base = Url::parse(&base)
            .map_err(|e| GhpError::Config(format!("invalid API URL '{base}': {e}")))?;
        Ok(self)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path)
            .map_err(|e| GhpError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    /// GET an absolute API URL and decode the response
    async fn get_json<R: FromResponse>(&self, url: &str) -> Result<R> {
        tracing::debug!(url, "GET");
        self.client
            .get::<R, _, ()>(url, None)
            .await
            .map_err(|e| fetch_error(url, &e))
    }

    /// GET every page of a list endpoint, following `Link: rel="next"`
    async fn get_paginated<T: DeserializeOwned>(&self, mut url: Url) -> Result<Vec<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let first: Page<T> = self.get_json(url.as_str()).await?;
        self.client
            .all_pages(first)
            .await
            .map_err(|e| fetch_error(url.as_str(), &e))
    }

    /// Login of the user the token belongs to
    pub async fn current_user(&self) -> Result<String> {
        let url = self.endpoint("user")?;
        tracing::debug!(url = %url, "GET");

        let user: UserRef = self
            .client
            .get::<UserRef, _, ()>(url.as_str(), None)
            .await
            .map_err(|e| {
                if is_github_unauthorized(&e) {
                    GhpError::Auth("GitHub rejected the token (401 Unauthorized)".to_string())
                } else {
                    GhpError::Auth(build_github_error_message(&e))
                }
            })?;
        Ok(user.login)
    }

    /// Organizations the authenticated user belongs to
    pub async fn list_user_orgs(&self) -> Result<Vec<OrgRef>> {
        let url = self.endpoint("user/orgs")?;
        self.get_paginated(url).await
    }

    /// Classic projects of an organization
    pub async fn list_org_projects(&self, org: &str) -> Result<Vec<ProjectRef>> {
        let url = self.endpoint(&format!("orgs/{org}/projects"))?;
        self.get_paginated(url).await
    }
}

impl BoardApi for GitHubClient {
    async fn list_columns(&self, project_id: i64) -> Result<Vec<ColumnRef>> {
        let url = self.endpoint(&format!("projects/{project_id}/columns"))?;
        self.get_paginated(url).await
    }

    async fn list_cards(&self, column_id: i64) -> Result<Vec<CardRef>> {
        let mut url = self.endpoint(&format!("projects/columns/{column_id}/cards"))?;
        // Archived cards are listed too; the resolver skips them
        url.query_pairs_mut().append_pair("archived_state", "all");
        self.get_paginated(url).await
    }

    async fn get_issue(&self, url: &str) -> Result<IssueResource> {
        self.get_json(url).await
    }

    async fn get_repository(&self, url: &str) -> Result<RepositoryResource> {
        self.get_json(url).await
    }
}
