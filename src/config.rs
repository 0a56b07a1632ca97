//! User settings.
//!
//! Configuration is stored as `config.yaml` in the platform config directory
//! (or in `$GHP_CONFIG_DIR` when set) and includes:
//! - The GitHub token
//! - The default project listed by `ghp`
//! - Remote timeout and fetch concurrency

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{GhpError, Result};
use crate::resolver::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, ResolveOptions};
use crate::utils::ensure_parent_dir;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "GHP_CONFIG_DIR";

/// Environment variable overriding the stored token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Authentication tokens
    #[serde(default)]
    pub auth: AuthConfig,

    /// Project listed when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<DefaultProject>,

    /// API root for GitHub Enterprise installations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Maximum concurrent card fetches per column (default: 8)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_remote_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            default_project: None,
            api_url: None,
            remote_timeout: default_remote_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubAuth>,
}

/// GitHub authentication
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubAuth {
    pub token: String,
}

impl fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubAuth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Default project selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultProject {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl Config {
    /// Directory holding `config.yaml`
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        directories::ProjectDirs::from("com", "ghp", "ghp")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                GhpError::Config(format!(
                    "cannot determine config directory, set {CONFIG_DIR_ENV}"
                ))
            })
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            GhpError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        ensure_parent_dir(&path)?;

        let content = serde_yaml_ng::to_string(self)?;
        write_private(&path, &content)?;
        Ok(())
    }

    /// Get GitHub token from environment variable or config
    pub fn github_token(&self) -> Option<SecretString> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(SecretString::from(token));
        }

        self.auth
            .github
            .as_ref()
            .filter(|g| !g.token.is_empty())
            .map(|g| SecretString::from(g.token.clone()))
    }

    pub fn set_github_token(&mut self, token: String) {
        self.auth.github = Some(GitHubAuth { token });
    }

    pub fn set_default_project(&mut self, id: i64, name: Option<String>, organization: Option<String>) {
        self.default_project = Some(DefaultProject {
            id,
            name,
            organization,
        });
    }

    pub fn default_project_id(&self) -> Option<i64> {
        self.default_project.as_ref().map(|p| p.id)
    }

    /// Resolver tuning derived from this configuration.
    ///
    /// Zero values from a hand-edited file are raised to 1.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            concurrency: self.concurrency.max(1),
            timeout: std::time::Duration::from_secs(self.remote_timeout.max(1)),
        }
    }
}

/// The config file holds a token, keep it readable by the owner only
#[cfg(unix)]
fn write_private(path: &std::path::Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &std::path::Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}
