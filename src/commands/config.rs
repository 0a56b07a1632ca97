//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set one value

use std::fmt;
use std::str::FromStr;

use owo_colors::OwoColorize;
use secrecy::ExposeSecret;
use serde_json::json;

use super::CommandOutput;
use crate::config::{Config, DefaultProject};
use crate::error::{GhpError, Result};
use crate::utils::mask_sensitive_value;

/// Keys accepted by `config get` and `config set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GithubToken,
    DefaultProject,
    DefaultProjectName,
    DefaultOrganization,
    RemoteTimeout,
    Concurrency,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::GithubToken,
        ConfigKey::DefaultProject,
        ConfigKey::DefaultProjectName,
        ConfigKey::DefaultOrganization,
        ConfigKey::RemoteTimeout,
        ConfigKey::Concurrency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::GithubToken => "github.token",
            ConfigKey::DefaultProject => "default.project",
            ConfigKey::DefaultProjectName => "default.project_name",
            ConfigKey::DefaultOrganization => "default.organization",
            ConfigKey::RemoteTimeout => "remote_timeout",
            ConfigKey::Concurrency => "concurrency",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = GhpError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(key) = ConfigKey::ALL.into_iter().find(|k| k.as_str() == s) {
            return Ok(key);
        }

        let valid = ConfigKey::ALL.map(|k| k.as_str()).join(", ");

        // github_token -> github.token
        if let Some(key) = ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str().replace('.', "_") == s)
        {
            return Err(GhpError::Config(format!(
                "invalid config key '{s}'. Use dot notation: '{key}'"
            )));
        }

        Err(GhpError::Config(format!(
            "unknown config key '{s}'. Valid keys: {valid}"
        )))
    }
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let config_path = Config::config_path()?;
    let token = config.github_token();
    let masked_token = token
        .as_ref()
        .map(|t| mask_sensitive_value(t.expose_secret()));

    let json_output = json!({
        "default_project": config.default_project.as_ref().map(|p| json!({
            "id": p.id,
            "name": p.name,
            "organization": p.organization,
        })),
        "auth": {
            "github_token_configured": token.is_some(),
        },
        "api_url": config.api_url,
        "remote_timeout": config.remote_timeout,
        "concurrency": config.concurrency,
        "config_file": config_path.to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    match &config.default_project {
        Some(project) => {
            text.push_str(&format!("{}:\n", "default_project".cyan()));
            text.push_str(&format!("  id: {}\n", project.id));
            if let Some(name) = &project.name {
                text.push_str(&format!("  name: {name}\n"));
            }
            if let Some(org) = &project.organization {
                text.push_str(&format!("  organization: {org}\n"));
            }
        }
        None => text.push_str(&format!(
            "{}: {}\n",
            "default_project".cyan(),
            "not configured".dimmed()
        )),
    }
    text.push('\n');

    text.push_str(&format!("{}:\n", "auth".cyan()));
    let token_status = match masked_token {
        Some(masked) => format!("{} ({masked})", "configured".green()),
        None => "not configured".dimmed().to_string(),
    };
    text.push_str(&format!("  github.token: {token_status}\n\n"));

    if let Some(api_url) = &config.api_url {
        text.push_str(&format!("{}: {api_url}\n", "api_url".cyan()));
    }
    text.push_str(&format!(
        "{}: {}s\n",
        "remote_timeout".cyan(),
        config.remote_timeout
    ));
    text.push_str(&format!("{}: {}\n\n", "concurrency".cyan(), config.concurrency));
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", config_path.display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    let mut config = Config::load()?;
    apply_config_value(&mut config, key, value)?;
    config.save()?;

    let shown = match key {
        ConfigKey::GithubToken => mask_sensitive_value(value),
        _ => value.to_string(),
    };
    println!("Set {} to {}", key.cyan(), shown);
    Ok(())
}

/// Print a configuration value
pub fn cmd_config_get(key: &str) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    let config = Config::load()?;
    println!("{}", read_config_value(&config, key)?);
    Ok(())
}

fn parse_number<T: FromStr>(key: ConfigKey, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        GhpError::Config(format!("invalid value '{value}' for {key}. Expected a number"))
    })
}

fn require_default_project(config: &mut Config, key: ConfigKey) -> Result<&mut DefaultProject> {
    config
        .default_project
        .as_mut()
        .ok_or_else(|| GhpError::Config(format!("set default.project before {key}")))
}

/// Store `value` under `key`, validating its type
pub fn apply_config_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::GithubToken => config.set_github_token(value.trim().to_string()),
        ConfigKey::DefaultProject => {
            let id: i64 = parse_number(key, value)?;
            if config.default_project_id() != Some(id) {
                config.set_default_project(id, None, None);
            }
        }
        ConfigKey::DefaultProjectName => {
            require_default_project(config, key)?.name = Some(value.to_string());
        }
        ConfigKey::DefaultOrganization => {
            require_default_project(config, key)?.organization = Some(value.to_string());
        }
        ConfigKey::RemoteTimeout => {
            let secs: u64 = parse_number(key, value)?;
            if secs == 0 {
                return Err(GhpError::Config(
                    "remote_timeout must be at least 1 second".to_string(),
                ));
            }
            config.remote_timeout = secs;
        }
        ConfigKey::Concurrency => {
            let n: usize = parse_number(key, value)?;
            if n == 0 {
                return Err(GhpError::Config("concurrency must be at least 1".to_string()));
            }
            config.concurrency = n;
        }
    }
    Ok(())
}

/// Current value of `key`; the token is masked
pub fn read_config_value(config: &Config, key: ConfigKey) -> Result<String> {
    let not_set = || GhpError::Config(format!("{key} not set"));
    let value = match key {
        ConfigKey::GithubToken => config
            .github_token()
            .map(|t| mask_sensitive_value(t.expose_secret()))
            .ok_or_else(not_set)?,
        ConfigKey::DefaultProject => config
            .default_project_id()
            .map(|id| id.to_string())
            .ok_or_else(not_set)?,
        ConfigKey::DefaultProjectName => config
            .default_project
            .as_ref()
            .and_then(|p| p.name.clone())
            .ok_or_else(not_set)?,
        ConfigKey::DefaultOrganization => config
            .default_project
            .as_ref()
            .and_then(|p| p.organization.clone())
            .ok_or_else(not_set)?,
        ConfigKey::RemoteTimeout => config.remote_timeout.to_string(),
        ConfigKey::Concurrency => config.concurrency.to_string(),
    };
    Ok(value)
}
