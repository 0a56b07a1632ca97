use owo_colors::OwoColorize;
use secrecy::SecretString;

use crate::config::Config;
use crate::error::{GhpError, Result};
use crate::remote::GitHubClient;

/// Check `token` against the API and store it in the config file
pub async fn cmd_auth(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(GhpError::Auth("token must not be empty".to_string()));
    }

    let mut config = Config::load()?;

    let mut client = GitHubClient::new(&SecretString::from(token.to_string()))?;
    if let Some(base) = config.api_url.as_deref() {
        client = client.with_api_base(base)?;
    }
    let login = client.current_user().await?;
    tracing::debug!(login = %login, "token validated");

    config.set_github_token(token.to_string());
    config.save()?;

    println!(
        "Authenticated as {} (token saved to {})",
        login.green(),
        Config::config_path()?.display()
    );
    Ok(())
}
