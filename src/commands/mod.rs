mod auth;
mod config;
mod list;
mod projects;

pub use auth::cmd_auth;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use list::{ListOptions, cmd_list};
pub use projects::cmd_projects;

use serde_json::Value;

use crate::error::Result;

/// Width used when the terminal cannot be queried
pub const FALLBACK_WIDTH: usize = 80;

/// Output of a command in both of its forms
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as pretty JSON when `json` is set, text otherwise
    pub fn print(self, json: bool) -> Result<()> {
        match self.text {
            Some(text) if !json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// Columns available for the listing: the explicit width, then the
/// terminal size, then `$COLUMNS`, then [`FALLBACK_WIDTH`].
pub fn terminal_width(explicit: Option<usize>) -> usize {
    if let Some(width) = explicit {
        return width;
    }
    if let Ok((columns, _)) = crossterm::terminal::size()
        && columns > 0
    {
        return columns as usize;
    }
    columns_from_env(std::env::var("COLUMNS").ok().as_deref()).unwrap_or(FALLBACK_WIDTH)
}

fn columns_from_env(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|&n| n > 0)
        .map(usize::from)
}
