//! `ghp list`: resolve a project board and print it.

use crate::board::Board;
use crate::cache::{CacheStats, ResponseCache};
use crate::config::Config;
use crate::display::{RenderOptions, render_with};
use crate::error::{GhpError, Result};
use crate::filter::Filter;
use crate::remote::{GitHubClient, RepositoryResource};
use crate::resolver::resolve_board;
use crate::utils::is_stdout_tty;

use super::terminal_width;

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Raw `--filter` values, each a comma-separated AND group
    pub filters: Vec<String>,
    pub project: Option<i64>,
    pub width: Option<usize>,
    pub json: bool,
    pub color: bool,
}

/// Pick the project to list: the flag first, then the configured default
pub fn project_id(options: &ListOptions, config: &Config) -> Result<i64> {
    options
        .project
        .or_else(|| config.default_project_id())
        .ok_or_else(|| {
            GhpError::Config(
                "no project given. Pass --project <ID> or run: ghp config set default.project <ID>"
                    .to_string(),
            )
        })
}

pub async fn cmd_list(options: ListOptions) -> Result<()> {
    let config = Config::load()?;
    let project_id = project_id(&options, &config)?;
    let filter = Filter::from_args(&options.filters);
    let client = GitHubClient::from_config(&config)?;
    let repositories: ResponseCache<RepositoryResource> = ResponseCache::new();

    eprintln!("Requesting full project {project_id}...");
    let board = resolve_board(&client, &repositories, project_id, config.resolve_options()).await?;

    if !filter.is_empty() {
        eprintln!("Applying filters: {filter}");
    }

    if options.json {
        print_json(&board, &filter)?;
    } else {
        let width = terminal_width(options.width);
        let color = options.color && is_stdout_tty();
        for line in render_with(&board, &filter, RenderOptions::for_terminal(width, color)) {
            println!("{line}");
        }
    }

    print_cache_stats(repositories.stats());
    Ok(())
}

fn print_json(board: &Board, filter: &Filter) -> Result<()> {
    let visible = board.filtered(filter);
    println!("{}", serde_json::to_string_pretty(&visible)?);
    Ok(())
}

fn print_cache_stats(stats: CacheStats) {
    eprintln!("\nCache performance:\n{stats}");
}
