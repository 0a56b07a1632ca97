//! `ghp projects`: find the id of a project to list.

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{GitHubClient, ProjectRef};

pub async fn cmd_projects(org: Option<&str>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let client = GitHubClient::from_config(&config)?;

    let orgs: Vec<String> = match org {
        Some(org) => vec![org.to_string()],
        None => client
            .list_user_orgs()
            .await?
            .into_iter()
            .map(|o| o.login)
            .collect(),
    };

    let mut listing = Vec::with_capacity(orgs.len());
    for org in orgs {
        let projects = client.list_org_projects(&org).await?;
        tracing::debug!(org = %org, count = projects.len(), "listed projects");
        listing.push((org, projects));
    }

    let json_output = json!(
        listing
            .iter()
            .map(|(org, projects)| json!({ "organization": org, "projects": projects }))
            .collect::<Vec<_>>()
    );

    CommandOutput::new(json_output)
        .with_text(format_listing(&listing))
        .print(json)
}

fn format_listing(listing: &[(String, Vec<ProjectRef>)]) -> String {
    if listing.is_empty() {
        return "No organizations found".dimmed().to_string();
    }

    let mut text = String::new();
    for (org, projects) in listing {
        text.push_str(&format!("{}:\n", org.cyan().bold()));
        if projects.is_empty() {
            text.push_str(&format!("  {}\n", "no classic projects".dimmed()));
            continue;
        }
        let id_width = projects
            .iter()
            .map(|p| p.id.to_string().len())
            .max()
            .unwrap_or(0);
        for project in projects {
            let closed = match project.state.as_deref() {
                Some("closed") => format!(" {}", "(closed)".dimmed()),
                _ => String::new(),
            };
            text.push_str(&format!(
                "  {:>id_width$}  {}{}\n",
                project.id, project.name, closed
            ));
        }
    }

    text.trim_end().to_string()
}
