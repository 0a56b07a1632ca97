use clap::builder::TypedValueParser;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{
    ListOptions, cmd_auth, cmd_config_get, cmd_config_set, cmd_config_show, cmd_list,
    cmd_projects,
};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "ghp")]
#[command(about = "Aligned terminal listing of a GitHub project board")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the cards of a project board (default)
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Validate a GitHub token and store it
    Auth {
        /// Personal access token with read access to projects and issues
        token: String,
    },

    /// List classic projects and their ids
    Projects {
        /// Organization to list (default: every organization of the user)
        #[arg(long)]
        org: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show cards containing every comma-separated word; repeat for OR
    #[arg(short, long = "filter", value_name = "WORDS")]
    pub filters: Vec<String>,

    /// Project id (default: configured default project)
    #[arg(short, long)]
    pub project: Option<i64>,

    /// Terminal width (default: detected)
    #[arg(short, long, value_parser = clap::value_parser!(u16).map(usize::from))]
    pub width: Option<usize>,

    /// Output the resolved board as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colours
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Key: github.token, default.project, default.project_name,
        /// default.organization, remote_timeout, concurrency
        key: String,
        value: String,
    },
    /// Get a configuration value
    Get {
        key: String,
    },
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        ListOptions {
            filters: args.filters,
            project: args.project,
            width: args.width,
            json: args.json,
            color: !args.no_color,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            None => cmd_list(self.list.into()).await,
            Some(Commands::List(args)) => cmd_list(args.into()).await,
            Some(Commands::Auth { token }) => cmd_auth(&token).await,
            Some(Commands::Projects { org, json }) => cmd_projects(org.as_deref(), json).await,
            Some(Commands::Config { action }) => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
                ConfigAction::Get { key } => cmd_config_get(&key),
            },
            Some(Commands::Completions { shell }) => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ghp", &mut io::stdout());
}
