pub mod board;
pub mod cache;
pub mod card;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod logging;
pub mod remote;
pub mod resolver;
pub mod utils;

pub use board::{Board, Column};
pub use cache::{CacheStats, ResponseCache};
pub use card::{Card, Issue, Note};
pub use config::Config;
pub use display::{RenderOptions, render, render_with};
pub use error::{GhpError, Result};
pub use filter::Filter;
pub use remote::{BoardApi, GitHubClient};
pub use resolver::{ResolveOptions, resolve_board};
