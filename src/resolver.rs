//! Board resolution: turn raw columns and cards into a hydrated [`Board`].
//!
//! Columns are resolved concurrently and the cards of each column go through
//! a bounded, order-preserving pool. Repository lookups are shared through a
//! [`ResponseCache`] because many issues point at the same repository; issue
//! lookups are not cached since every card references its own issue.
//!
//! Resolution is all-or-nothing: the first failure drops every in-flight
//! request and is returned to the caller.

use std::time::Duration;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::board::{Board, Column};
use crate::cache::ResponseCache;
use crate::card::{Card, Issue, Note};
use crate::error::{GhpError, Result};
use crate::remote::{BoardApi, CardRef, ColumnRef, RepositoryResource};

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning for a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of cards fetched at once within a column
    pub concurrency: usize,
    /// Deadline for the whole pass
    pub timeout: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Resolve a whole project board within `options.timeout`.
pub async fn resolve_board<A: BoardApi>(
    api: &A,
    repositories: &ResponseCache<RepositoryResource>,
    project_id: i64,
    options: ResolveOptions,
) -> Result<Board> {
    let board = tokio::time::timeout(
        options.timeout,
        pull_columns(api, repositories, project_id, options.concurrency),
    )
    .await
    .map_err(|_| GhpError::Timeout(options.timeout.as_secs()))??;

    tracing::info!(
        columns = board.columns.len(),
        cards = board.card_count(),
        cache_hits = repositories.hits(),
        cache_misses = repositories.misses(),
        "board resolved"
    );

    Ok(board)
}

/// List the project's columns and resolve each one.
///
/// A project without columns is reported as [`GhpError::EmptyBoard`].
pub async fn pull_columns<A: BoardApi>(
    api: &A,
    repositories: &ResponseCache<RepositoryResource>,
    project_id: i64,
    concurrency: usize,
) -> Result<Board> {
    tracing::debug!(project_id, "listing columns");
    let refs = api.list_columns(project_id).await?;
    if refs.is_empty() {
        return Err(GhpError::EmptyBoard(project_id));
    }

    let columns = try_join_all(
        refs.into_iter()
            .map(|column| pull_cards(api, repositories, column, concurrency)),
    )
    .await?;

    Ok(Board::new(columns))
}

async fn pull_cards<A: BoardApi>(
    api: &A,
    repositories: &ResponseCache<RepositoryResource>,
    column: ColumnRef,
    concurrency: usize,
) -> Result<Column> {
    tracing::debug!(column = %column.name, id = column.id, "listing cards");
    let raw = api.list_cards(column.id).await?;

    let cards = stream::iter(raw.into_iter().filter(|card| !card.archived))
        .map(|card| build_card(api, repositories, card))
        .buffered(concurrency.max(1))
        .inspect_ok(|card| {
            tracing::debug!(url = card.url(), card = %card.description(), "resolved card");
        })
        .try_collect::<Vec<_>>()
        .await?;

    Ok(Column {
        name: column.name,
        id: column.id,
        url: column.url,
        cards,
    })
}

/// Classify a raw card and hydrate it.
///
/// Cards with note text become notes. Anything else must reference an
/// issue, which is fetched together with its repository.
pub async fn build_card<A: BoardApi>(
    api: &A,
    repositories: &ResponseCache<RepositoryResource>,
    card: CardRef,
) -> Result<Card> {
    if let Some(text) = card.note.filter(|text| !text.is_empty()) {
        return Ok(Card::Note(Note {
            url: card.url,
            text,
            created_at: card.created_at,
        }));
    }

    let content_url = card.content_url.ok_or_else(|| GhpError::Classification {
        url: card.url.clone(),
        reason: "card has neither note text nor content URL".to_string(),
    })?;

    tracing::debug!(url = %content_url, "fetching issue");
    let issue = api.get_issue(&content_url).await?;
    let repository_url = issue.repository_url.clone();
    let repository = repositories
        .get_or_try_insert_with(&repository_url, || api.get_repository(&repository_url))
        .await?;

    Ok(Card::Issue(Issue::from_resources(
        card.url,
        card.created_at,
        issue,
        &repository,
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::Timestamp;
    use parking_lot::Mutex;

    use crate::remote::{IssueResource, IssueState, LabelRef, UserRef};

    /// In-memory board with per-URL call counting
    #[derive(Default)]
    pub(crate) struct MockApi {
        pub columns: Vec<ColumnRef>,
        pub cards: HashMap<i64, Vec<CardRef>>,
        pub issues: HashMap<String, IssueResource>,
        pub repositories: HashMap<String, RepositoryResource>,
        pub calls: Mutex<HashMap<String, usize>>,
        pub repository_fetches: AtomicUsize,
    }

    impl MockApi {
        fn record(&self, key: &str) {
            *self.calls.lock().entry(key.to_string()).or_default() += 1;
        }

        pub fn calls_for(&self, key: &str) -> usize {
            self.calls.lock().get(key).copied().unwrap_or(0)
        }

        pub fn column(mut self, id: i64, name: &str, cards: Vec<CardRef>) -> Self {
            self.columns.push(ColumnRef {
                id,
                name: name.to_string(),
                url: format!("https://api.github.com/projects/columns/{id}"),
            });
            self.cards.insert(id, cards);
            self
        }

        pub fn issue(
            mut self,
            repo: &str,
            number: u64,
            title: &str,
            assignee: Option<&str>,
            labels: &[&str],
        ) -> Self {
            let repository_url = format!("https://api.github.com/repos/acme/{repo}");
            self.repositories
                .entry(repository_url.clone())
                .or_insert_with(|| RepositoryResource {
                    name: repo.to_string(),
                    full_name: format!("acme/{repo}"),
                    url: repository_url.clone(),
                });
            let url = issue_url(repo, number);
            self.issues.insert(
                url.clone(),
                IssueResource {
                    url,
                    number,
                    title: title.to_string(),
                    state: IssueState::Open,
                    assignee: assignee.map(|login| UserRef {
                        login: login.to_string(),
                    }),
                    labels: labels
                        .iter()
                        .map(|name| LabelRef {
                            name: name.to_string(),
                        })
                        .collect(),
                    repository_url,
                },
            );
            self
        }
    }

    pub(crate) fn issue_url(repo: &str, number: u64) -> String {
        format!("https://api.github.com/repos/acme/{repo}/issues/{number}")
    }

    pub(crate) fn note_card(id: u64, text: &str) -> CardRef {
        CardRef {
            url: format!("https://api.github.com/projects/columns/cards/{id}"),
            note: Some(text.to_string()),
            archived: false,
            content_url: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(crate) fn issue_card(id: u64, repo: &str, number: u64) -> CardRef {
        CardRef {
            url: format!("https://api.github.com/projects/columns/cards/{id}"),
            note: None,
            archived: false,
            content_url: Some(issue_url(repo, number)),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    impl BoardApi for MockApi {
        async fn list_columns(&self, project_id: i64) -> Result<Vec<ColumnRef>> {
            self.record(&format!("columns:{project_id}"));
            Ok(self.columns.clone())
        }

        async fn list_cards(&self, column_id: i64) -> Result<Vec<CardRef>> {
            self.record(&format!("cards:{column_id}"));
            self.cards
                .get(&column_id)
                .cloned()
                .ok_or_else(|| GhpError::fetch(format!("cards:{column_id}"), "http: 404 Not Found"))
        }

        async fn get_issue(&self, url: &str) -> Result<IssueResource> {
            self.record(url);
            tokio::task::yield_now().await;
            self.issues
                .get(url)
                .cloned()
                .ok_or_else(|| GhpError::fetch(url, "http: 404 Not Found"))
        }

        async fn get_repository(&self, url: &str) -> Result<RepositoryResource> {
            self.record(url);
            self.repository_fetches.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.repositories
                .get(url)
                .cloned()
                .ok_or_else(|| GhpError::fetch(url, "http: 404 Not Found"))
        }
    }

    async fn resolve(api: &MockApi) -> (Result<Board>, ResponseCache<RepositoryResource>) {
        let cache = ResponseCache::new();
        let board = resolve_board(api, &cache, 1, ResolveOptions::default()).await;
        (board, cache)
    }

    #[tokio::test]
    async fn test_resolves_notes_and_issues_in_order() {
        let api = MockApi::default()
            .issue("proj", 42, "Fix the parser", Some("alice"), &["bug"])
            .column(
                10,
                "To Do",
                vec![issue_card(1, "proj", 42), note_card(2, "remember to deploy")],
            )
            .column(11, "Done", vec![note_card(3, "shipped")]);

        let (board, _) = resolve(&api).await;
        let board = board.unwrap();

        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.columns[0].name, "To Do");
        assert_eq!(board.columns[1].name, "Done");

        let issue = board.columns[0].cards[0].as_issue().unwrap();
        assert_eq!(issue.identifier(), "proj#42");
        assert_eq!(issue.assignee.as_deref(), Some("alice"));
        // The card keeps its own URL, not the issue's
        assert_eq!(issue.url, "https://api.github.com/projects/columns/cards/1");
        assert!(matches!(&board.columns[0].cards[1], Card::Note(n) if n.text == "remember to deploy"));
    }

    #[tokio::test]
    async fn test_zero_columns_is_an_error() {
        let api = MockApi::default();
        let (board, _) = resolve(&api).await;
        assert!(matches!(board, Err(GhpError::EmptyBoard(1))));
        assert_eq!(api.calls_for("columns:1"), 1);
    }

    #[tokio::test]
    async fn test_archived_cards_are_skipped() {
        let mut archived = note_card(2, "old news");
        archived.archived = true;
        let api = MockApi::default().column(10, "To Do", vec![note_card(1, "fresh"), archived]);

        let (board, _) = resolve(&api).await;
        let board = board.unwrap();

        assert_eq!(board.columns[0].cards.len(), 1);
        assert_eq!(board.columns[0].cards[0].url(), "https://api.github.com/projects/columns/cards/1");
    }

    #[tokio::test]
    async fn test_repository_fetched_once_for_many_issues() {
        let api = MockApi::default()
            .issue("proj", 1, "One", None, &[])
            .issue("proj", 2, "Two", None, &[])
            .issue("proj", 3, "Three", None, &[])
            .issue("tools", 4, "Four", None, &[])
            .column(
                10,
                "To Do",
                vec![issue_card(1, "proj", 1), issue_card(2, "proj", 2)],
            )
            .column(
                11,
                "Doing",
                vec![issue_card(3, "proj", 3), issue_card(4, "tools", 4)],
            );

        let (board, cache) = resolve(&api).await;
        board.unwrap();

        assert_eq!(api.calls_for("https://api.github.com/repos/acme/proj"), 1);
        assert_eq!(api.calls_for("https://api.github.com/repos/acme/tools"), 1);
        assert_eq!(api.repository_fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 2);
    }

    #[tokio::test]
    async fn test_issues_are_fetched_once_per_card_and_never_cached() {
        let api = MockApi::default()
            .issue("proj", 1, "One", None, &[])
            .column(10, "To Do", vec![issue_card(1, "proj", 1)]);

        let cache = ResponseCache::new();
        resolve_board(&api, &cache, 1, ResolveOptions::default())
            .await
            .unwrap();
        resolve_board(&api, &cache, 1, ResolveOptions::default())
            .await
            .unwrap();

        // Repository comes from the cache on the second pass, the issue does not
        assert_eq!(api.calls_for(&issue_url("proj", 1)), 2);
        assert_eq!(api.calls_for("https://api.github.com/repos/acme/proj"), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_card_without_note_or_content_is_classification_error() {
        let card = note_card(1, "");
        let api = MockApi::default().column(10, "To Do", vec![card]);

        let (board, _) = resolve(&api).await;
        assert!(matches!(board, Err(GhpError::Classification { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_whole_board() {
        let api = MockApi::default()
            .issue("proj", 1, "One", None, &[])
            .column(10, "To Do", vec![issue_card(1, "proj", 1)])
            // Issue 99 is unknown to the mock, so its fetch fails
            .column(11, "Done", vec![issue_card(2, "proj", 99)]);

        let (board, _) = resolve(&api).await;
        match board {
            Err(GhpError::Fetch { url, .. }) => assert_eq!(url, issue_url("proj", 99)),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_card_order_preserved_with_single_worker() {
        let api = MockApi::default()
            .issue("proj", 1, "One", None, &[])
            .issue("proj", 2, "Two", None, &[])
            .column(
                10,
                "To Do",
                vec![
                    issue_card(1, "proj", 2),
                    note_card(2, "between"),
                    issue_card(3, "proj", 1),
                ],
            );
        let cache = ResponseCache::new();
        let options = ResolveOptions {
            concurrency: 1,
            ..ResolveOptions::default()
        };

        let board = resolve_board(&api, &cache, 1, options).await.unwrap();
        let urls: Vec<&str> = board.columns[0].cards.iter().map(Card::url).collect();
        assert_eq!(
            urls,
            vec![
                "https://api.github.com/projects/columns/cards/1",
                "https://api.github.com/projects/columns/cards/2",
                "https://api.github.com/projects/columns/cards/3",
            ]
        );
    }

    struct SlowApi;

    impl BoardApi for SlowApi {
        async fn list_columns(&self, _project_id: i64) -> Result<Vec<ColumnRef>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        async fn list_cards(&self, _column_id: i64) -> Result<Vec<CardRef>> {
            Ok(Vec::new())
        }

        async fn get_issue(&self, url: &str) -> Result<IssueResource> {
            Err(GhpError::fetch(url, "unreachable"))
        }

        async fn get_repository(&self, url: &str) -> Result<RepositoryResource> {
            Err(GhpError::fetch(url, "unreachable"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_deadline() {
        let cache = ResponseCache::new();
        let options = ResolveOptions {
            concurrency: 1,
            timeout: Duration::from_secs(5),
        };

        let result = resolve_board(&SlowApi, &cache, 1, options).await;
        assert!(matches!(result, Err(GhpError::Timeout(5))));
    }
}
