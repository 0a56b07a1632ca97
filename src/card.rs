//! Board cards: free-text notes and issue references.

use jiff::Timestamp;
use serde::Serialize;

use crate::filter::Filter;
use crate::remote::{IssueResource, IssueState, RepositoryResource};

/// A single card on a project board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Note(Note),
    Issue(Issue),
}

impl Card {
    /// URL of the board card (not of the referenced issue)
    pub fn url(&self) -> &str {
        match self {
            Card::Note(note) => &note.url,
            Card::Issue(issue) => &issue.url,
        }
    }

    /// One-line description used for plain listings
    pub fn description(&self) -> String {
        match self {
            Card::Note(note) => note.description(),
            Card::Issue(issue) => issue.description(),
        }
    }

    pub fn matches(&self, filter: &Filter) -> bool {
        match self {
            Card::Note(note) => note.matches(filter),
            Card::Issue(issue) => issue.matches(filter),
        }
    }

    pub fn as_issue(&self) -> Option<&Issue> {
        match self {
            Card::Issue(issue) => Some(issue),
            Card::Note(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub url: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl Note {
    pub fn description(&self) -> String {
        format!("note: {}", self.text)
    }

    pub fn match_text(&self) -> String {
        format!("note {}", self.text)
    }

    pub fn matches(&self, filter: &Filter) -> bool {
        filter.is_empty() || filter.matches(&self.match_text())
    }

    /// Text up to the first line break
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub url: String,
    pub created_at: Timestamp,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub repository: String,
}

impl Issue {
    /// Combine a card with the issue and repository it references
    pub fn from_resources(
        card_url: String,
        created_at: Timestamp,
        issue: IssueResource,
        repository: &RepositoryResource,
    ) -> Self {
        Self {
            url: card_url,
            created_at,
            number: issue.number,
            title: issue.title,
            state: issue.state,
            assignee: issue.assignee.map(|a| a.login),
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            repository: repository.name.clone(),
        }
    }

    /// `<repository>#<number>`
    pub fn identifier(&self) -> String {
        format!("{}#{}", self.repository, self.number)
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    pub fn label_string(&self) -> String {
        self.labels.join(",")
    }

    pub fn description(&self) -> String {
        let mut res = format!("issue: {}", self.identifier());
        if self.is_closed() {
            res.push_str("(closed)");
        }
        res.push(' ');
        res.push_str(&self.title);
        res.push(' ');
        if let Some(login) = &self.assignee {
            res.push('@');
            res.push_str(login);
            res.push(' ');
        }
        res.push_str(&self.label_string());
        res
    }

    /// Match-text: the description, plus "unassigned" when nobody is assigned
    pub fn match_text(&self) -> String {
        let mut text = format!("issue {}", self.description());
        if self.assignee.is_none() {
            text.push_str(" unassigned");
        }
        text
    }

    pub fn matches(&self, filter: &Filter) -> bool {
        filter.is_empty() || filter.matches(&self.match_text())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn note(text: &str) -> Note {
        Note {
            url: "https://api.github.com/projects/columns/cards/1".to_string(),
            text: text.to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(crate) fn issue(
        repository: &str,
        number: u64,
        title: &str,
        assignee: Option<&str>,
        labels: &[&str],
    ) -> Issue {
        Issue {
            url: format!("https://api.github.com/projects/columns/cards/{number}"),
            created_at: Timestamp::UNIX_EPOCH,
            number,
            title: title.to_string(),
            state: IssueState::Open,
            assignee: assignee.map(str::to_string),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            repository: repository.to_string(),
        }
    }

    fn filter(groups: &[&[&str]]) -> Filter {
        Filter::new(
            groups
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_note_matching() {
        let n = note("fix bug");
        assert!(n.matches(&filter(&[&["fix"]])));
        assert!(!n.matches(&filter(&[&["nope"]])));
        assert!(n.matches(&Filter::default()));
    }

    #[test]
    fn test_note_match_text_has_prefix() {
        let n = note("fix bug");
        assert!(n.matches(&filter(&[&["note", "bug"]])));
        assert!(!n.matches(&filter(&[&["issue"]])));
    }

    #[test]
    fn test_issue_unassigned_matching() {
        let i = issue("proj", 1, "x", None, &[]);
        assert!(i.matches(&filter(&[&["unassigned"]])));

        let assigned = issue("proj", 1, "x", Some("alice"), &[]);
        assert!(!assigned.matches(&filter(&[&["unassigned"]])));
        assert!(assigned.matches(&filter(&[&["@alice"]])));
    }

    #[test]
    fn test_issue_description() {
        let mut i = issue("proj", 42, "Fix the parser", Some("alice"), &["bug", "p1"]);
        assert_eq!(i.description(), "issue: proj#42 Fix the parser @alice bug,p1");

        i.state = IssueState::Closed;
        i.assignee = None;
        assert_eq!(i.description(), "issue: proj#42(closed) Fix the parser bug,p1");
    }

    #[test]
    fn test_issue_matches_labels_and_state() {
        let mut i = issue("proj", 42, "Fix the parser", None, &["bug"]);
        i.state = IssueState::Closed;
        assert!(i.matches(&filter(&[&["(closed)", "bug"]])));
        assert!(i.matches(&filter(&[&["proj#42"]])));
        assert!(!i.matches(&filter(&[&["proj#43"]])));
    }

    #[test]
    fn test_note_first_line() {
        assert_eq!(note("first\nsecond").first_line(), "first");
        assert_eq!(note("").first_line(), "");
    }

    #[test]
    fn test_card_dispatch() {
        let card = Card::Issue(issue("proj", 7, "Title", None, &[]));
        assert_eq!(card.url(), "https://api.github.com/projects/columns/cards/7");
        assert!(card.as_issue().is_some());
        assert!(Card::Note(note("n")).as_issue().is_none());
    }

    #[test]
    fn test_card_description_per_variant() {
        assert_eq!(
            Card::Note(note("remember to deploy")).description(),
            "note: remember to deploy"
        );
        assert_eq!(
            Card::Issue(issue("proj", 7, "Title", None, &["docs"])).description(),
            "issue: proj#7 Title docs"
        );
    }

    #[test]
    fn test_card_serializes_with_type_tag() {
        let card = Card::Note(note("hello"));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "note");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn test_issue_from_resources() {
        let resource: IssueResource = serde_json::from_str(
            r#"{
                "url": "https://api.github.com/repos/acme/proj/issues/42",
                "repository_url": "https://api.github.com/repos/acme/proj",
                "number": 42,
                "title": "Fix the parser",
                "state": "open",
                "assignee": null,
                "labels": [{"name": "bug"}]
            }"#,
        )
        .unwrap();
        let repository = RepositoryResource {
            name: "proj".to_string(),
            full_name: "acme/proj".to_string(),
            url: "https://api.github.com/repos/acme/proj".to_string(),
        };

        let i = Issue::from_resources(
            "https://api.github.com/projects/columns/cards/9".to_string(),
            Timestamp::UNIX_EPOCH,
            resource,
            &repository,
        );

        assert_eq!(i.url, "https://api.github.com/projects/columns/cards/9");
        assert_eq!(i.identifier(), "proj#42");
        assert_eq!(i.labels, vec!["bug".to_string()]);
        assert!(i.assignee.is_none());
    }
}
