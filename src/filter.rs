//! Substring filters for board cards.
//!
//! A filter is a disjunction of conjunctions: each `--filter a,b` flag adds
//! one group whose terms must all appear in a card's match-text, and a card
//! is shown when any group matches. Matching is case-sensitive.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    groups: Vec<Vec<String>>,
}

impl Filter {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    /// Build a filter from raw `--filter` values, splitting each on commas.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let groups = args
            .iter()
            .map(|arg| arg.as_ref().split(',').map(str::to_string).collect())
            .collect();
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// True when the filter is empty or some group has all of its terms in `text`.
    pub fn matches(&self, text: &str) -> bool {
        if self.groups.is_empty() {
            return true;
        }
        self.groups
            .iter()
            .any(|group| group.iter().all(|term| text.contains(term.as_str())))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .groups
            .iter()
            .map(|group| format!("({})", group.join(" AND ")))
            .collect();
        write!(f, "{}", rendered.join(" OR "))
    }
}
