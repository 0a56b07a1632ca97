use serde::Serialize;

use crate::card::{Card, Issue};
use crate::filter::Filter;

/// An ordered bucket of cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub id: i64,
    pub url: String,
    pub cards: Vec<Card>,
}

impl Column {
    /// Cards that pass `filter`, in board order
    pub fn visible_cards<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |card| card.matches(filter))
    }
}

/// A fully resolved project board
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Every issue card on the board that passes `filter`
    pub fn visible_issues<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Issue> + 'a {
        self.columns
            .iter()
            .flat_map(move |column| column.visible_cards(filter))
            .filter_map(Card::as_issue)
    }

    /// Copy of the board keeping only the cards that pass `filter`
    pub fn filtered(&self, filter: &Filter) -> Board {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                id: column.id,
                url: column.url.clone(),
                cards: column.visible_cards(filter).cloned().collect(),
            })
            .collect();
        Board { columns }
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}
