//! Aligned board listing.
//!
//! Rendering is two passes over a resolved [`Board`]. The first measures the
//! widest issue identifier and assignee among the visible cards of the whole
//! board, so those fields line up across every column. The second lays out
//! one line per visible card inside the target width:
//!
//! ```text
//!   proj#42 Fix the parser           bug  @alice
//!   note:   remember to deploy
//! ```
//!
//! Titles shrink first; when even a short title no longer fits next to the
//! labels, labels are dropped. All arithmetic clamps at zero, so very narrow
//! terminals produce short lines rather than panics.

pub mod palette;

use crate::board::Board;
use crate::card::{Card, Issue, Note};
use crate::filter::Filter;
use crate::utils::{char_len, clamp_width, pad, truncate_with_ellipsis};

pub use palette::Palette;

/// Columns kept free at the right edge of the terminal
pub const LINE_MARGIN: usize = 3;

/// Widest terminal the layout accepts
pub const MAX_COLUMNS: usize = u16::MAX as usize;

/// Indent of every card line
pub const LINE_INDENT: &str = "  ";

/// Identifier placeholder for note cards
const NOTE_LABEL: &str = "note:";

/// Below this much room per title (plus labels) the labels are dropped
const MIN_TITLE_ROOM: isize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target line width, margin already removed
    pub width: usize,
    pub color: bool,
}

impl RenderOptions {
    /// Options for a terminal `columns` wide, capped at [`MAX_COLUMNS`]
    pub fn for_terminal(columns: usize, color: bool) -> Self {
        Self {
            width: columns.min(MAX_COLUMNS).saturating_sub(LINE_MARGIN),
            color,
        }
    }
}

/// Board-wide field sizes, in codepoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldWidths {
    pub max_id: usize,
    pub max_assignee: usize,
}

impl FieldWidths {
    /// Measure every visible issue on the board
    pub fn measure(board: &Board, filter: &Filter) -> Self {
        board
            .visible_issues(filter)
            .fold(FieldWidths::default(), |widths, issue| FieldWidths {
                max_id: widths.max_id.max(char_len(&issue.identifier())),
                max_assignee: widths
                    .max_assignee
                    .max(issue.assignee.as_deref().map(char_len).unwrap_or(0)),
            })
    }

    pub fn id_field(&self) -> usize {
        self.max_id + 1
    }

    pub fn assignee_field(&self) -> usize {
        self.max_assignee + 2
    }
}

/// Render the cards matching `filter` for a terminal `terminal_width` columns wide.
pub fn render(board: &Board, filter: &Filter, terminal_width: usize) -> Vec<String> {
    render_with(
        board,
        filter,
        RenderOptions::for_terminal(terminal_width, false),
    )
}

pub fn render_with(board: &Board, filter: &Filter, options: RenderOptions) -> Vec<String> {
    let widths = FieldWidths::measure(board, filter);
    let palette = Palette::new(options.color);
    let mut lines = Vec::new();

    for (index, column) in board.columns.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(palette.header(&format!("{}:", column.name)));

        for card in column.visible_cards(filter) {
            let line = match card {
                Card::Issue(issue) => issue_line(issue, &widths, options.width, &palette),
                Card::Note(note) => note_line(note, &widths, options.width),
            };
            lines.push(line);
        }
    }

    lines
}

/// `note:` padded to the identifier field, then the first line of text
pub fn note_line(note: &Note, widths: &FieldWidths, width: usize) -> String {
    let id_field = widths.id_field();
    let id_pad = pad(id_field.saturating_sub(char_len(NOTE_LABEL)));
    let text = truncate_with_ellipsis(note.first_line(), width.saturating_sub(id_field));
    format!("{LINE_INDENT}{NOTE_LABEL}{id_pad}{text}")
}

/// Identifier, title, labels and assignee laid out inside `width`
pub fn issue_line(issue: &Issue, widths: &FieldWidths, width: usize, palette: &Palette) -> String {
    let width = width.min(MAX_COLUMNS);
    let id = issue.identifier();
    let id_field = widths.id_field() as isize;
    let assignee_field = widths.assignee_field() as isize;

    let title_len = char_len(&issue.title) as isize;
    let labels_len = char_len(&issue.label_string()) as isize;
    let remain = width as isize - id_field - assignee_field;

    let (title, flex, show_labels) = if remain > labels_len + 1 + title_len {
        (issue.title.clone(), remain - (1 + labels_len + title_len), true)
    } else if remain < MIN_TITLE_ROOM + labels_len {
        let flex = if remain > title_len { remain - title_len } else { 0 };
        (
            truncate_with_ellipsis(&issue.title, clamp_width(remain - 1)),
            flex,
            false,
        )
    } else {
        (
            truncate_with_ellipsis(&issue.title, clamp_width(remain - labels_len - 1)),
            0,
            true,
        )
    };

    let mut line = format!(
        "{LINE_INDENT}{}{}{}{}",
        palette.stable(&id),
        pad(clamp_width(id_field - char_len(&id) as isize)),
        title,
        pad(clamp_width(flex)),
    );

    if show_labels {
        line.push(' ');
        line.push_str(&palette.labels(&issue.labels));
    }

    if let Some(login) = &issue.assignee {
        let mention = format!("@{login}");
        line.push(' ');
        line.push_str(&pad(clamp_width(assignee_field - char_len(&mention) as isize)));
        line.push_str(&palette.stable(&mention));
    }

    line
}
