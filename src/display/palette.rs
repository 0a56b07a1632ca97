//! Stable terminal colours for identifiers, labels and assignees.
//!
//! Every string maps to the same RGB colour on every run, so a repository or
//! label is recognisable at a glance across listings. Colour is applied to
//! already laid-out segments and never affects widths.

use owo_colors::OwoColorize;

/// Lowest channel value, keeps colours readable on dark backgrounds
const MIN_CHANNEL: u8 = 64;

/// RGB colour derived from a hash of `key`
pub fn stable_rgb(key: &str) -> (u8, u8, u8) {
    let hash = blake3::hash(key.as_bytes());
    let bytes = hash.as_bytes();
    let channel = |b: u8| MIN_CHANNEL + ((b as u16 * (255 - MIN_CHANNEL) as u16) / 255) as u8;
    (channel(bytes[0]), channel(bytes[1]), channel(bytes[2]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn header(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colour `text` by its own content
    pub fn stable(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let (r, g, b) = stable_rgb(text);
        text.truecolor(r, g, b).to_string()
    }

    /// Comma-joined labels, each in its own colour
    pub fn labels(&self, labels: &[String]) -> String {
        labels
            .iter()
            .map(|label| self.stable(label))
            .collect::<Vec<_>>()
            .join(",")
    }
}
