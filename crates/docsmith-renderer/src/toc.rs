//! Table of contents.

use std::fmt::Write;

use crate::block::{Block, Blocks};
use crate::html::escape_html;
use crate::slug::SlugRegistry;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (2 or 3).
    pub level: u8,
    /// Heading text as written in the source.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Collect level-2 and level-3 headings in document order.
///
/// Walks the same block structure as [`render_markdown`](crate::render_markdown),
/// so headings inside code fences are ignored and ids match the rendered body.
#[must_use]
pub fn extract_toc(text: &str) -> Vec<TocEntry> {
    let mut slugs = SlugRegistry::new();
    let mut entries = Vec::new();
    for block in Blocks::new(text) {
        let Block::Heading { level, text } = block else {
            continue;
        };
        // Every heading claims its id, listed or not.
        let id = slugs.unique(text);
        if matches!(level, 2 | 3) {
            entries.push(TocEntry {
                level,
                title: text.to_owned(),
                id,
            });
        }
    }
    entries
}

/// Render entries as a run of anchor links.
///
/// Returns an empty string for no entries; callers supply their own
/// placeholder.
#[must_use]
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let class = if entry.level == 3 { "toc-sub" } else { "toc-main" };
        write!(
            out,
            r##"<a class="toc-link {class}" href="#{}">{}</a>"##,
            escape_html(&entry.id),
            escape_html(&entry.title)
        )
        .unwrap();
    }
    out
}
